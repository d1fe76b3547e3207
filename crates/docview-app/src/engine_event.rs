//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`, so subscribers see a consistent view of state
//! changes. The headless runner serializes them as JSON lines.

use serde::Serialize;

use docview_render::{CodeBlockId, CopyState};

/// How a diagram render ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiagramOutcome {
    Rendered,
    Failed { message: String },
}

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// A new page was derived for the active document
    DocumentChanged {
        id: String,
        title: String,
        placeholder: bool,
    },

    /// The content viewport should return to the top
    ScrollToTop,

    /// The mobile navigation overlay opened or closed
    MobileMenuChanged { open: bool },

    /// The sidebar filter changed
    MenuFiltered { query: String, matches: usize },

    // ─────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────
    /// A diagram on the live page reached Rendered or Failed
    DiagramSettled {
        diagram_id: String,
        outcome: DiagramOutcome,
    },

    /// A code panel's copy confirmation changed
    CopyStateChanged { block: CodeBlockId, state: CopyState },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DocumentChanged { .. } => "document_changed",
            Self::ScrollToTop => "scroll_to_top",
            Self::MobileMenuChanged { .. } => "mobile_menu_changed",
            Self::MenuFiltered { .. } => "menu_filtered",
            Self::DiagramSettled { .. } => "diagram_settled",
            Self::CopyStateChanged { .. } => "copy_state_changed",
            Self::Shutdown => "shutdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_matches_serialized_tag() {
        let events = vec![
            EngineEvent::DocumentChanged {
                id: "a".to_string(),
                title: "A".to_string(),
                placeholder: false,
            },
            EngineEvent::ScrollToTop,
            EngineEvent::MobileMenuChanged { open: true },
            EngineEvent::MenuFiltered {
                query: "q".to_string(),
                matches: 0,
            },
            EngineEvent::DiagramSettled {
                diagram_id: "d".to_string(),
                outcome: DiagramOutcome::Rendered,
            },
            EngineEvent::CopyStateChanged {
                block: CodeBlockId(0),
                state: CopyState::Copied,
            },
            EngineEvent::Shutdown,
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.event_type());
        }
    }

    #[test]
    fn test_failed_outcome_serializes_message() {
        let event = EngineEvent::DiagramSettled {
            diagram_id: "intro-diagram-0".to_string(),
            outcome: DiagramOutcome::Failed {
                message: "Parse error".to_string(),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["message"], "Parse error");
    }
}

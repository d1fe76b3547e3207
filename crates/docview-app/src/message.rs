//! Message types for the application (TEA pattern)

use docview_render::{CodeBlockId, DiagramError, Graphic};

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Make `id` the active document (any id is accepted)
    SelectDocument { id: String },

    /// Select the entry before the active one, if any
    SelectPrevious,

    /// Select the entry after the active one, if any
    SelectNext,

    /// Open/close the mobile navigation overlay
    ToggleMobileMenu,

    /// Close the mobile navigation overlay
    CloseMobileMenu,

    /// Sidebar search query changed
    SearchChanged { query: String },

    // ─────────────────────────────────────────────────────────
    // Diagram Rendering
    // ─────────────────────────────────────────────────────────
    /// A diagram engine call finished
    DiagramRendered {
        epoch: u64,
        diagram_id: String,
        version: u64,
        result: Result<Graphic, DiagramError>,
    },

    // ─────────────────────────────────────────────────────────
    // Copy Action
    // ─────────────────────────────────────────────────────────
    /// User pressed the copy button of a code panel
    CopyCode { block: CodeBlockId },

    /// Clipboard write succeeded
    CopySucceeded { epoch: u64, block: CodeBlockId },

    /// Clipboard write failed (logged only)
    CopyFailed {
        epoch: u64,
        block: CodeBlockId,
        error: String,
    },

    /// The "Copied" confirmation delay elapsed
    CopyFeedbackExpired {
        epoch: u64,
        block: CodeBlockId,
        token: u64,
    },

    /// Stop the viewer
    Quit,
}

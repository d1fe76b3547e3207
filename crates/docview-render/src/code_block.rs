//! Code block presentation
//!
//! Decides how a code region is shown: inline code, a styled panel with a
//! copy action, or a diagram delegated to the diagram renderer.

use serde::Serialize;

/// Reserved language tag that routes a fenced block to the diagram renderer.
pub const DEFAULT_DIAGRAM_LANGUAGE: &str = "mermaid";

/// Whether a code region is inline code or a fenced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Inline,
    Fenced,
}

/// Classify a code region.
///
/// A region is fenced when it carries a language annotation or its content
/// contains a line break; anything else is inline code.
pub fn classify(content: &str, language: Option<&str>) -> CodeKind {
    let has_language = language.is_some_and(|l| !l.is_empty());
    if has_language || content.contains('\n') {
        CodeKind::Fenced
    } else {
        CodeKind::Inline
    }
}

/// Strip exactly one trailing newline.
pub fn strip_trailing_newline(content: &str) -> &str {
    content.strip_suffix('\n').unwrap_or(content)
}

/// Language tag from a fenced block info string (`rust,ignore` -> `rust`).
pub fn language_from_info(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

/// Per-document identifier of a code panel, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CodeBlockId(pub usize);

impl std::fmt::Display for CodeBlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A styled code panel with a language label and copy action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodePanel {
    pub id: CodeBlockId,
    pub language: Option<String>,
    /// Exact text placed on the clipboard (trailing newline stripped).
    pub code: String,
}

/// A fenced block routed to the diagram renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramBlock {
    /// Stable for the same block across re-renders, unique within a page.
    pub id: String,
    /// Raw diagram source, trailing newline stripped, entities not yet decoded.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "presentation", rename_all = "snake_case")]
pub enum CodePresentation {
    Panel(CodePanel),
    Diagram(DiagramBlock),
}

/// Allocates code panel and diagram ids for one document.
#[derive(Debug)]
pub struct BlockIds {
    diagram_prefix: String,
    next_panel: usize,
    next_diagram: usize,
}

impl BlockIds {
    pub fn new(document_id: &str) -> Self {
        let slug = crate::toc::slugify(document_id);
        let prefix = if slug.is_empty() { "doc" } else { &slug };
        Self {
            diagram_prefix: format!("{prefix}-diagram"),
            next_panel: 0,
            next_diagram: 0,
        }
    }

    fn panel(&mut self) -> CodeBlockId {
        let id = CodeBlockId(self.next_panel);
        self.next_panel += 1;
        id
    }

    fn diagram(&mut self) -> String {
        let id = format!("{}-{}", self.diagram_prefix, self.next_diagram);
        self.next_diagram += 1;
        id
    }
}

/// Chooses between diagram delegation and a plain code panel.
#[derive(Debug, Clone)]
pub struct CodeBlockPresenter {
    diagram_language: String,
}

impl Default for CodeBlockPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_DIAGRAM_LANGUAGE)
    }
}

impl CodeBlockPresenter {
    pub fn new(diagram_language: impl Into<String>) -> Self {
        Self {
            diagram_language: diagram_language.into(),
        }
    }

    pub fn diagram_language(&self) -> &str {
        &self.diagram_language
    }

    pub fn is_diagram(&self, language: Option<&str>) -> bool {
        language == Some(self.diagram_language.as_str())
    }

    /// Present a fenced block.
    pub fn present(
        &self,
        ids: &mut BlockIds,
        content: &str,
        language: Option<&str>,
    ) -> CodePresentation {
        let trimmed = strip_trailing_newline(content).to_string();
        if self.is_diagram(language) {
            CodePresentation::Diagram(DiagramBlock {
                id: ids.diagram(),
                source: trimmed,
            })
        } else {
            CodePresentation::Panel(CodePanel {
                id: ids.panel(),
                language: language.map(str::to_string),
                code: trimmed,
            })
        }
    }
}

/// Copy-confirmation state of a code panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyState {
    #[default]
    Idle,
    Copied,
}

/// Copy feedback for one panel.
///
/// Each successful copy returns a token; only the revert carrying the latest
/// token moves the panel back to Idle, so a second copy within the delay is
/// not cut short by the first timer.
#[derive(Debug, Clone, Default)]
pub struct CopyFeedback {
    state: CopyState,
    token: u64,
}

impl CopyFeedback {
    pub fn state(&self) -> CopyState {
        self.state
    }

    /// Enter Copied; returns the token the revert must present.
    pub fn mark_copied(&mut self) -> u64 {
        self.token += 1;
        self.state = CopyState::Copied;
        self.token
    }

    /// Revert to Idle if `token` is the latest. Returns whether it applied.
    pub fn expire(&mut self, token: u64) -> bool {
        if token == self.token && self.state == CopyState::Copied {
            self.state = CopyState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_language_or_newline_is_fenced() {
        assert_eq!(classify("x", Some("rust")), CodeKind::Fenced);
        assert_eq!(classify("a\nb", None), CodeKind::Fenced);
        assert_eq!(classify("one line\n", None), CodeKind::Fenced);
        assert_eq!(classify("npm i", None), CodeKind::Inline);
        assert_eq!(classify("npm i", Some("")), CodeKind::Inline);
    }

    #[test]
    fn test_strip_trailing_newline_strips_one() {
        assert_eq!(
            strip_trailing_newline("line one\nline two\n"),
            "line one\nline two"
        );
        assert_eq!(strip_trailing_newline("a\n\n"), "a\n");
        assert_eq!(strip_trailing_newline("a"), "a");
    }

    #[test]
    fn test_language_from_info() {
        assert_eq!(language_from_info("rust"), Some("rust".to_string()));
        assert_eq!(language_from_info("rust,ignore"), Some("rust".to_string()));
        assert_eq!(
            language_from_info("mermaid  title=x"),
            Some("mermaid".to_string())
        );
        assert_eq!(language_from_info(""), None);
        assert_eq!(language_from_info("   "), None);
    }

    #[test]
    fn test_present_routes_diagram_language() {
        let presenter = CodeBlockPresenter::default();
        let mut ids = BlockIds::new("Intro");

        let first = presenter.present(&mut ids, "graph TD\nA-->B\n", Some("mermaid"));
        let second = presenter.present(&mut ids, "graph LR\nB-->C\n", Some("mermaid"));

        assert_eq!(
            first,
            CodePresentation::Diagram(DiagramBlock {
                id: "intro-diagram-0".to_string(),
                source: "graph TD\nA-->B".to_string(),
            })
        );
        assert!(matches!(second, CodePresentation::Diagram(d) if d.id == "intro-diagram-1"));
    }

    #[test]
    fn test_present_panel_keeps_language_and_strips_newline() {
        let presenter = CodeBlockPresenter::default();
        let mut ids = BlockIds::new("intro");

        let panel = presenter.present(&mut ids, "line one\nline two\n", Some("bash"));
        assert_eq!(
            panel,
            CodePresentation::Panel(CodePanel {
                id: CodeBlockId(0),
                language: Some("bash".to_string()),
                code: "line one\nline two".to_string(),
            })
        );
    }

    #[test]
    fn test_diagram_language_match_is_exact() {
        let presenter = CodeBlockPresenter::new("mermaid");
        assert!(presenter.is_diagram(Some("mermaid")));
        assert!(!presenter.is_diagram(Some("Mermaid")));
        assert!(!presenter.is_diagram(None));
    }

    #[test]
    fn test_copy_feedback_only_latest_token_reverts() {
        let mut feedback = CopyFeedback::default();
        assert_eq!(feedback.state(), CopyState::Idle);

        let first = feedback.mark_copied();
        let second = feedback.mark_copied();
        assert_eq!(feedback.state(), CopyState::Copied);

        assert!(!feedback.expire(first));
        assert_eq!(feedback.state(), CopyState::Copied);

        assert!(feedback.expire(second));
        assert_eq!(feedback.state(), CopyState::Idle);
        assert!(!feedback.expire(second));
    }
}

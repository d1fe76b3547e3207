//! Diagram render lifecycle
//!
//! [`DiagramRenderer`] owns one diagram's [`RenderState`]. It does not call the
//! diagram engine itself: [`DiagramRenderer::set_source`] hands back a
//! [`RenderRequest`] for the caller to run asynchronously, and the outcome is
//! fed back through [`DiagramRenderer::complete`]. Every request carries the
//! instance's version at the time it was issued; completions for any older
//! version are discarded, so the last input wins regardless of completion
//! order.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Rendered graphic markup (SVG).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graphic {
    pub markup: String,
}

impl Graphic {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

/// Failures reported by a diagram engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    /// The diagram description could not be parsed.
    #[error("{0}")]
    Syntax(String),

    #[error("diagram engine unavailable: {0}")]
    Unavailable(String),

    #[error("diagram engine failed: {0}")]
    Engine(String),
}

/// Lifecycle of one diagram instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Rendering,
    Rendered(Graphic),
    Failed(String),
}

impl RenderState {
    pub fn is_settled(&self) -> bool {
        matches!(self, RenderState::Rendered(_) | RenderState::Failed(_))
    }
}

/// Work order for the diagram engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub diagram_id: String,
    pub version: u64,
    /// Entity-decoded source, ready for the engine.
    pub source: String,
}

/// What the diagram panel should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramView<'a> {
    /// Nothing to show yet: empty source or render in flight.
    Loading,
    Graphic(&'a str),
    Failed { message: &'a str, source: &'a str },
}

/// Decode the HTML entities upstream markdown stages may have applied to a
/// diagram source.
///
/// `&amp;` is decoded last so `&amp;lt;` becomes `&lt;`, not `<`.
pub fn decode_entities(source: &str) -> String {
    if !source.contains('&') {
        return source.to_string();
    }
    source
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// One diagram instance on a page.
#[derive(Debug, Clone)]
pub struct DiagramRenderer {
    id: String,
    source: String,
    version: u64,
    state: RenderState,
}

impl DiagramRenderer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: String::new(),
            version: 0,
            state: RenderState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Feed new source text.
    ///
    /// Returns a request when a render should start. Unchanged source is a
    /// no-op once a render has been issued for it. Whitespace-only source never
    /// renders; it still bumps the version so an in-flight render for older
    /// source cannot land.
    pub fn set_source(&mut self, code: &str) -> Option<RenderRequest> {
        if code == self.source && self.state != RenderState::Idle {
            return None;
        }

        self.source = code.to_string();
        self.version += 1;

        if code.trim().is_empty() {
            self.state = RenderState::Idle;
            return None;
        }

        self.state = RenderState::Rendering;
        Some(RenderRequest {
            diagram_id: self.id.clone(),
            version: self.version,
            source: decode_entities(code),
        })
    }

    /// Apply an engine outcome. Returns `false` when the outcome is stale.
    pub fn complete(&mut self, version: u64, outcome: Result<Graphic, DiagramError>) -> bool {
        if version != self.version || self.state != RenderState::Rendering {
            debug!(
                diagram = %self.id,
                version,
                current = self.version,
                "Discarding stale diagram render"
            );
            return false;
        }

        self.state = match outcome {
            Ok(graphic) => RenderState::Rendered(graphic),
            Err(e) => {
                warn!(diagram = %self.id, "Diagram render failed: {}", e);
                RenderState::Failed(e.to_string())
            }
        };
        true
    }

    pub fn view(&self) -> DiagramView<'_> {
        match &self.state {
            RenderState::Idle | RenderState::Rendering => DiagramView::Loading,
            RenderState::Rendered(graphic) => DiagramView::Graphic(&graphic.markup),
            RenderState::Failed(message) => DiagramView::Failed {
                message,
                source: &self.source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOW: &str = "graph TD\nA-->B";

    #[test]
    fn test_new_instance_is_idle_and_loading() {
        let diagram = DiagramRenderer::new("d-0");
        assert_eq!(diagram.state(), &RenderState::Idle);
        assert_eq!(diagram.view(), DiagramView::Loading);
    }

    #[test]
    fn test_set_source_enters_rendering() {
        let mut diagram = DiagramRenderer::new("d-0");
        let request = diagram.set_source(FLOW).unwrap();

        assert_eq!(request.diagram_id, "d-0");
        assert_eq!(request.version, 1);
        assert_eq!(request.source, FLOW);
        assert_eq!(diagram.state(), &RenderState::Rendering);
        assert_eq!(diagram.view(), DiagramView::Loading);
    }

    #[test]
    fn test_blank_source_never_renders() {
        let mut diagram = DiagramRenderer::new("d-0");
        assert!(diagram.set_source("").is_none());
        assert!(diagram.set_source("  \n\t").is_none());
        assert_eq!(diagram.state(), &RenderState::Idle);
        assert_eq!(diagram.view(), DiagramView::Loading);
    }

    #[test]
    fn test_unchanged_source_is_noop() {
        let mut diagram = DiagramRenderer::new("d-0");
        assert!(diagram.set_source(FLOW).is_some());
        assert!(diagram.set_source(FLOW).is_none());
        assert_eq!(diagram.version(), 1);
    }

    #[test]
    fn test_success_shows_graphic() {
        let mut diagram = DiagramRenderer::new("d-0");
        let request = diagram.set_source(FLOW).unwrap();

        assert!(diagram.complete(request.version, Ok(Graphic::new("<svg/>"))));
        assert_eq!(diagram.view(), DiagramView::Graphic("<svg/>"));
    }

    #[test]
    fn test_failure_shows_message_and_raw_source() {
        let mut diagram = DiagramRenderer::new("d-0");
        let raw = "graph TD\nA--&gt;";
        let request = diagram.set_source(raw).unwrap();

        assert!(diagram.complete(
            request.version,
            Err(DiagramError::Syntax("Parse error on line 2".to_string()))
        ));
        assert_eq!(
            diagram.view(),
            DiagramView::Failed {
                message: "Parse error on line 2",
                source: raw,
            }
        );
    }

    #[test]
    fn test_stale_completion_after_newer_is_discarded() {
        let mut diagram = DiagramRenderer::new("d-0");
        let a = diagram.set_source("graph TD\nA-->B").unwrap();
        let b = diagram.set_source("graph TD\nB-->C").unwrap();

        // B finishes first, then A's late result arrives.
        assert!(diagram.complete(b.version, Ok(Graphic::new("<svg>B</svg>"))));
        assert!(!diagram.complete(a.version, Ok(Graphic::new("<svg>A</svg>"))));

        assert_eq!(diagram.view(), DiagramView::Graphic("<svg>B</svg>"));
    }

    #[test]
    fn test_stale_completion_while_newer_in_flight_keeps_loading() {
        let mut diagram = DiagramRenderer::new("d-0");
        let a = diagram.set_source("graph TD\nA-->B").unwrap();
        let _b = diagram.set_source("graph TD\nB-->C").unwrap();

        assert!(!diagram.complete(a.version, Err(DiagramError::Syntax("boom".into()))));
        assert_eq!(diagram.state(), &RenderState::Rendering);
        assert_eq!(diagram.view(), DiagramView::Loading);
    }

    #[test]
    fn test_clearing_source_invalidates_in_flight_render() {
        let mut diagram = DiagramRenderer::new("d-0");
        let a = diagram.set_source(FLOW).unwrap();
        assert!(diagram.set_source("").is_none());

        assert!(!diagram.complete(a.version, Ok(Graphic::new("<svg/>"))));
        assert_eq!(diagram.state(), &RenderState::Idle);
    }

    #[test]
    fn test_new_source_clears_previous_error() {
        let mut diagram = DiagramRenderer::new("d-0");
        let a = diagram.set_source("graph").unwrap();
        diagram.complete(a.version, Err(DiagramError::Syntax("bad".into())));

        let b = diagram.set_source(FLOW).unwrap();
        assert_eq!(diagram.view(), DiagramView::Loading);
        diagram.complete(b.version, Ok(Graphic::new("<svg/>")));
        assert_eq!(diagram.view(), DiagramView::Graphic("<svg/>"));
    }

    #[test]
    fn test_request_source_is_entity_decoded() {
        let mut diagram = DiagramRenderer::new("d-0");
        let request = diagram
            .set_source("graph TD\nA[&quot;x&quot;] --&gt; B &amp; C")
            .unwrap();
        assert_eq!(request.source, "graph TD\nA[\"x\"] --> B & C");
        assert!(diagram.source().contains("&gt;"));
    }

    #[test]
    fn test_decode_entities_order() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("a &lt;b&gt; &#39;c&#39;"), "a <b> 'c'");
        assert_eq!(decode_entities("plain"), "plain");
    }

    #[test]
    fn test_error_display_is_engine_message() {
        assert_eq!(DiagramError::Syntax("Lexical error".into()).to_string(), "Lexical error");
        assert!(DiagramError::Unavailable("mmdc".into())
            .to_string()
            .contains("unavailable"));
    }
}

//! Application state (Model in TEA pattern)

use std::collections::HashMap;

use docview_core::Document;
use docview_render::{
    BlockStates, CodeBlockId, CodeBlockPresenter, ContentTransformer, CopyFeedback, CopyState,
    DiagramRenderer, DiagramView, RenderRequest, RenderState, RenderedDocument,
};

use crate::config::{Catalog, Settings};
use crate::navigator::DocumentNavigator;

/// Lifecycle phase of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

// ─────────────────────────────────────────────────────────────────────────────
// Page State
// ─────────────────────────────────────────────────────────────────────────────

/// Everything derived from the active document.
///
/// A page is rebuilt from scratch whenever the active document changes and
/// tagged with a fresh `epoch`. Async completions carry the epoch they were
/// issued under; a mismatch means the instance they target has been
/// discarded.
#[derive(Debug, Clone)]
pub struct PageState {
    pub epoch: u64,
    pub document: Document,
    pub has_content: bool,
    pub rendered: RenderedDocument,
    pub diagrams: HashMap<String, DiagramRenderer>,
    pub copy: HashMap<CodeBlockId, CopyFeedback>,
}

impl PageState {
    /// Build a page and the diagram renders it needs.
    pub fn derive(
        epoch: u64,
        document: Document,
        has_content: bool,
        transformer: &ContentTransformer,
    ) -> (Self, Vec<RenderRequest>) {
        let rendered = transformer.transform(&document.id, &document.body);

        let mut diagrams = HashMap::with_capacity(rendered.diagrams.len());
        let mut requests = Vec::new();
        for block in &rendered.diagrams {
            let mut renderer = DiagramRenderer::new(block.id.clone());
            if let Some(request) = renderer.set_source(&block.source) {
                requests.push(request);
            }
            diagrams.insert(block.id.clone(), renderer);
        }

        let copy = rendered
            .panels
            .iter()
            .map(|panel| (panel.id, CopyFeedback::default()))
            .collect();

        let page = Self {
            epoch,
            document,
            has_content,
            rendered,
            diagrams,
            copy,
        };
        (page, requests)
    }

    /// Whether any diagram on the page still has a render in flight.
    pub fn is_rendering(&self) -> bool {
        self.diagrams
            .values()
            .any(|d| matches!(d.state(), RenderState::Rendering))
    }
}

impl BlockStates for PageState {
    fn diagram(&self, id: &str) -> DiagramView<'_> {
        self.diagrams
            .get(id)
            .map(DiagramRenderer::view)
            .unwrap_or(DiagramView::Loading)
    }

    fn copy_state(&self, block: CodeBlockId) -> CopyState {
        self.copy
            .get(&block)
            .map(CopyFeedback::state)
            .unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App State
// ─────────────────────────────────────────────────────────────────────────────

/// Complete application state (the Model)
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,

    pub settings: Settings,

    pub navigator: DocumentNavigator,

    pub transformer: ContentTransformer,

    /// Mobile navigation overlay
    pub mobile_menu_open: bool,

    /// Sidebar search filter
    pub search_query: String,

    /// Page derived from the active document
    pub page: Option<PageState>,

    next_epoch: u64,
}

impl AppState {
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        let navigator = DocumentNavigator::new(catalog.menu, catalog.content)
            .with_placeholder(settings.content.placeholder());
        let transformer =
            ContentTransformer::new(CodeBlockPresenter::new(settings.diagram.language.clone()));

        Self {
            phase: AppPhase::Running,
            settings,
            navigator,
            transformer,
            mobile_menu_open: false,
            search_query: String::new(),
            page: None,
            next_epoch: 0,
        }
    }

    /// Document to select at startup: the configured default, else the first
    /// menu entry.
    pub fn initial_document(&self) -> Option<String> {
        self.settings.content.default_document.clone().or_else(|| {
            self.navigator
                .flattened()
                .entries()
                .first()
                .map(|e| e.id.clone())
        })
    }

    /// Rebuild the page for the active document under a new epoch.
    pub fn rebuild_page(&mut self) -> Vec<RenderRequest> {
        self.next_epoch += 1;
        let (page, requests) = PageState::derive(
            self.next_epoch,
            self.navigator.active_document(),
            self.navigator.has_content(),
            &self.transformer,
        );
        self.page = Some(page);
        requests
    }

    /// Page for the given epoch, if it is still the live one.
    pub fn page_for_epoch(&mut self, epoch: u64) -> Option<&mut PageState> {
        self.page.as_mut().filter(|p| p.epoch == epoch)
    }

    pub fn is_rendering(&self) -> bool {
        self.page.as_ref().is_some_and(PageState::is_rendering)
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }
}

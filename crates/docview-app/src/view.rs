//! Page view derivation
//!
//! [`page_view`] is a pure function of [`AppState`]: every frontend (static
//! export, headless snapshots) renders from its output and never reads state
//! directly.

use serde::Serialize;

use docview_core::{Menu, MenuEntry};
use docview_render::{
    render_blocks, render_outline, BlockStates, CodeBlockId, CopyState, Detached, DiagramView,
    OutlineEntry,
};

use crate::state::AppState;

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    pub id: String,
    pub label: String,
    pub icon: &'static str,
    pub active: bool,
}

/// Sidebar group, already filtered by the search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    pub title: String,
    pub items: Vec<SidebarItem>,
}

/// Previous/next link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub id: String,
    pub label: String,
}

impl From<&MenuEntry> for NavLink {
    fn from(entry: &MenuEntry) -> Self {
        Self {
            id: entry.id.clone(),
            label: entry.label.clone(),
        }
    }
}

/// Diagram status summary for non-HTML consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramStatus {
    pub id: String,
    /// `loading`, `rendered` or `failed`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Code panel summary for non-HTML consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlockStatus {
    pub id: CodeBlockId,
    pub language: Option<String>,
    pub copy_state: CopyState,
}

/// Everything a frontend needs to draw the documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub document_id: String,
    pub title: String,
    pub breadcrumb: String,
    pub placeholder: bool,
    pub sidebar: Vec<SidebarGroup>,
    pub mobile_menu_open: bool,
    pub search_query: String,
    pub content_html: String,
    pub outline: Vec<OutlineEntry>,
    pub outline_html: String,
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
    pub diagrams: Vec<DiagramStatus>,
    pub code_blocks: Vec<CodeBlockStatus>,
}

fn sidebar(menu: &Menu, active_id: Option<&str>) -> Vec<SidebarGroup> {
    menu.groups
        .iter()
        .map(|group| SidebarGroup {
            title: group.title.clone(),
            items: group
                .items
                .iter()
                .map(|entry| SidebarItem {
                    id: entry.id.clone(),
                    label: entry.label.clone(),
                    icon: entry.icon.name(),
                    active: active_id == Some(entry.id.as_str()),
                })
                .collect(),
        })
        .collect()
}

/// Derive the page view from state.
pub fn page_view(state: &AppState) -> PageView {
    let navigator = &state.navigator;
    let adjacent = navigator.adjacent();
    let menu = navigator.menu().filtered(&state.search_query);

    let (document_id, title, placeholder) = match &state.page {
        Some(page) => (
            page.document.id.clone(),
            page.document.title.clone(),
            !page.has_content,
        ),
        None => {
            let document = navigator.active_document();
            (document.id, document.title, !navigator.has_content())
        }
    };

    let (content_html, outline, diagrams, code_blocks) = match &state.page {
        Some(page) => {
            let diagrams = page
                .rendered
                .diagrams
                .iter()
                .map(|block| {
                    let (status, error) = match page.diagram(&block.id) {
                        DiagramView::Loading => ("loading", None),
                        DiagramView::Graphic(_) => ("rendered", None),
                        DiagramView::Failed { message, .. } => ("failed", Some(message.to_string())),
                    };
                    DiagramStatus {
                        id: block.id.clone(),
                        status,
                        error,
                    }
                })
                .collect();
            let code_blocks = page
                .rendered
                .panels
                .iter()
                .map(|panel| CodeBlockStatus {
                    id: panel.id,
                    language: panel.language.clone(),
                    copy_state: page.copy_state(panel.id),
                })
                .collect();
            (
                render_blocks(&page.rendered.blocks, page),
                page.rendered.outline.clone(),
                diagrams,
                code_blocks,
            )
        }
        None => {
            let rendered = state.transformer.transform(&document_id, &navigator.active_document().body);
            (
                render_blocks(&rendered.blocks, &Detached),
                rendered.outline,
                Vec::new(),
                Vec::new(),
            )
        }
    };

    PageView {
        breadcrumb: navigator.breadcrumb().to_string(),
        sidebar: sidebar(&menu, navigator.active_id()),
        mobile_menu_open: state.mobile_menu_open,
        search_query: state.search_query.clone(),
        outline_html: render_outline(&outline),
        outline,
        content_html,
        previous: adjacent.previous.map(NavLink::from),
        next: adjacent.next.map(NavLink::from),
        diagrams,
        code_blocks,
        document_id,
        title,
        placeholder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::update;
    use crate::message::Message;
    use crate::test_utils::test_app_state;
    use docview_render::DiagramError;

    fn select(state: &mut AppState, id: &str) {
        update(
            state,
            Message::SelectDocument {
                id: id.to_string(),
            },
        );
    }

    #[test]
    fn test_view_of_first_document() {
        let mut state = test_app_state();
        select(&mut state, "a");

        let view = page_view(&state);
        assert_eq!(view.title, "Title A");
        assert_eq!(view.breadcrumb, "Entry A");
        assert!(!view.placeholder);
        assert!(view.previous.is_none());
        assert_eq!(view.next.as_ref().map(|l| l.id.as_str()), Some("b"));
        assert!(view.content_html.contains("<h1 id=\"title-a\" class=\"doc-title\">Title A</h1>"));
        assert!(view.sidebar[0].items[0].active);
        assert!(!view.sidebar[0].items[1].active);
    }

    #[test]
    fn test_view_of_missing_document() {
        let mut state = test_app_state();
        select(&mut state, "missing");

        let view = page_view(&state);
        assert!(view.placeholder);
        assert_eq!(view.title, "Under Construction");
        assert_eq!(view.breadcrumb, "Content");
        assert!(view.previous.is_none() && view.next.is_none());
    }

    #[test]
    fn test_view_is_pure() {
        let mut state = test_app_state();
        select(&mut state, "flows");
        assert_eq!(page_view(&state), page_view(&state));
    }

    #[test]
    fn test_view_filters_sidebar_by_search() {
        let mut state = test_app_state();
        select(&mut state, "a");
        update(
            &mut state,
            Message::SearchChanged {
                query: "flow".to_string(),
            },
        );

        let view = page_view(&state);
        assert_eq!(view.sidebar.len(), 1);
        assert_eq!(view.sidebar[0].items[0].id, "flows");
        // Navigation ignores the filter.
        assert_eq!(view.next.as_ref().map(|l| l.id.as_str()), Some("b"));
    }

    #[test]
    fn test_view_reports_diagram_and_copy_status() {
        let mut state = test_app_state();
        select(&mut state, "flows");

        let view = page_view(&state);
        assert_eq!(view.diagrams[0].status, "loading");
        assert!(view.content_html.contains("doc-diagram-loading"));
        assert_eq!(view.code_blocks[0].copy_state, CopyState::Idle);

        let (epoch, version) = {
            let page = state.page.as_ref().unwrap();
            (page.epoch, page.diagrams["flows-diagram-0"].version())
        };
        update(
            &mut state,
            Message::DiagramRendered {
                epoch,
                diagram_id: "flows-diagram-0".to_string(),
                version,
                result: Err(DiagramError::Syntax("Lexical error".to_string())),
            },
        );

        let view = page_view(&state);
        assert_eq!(view.diagrams[0].status, "failed");
        assert_eq!(view.diagrams[0].error.as_deref(), Some("Lexical error"));
        assert!(view.content_html.contains("Lexical error"));
        // The heading around the failed diagram still renders.
        assert!(view.content_html.contains("doc-title"));
    }
}

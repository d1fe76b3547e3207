//! Navigation handlers: selection, previous/next, search

use tracing::debug;

use crate::message::Message;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Select a document.
///
/// Always closes the mobile overlay and scrolls to top. The page is only
/// rebuilt when the active id actually changes, so re-selecting the current
/// document keeps its diagram and copy state.
pub fn handle_select_document(state: &mut AppState, id: &str) -> UpdateResult {
    state.mobile_menu_open = false;

    let changed = state.navigator.select_document(id);
    let mut actions = vec![UpdateAction::ScrollToTop];

    if changed || state.page.is_none() {
        let requests = state.rebuild_page();
        let epoch = state.page.as_ref().map(|p| p.epoch).unwrap_or_default();
        actions.extend(
            requests
                .into_iter()
                .map(|request| UpdateAction::RenderDiagram { epoch, request }),
        );
    }

    UpdateResult::actions(actions)
}

pub fn handle_select_previous(state: &mut AppState) -> UpdateResult {
    match state.navigator.adjacent().previous {
        Some(entry) => UpdateResult::message(Message::SelectDocument {
            id: entry.id.clone(),
        }),
        None => {
            debug!("No previous document");
            UpdateResult::none()
        }
    }
}

pub fn handle_select_next(state: &mut AppState) -> UpdateResult {
    match state.navigator.adjacent().next {
        Some(entry) => UpdateResult::message(Message::SelectDocument {
            id: entry.id.clone(),
        }),
        None => {
            debug!("No next document");
            UpdateResult::none()
        }
    }
}

pub fn handle_search_changed(state: &mut AppState, query: String) -> UpdateResult {
    state.search_query = query;
    UpdateResult::none()
}

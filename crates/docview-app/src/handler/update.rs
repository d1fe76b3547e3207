//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{copy, diagram, navigation, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or actions
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::SelectDocument { id } => navigation::handle_select_document(state, &id),
        Message::SelectPrevious => navigation::handle_select_previous(state),
        Message::SelectNext => navigation::handle_select_next(state),
        Message::ToggleMobileMenu => {
            state.mobile_menu_open = !state.mobile_menu_open;
            UpdateResult::none()
        }
        Message::CloseMobileMenu => {
            state.mobile_menu_open = false;
            UpdateResult::none()
        }
        Message::SearchChanged { query } => navigation::handle_search_changed(state, query),

        // ─────────────────────────────────────────────────────────
        // Diagram Rendering
        // ─────────────────────────────────────────────────────────
        Message::DiagramRendered {
            epoch,
            diagram_id,
            version,
            result,
        } => diagram::handle_diagram_rendered(state, epoch, &diagram_id, version, result),

        // ─────────────────────────────────────────────────────────
        // Copy Action
        // ─────────────────────────────────────────────────────────
        Message::CopyCode { block } => copy::handle_copy_code(state, block),
        Message::CopySucceeded { epoch, block } => copy::handle_copy_succeeded(state, epoch, block),
        Message::CopyFailed {
            epoch,
            block,
            error,
        } => copy::handle_copy_failed(epoch, block, &error),
        Message::CopyFeedbackExpired {
            epoch,
            block,
            token,
        } => copy::handle_copy_feedback_expired(state, epoch, block, token),
    }
}

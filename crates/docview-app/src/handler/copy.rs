//! Copy action handlers
//!
//! Clipboard failures never surface: the panel just stays Idle and the
//! failure is logged.

use std::time::Duration;

use docview_render::CodeBlockId;
use tracing::{debug, warn};

use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub fn handle_copy_code(state: &mut AppState, block: CodeBlockId) -> UpdateResult {
    let Some(page) = state.page.as_ref() else {
        debug!(%block, "Copy requested with no page");
        return UpdateResult::none();
    };

    match page.rendered.panel(block) {
        Some(panel) => UpdateResult::action(UpdateAction::WriteClipboard {
            epoch: page.epoch,
            block,
            text: panel.code.clone(),
        }),
        None => {
            debug!(%block, "Copy requested for unknown code block");
            UpdateResult::none()
        }
    }
}

pub fn handle_copy_succeeded(state: &mut AppState, epoch: u64, block: CodeBlockId) -> UpdateResult {
    let delay = Duration::from_millis(state.settings.copy.feedback_ms);
    let Some(feedback) = state
        .page_for_epoch(epoch)
        .and_then(|page| page.copy.get_mut(&block))
    else {
        debug!(%block, epoch, "Copy confirmation for a disposed page");
        return UpdateResult::none();
    };

    let token = feedback.mark_copied();
    UpdateResult::action(UpdateAction::ScheduleCopyReset {
        epoch,
        block,
        token,
        delay,
    })
}

pub fn handle_copy_failed(epoch: u64, block: CodeBlockId, error: &str) -> UpdateResult {
    warn!(%block, epoch, "Copy to clipboard failed: {}", error);
    UpdateResult::none()
}

pub fn handle_copy_feedback_expired(
    state: &mut AppState,
    epoch: u64,
    block: CodeBlockId,
    token: u64,
) -> UpdateResult {
    if let Some(feedback) = state
        .page_for_epoch(epoch)
        .and_then(|page| page.copy.get_mut(&block))
    {
        if !feedback.expire(token) {
            debug!(%block, token, "Copy feedback superseded by a newer copy");
        }
    }
    UpdateResult::none()
}

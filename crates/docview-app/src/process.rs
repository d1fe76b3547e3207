//! Message processing
//!
//! Runs a message through the TEA update function, follows up on chained
//! messages, and dispatches the resulting actions.

use tokio::sync::mpsc;

use crate::actions::handle_action;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::services::{Clipboard, DiagramEngine, Services};
use crate::state::AppState;

/// Side effects of one processing cycle the event loop surfaces itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub scroll_to_top: bool,
}

/// Process a message through the TEA update function
pub fn process_message<D, C>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    services: &Services<D, C>,
) -> ProcessOutcome
where
    D: DiagramEngine + Sync + 'static,
    C: Clipboard + Sync + 'static,
{
    let mut outcome = ProcessOutcome::default();

    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        for action in result.actions {
            if action == UpdateAction::ScrollToTop {
                outcome.scroll_to_top = true;
                continue;
            }
            handle_action(action, msg_tx.clone(), services);
        }

        // Continue with follow-up message
        msg = result.message;
    }

    outcome
}

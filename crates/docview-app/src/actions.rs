//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every spawned task reports back through the message channel; none of them
//! touch state directly.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::handler::UpdateAction;
use crate::message::Message;
use crate::services::{Clipboard, DiagramEngine, Services};

/// Execute an action by spawning a background task
///
/// `ScrollToTop` has no background work and is handled by the caller.
pub fn handle_action<D, C>(action: UpdateAction, msg_tx: mpsc::Sender<Message>, services: &Services<D, C>)
where
    D: DiagramEngine + Sync + 'static,
    C: Clipboard + Sync + 'static,
{
    match action {
        UpdateAction::ScrollToTop => {}

        UpdateAction::RenderDiagram { epoch, request } => {
            let engine = services.diagrams.clone();
            tokio::spawn(async move {
                let result = engine.render(&request.diagram_id, &request.source).await;
                let msg = Message::DiagramRendered {
                    epoch,
                    diagram_id: request.diagram_id,
                    version: request.version,
                    result,
                };
                if msg_tx.send(msg).await.is_err() {
                    debug!("Message channel closed before diagram render completed");
                }
            });
        }

        UpdateAction::WriteClipboard { epoch, block, text } => {
            let clipboard = services.clipboard.clone();
            tokio::spawn(async move {
                let msg = match clipboard.write_text(&text).await {
                    Ok(()) => Message::CopySucceeded { epoch, block },
                    Err(e) => Message::CopyFailed {
                        epoch,
                        block,
                        error: e.to_string(),
                    },
                };
                if msg_tx.send(msg).await.is_err() {
                    debug!("Message channel closed before clipboard write completed");
                }
            });
        }

        UpdateAction::ScheduleCopyReset {
            epoch,
            block,
            token,
            delay,
        } => {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(e) = msg_tx
                    .send(Message::CopyFeedbackExpired {
                        epoch,
                        block,
                        token,
                    })
                    .await
                {
                    warn!("Failed to deliver copy feedback reset: {}", e);
                }
            });
        }
    }
}

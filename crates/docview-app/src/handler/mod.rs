//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `navigation`: Selection, previous/next, mobile menu and search
//! - `diagram`: Diagram engine completions
//! - `copy`: Code panel copy action and its feedback timer

pub(crate) mod copy;
pub(crate) mod diagram;
pub(crate) mod navigation;
pub(crate) mod update;


use std::time::Duration;

use docview_render::{CodeBlockId, RenderRequest};

use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Reset the content viewport to the top
    ScrollToTop,

    /// Run the diagram engine for one diagram instance
    RenderDiagram { epoch: u64, request: RenderRequest },

    /// Put a code panel's text on the system clipboard
    WriteClipboard {
        epoch: u64,
        block: CodeBlockId,
        text: String,
    },

    /// Revert a panel's "Copied" confirmation after `delay`
    ScheduleCopyReset {
        epoch: u64,
        block: CodeBlockId,
        token: u64,
        delay: Duration,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Actions for the event loop to perform, in order
    pub actions: Vec<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            actions: Vec::new(),
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            actions: vec![action],
        }
    }

    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self {
            message: None,
            actions,
        }
    }
}

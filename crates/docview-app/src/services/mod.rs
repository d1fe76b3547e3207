//! Service layer: external collaborators behind async traits
//!
//! - [`DiagramEngine`]: turns diagram source into graphic markup
//! - [`Clipboard`]: write-only, best-effort system clipboard
//!
//! Both traits are generated with `trait_variant` so the `Send` variants can be
//! driven from spawned tokio tasks.

pub mod clipboard;
pub mod diagram_engine;

pub use clipboard::{Clipboard, LocalClipboard, SystemClipboard};
pub use diagram_engine::{DiagramEngine, LocalDiagramEngine, MermaidCli};

use std::sync::Arc;

/// Shared handles to the services the action layer calls into.
#[derive(Debug)]
pub struct Services<D, C> {
    pub diagrams: Arc<D>,
    pub clipboard: Arc<C>,
}

impl<D, C> Services<D, C> {
    pub fn new(diagrams: D, clipboard: C) -> Self {
        Self {
            diagrams: Arc::new(diagrams),
            clipboard: Arc::new(clipboard),
        }
    }
}

impl<D, C> Clone for Services<D, C> {
    fn clone(&self) -> Self {
        Self {
            diagrams: Arc::clone(&self.diagrams),
            clipboard: Arc::clone(&self.clipboard),
        }
    }
}

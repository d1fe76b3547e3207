//! docview-app - Application state and orchestration for docview
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! documentation viewer: navigation state, per-page diagram and copy
//! lifecycles, the Engine that runs background service work, configuration
//! and catalog loading, and the service traits for the diagram engine and
//! clipboard.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod message;
pub mod navigator;
pub mod process;
pub mod services;
pub mod state;
pub mod view;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::{DiagramOutcome, EngineEvent};
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use navigator::{DocumentNavigator, Selection};
pub use state::{AppPhase, AppState, PageState};
pub use view::{page_view, PageView};

//! docview Library
//!
//! Runtime surfaces for the documentation viewer: static HTML export and a
//! headless JSON event mode, both driven by the shared
//! [`Engine`](docview_app::Engine).

pub mod bootstrap;
pub mod export;
pub mod headless;

// Re-export main entry points
pub use bootstrap::{load_project, system_engine, SystemEngine};
pub use export::{export_site, ExportSummary};
pub use headless::runner::run_headless;

//! Project loading and engine construction shared by every mode

use std::path::Path;

use docview_app::config::{load_catalog, load_settings};
use docview_app::services::{MermaidCli, SystemClipboard};
use docview_app::{AppState, Engine};
use docview_core::prelude::*;

/// Engine wired to the system diagram engine and clipboard.
pub type SystemEngine = Engine<MermaidCli, SystemClipboard>;

/// Load settings and catalog for a docs project.
///
/// Settings problems fall back to defaults; a missing or invalid menu is an
/// error.
pub fn load_project(project_path: &Path) -> Result<AppState> {
    let settings = load_settings(project_path);
    let catalog = load_catalog(project_path)?;
    Ok(AppState::new(catalog, settings))
}

/// Build an engine over the system services.
///
/// A missing diagram engine or clipboard is only logged: diagrams then
/// settle as Failed and copies stay Idle.
pub fn system_engine(state: AppState) -> SystemEngine {
    let diagrams = MermaidCli::new(state.settings.diagram.command.clone());
    if !diagrams.is_available() {
        let err = Error::DiagramEngineNotFound {
            command: diagrams.command().to_string(),
        };
        warn!("{}, diagrams will show an error panel", err);
    }

    if !SystemClipboard::is_available() {
        warn!("{}, copy buttons will have no effect", Error::ClipboardUnavailable);
    }

    Engine::new(state, diagrams, SystemClipboard::new())
}

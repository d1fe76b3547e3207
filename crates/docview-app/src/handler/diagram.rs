//! Diagram engine completion handler

use docview_render::{DiagramError, Graphic};
use tracing::debug;

use crate::state::AppState;

use super::UpdateResult;

/// Apply a diagram engine result.
///
/// Results for a page that has since been replaced target a discarded
/// instance and are dropped without touching state. Results for an older
/// version of a live instance are dropped by the renderer itself.
pub fn handle_diagram_rendered(
    state: &mut AppState,
    epoch: u64,
    diagram_id: &str,
    version: u64,
    result: Result<Graphic, DiagramError>,
) -> UpdateResult {
    let Some(page) = state.page_for_epoch(epoch) else {
        debug!(
            diagram = diagram_id,
            epoch, "Discarding diagram render for a disposed page"
        );
        return UpdateResult::none();
    };

    match page.diagrams.get_mut(diagram_id) {
        Some(renderer) => {
            renderer.complete(version, result);
        }
        None => debug!(diagram = diagram_id, "Render completed for unknown diagram"),
    }

    UpdateResult::none()
}

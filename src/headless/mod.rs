//! Headless mode - JSON event output for scripting and E2E testing
//!
//! Engine events and page snapshots are written to stdout as NDJSON
//! (newline-delimited JSON), one object per line. Every object has an
//! `"event"` field naming its type and a `"timestamp"` in milliseconds.
//!
//! # Example Output
//!
//! ```json
//! {"event":"ready","project":"./site","entries":9,"diagram_engine":true,"timestamp":1704700001000}
//! {"event":"document_changed","id":"introduction","title":"Introduction","placeholder":false,"timestamp":1704700001002}
//! {"event":"scroll_to_top","timestamp":1704700001002}
//! {"event":"diagram_settled","diagram_id":"flows-diagram-0","outcome":{"status":"rendered"},"timestamp":1704700001350}
//! ```
//!
//! # Commands
//!
//! One command per stdin line: `select <id>`, `next`, `prev`, `copy <n>`,
//! `search [query]`, `menu`, `page`, `quit`.

pub mod runner;

use std::io::Write;

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use docview_app::PageView;

/// Events only the headless frontend emits. Engine events are written as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Project loaded, about to select the initial document
    Ready {
        project: String,
        entries: usize,
        diagram_engine: bool,
    },

    /// Full page snapshot, written in response to `page`
    Page { view: Box<PageView> },

    /// Unparseable command or other non-engine error
    Error { message: String, fatal: bool },
}

impl HeadlessEvent {
    pub fn ready(project: &str, entries: usize, diagram_engine: bool) -> Self {
        Self::Ready {
            project: project.to_string(),
            entries,
            diagram_engine,
        }
    }

    pub fn page(view: PageView) -> Self {
        Self::Page {
            view: Box::new(view),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error { message, fatal }
    }
}

/// Serialize `payload` to one JSON line with a `timestamp` field added.
pub fn to_line(payload: &impl Serialize) -> Option<String> {
    let mut value = match serde_json::to_value(payload) {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to serialize headless event: {}", e);
            return None;
        }
    };
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "timestamp".to_string(),
            Utc::now().timestamp_millis().into(),
        );
    }
    Some(value.to_string())
}

/// Write `payload` as one NDJSON line and flush.
pub fn emit(out: &mut impl Write, payload: &impl Serialize) {
    let Some(line) = to_line(payload) else {
        return;
    };

    if let Err(e) = writeln!(out, "{}", line) {
        error!("Failed to write headless event: {}", e);
        return;
    }

    // Flush to ensure immediate output
    if let Err(e) = out.flush() {
        error!("Failed to flush headless output: {}", e);
    }
}

//! Test utilities for app types
//!
//! Provides a small catalog, app state built from it, and in-memory fakes for
//! the diagram engine and clipboard services.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use docview_core::prelude::*;
use docview_core::{ContentTable, IconRef, Menu, MenuEntry, MenuGroup};
use docview_render::{DiagramError, Graphic};
use tokio::sync::Notify;

use crate::config::{Catalog, Settings};
use crate::services::{Clipboard, DiagramEngine};
use crate::state::AppState;

/// Body of the `flows` test document: one diagram, one code panel.
pub const FLOWS_DOC: &str =
    "# Flows\n\n```mermaid\ngraph TD\nA-->B\n```\n\n```bash\nline one\nline two\n```\n";

/// Catalog with entries `a`, `b` (group 1) and `flows` (group 2), all with
/// content.
pub fn test_catalog() -> Catalog {
    let menu = Menu::new(vec![
        MenuGroup {
            title: "Getting Started".to_string(),
            items: vec![
                MenuEntry::new("a", "Entry A", IconRef::Book),
                MenuEntry::new("b", "Entry B", IconRef::Zap),
            ],
        },
        MenuGroup {
            title: "Features".to_string(),
            items: vec![MenuEntry::new("flows", "Flows", IconRef::Cpu)],
        },
    ]);
    let content: ContentTable = [("a", "# Title A"), ("b", "# Title B"), ("flows", FLOWS_DOC)]
        .into_iter()
        .collect();
    Catalog::new(menu, content)
}

/// App state over [`test_catalog`] with default settings.
pub fn test_app_state() -> AppState {
    AppState::new(test_catalog(), Settings::default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Fake Diagram Engine
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct FakeEngineInner {
    calls: Mutex<Vec<(String, String)>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

/// In-memory diagram engine.
///
/// Sources starting with a known diagram keyword (`graph`, `flowchart`,
/// `sequenceDiagram`) render to `<svg data-diagram="{id}">{source}</svg>`;
/// anything else fails with a syntax error. A source can be gated so its
/// render waits until released, which lets tests force completion order.
#[derive(Debug, Clone, Default)]
pub struct FakeDiagramEngine {
    inner: Arc<FakeEngineInner>,
}

const DIAGRAM_KEYWORDS: &[&str] = &["graph", "flowchart", "sequenceDiagram"];

impl FakeDiagramEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold renders of `source` until the returned handle is notified.
    pub fn gate(&self, source: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        if let Ok(mut gates) = self.inner.gates.lock() {
            gates.insert(source.to_string(), notify.clone());
        }
        notify
    }

    /// `(id, source)` of every render call, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.inner
            .calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl DiagramEngine for FakeDiagramEngine {
    async fn render(&self, id: &str, source: &str) -> std::result::Result<Graphic, DiagramError> {
        if let Ok(mut calls) = self.inner.calls.lock() {
            calls.push((id.to_string(), source.to_string()));
        }
        let gate = self
            .inner
            .gates
            .lock()
            .ok()
            .and_then(|g| g.get(source).cloned());
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let first_word = source.split_whitespace().next().unwrap_or_default();
        if DIAGRAM_KEYWORDS.contains(&first_word) {
            Ok(Graphic::new(format!(
                "<svg data-diagram=\"{id}\">{}</svg>",
                source.replace('<', "&lt;")
            )))
        } else {
            Err(DiagramError::Syntax(format!(
                "Parse error on line 1: unknown diagram type '{}'",
                first_word
            )))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// Clipboard that records writes, optionally failing every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    writes: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let clipboard = Self::default();
        clipboard.set_failing(true);
        clipboard
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Current clipboard contents.
    pub fn contents(&self) -> Option<String> {
        self.writes().last().cloned()
    }
}

impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::ClipboardUnavailable);
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(text.to_string());
        }
        Ok(())
    }
}

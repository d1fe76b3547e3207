//! Configuration types for docview
//!
//! Defines:
//! - `Settings` - Global settings from `.docview/config.toml`
//! - Per-section sub-types with serde defaults

use serde::{Deserialize, Serialize};

use docview_core::{Placeholder, PLACEHOLDER_BODY, PLACEHOLDER_TITLE};
use docview_render::DEFAULT_DIAGRAM_LANGUAGE;

/// Global settings from `.docview/config.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub diagram: DiagramSettings,

    #[serde(default)]
    pub copy: CopySettings,

    #[serde(default)]
    pub content: ContentSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

/// Diagram engine settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiagramSettings {
    /// Fenced-block language tag routed to the diagram engine
    #[serde(default = "default_diagram_language")]
    pub language: String,

    /// Diagram engine executable, resolved through PATH
    #[serde(default = "default_diagram_command")]
    pub command: String,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            language: default_diagram_language(),
            command: default_diagram_command(),
        }
    }
}

fn default_diagram_language() -> String {
    DEFAULT_DIAGRAM_LANGUAGE.to_string()
}

fn default_diagram_command() -> String {
    "mmdc".to_string()
}

/// Copy action settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CopySettings {
    /// How long the "Copied" confirmation stays up, in milliseconds
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            feedback_ms: default_feedback_ms(),
        }
    }
}

fn default_feedback_ms() -> u64 {
    2000
}

/// Content settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentSettings {
    /// Document selected at startup (first menu entry when unset)
    #[serde(default)]
    pub default_document: Option<String>,

    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,

    #[serde(default = "default_placeholder_body")]
    pub placeholder_body: String,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            default_document: None,
            placeholder_title: default_placeholder_title(),
            placeholder_body: default_placeholder_body(),
        }
    }
}

impl ContentSettings {
    pub fn placeholder(&self) -> Placeholder {
        Placeholder {
            title: self.placeholder_title.clone(),
            body: self.placeholder_body.clone(),
        }
    }
}

fn default_placeholder_title() -> String {
    PLACEHOLDER_TITLE.to_string()
}

fn default_placeholder_body() -> String {
    PLACEHOLDER_BODY.to_string()
}

/// Static export settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Upper bound on waiting for in-flight diagram renders per page
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            settle_timeout_ms: default_settle_timeout_ms(),
        }
    }
}

fn default_settle_timeout_ms() -> u64 {
    30_000
}

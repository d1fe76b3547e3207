//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Configuration / Catalog Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid catalog: {message}")]
    CatalogInvalid { message: String },

    #[error("No menu file found in: {path}")]
    NoMenu { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Diagram Engine Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Diagram engine not found: '{command}' is not in PATH")]
    DiagramEngineNotFound { command: String },

    // ─────────────────────────────────────────────────────────────
    // Clipboard Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No system clipboard available")]
    ClipboardUnavailable,

    #[error("Clipboard write failed: {message}")]
    Clipboard { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::CatalogInvalid {
            message: message.into(),
        }
    }

    pub fn no_menu(path: impl Into<PathBuf>) -> Self {
        Self::NoMenu { path: path.into() }
    }

    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Diagram and clipboard failures are contained by the component that
    /// raised them and never abort a page render.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::DiagramEngineNotFound { .. }
                | Error::ClipboardUnavailable
                | Error::Clipboard { .. }
        )
    }

    /// Check if this error should abort the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::NoMenu { .. } | Error::CatalogInvalid { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

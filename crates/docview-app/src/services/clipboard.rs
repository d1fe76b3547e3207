//! Clipboard service
//!
//! [`SystemClipboard`] writes through the platform clipboard provider. Writes
//! are fire-and-forget from the caller's point of view: the action layer turns
//! any error into a logged warning.

use copypasta::{ClipboardContext, ClipboardProvider};
use docview_core::prelude::*;

/// Clipboard sink
#[trait_variant::make(Clipboard: Send)]
pub trait LocalClipboard {
    /// Replace the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// OS clipboard via `copypasta`.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    /// Whether a clipboard context can be opened right now.
    pub fn is_available() -> bool {
        ClipboardContext::new().is_ok()
    }
}

impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let contents = text.to_string();
        let len = contents.len();

        // Platform providers block, so keep them off the runtime threads.
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut ctx = ClipboardContext::new().map_err(|e| {
                debug!("Clipboard context unavailable: {}", e);
                Error::ClipboardUnavailable
            })?;
            ctx.set_contents(contents)
                .map_err(|e| Error::clipboard(e.to_string()))
        })
        .await
        .map_err(|e| Error::clipboard(format!("Clipboard task failed: {}", e)))??;

        debug!("Copied {} bytes to clipboard", len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_errors_are_recoverable() {
        assert!(Error::ClipboardUnavailable.is_recoverable());
        assert!(Error::clipboard("boom").is_recoverable());
    }

    #[tokio::test]
    async fn test_system_write_never_fails_fatally() {
        // CI usually has no display; either outcome must stay recoverable.
        match Clipboard::write_text(&SystemClipboard::new(), "cargo install docview").await {
            Ok(()) => {}
            Err(e) => {
                assert!(e.is_recoverable(), "unexpected error: {}", e);
                assert!(!e.is_fatal());
            }
        }
    }
}

//! Diagram engine service
//!
//! [`MermaidCli`] shells out to the mermaid CLI (`mmdc` by default): the
//! source is written to a temp file, rendered to SVG next to it, and read
//! back. A non-zero exit is reported as a syntax error carrying the engine's
//! stderr, which is what the failed diagram panel shows.

use std::path::PathBuf;
use std::process::Stdio;

use docview_render::{DiagramError, Graphic};
use tokio::process::Command;
use tracing::debug;

/// Diagram rendering engine
#[trait_variant::make(DiagramEngine: Send)]
pub trait LocalDiagramEngine {
    /// Render `source` for the diagram instance `id`.
    async fn render(&self, id: &str, source: &str) -> Result<Graphic, DiagramError>;
}

/// Diagram engine backed by the mermaid CLI.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    command: String,
}

impl MermaidCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Resolve the configured command through PATH.
    pub fn resolve(&self) -> Result<PathBuf, DiagramError> {
        which::which(&self.command).map_err(|_| {
            DiagramError::Unavailable(format!("'{}' is not in PATH", self.command))
        })
    }

    pub fn is_available(&self) -> bool {
        self.resolve().is_ok()
    }
}

/// File-name-safe form of a diagram id.
fn file_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "diagram".to_string()
    } else {
        stem
    }
}

/// The engine's explanation of a failure: stderr without blank lines, or a
/// generic message when stderr is empty.
fn failure_message(stderr: &[u8], status: std::process::ExitStatus) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let message = stderr
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if message.is_empty() {
        format!("diagram engine exited with {}", status)
    } else {
        message
    }
}

impl DiagramEngine for MermaidCli {
    async fn render(&self, id: &str, source: &str) -> Result<Graphic, DiagramError> {
        let program = self.resolve()?;

        let workdir = tempfile::tempdir().map_err(|e| DiagramError::Engine(e.to_string()))?;
        let stem = file_stem(id);
        let input = workdir.path().join(format!("{stem}.mmd"));
        let output = workdir.path().join(format!("{stem}.svg"));

        tokio::fs::write(&input, source)
            .await
            .map_err(|e| DiagramError::Engine(format!("Failed to write diagram source: {}", e)))?;

        debug!(diagram = id, "Running {:?}", program);
        let result = Command::new(&program)
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .arg("--quiet")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DiagramError::Unavailable(format!("Failed to run {}: {}", self.command, e)))?;

        if !result.status.success() {
            return Err(DiagramError::Syntax(failure_message(
                &result.stderr,
                result.status,
            )));
        }

        let markup = tokio::fs::read_to_string(&output)
            .await
            .map_err(|e| DiagramError::Engine(format!("No graphic produced: {}", e)))?;

        Ok(Graphic::new(markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_is_path_safe() {
        assert_eq!(file_stem("intro-diagram-0"), "intro-diagram-0");
        assert_eq!(file_stem("../x y"), "___x_y");
        assert_eq!(file_stem(""), "diagram");
    }

    #[tokio::test]
    async fn test_missing_command_is_unavailable() {
        let engine = MermaidCli::new("docview-no-such-diagram-engine");
        assert!(!engine.is_available());

        let result = DiagramEngine::render(&engine, "d-0", "graph TD\nA-->B").await;
        assert!(matches!(result, Err(DiagramError::Unavailable(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_message_prefers_stderr() {
        use std::os::unix::process::ExitStatusExt;

        let status = std::process::ExitStatus::from_raw(1 << 8);
        assert_eq!(
            failure_message(b"\nError: Parse error on line 2:\n  A--\n\n", status),
            "Error: Parse error on line 2:\n  A--"
        );
        assert!(failure_message(b"", status).contains("exited with"));
    }
}

//! Settings parser for .docview/config.toml

use super::types::Settings;
use docview_core::prelude::*;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.toml";
pub(crate) const DOCVIEW_DIR: &str = ".docview";

/// Load settings from `.docview/config.toml`
///
/// A missing file yields defaults. A file that cannot be read or parsed is
/// logged and also yields defaults.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(DOCVIEW_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create a commented default config in `.docview/`
///
/// An existing config file is left untouched.
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let docview_dir = project_path.join(DOCVIEW_DIR);

    if !docview_dir.exists() {
        std::fs::create_dir_all(&docview_dir)
            .map_err(|e| Error::config(format!("Failed to create .docview dir: {}", e)))?;
    }

    let config_path = docview_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# docview configuration

[diagram]
language = "mermaid"    # Fenced-block tag rendered as a diagram
command = "mmdc"        # Diagram engine executable (mermaid-cli)

[copy]
feedback_ms = 2000      # How long "Copied" stays visible

[content]
# default_document = "introduction"
placeholder_title = "Under Construction"
placeholder_body = """
# Under Construction

The documentation for this section is still being written."""

[export]
settle_timeout_ms = 30000   # Max wait for diagram renders per exported page
"#;

        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(dir.path());
        assert_eq!(settings.diagram.command, "mmdc");
    }

    #[test]
    fn test_load_custom_config() {
        let dir = tempdir().unwrap();
        let docview_dir = dir.path().join(DOCVIEW_DIR);
        std::fs::create_dir_all(&docview_dir).unwrap();
        std::fs::write(
            docview_dir.join(CONFIG_FILENAME),
            "[copy]\nfeedback_ms = 500\n\n[diagram]\nlanguage = \"graph\"\n",
        )
        .unwrap();

        let settings = load_settings(dir.path());
        assert_eq!(settings.copy.feedback_ms, 500);
        assert_eq!(settings.diagram.language, "graph");
        assert_eq!(settings.diagram.command, "mmdc");
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let docview_dir = dir.path().join(DOCVIEW_DIR);
        std::fs::create_dir_all(&docview_dir).unwrap();
        std::fs::write(docview_dir.join(CONFIG_FILENAME), "[copy\nfeedback_ms = ").unwrap();

        let settings = load_settings(dir.path());
        assert_eq!(settings.copy.feedback_ms, 2000);
    }

    #[test]
    fn test_init_config_dir_round_trips_defaults() {
        let dir = tempdir().unwrap();
        init_config_dir(dir.path()).unwrap();

        let settings = load_settings(dir.path());
        assert_eq!(settings.diagram.language, "mermaid");
        assert_eq!(settings.copy.feedback_ms, 2000);
        assert_eq!(settings.export.settle_timeout_ms, 30_000);
        assert!(settings
            .content
            .placeholder_body
            .starts_with("# Under Construction"));
    }

    #[test]
    fn test_init_config_dir_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let docview_dir = dir.path().join(DOCVIEW_DIR);
        std::fs::create_dir_all(&docview_dir).unwrap();
        std::fs::write(docview_dir.join(CONFIG_FILENAME), "[copy]\nfeedback_ms = 10\n").unwrap();

        init_config_dir(dir.path()).unwrap();
        assert_eq!(load_settings(dir.path()).copy.feedback_ms, 10);
    }
}

//! Catalog loader for `menu.toml` and `docs/*.md`
//!
//! Layout of a docs project:
//!
//! ```text
//! project/
//! ├── menu.toml          [[groups]] with [[groups.items]] (id, label, icon)
//! ├── docs/
//! │   ├── introduction.md
//! │   └── quick-start.md
//! └── .docview/config.toml
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use docview_core::prelude::*;
use docview_core::{ContentTable, Menu};

const MENU_FILENAME: &str = "menu.toml";
const DOCS_DIR: &str = "docs";
const DOC_EXTENSION: &str = "md";

/// Immutable catalog input shared by the navigator and the exporter.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub menu: Arc<Menu>,
    pub content: Arc<ContentTable>,
}

impl Catalog {
    pub fn new(menu: Menu, content: ContentTable) -> Self {
        Self {
            menu: Arc::new(menu),
            content: Arc::new(content),
        }
    }
}

/// Parse a menu from TOML text.
///
/// Entry ids must be non-empty and unique across all groups, otherwise
/// previous/next lookup would be ambiguous.
pub fn parse_menu(content: &str) -> Result<Menu> {
    let menu: Menu = toml::from_str(content)
        .map_err(|e| Error::catalog(format!("Failed to parse {}: {}", MENU_FILENAME, e)))?;

    let mut seen = HashSet::new();
    for id in menu.entry_ids() {
        if id.trim().is_empty() {
            return Err(Error::catalog("menu entry with empty id"));
        }
        if !seen.insert(id) {
            return Err(Error::catalog(format!("duplicate menu entry id '{}'", id)));
        }
    }

    Ok(menu)
}

/// Load the menu and every `docs/<id>.md` document.
///
/// Menu entries without a document are allowed; they are logged here and
/// shown as placeholders at render time.
pub fn load_catalog(project_path: &Path) -> Result<Catalog> {
    let menu_path = project_path.join(MENU_FILENAME);
    if !menu_path.exists() {
        return Err(Error::no_menu(project_path));
    }

    let menu_text = std::fs::read_to_string(&menu_path)?;
    let menu = parse_menu(&menu_text)?;
    let content = load_documents(&project_path.join(DOCS_DIR))?;

    for id in content.missing_from(&menu) {
        warn!("Menu entry '{}' has no document, placeholder will be shown", id);
    }

    info!(
        "Loaded catalog: {} menu entries, {} documents",
        menu.entry_ids().count(),
        content.len()
    );

    Ok(Catalog::new(menu, content))
}

fn load_documents(docs_dir: &Path) -> Result<ContentTable> {
    let mut table = ContentTable::new();

    if !docs_dir.is_dir() {
        warn!("No docs directory at {:?}", docs_dir);
        return Ok(table);
    }

    let mut paths: Vec<_> = std::fs::read_dir(docs_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == DOC_EXTENSION))
        .collect();
    paths.sort();

    for path in paths {
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            debug!("Skipping non UTF-8 document name {:?}", path);
            continue;
        };
        match std::fs::read_to_string(&path) {
            Ok(body) => table.insert(id, body),
            Err(e) => warn!("Failed to read {:?}: {}", path, e),
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docview_core::IconRef;
    use tempfile::tempdir;

    const MENU: &str = r#"
[[groups]]
title = "Getting Started"

[[groups.items]]
id = "introduction"
label = "Introduction"
icon = "book"

[[groups.items]]
id = "quick-start"
label = "Quick Start"
icon = "zap"

[[groups]]
title = "Features"

[[groups.items]]
id = "diagrams"
label = "Diagrams"
icon = "sparkles"
"#;

    #[test]
    fn test_parse_menu() {
        let menu = parse_menu(MENU).unwrap();
        assert_eq!(menu.groups.len(), 2);
        assert_eq!(menu.groups[0].items[1].icon, IconRef::Zap);
        // Unknown icon names fall back to the generic icon.
        assert_eq!(menu.groups[1].items[0].icon, IconRef::Generic);
    }

    #[test]
    fn test_parse_menu_rejects_duplicate_ids() {
        let text = r#"
[[groups]]
title = "A"
items = [{ id = "x", label = "X" }, { id = "x", label = "X again" }]
"#;
        let err = parse_menu(text).unwrap_err();
        assert!(matches!(err, Error::CatalogInvalid { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_parse_menu_rejects_invalid_toml() {
        assert!(matches!(
            parse_menu("[[groups]\ntitle = "),
            Err(Error::CatalogInvalid { .. })
        ));
    }

    #[test]
    fn test_load_catalog() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(MENU_FILENAME), MENU).unwrap();
        let docs = dir.path().join(DOCS_DIR);
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("introduction.md"), "# Welcome\n\nHello.").unwrap();
        std::fs::write(docs.join("diagrams.md"), "# Diagrams").unwrap();
        std::fs::write(docs.join("notes.txt"), "ignored").unwrap();

        let catalog = load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.content.len(), 2);
        assert_eq!(
            catalog.content.get("introduction").unwrap().title,
            "Welcome"
        );
        assert_eq!(catalog.content.missing_from(&catalog.menu), vec!["quick-start"]);
    }

    #[test]
    fn test_load_catalog_without_menu() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_catalog(dir.path()),
            Err(Error::NoMenu { .. })
        ));
    }

    #[test]
    fn test_load_catalog_without_docs_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(MENU_FILENAME), MENU).unwrap();

        let catalog = load_catalog(dir.path()).unwrap();
        assert!(catalog.content.is_empty());
        assert_eq!(catalog.menu.flatten().len(), 3);
    }
}

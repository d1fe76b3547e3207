//! Documentation catalog types
//!
//! The catalog is static input: a [`ContentTable`] mapping document ids to raw
//! markdown and a [`Menu`] grouping those ids for navigation. Both are
//! immutable once built and are shared read-only between components.

use std::collections::HashMap;

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// Title used when the active id has no entry in the content table.
pub const PLACEHOLDER_TITLE: &str = "Under Construction";

/// Body used when the active id has no entry in the content table.
pub const PLACEHOLDER_BODY: &str =
    "# Under Construction\n\nThe documentation for this section is still being written.";

/// A unit of renderable content identified by a stable string key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl Document {
    /// Build a document, taking its title from the first level-1 heading.
    ///
    /// Both ATX (`# Title`) and setext (`Title\n===`) headings count; lines
    /// inside code blocks do not. Falls back to the id when there is none.
    pub fn from_body(id: impl Into<String>, body: impl Into<String>) -> Self {
        let id = id.into();
        let body = body.into();
        let title = extract_title(&body).unwrap_or_else(|| id.clone());
        Self { id, title, body }
    }

    /// The stand-in returned for ids with no content.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Placeholder::default().document(id)
    }
}

/// Title and body substituted for ids with no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub title: String,
    pub body: String,
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            body: PLACEHOLDER_BODY.to_string(),
        }
    }
}

impl Placeholder {
    pub fn document(&self, id: impl Into<String>) -> Document {
        Document {
            id: id.into(),
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

fn extract_title(body: &str) -> Option<String> {
    let mut title: Option<String> = None;
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => title = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(t) = title.as_mut() {
                    t.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                match title.take().map(|t| t.trim().to_string()) {
                    Some(t) if !t.is_empty() => return Some(t),
                    _ => {}
                }
            }
            _ => {}
        }
    }
    None
}

/// Symbolic icon reference for a menu entry.
///
/// Frontends map these to actual glyphs; unknown names deserialize to
/// [`IconRef::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconRef {
    Book,
    Zap,
    Terminal,
    MessageSquare,
    Cpu,
    Shield,
    HelpCircle,
    Settings,
    Download,
    #[default]
    #[serde(other)]
    Generic,
}

impl IconRef {
    pub fn name(&self) -> &'static str {
        match self {
            IconRef::Book => "book",
            IconRef::Zap => "zap",
            IconRef::Terminal => "terminal",
            IconRef::MessageSquare => "message-square",
            IconRef::Cpu => "cpu",
            IconRef::Shield => "shield",
            IconRef::HelpCircle => "help-circle",
            IconRef::Settings => "settings",
            IconRef::Download => "download",
            IconRef::Generic => "generic",
        }
    }
}

/// A single navigable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: IconRef,
}

impl MenuEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: IconRef) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon,
        }
    }
}

/// A titled, ordered group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuGroup {
    pub title: String,
    #[serde(default)]
    pub items: Vec<MenuEntry>,
}

/// The static navigational structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub groups: Vec<MenuGroup>,
}

impl Menu {
    pub fn new(groups: Vec<MenuGroup>) -> Self {
        Self { groups }
    }

    /// All entries in group order, then item order.
    pub fn flatten(&self) -> FlattenedMenu {
        FlattenedMenu {
            entries: self
                .groups
                .iter()
                .flat_map(|g| g.items.iter().cloned())
                .collect(),
        }
    }

    pub fn entry_ids(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter().map(|i| i.id.as_str()))
    }

    /// Entries whose label or id contains `query` (case-insensitive).
    ///
    /// Groups left with no entries are dropped. A blank query returns the
    /// whole menu.
    pub fn filtered(&self, query: &str) -> Menu {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.clone();
        }
        let groups = self
            .groups
            .iter()
            .filter_map(|group| {
                let items: Vec<MenuEntry> = group
                    .items
                    .iter()
                    .filter(|e| {
                        e.label.to_lowercase().contains(&query)
                            || e.id.to_lowercase().contains(&query)
                    })
                    .cloned()
                    .collect();
                (!items.is_empty()).then(|| MenuGroup {
                    title: group.title.clone(),
                    items,
                })
            })
            .collect();
        Menu { groups }
    }
}

/// Previous/next neighbours of an entry in the flattened menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adjacent<'a> {
    pub previous: Option<&'a MenuEntry>,
    pub next: Option<&'a MenuEntry>,
}

/// Linear ordering of every menu entry, used for previous/next lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedMenu {
    entries: Vec<MenuEntry>,
}

impl FlattenedMenu {
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Neighbours of `id`; both absent when `id` is not in the menu.
    ///
    /// There is no wraparound: the first entry has no previous and the last
    /// has no next.
    pub fn adjacent(&self, id: &str) -> Adjacent<'_> {
        match self.position(id) {
            Some(index) => Adjacent {
                previous: index.checked_sub(1).and_then(|i| self.entries.get(i)),
                next: self.entries.get(index + 1),
            },
            None => Adjacent::default(),
        }
    }
}

/// Read-only mapping from document id to raw markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTable {
    documents: HashMap<String, Document>,
}

impl ContentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, body: impl Into<String>) {
        let document = Document::from_body(id, body);
        self.documents.insert(document.id.clone(), document);
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Menu ids that have no document behind them.
    pub fn missing_from<'m>(&self, menu: &'m Menu) -> Vec<&'m str> {
        menu.entry_ids().filter(|id| !self.contains(id)).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ContentTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = ContentTable::new();
        for (id, body) in iter {
            table.insert(id, body);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_group_menu() -> Menu {
        Menu::new(vec![
            MenuGroup {
                title: "Getting Started".to_string(),
                items: vec![
                    MenuEntry::new("intro", "Introduction", IconRef::Book),
                    MenuEntry::new("start", "Quick Start", IconRef::Zap),
                ],
            },
            MenuGroup {
                title: "Features".to_string(),
                items: vec![MenuEntry::new("chat", "Chat", IconRef::MessageSquare)],
            },
        ])
    }

    #[test]
    fn test_flatten_preserves_group_then_item_order() {
        let flat = two_group_menu().flatten();
        let ids: Vec<_> = flat.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "start", "chat"]);
    }

    #[test]
    fn test_adjacent_at_boundaries() {
        let flat = two_group_menu().flatten();

        let first = flat.adjacent("intro");
        assert!(first.previous.is_none());
        assert_eq!(first.next.map(|e| e.id.as_str()), Some("start"));

        let middle = flat.adjacent("start");
        assert_eq!(middle.previous.map(|e| e.id.as_str()), Some("intro"));
        assert_eq!(middle.next.map(|e| e.id.as_str()), Some("chat"));

        let last = flat.adjacent("chat");
        assert_eq!(last.previous.map(|e| e.id.as_str()), Some("start"));
        assert!(last.next.is_none());
    }

    #[test]
    fn test_adjacent_unknown_id_is_empty() {
        let flat = two_group_menu().flatten();
        assert_eq!(flat.adjacent("missing"), Adjacent::default());
    }

    #[test]
    fn test_adjacent_crosses_group_boundary() {
        let flat = two_group_menu().flatten();
        assert_eq!(
            flat.adjacent("chat").previous.map(|e| e.label.as_str()),
            Some("Quick Start")
        );
    }

    #[test]
    fn test_document_title_from_first_h1() {
        let doc = Document::from_body("a", "intro text\n\n# Title A\n\n## Section");
        assert_eq!(doc.title, "Title A");
    }

    #[test]
    fn test_document_title_falls_back_to_id() {
        let doc = Document::from_body("faq", "## Only a section");
        assert_eq!(doc.title, "faq");
    }

    #[test]
    fn test_placeholder_document() {
        let doc = Document::placeholder("missing");
        assert_eq!(doc.id, "missing");
        assert_eq!(doc.title, PLACEHOLDER_TITLE);
        assert_eq!(doc.body, PLACEHOLDER_BODY);
    }

    #[test]
    fn test_title_skips_comments_in_code_blocks() {
        let doc = Document::from_body(
            "install",
            "Run this first:\n\n```bash\n# install deps\nnpm i\n```\n\n# Installation\n",
        );
        assert_eq!(doc.title, "Installation");
    }

    #[test]
    fn test_title_from_setext_heading() {
        let doc = Document::from_body("x", "Installation\n============\n\nBody");
        assert_eq!(doc.title, "Installation");
    }

    #[test]
    fn test_title_skips_lower_levels_and_keeps_inline_code() {
        let doc = Document::from_body("x", "## Setup\n\n# The `mmdc` CLI\n");
        assert_eq!(doc.title, "The mmdc CLI");
    }

    #[test]
    fn test_content_table_missing_from_menu() {
        let table: ContentTable = [("intro", "# Intro"), ("chat", "# Chat")]
            .into_iter()
            .collect();
        assert_eq!(table.missing_from(&two_group_menu()), vec!["start"]);
    }

    #[test]
    fn test_icon_unknown_name_is_generic() {
        let entry: MenuEntry =
            serde_json::from_str(r#"{"id":"x","label":"X","icon":"rocket"}"#).unwrap();
        assert_eq!(entry.icon, IconRef::Generic);

        let entry: MenuEntry =
            serde_json::from_str(r#"{"id":"x","label":"X","icon":"message-square"}"#).unwrap();
        assert_eq!(entry.icon, IconRef::MessageSquare);
        assert_eq!(entry.icon.name(), "message-square");
    }

    #[test]
    fn test_filtered_matches_label_or_id() {
        let menu = two_group_menu();

        let by_label = menu.filtered("QUICK");
        assert_eq!(by_label.groups.len(), 1);
        assert_eq!(by_label.groups[0].items[0].id, "start");

        let by_id = menu.filtered("cha");
        assert_eq!(by_id.groups[0].title, "Features");

        assert!(menu.filtered("nothing-matches").groups.is_empty());
        assert_eq!(menu.filtered("  "), menu);
    }

    #[test]
    fn test_custom_placeholder_document() {
        let placeholder = Placeholder {
            title: "Coming Soon".to_string(),
            body: "# Coming Soon".to_string(),
        };
        let doc = placeholder.document("faq");
        assert_eq!(doc.id, "faq");
        assert_eq!(doc.title, "Coming Soon");
        assert_eq!(doc.body, "# Coming Soon");
    }
}

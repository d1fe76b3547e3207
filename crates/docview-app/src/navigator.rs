//! Active-document selection and previous/next lookup

use std::sync::Arc;

use docview_core::prelude::*;
use docview_core::{Adjacent, ContentTable, Document, FlattenedMenu, Menu, MenuEntry, Placeholder};

/// Breadcrumb label used when the active id is not in the menu.
pub const FALLBACK_BREADCRUMB: &str = "Content";

/// Navigator selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(String),
}

/// Owns the active-document selection.
///
/// The menu and content table are injected and never mutated. Any id is
/// accepted by [`select_document`](Self::select_document); ids without
/// content resolve to the placeholder document.
#[derive(Debug, Clone)]
pub struct DocumentNavigator {
    menu: Arc<Menu>,
    flattened: FlattenedMenu,
    content: Arc<ContentTable>,
    placeholder: Placeholder,
    selection: Selection,
}

impl DocumentNavigator {
    pub fn new(menu: Arc<Menu>, content: Arc<ContentTable>) -> Self {
        let flattened = menu.flatten();
        Self {
            menu,
            flattened,
            content,
            placeholder: Placeholder::default(),
            selection: Selection::NoSelection,
        }
    }

    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn flattened(&self) -> &FlattenedMenu {
        &self.flattened
    }

    pub fn content(&self) -> &ContentTable {
        &self.content
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::Selected(id) => Some(id),
            Selection::NoSelection => None,
        }
    }

    /// Set the active document. Never fails.
    ///
    /// Returns `true` when the selection changed. Overlay and scroll side
    /// effects are applied by the caller for every call, changed or not.
    pub fn select_document(&mut self, id: &str) -> bool {
        if self.active_id() == Some(id) {
            return false;
        }
        debug!("Selecting document '{}'", id);
        self.selection = Selection::Selected(id.to_string());
        true
    }

    /// The active document, or the placeholder when it has no content.
    ///
    /// With no selection the placeholder carries an empty id.
    pub fn active_document(&self) -> Document {
        let id = self.active_id().unwrap_or_default();
        match self.content.get(id) {
            Some(document) => document.clone(),
            None => {
                debug!("No content for '{}', using placeholder", id);
                self.placeholder.document(id)
            }
        }
    }

    /// Whether the active id has an entry in the content table.
    pub fn has_content(&self) -> bool {
        self.active_id().is_some_and(|id| self.content.contains(id))
    }

    /// Previous/next entries around the active id; both absent when the id
    /// is not in the menu or nothing is selected.
    pub fn adjacent(&self) -> Adjacent<'_> {
        match self.active_id() {
            Some(id) => self.flattened.adjacent(id),
            None => Adjacent::default(),
        }
    }

    pub fn active_entry(&self) -> Option<&MenuEntry> {
        self.active_id().and_then(|id| self.flattened.get(id))
    }

    pub fn breadcrumb(&self) -> &str {
        self.active_entry()
            .map(|e| e.label.as_str())
            .unwrap_or(FALLBACK_BREADCRUMB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docview_core::{IconRef, MenuGroup};

    fn navigator() -> DocumentNavigator {
        let menu = Menu::new(vec![MenuGroup {
            title: "Docs".to_string(),
            items: vec![
                MenuEntry::new("a", "Entry A", IconRef::Book),
                MenuEntry::new("b", "Entry B", IconRef::Zap),
            ],
        }]);
        let content: ContentTable = [("a", "# Title A"), ("b", "# Title B")]
            .into_iter()
            .collect();
        DocumentNavigator::new(Arc::new(menu), Arc::new(content))
    }

    fn ids(adjacent: Adjacent<'_>) -> (Option<&str>, Option<&str>) {
        (
            adjacent.previous.map(|e| e.id.as_str()),
            adjacent.next.map(|e| e.id.as_str()),
        )
    }

    #[test]
    fn test_initial_state_is_no_selection() {
        let nav = navigator();
        assert_eq!(nav.selection(), &Selection::NoSelection);
        assert_eq!(nav.active_document().title, "Under Construction");
        assert!(!nav.has_content());
        assert_eq!(ids(nav.adjacent()), (None, None));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut nav = navigator();

        nav.select_document("a");
        assert_eq!(nav.active_document().title, "Title A");
        assert_eq!(ids(nav.adjacent()), (None, Some("b")));

        nav.select_document("b");
        assert_eq!(nav.active_document().body, "# Title B");
        assert_eq!(ids(nav.adjacent()), (Some("a"), None));

        nav.select_document("missing");
        let doc = nav.active_document();
        assert!(!nav.has_content());
        assert_eq!(doc.title, "Under Construction");
        assert_eq!(doc.id, "missing");
        assert_eq!(ids(nav.adjacent()), (None, None));
    }

    #[test]
    fn test_selection_independent_of_history() {
        let mut nav = navigator();
        nav.select_document("missing");
        nav.select_document("b");
        nav.select_document("a");
        assert_eq!(nav.active_document().title, "Title A");
    }

    #[test]
    fn test_reselect_is_idempotent() {
        let mut nav = navigator();
        assert!(nav.select_document("a"));
        let first = nav.active_document();
        assert!(!nav.select_document("a"));
        assert_eq!(nav.active_document(), first);
    }

    #[test]
    fn test_custom_placeholder() {
        let mut nav = navigator().with_placeholder(Placeholder {
            title: "Soon".to_string(),
            body: "# Soon".to_string(),
        });
        nav.select_document("faq");
        assert_eq!(nav.active_document().title, "Soon");
        assert!(!nav.has_content());
    }

    #[test]
    fn test_breadcrumb() {
        let mut nav = navigator();
        assert_eq!(nav.breadcrumb(), FALLBACK_BREADCRUMB);
        nav.select_document("b");
        assert_eq!(nav.breadcrumb(), "Entry B");
        nav.select_document("unknown");
        assert_eq!(nav.breadcrumb(), "Content");
    }
}

//! Heading anchors and the "on this page" outline.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Converts heading text to a URL-safe slug following GitHub's convention.
///
/// 1. Convert to lowercase
/// 2. Replace spaces with hyphens
/// 3. Remove all characters except alphanumeric, hyphens, and underscores
/// 4. Collapse multiple consecutive hyphens into one
///
/// Non-ASCII letters are kept, so Japanese or accented headings still produce
/// readable anchors.
///
/// # Example
///
/// ```
/// use docview_render::toc::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("API Reference (v2)"), "api-reference-v2");
/// ```
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '_' {
                Some(c)
            } else if c == ' ' || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Hands out unique anchors within one document.
///
/// Repeated slugs get the first free `-1`, `-2`, ... suffix; empty slugs
/// become `section`. Suffixed anchors count as taken too, so a heading whose
/// own slug is `overview-1` never reuses a generated one.
#[derive(Debug, Default)]
pub struct AnchorSet {
    seen: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor_for(&mut self, text: &str) -> String {
        let mut base = slugify(&text.replace('`', ""));
        if base.is_empty() {
            base = "section".to_string();
        }
        if self.seen.insert(base.clone()) {
            return base;
        }

        let suffix = self.next_suffix.entry(base.clone()).or_insert(1);
        loop {
            let candidate = format!("{base}-{suffix}");
            *suffix += 1;
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Deepest heading level listed in the outline.
pub const OUTLINE_MAX_LEVEL: u8 = 3;

/// A single outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub text: String,
    pub anchor: String,
}

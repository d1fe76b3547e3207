//! Visual tree produced by the content transformer
//!
//! One variant per enrichment rule. The tree is plain data: it owns no render
//! state, so the same tree can be emitted many times against different
//! diagram/copy states.

use serde::Serialize;

use crate::code_block::CodePresentation;

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading(Heading),
    Paragraph { content: Vec<Inline> },
    List(List),
    /// A block quote re-rendered as an informational callout panel.
    Callout { children: Vec<Block> },
    Table(Table),
    /// A paragraph made only of images, rendered as stacked cards.
    Figure { images: Vec<ImageCard> },
    Code(CodePresentation),
    Rule,
    Html { markup: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// 1..=6
    pub level: u8,
    pub anchor: String,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    /// Starting number for ordered lists, `None` for bullet lists.
    pub start: Option<u64>,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn is_ordered(&self) -> bool {
        self.start.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListItem {
    /// Task list marker, if the item has one.
    pub checked: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    pub(crate) fn css(&self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(value: pulldown_cmark::Alignment) -> Self {
        match value {
            pulldown_cmark::Alignment::None => Alignment::None,
            pulldown_cmark::Alignment::Left => Alignment::Left,
            pulldown_cmark::Alignment::Center => Alignment::Center,
            pulldown_cmark::Alignment::Right => Alignment::Right,
        }
    }
}

pub type TableCell = Vec<Inline>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub alignments: Vec<Alignment>,
    pub header: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    pub(crate) fn alignment(&self, column: usize) -> Alignment {
        self.alignments
            .get(column)
            .copied()
            .unwrap_or(Alignment::None)
    }
}

/// An image wrapped in a card, captioned by its alt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCard {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

impl ImageCard {
    /// Caption text, or `None` when the alt text is empty.
    pub fn caption(&self) -> Option<&str> {
        let alt = self.alt.trim();
        (!alt.is_empty()).then_some(alt)
    }
}

/// Inline node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    Strong { children: Vec<Inline> },
    Emphasis { children: Vec<Inline> },
    Strikethrough { children: Vec<Inline> },
    /// Inline code: minimal styling, no copy action.
    Code { code: String },
    Link(Link),
    Image(ImageCard),
    SoftBreak,
    HardBreak,
    Html { markup: String },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub title: Option<String>,
    pub children: Vec<Inline>,
}

/// Concatenated text content of an inline run (markup stripped).
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(inlines, &mut out);
    out
}

fn push_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text { text } => out.push_str(text),
            Inline::Code { code } => out.push_str(code),
            Inline::Strong { children }
            | Inline::Emphasis { children }
            | Inline::Strikethrough { children } => push_plain_text(children, out),
            Inline::Link(link) => push_plain_text(&link.children, out),
            Inline::Image(card) => out.push_str(&card.alt),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Html { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_absent_for_blank_alt() {
        let card = ImageCard {
            src: "a.png".to_string(),
            alt: "  ".to_string(),
            title: None,
        };
        assert_eq!(card.caption(), None);

        let card = ImageCard {
            alt: "Architecture".to_string(),
            ..card
        };
        assert_eq!(card.caption(), Some("Architecture"));
    }

    #[test]
    fn test_plain_text_flattens_nested_markup() {
        let inlines = vec![
            Inline::text("Use "),
            Inline::Strong {
                children: vec![Inline::Code {
                    code: "docview".to_string(),
                }],
            },
            Inline::SoftBreak,
            Inline::Link(Link {
                href: "/x".to_string(),
                title: None,
                children: vec![Inline::text("now")],
            }),
        ];
        assert_eq!(plain_text(&inlines), "Use docview now");
    }
}

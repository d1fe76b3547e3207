//! Markdown to visual tree transformation.
//!
//! The transformer walks pulldown-cmark's event stream with an explicit frame
//! stack and builds a [`Block`] tree, applying one enrichment rule per node
//! type:
//! - headings get anchors (levels 1-3 also feed the outline)
//! - block quotes become callout panels
//! - tables keep header/body split and column alignment
//! - image-only paragraphs become figure cards
//! - fenced code goes through [`CodeBlockPresenter`]
//!
//! Diagram rendering is not done here; diagram blocks are only collected so
//! the caller can drive their lifecycle.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use tracing::trace;

use crate::code_block::{
    classify, language_from_info, BlockIds, CodeBlockId, CodeBlockPresenter, CodeKind, CodePanel,
    CodePresentation, DiagramBlock,
};
use crate::toc::{AnchorSet, OutlineEntry, OUTLINE_MAX_LEVEL};
use crate::view::{
    plain_text, Block, Heading, ImageCard, Inline, Link, List, ListItem, Table, TableCell,
};

/// Markdown extensions to enable.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// GitHub Flavored Markdown tables
    pub enable_tables: bool,
    /// Strikethrough syntax (~~text~~)
    pub enable_strikethrough: bool,
    /// Task list items ([x] and [ ])
    pub enable_tasklists: bool,
    /// Footnotes ([^1])
    pub enable_footnotes: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            enable_tables: true,
            enable_strikethrough: true,
            enable_tasklists: true,
            enable_footnotes: false,
        }
    }
}

impl TransformOptions {
    fn to_pulldown_options(&self) -> Options {
        let mut options = Options::empty();
        if self.enable_tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.enable_strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.enable_tasklists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if self.enable_footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        options
    }
}

/// Output of transforming one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub document_id: String,
    pub blocks: Vec<Block>,
    pub outline: Vec<OutlineEntry>,
    /// Diagram blocks in document order.
    pub diagrams: Vec<DiagramBlock>,
    /// Code panels in document order; `panels[n].id == CodeBlockId(n)`.
    pub panels: Vec<CodePanel>,
}

impl RenderedDocument {
    /// Look up a code panel by id.
    pub fn panel(&self, id: CodeBlockId) -> Option<&CodePanel> {
        self.panels.get(id.0).filter(|p| p.id == id)
    }
}

/// Maps markdown to the enriched visual tree.
#[derive(Debug, Clone, Default)]
pub struct ContentTransformer {
    options: TransformOptions,
    presenter: CodeBlockPresenter,
}

impl ContentTransformer {
    pub fn new(presenter: CodeBlockPresenter) -> Self {
        Self {
            options: TransformOptions::default(),
            presenter,
        }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    pub fn presenter(&self) -> &CodeBlockPresenter {
        &self.presenter
    }

    /// Transform one document.
    ///
    /// `document_id` seeds the diagram ids, which are therefore stable for the
    /// same document and block position.
    ///
    /// # Example
    ///
    /// ```
    /// use docview_render::{ContentTransformer, Block};
    ///
    /// let doc = ContentTransformer::default().transform("a", "# Title A");
    /// assert!(matches!(&doc.blocks[0], Block::Heading(h) if h.level == 1));
    /// ```
    pub fn transform(&self, document_id: &str, markdown: &str) -> RenderedDocument {
        let parser = Parser::new_ext(markdown, self.options.to_pulldown_options());
        let mut builder = TreeBuilder::new(&self.presenter, document_id);
        for event in parser {
            builder.handle(event);
        }
        builder.finish(document_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree building
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Container {
    Root,
    Quote,
    Footnote,
}

#[derive(Debug)]
enum SpanKind {
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: Option<String> },
}

#[derive(Debug)]
enum Frame {
    Blocks(Container, Vec<Block>),
    Paragraph(Vec<Inline>),
    Heading {
        level: u8,
        inlines: Vec<Inline>,
    },
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Item {
        checked: Option<bool>,
        blocks: Vec<Block>,
        inlines: Vec<Inline>,
    },
    Table(Table),
    TableHead(Vec<TableCell>),
    TableRow(Vec<TableCell>),
    TableCell(Vec<Inline>),
    Span {
        kind: SpanKind,
        children: Vec<Inline>,
    },
    Image {
        src: String,
        title: Option<String>,
        alt: String,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    HtmlBlock(String),
    Skip,
}

struct TreeBuilder<'p> {
    presenter: &'p CodeBlockPresenter,
    ids: BlockIds,
    anchors: AnchorSet,
    stack: Vec<Frame>,
    outline: Vec<OutlineEntry>,
    diagrams: Vec<DiagramBlock>,
    panels: Vec<CodePanel>,
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Whitespace-only text and line breaks between images do not break a figure.
fn is_figure(inlines: &[Inline]) -> bool {
    let mut images = 0;
    for inline in inlines {
        match inline {
            Inline::Image(_) => images += 1,
            Inline::Text { text } if text.trim().is_empty() => {}
            Inline::SoftBreak | Inline::HardBreak => {}
            _ => return false,
        }
    }
    images > 0
}

fn flush_inlines(blocks: &mut Vec<Block>, inlines: &mut Vec<Inline>) {
    if !inlines.is_empty() {
        blocks.push(Block::Paragraph {
            content: std::mem::take(inlines),
        });
    }
}

impl<'p> TreeBuilder<'p> {
    fn new(presenter: &'p CodeBlockPresenter, document_id: &str) -> Self {
        Self {
            presenter,
            ids: BlockIds::new(document_id),
            anchors: AnchorSet::new(),
            stack: vec![Frame::Blocks(Container::Root, Vec::new())],
            outline: Vec::new(),
            diagrams: Vec::new(),
            panels: Vec::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.stack.last_mut() {
                Some(Frame::CodeBlock { text: buf, .. }) | Some(Frame::HtmlBlock(buf)) => {
                    buf.push_str(&text)
                }
                Some(Frame::Skip) => {}
                _ => self.push_inline(Inline::text(text.into_string())),
            },
            Event::Code(code) => self.push_inline(Inline::Code {
                code: code.into_string(),
            }),
            Event::Html(html) => match self.stack.last_mut() {
                Some(Frame::HtmlBlock(buf)) => buf.push_str(&html),
                _ => self.push_inline(Inline::Html {
                    markup: html.into_string(),
                }),
            },
            Event::InlineHtml(html) => self.push_inline(Inline::Html {
                markup: html.into_string(),
            }),
            Event::FootnoteReference(label) => {
                self.push_inline(Inline::text(format!("[{label}]")))
            }
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => self.push_block(Block::Rule),
            Event::TaskListMarker(done) => {
                let item = self.stack.iter_mut().rev().find_map(|f| match f {
                    Frame::Item { checked, .. } => Some(checked),
                    _ => None,
                });
                if let Some(checked) = item {
                    *checked = Some(done);
                }
            }
            #[allow(unreachable_patterns)]
            other => trace!(?other, "Unhandled markdown event"),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading {
                level: heading_level(level),
                inlines: Vec::new(),
            },
            Tag::BlockQuote => Frame::Blocks(Container::Quote, Vec::new()),
            Tag::CodeBlock(kind) => Frame::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(info) => language_from_info(&info),
                    CodeBlockKind::Indented => None,
                },
                text: String::new(),
            },
            Tag::HtmlBlock => Frame::HtmlBlock(String::new()),
            Tag::List(start) => Frame::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::Item {
                checked: None,
                blocks: Vec::new(),
                inlines: Vec::new(),
            },
            Tag::FootnoteDefinition(_) => Frame::Blocks(Container::Footnote, Vec::new()),
            Tag::Table(alignments) => Frame::Table(Table {
                alignments: alignments.into_iter().map(Into::into).collect(),
                ..Table::default()
            }),
            Tag::TableHead => Frame::TableHead(Vec::new()),
            Tag::TableRow => Frame::TableRow(Vec::new()),
            Tag::TableCell => Frame::TableCell(Vec::new()),
            Tag::Emphasis => Frame::Span {
                kind: SpanKind::Emphasis,
                children: Vec::new(),
            },
            Tag::Strong => Frame::Span {
                kind: SpanKind::Strong,
                children: Vec::new(),
            },
            Tag::Strikethrough => Frame::Span {
                kind: SpanKind::Strikethrough,
                children: Vec::new(),
            },
            Tag::Link {
                dest_url, title, ..
            } => Frame::Span {
                kind: SpanKind::Link {
                    href: dest_url.into_string(),
                    title: non_empty(&title),
                },
                children: Vec::new(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                src: dest_url.into_string(),
                title: non_empty(&title),
                alt: String::new(),
            },
            Tag::MetadataBlock(_) => Frame::Skip,
            #[allow(unreachable_patterns)]
            _ => Frame::Skip,
        };
        self.stack.push(frame);
    }

    fn end(&mut self, tag: TagEnd) {
        // The root frame is never popped by an end event.
        if self.stack.len() <= 1 {
            trace!(?tag, "Unbalanced end event ignored");
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame {
            Frame::Paragraph(inlines) => {
                if is_figure(&inlines) {
                    let images = inlines
                        .into_iter()
                        .filter_map(|i| match i {
                            Inline::Image(card) => Some(card),
                            _ => None,
                        })
                        .collect();
                    self.push_block(Block::Figure { images });
                } else {
                    self.push_block(Block::Paragraph { content: inlines });
                }
            }
            Frame::Heading { level, inlines } => {
                let text = plain_text(&inlines);
                let anchor = self.anchors.anchor_for(&text);
                if level <= OUTLINE_MAX_LEVEL {
                    self.outline.push(OutlineEntry {
                        level,
                        text: text.trim().to_string(),
                        anchor: anchor.clone(),
                    });
                }
                self.push_block(Block::Heading(Heading {
                    level,
                    anchor,
                    content: inlines,
                }));
            }
            Frame::Blocks(Container::Quote, children) => {
                self.push_block(Block::Callout { children })
            }
            Frame::Blocks(_, children) => {
                for block in children {
                    self.push_block(block);
                }
            }
            Frame::CodeBlock { language, text } => self.finish_code(language, text),
            Frame::HtmlBlock(markup) => self.push_block(Block::Html { markup }),
            Frame::List { start, items } => self.push_block(Block::List(List { start, items })),
            Frame::Item {
                checked,
                mut blocks,
                mut inlines,
            } => {
                flush_inlines(&mut blocks, &mut inlines);
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(ListItem { checked, blocks });
                }
            }
            Frame::Table(table) => self.push_block(Block::Table(table)),
            Frame::TableHead(cells) => {
                if let Some(Frame::Table(table)) = self.stack.last_mut() {
                    table.header = cells;
                }
            }
            Frame::TableRow(cells) => {
                if let Some(Frame::Table(table)) = self.stack.last_mut() {
                    table.rows.push(cells);
                }
            }
            Frame::TableCell(inlines) => match self.stack.last_mut() {
                Some(Frame::TableHead(cells)) | Some(Frame::TableRow(cells)) => {
                    cells.push(inlines)
                }
                _ => {}
            },
            Frame::Span { kind, children } => {
                let inline = match kind {
                    SpanKind::Emphasis => Inline::Emphasis { children },
                    SpanKind::Strong => Inline::Strong { children },
                    SpanKind::Strikethrough => Inline::Strikethrough { children },
                    SpanKind::Link { href, title } => Inline::Link(Link {
                        href,
                        title,
                        children,
                    }),
                };
                self.push_inline(inline);
            }
            Frame::Image { src, title, alt } => {
                self.push_inline(Inline::Image(ImageCard { src, alt, title }))
            }
            Frame::Skip => {}
        }
    }

    fn finish_code(&mut self, language: Option<String>, text: String) {
        match classify(&text, language.as_deref()) {
            CodeKind::Inline => self.push_block(Block::Paragraph {
                content: vec![Inline::Code { code: text }],
            }),
            CodeKind::Fenced => {
                let presentation = self
                    .presenter
                    .present(&mut self.ids, &text, language.as_deref());
                match &presentation {
                    CodePresentation::Diagram(diagram) => self.diagrams.push(diagram.clone()),
                    CodePresentation::Panel(panel) => self.panels.push(panel.clone()),
                }
                self.push_block(Block::Code(presentation));
            }
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        let target = match self.stack.last_mut() {
            Some(Frame::Paragraph(v))
            | Some(Frame::Heading { inlines: v, .. })
            | Some(Frame::Item { inlines: v, .. })
            | Some(Frame::TableCell(v))
            | Some(Frame::Span { children: v, .. }) => v,
            Some(Frame::Image { alt, .. }) => {
                alt.push_str(&plain_text(std::slice::from_ref(&inline)));
                return;
            }
            Some(Frame::Blocks(_, blocks)) => {
                blocks.push(Block::Paragraph {
                    content: vec![inline],
                });
                return;
            }
            _ => return,
        };

        // Adjacent text runs are merged.
        if let (Some(Inline::Text { text: last }), Inline::Text { text }) =
            (target.last_mut(), &inline)
        {
            last.push_str(text);
            return;
        }
        target.push(inline);
    }

    fn push_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(Frame::Blocks(_, blocks)) => blocks.push(block),
            Some(Frame::Item {
                blocks, inlines, ..
            }) => {
                flush_inlines(blocks, inlines);
                blocks.push(block);
            }
            _ => trace!("Dropping block outside a block container"),
        }
    }

    fn finish(mut self, document_id: &str) -> RenderedDocument {
        while self.stack.len() > 1 {
            self.end(TagEnd::Paragraph);
        }
        let blocks = match self.stack.pop() {
            Some(Frame::Blocks(_, blocks)) => blocks,
            _ => Vec::new(),
        };
        RenderedDocument {
            document_id: document_id.to_string(),
            blocks,
            outline: self.outline,
            diagrams: self.diagrams,
            panels: self.panels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Alignment;

    fn transform(md: &str) -> RenderedDocument {
        ContentTransformer::default().transform("doc", md)
    }

    #[test]
    fn test_heading_levels_and_anchors() {
        let doc = transform("# Title\n\n## Section One\n\n### Detail\n\n#### Deep");
        let levels: Vec<_> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some((h.level, h.anchor.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            levels,
            vec![(1, "title"), (2, "section-one"), (3, "detail"), (4, "deep")]
        );
        // Outline stops at level 3.
        assert_eq!(doc.outline.len(), 3);
        assert_eq!(doc.outline[1].text, "Section One");
    }

    #[test]
    fn test_block_quote_becomes_callout_with_content_preserved() {
        let doc = transform("> **Tip**: set the API key.\n>\n> - one");
        let Block::Callout { children } = &doc.blocks[0] else {
            panic!("expected callout, got {:?}", doc.blocks[0]);
        };
        assert_eq!(children.len(), 2);
        let Block::Paragraph { content } = &children[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&content[0], Inline::Strong { .. }));
        assert_eq!(plain_text(content), "Tip: set the API key.");
        assert!(matches!(&children[1], Block::List(_)));
    }

    #[test]
    fn test_table_header_rows_and_alignment() {
        let doc = transform("| Role | Can edit |\n|:-----|:--------:|\n| Admin | yes |\n| Guest | no |");
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.alignments, vec![Alignment::Left, Alignment::Center]);
        assert_eq!(plain_text(&table.header[1]), "Can edit");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(plain_text(&table.rows[1][0]), "Guest");
    }

    #[test]
    fn test_image_only_paragraph_is_figure() {
        let doc = transform("![Sidebar overview](sidebar.png)\n\nText with ![](icon.png) inside.");
        let Block::Figure { images } = &doc.blocks[0] else {
            panic!("expected figure, got {:?}", doc.blocks[0]);
        };
        assert_eq!(images[0].src, "sidebar.png");
        assert_eq!(images[0].caption(), Some("Sidebar overview"));

        let Block::Paragraph { content } = &doc.blocks[1] else {
            panic!("expected paragraph");
        };
        let Some(Inline::Image(card)) = content.get(1) else {
            panic!("expected inline image");
        };
        assert_eq!(card.caption(), None);
    }

    #[test]
    fn test_fenced_code_becomes_panel() {
        let doc = transform("```bash\nnpm install\nnpm start\n```");
        assert_eq!(
            doc.blocks[0],
            Block::Code(CodePresentation::Panel(CodePanel {
                id: CodeBlockId(0),
                language: Some("bash".to_string()),
                code: "npm install\nnpm start".to_string(),
            }))
        );
        assert_eq!(doc.panels.len(), 1);
        assert_eq!(doc.panel(CodeBlockId(0)).unwrap().code, "npm install\nnpm start");
    }

    #[test]
    fn test_mermaid_block_is_collected_as_diagram() {
        let doc = transform("Intro\n\n```mermaid\ngraph TD\nA-->B\n```\n\n```mermaid\nsequenceDiagram\n```");
        assert_eq!(doc.diagrams.len(), 2);
        assert_eq!(doc.diagrams[0].id, "doc-diagram-0");
        assert_eq!(doc.diagrams[0].source, "graph TD\nA-->B");
        assert_eq!(doc.diagrams[1].id, "doc-diagram-1");
        assert!(doc.panels.is_empty());
    }

    #[test]
    fn test_inline_code_stays_inline() {
        let doc = transform("Press `/` to open the menu.");
        let Block::Paragraph { content } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            content[1],
            Inline::Code {
                code: "/".to_string()
            }
        );
        assert!(doc.panels.is_empty());
    }

    #[test]
    fn test_ordered_and_unordered_lists() {
        let doc = transform("1. first\n2. second\n\n- a\n- b");
        let Block::List(ordered) = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert!(ordered.is_ordered());
        assert_eq!(ordered.start, Some(1));
        assert_eq!(ordered.items.len(), 2);

        let Block::List(bullets) = &doc.blocks[1] else {
            panic!("expected list");
        };
        assert!(!bullets.is_ordered());
        let Block::Paragraph { content } = &bullets.items[1].blocks[0] else {
            panic!("tight item text should be wrapped in a paragraph");
        };
        assert_eq!(plain_text(content), "b");
    }

    #[test]
    fn test_nested_list_structure_is_kept() {
        let doc = transform("- **Advanced**:\n  - Code Block\n  - Mermaid");
        let Block::List(outer) = &doc.blocks[0] else {
            panic!("expected list");
        };
        let item = &outer.items[0];
        assert!(matches!(&item.blocks[0], Block::Paragraph { .. }));
        let Block::List(inner) = &item.blocks[1] else {
            panic!("expected nested list");
        };
        assert_eq!(inner.items.len(), 2);
    }

    #[test]
    fn test_task_list_markers() {
        let doc = transform("- [x] done\n- [ ] todo");
        let Block::List(list) = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].checked, Some(true));
        assert_eq!(list.items[1].checked, Some(false));
    }

    #[test]
    fn test_links_keep_href_and_children() {
        let doc = transform("See the [download page](/download \"Downloads\").");
        let Block::Paragraph { content } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        let Inline::Link(link) = &content[1] else {
            panic!("expected link");
        };
        assert_eq!(link.href, "/download");
        assert_eq!(link.title.as_deref(), Some("Downloads"));
        assert_eq!(plain_text(&link.children), "download page");
    }

    #[test]
    fn test_rule_and_emphasis() {
        let doc = transform("---\n*note* and ~~old~~");
        assert_eq!(doc.blocks[0], Block::Rule);
        let Block::Paragraph { content } = &doc.blocks[1] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&content[0], Inline::Emphasis { .. }));
        assert!(matches!(&content[2], Inline::Strikethrough { .. }));
    }

    #[test]
    fn test_same_input_same_ids() {
        let md = "```mermaid\ngraph TD\n```\n\n```rust\nfn main() {}\n```";
        let a = ContentTransformer::default().transform("ai", md);
        let b = ContentTransformer::default().transform("ai", md);
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_diagram_language() {
        let transformer = ContentTransformer::new(CodeBlockPresenter::new("dot"));
        let doc = transformer.transform("x", "```dot\ndigraph { a -> b }\n```\n\n```mermaid\ngraph\n```");
        assert_eq!(doc.diagrams.len(), 1);
        assert_eq!(doc.panels.len(), 1);
        assert_eq!(doc.panels[0].language.as_deref(), Some("mermaid"));
    }
}

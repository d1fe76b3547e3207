//! HTML emission for the visual tree
//!
//! Stateful parts of a page (diagram render state, copy feedback) are read
//! through [`BlockStates`] at emit time, so the tree itself stays immutable.

use std::fmt::Write as _;

use crate::code_block::{CodeBlockId, CodePanel, CodePresentation, CopyState, DiagramBlock};
use crate::diagram::DiagramView;
use crate::toc::OutlineEntry;
use crate::view::{Block, ImageCard, Inline, List, Table};

/// Live state consulted while emitting stateful blocks.
pub trait BlockStates {
    fn diagram(&self, id: &str) -> DiagramView<'_>;
    fn copy_state(&self, block: CodeBlockId) -> CopyState;
}

/// States for a tree with no live page behind it: diagrams loading, panels idle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl BlockStates for Detached {
    fn diagram(&self, _id: &str) -> DiagramView<'_> {
        DiagramView::Loading
    }

    fn copy_state(&self, _block: CodeBlockId) -> CopyState {
        CopyState::Idle
    }
}

const INFO_ICON: &str = r#"<svg class="doc-callout-icon" xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><circle cx="12" cy="12" r="10"/><path d="M12 16v-4"/><path d="M12 8h.01"/></svg>"#;

/// Escape text for HTML content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = pulldown_cmark_escape::escape_html(&mut out, text);
    out
}

/// Escape a link or image destination for an `href`/`src` attribute.
pub fn escape_href(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let _ = pulldown_cmark_escape::escape_href(&mut out, url);
    out
}

/// Label shown on a code panel's copy button.
pub fn copy_label(state: CopyState) -> &'static str {
    match state {
        CopyState::Idle => "Copy",
        CopyState::Copied => "Copied",
    }
}

/// Emit blocks as an HTML fragment.
pub fn render_blocks(blocks: &[Block], states: &impl BlockStates) -> String {
    let mut emitter = Emitter {
        out: String::new(),
        states,
    };
    emitter.blocks(blocks);
    emitter.out
}

/// Emit the "on this page" outline. Empty outlines produce an empty string.
pub fn render_outline(outline: &[OutlineEntry]) -> String {
    if outline.is_empty() {
        return String::new();
    }
    let mut out = String::from("<nav class=\"doc-outline\"><p class=\"doc-outline-title\">On this page</p><ul>");
    for entry in outline {
        let _ = write!(
            out,
            "<li class=\"doc-outline-level-{}\"><a href=\"#{}\">{}</a></li>",
            entry.level,
            escape_html(&entry.anchor),
            escape_html(&entry.text)
        );
    }
    out.push_str("</ul></nav>");
    out
}

struct Emitter<'s, S> {
    out: String,
    states: &'s S,
}

impl<S: BlockStates> Emitter<'_, S> {
    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading(heading) => {
                let anchor = escape_html(&heading.anchor);
                match heading.level {
                    1 => {
                        let _ = write!(self.out, "<h1 id=\"{anchor}\" class=\"doc-title\">");
                        self.inlines(&heading.content);
                        self.out.push_str("</h1>\n");
                    }
                    2 => {
                        let _ = write!(
                            self.out,
                            "<h2 id=\"{anchor}\" class=\"doc-section\"><span class=\"doc-section-marker\"></span>"
                        );
                        self.inlines(&heading.content);
                        self.out
                            .push_str("</h2>\n<hr class=\"doc-section-rule\" />\n");
                    }
                    3 => {
                        let _ = write!(self.out, "<h3 id=\"{anchor}\" class=\"doc-subsection\">");
                        self.inlines(&heading.content);
                        self.out.push_str("</h3>\n");
                    }
                    level => {
                        let _ = write!(self.out, "<h{level} id=\"{anchor}\">");
                        self.inlines(&heading.content);
                        let _ = writeln!(self.out, "</h{level}>");
                    }
                }
            }
            Block::Paragraph { content } => {
                self.out.push_str("<p class=\"doc-paragraph\">");
                self.inlines(content);
                self.out.push_str("</p>\n");
            }
            Block::List(list) => self.list(list),
            Block::Callout { children } => {
                self.out.push_str("<aside class=\"doc-callout\" role=\"note\">");
                self.out.push_str(INFO_ICON);
                self.out.push_str("<div class=\"doc-callout-body\">\n");
                self.blocks(children);
                self.out.push_str("</div></aside>\n");
            }
            Block::Table(table) => self.table(table),
            Block::Figure { images } => {
                self.out.push_str("<div class=\"doc-figure\">\n");
                for image in images {
                    self.image_card(image);
                }
                self.out.push_str("</div>\n");
            }
            Block::Code(CodePresentation::Panel(panel)) => self.code_panel(panel),
            Block::Code(CodePresentation::Diagram(diagram)) => self.diagram(diagram),
            Block::Rule => self.out.push_str("<hr class=\"doc-rule\" />\n"),
            Block::Html { markup } => self.out.push_str(markup),
        }
    }

    fn list(&mut self, list: &List) {
        match list.start {
            Some(1) => self.out.push_str("<ol class=\"doc-list\">\n"),
            Some(start) => {
                let _ = writeln!(self.out, "<ol class=\"doc-list\" start=\"{start}\">");
            }
            None => self.out.push_str("<ul class=\"doc-list\">\n"),
        }
        for item in &list.items {
            match item.checked {
                Some(checked) => {
                    self.out.push_str("<li class=\"doc-task\"><input type=\"checkbox\" disabled");
                    if checked {
                        self.out.push_str(" checked");
                    }
                    self.out.push_str(" /> ");
                }
                None => self.out.push_str("<li>"),
            }
            // Tight items hold a single paragraph; emit it without the <p>.
            match item.blocks.as_slice() {
                [Block::Paragraph { content }] => self.inlines(content),
                blocks => self.blocks(blocks),
            }
            self.out.push_str("</li>\n");
        }
        self.out.push_str(if list.is_ordered() { "</ol>\n" } else { "</ul>\n" });
    }

    fn table(&mut self, table: &Table) {
        self.out
            .push_str("<div class=\"doc-table\"><table>\n<thead><tr>");
        for (column, cell) in table.header.iter().enumerate() {
            self.cell("th", table.alignment(column).css(), cell);
        }
        self.out.push_str("</tr></thead>\n<tbody>\n");
        for (index, row) in table.rows.iter().enumerate() {
            let parity = if index % 2 == 0 { "even" } else { "odd" };
            let _ = write!(self.out, "<tr class=\"doc-row-{parity}\">");
            for (column, cell) in row.iter().enumerate() {
                self.cell("td", table.alignment(column).css(), cell);
            }
            self.out.push_str("</tr>\n");
        }
        self.out.push_str("</tbody></table></div>\n");
    }

    fn cell(&mut self, tag: &str, align: Option<&str>, content: &[Inline]) {
        match align {
            Some(align) => {
                let _ = write!(self.out, "<{tag} style=\"text-align: {align}\">");
            }
            None => {
                let _ = write!(self.out, "<{tag}>");
            }
        }
        self.inlines(content);
        let _ = write!(self.out, "</{tag}>");
    }

    fn image_card(&mut self, image: &ImageCard) {
        let _ = write!(
            self.out,
            "<figure class=\"doc-image-card\"><img src=\"{}\" alt=\"{}\"",
            escape_href(&image.src),
            escape_html(&image.alt)
        );
        if let Some(title) = &image.title {
            let _ = write!(self.out, " title=\"{}\"", escape_html(title));
        }
        self.out.push_str(" loading=\"lazy\" />");
        if let Some(caption) = image.caption() {
            let _ = write!(self.out, "<figcaption>{}</figcaption>", escape_html(caption));
        }
        self.out.push_str("</figure>\n");
    }

    fn code_panel(&mut self, panel: &CodePanel) {
        let state = self.states.copy_state(panel.id);
        let state_attr = match state {
            CopyState::Idle => "idle",
            CopyState::Copied => "copied",
        };
        let language = panel.language.as_deref().unwrap_or("text");
        let language = escape_html(language);
        let _ = write!(
            self.out,
            "<div class=\"doc-code\" data-block=\"{id}\" data-copy-state=\"{state_attr}\">\
             <div class=\"doc-code-header\"><span class=\"doc-code-language\">{language}</span>\
             <button type=\"button\" class=\"doc-copy\" data-block=\"{id}\">{label}</button></div>\
             <pre><code class=\"language-{language}\">{code}</code></pre></div>\n",
            id = panel.id,
            label = copy_label(state),
            code = escape_html(&panel.code),
        );
    }

    fn diagram(&mut self, diagram: &DiagramBlock) {
        let id = escape_html(&diagram.id);
        match self.states.diagram(&diagram.id) {
            DiagramView::Loading => {
                let _ = writeln!(
                    self.out,
                    "<div id=\"{id}\" class=\"doc-diagram doc-diagram-loading\">\
                     <span class=\"doc-spinner\" aria-hidden=\"true\"></span>\
                     <span>Rendering diagram...</span></div>"
                );
            }
            DiagramView::Graphic(markup) => {
                let _ = writeln!(
                    self.out,
                    "<div id=\"{id}\" class=\"doc-diagram\"><div class=\"doc-diagram-scroll\">\
                     <div class=\"doc-diagram-graphic\">{markup}</div></div></div>"
                );
            }
            DiagramView::Failed { message, source } => {
                let _ = writeln!(
                    self.out,
                    "<div id=\"{id}\" class=\"doc-diagram doc-diagram-error\" role=\"alert\">\
                     <p class=\"doc-diagram-error-title\">Diagram render failed</p>\
                     <pre class=\"doc-diagram-error-message\">{}</pre>\
                     <pre class=\"doc-diagram-source\"><code>{}</code></pre></div>",
                    escape_html(message),
                    escape_html(source)
                );
            }
        }
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text { text } => self.out.push_str(&escape_html(text)),
            Inline::Strong { children } => self.wrap("strong", children),
            Inline::Emphasis { children } => self.wrap("em", children),
            Inline::Strikethrough { children } => self.wrap("del", children),
            Inline::Code { code } => {
                let _ = write!(
                    self.out,
                    "<code class=\"doc-inline-code\">{}</code>",
                    escape_html(code)
                );
            }
            Inline::Link(link) => {
                let _ = write!(self.out, "<a href=\"{}\"", escape_href(&link.href));
                if let Some(title) = &link.title {
                    let _ = write!(self.out, " title=\"{}\"", escape_html(title));
                }
                if link.href.starts_with("http://") || link.href.starts_with("https://") {
                    self.out
                        .push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
                }
                self.out.push('>');
                self.inlines(&link.children);
                self.out.push_str("</a>");
            }
            Inline::Image(image) => {
                let _ = write!(
                    self.out,
                    "<img class=\"doc-inline-image\" src=\"{}\" alt=\"{}\" />",
                    escape_href(&image.src),
                    escape_html(&image.alt)
                );
            }
            Inline::SoftBreak => self.out.push('\n'),
            Inline::HardBreak => self.out.push_str("<br />\n"),
            Inline::Html { markup } => self.out.push_str(markup),
        }
    }

    fn wrap(&mut self, tag: &str, children: &[Inline]) {
        let _ = write!(self.out, "<{tag}>");
        self.inlines(children);
        let _ = write!(self.out, "</{tag}>");
    }
}

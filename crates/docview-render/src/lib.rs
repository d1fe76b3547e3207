//! # docview-render - Content Transformation and Presentation
//!
//! Turns markdown documents into an enriched visual tree and emits it as HTML.
//!
//! ## Public API
//!
//! - [`ContentTransformer`]: markdown to [`RenderedDocument`] (blocks, outline,
//!   diagram and code panel inventory)
//! - [`CodeBlockPresenter`]: routes fenced code to a panel or a diagram
//! - [`DiagramRenderer`]: per-diagram render lifecycle with stale-result guard
//! - [`CopyFeedback`]: copy-confirmation state of a code panel
//! - [`html`]: HTML emission against live [`BlockStates`]

pub mod code_block;
pub mod diagram;
pub mod html;
pub mod markdown;
pub mod toc;
pub mod view;

pub use code_block::{
    classify, BlockIds, CodeBlockId, CodeBlockPresenter, CodeKind, CodePanel, CodePresentation,
    CopyFeedback, CopyState, DiagramBlock, DEFAULT_DIAGRAM_LANGUAGE,
};
pub use diagram::{
    decode_entities, DiagramError, DiagramRenderer, DiagramView, Graphic, RenderRequest,
    RenderState,
};
pub use html::{escape_href, escape_html, render_blocks, render_outline, BlockStates, Detached};
pub use markdown::{ContentTransformer, RenderedDocument, TransformOptions};
pub use toc::{slugify, AnchorSet, OutlineEntry};
pub use view::{plain_text, Alignment, Block, Heading, ImageCard, Inline, Link, List, ListItem, Table};

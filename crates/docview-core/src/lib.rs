//! # docview-core - Core Domain Types
//!
//! Foundation crate for docview. Provides the documentation catalog types,
//! error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Catalog (`catalog`)
//! - [`Document`] - A renderable document (id, title, raw markdown body)
//! - [`Menu`], [`MenuGroup`], [`MenuEntry`] - Static navigation tree
//! - [`FlattenedMenu`], [`Adjacent`] - Linear menu order for previous/next lookup
//! - [`ContentTable`] - Read-only id -> document mapping
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use docview_core::prelude::*;
//! ```

pub mod catalog;
pub mod error;
pub mod logging;
pub mod prelude;

pub use catalog::{
    Adjacent, ContentTable, Document, FlattenedMenu, IconRef, Menu, MenuEntry, MenuGroup,
    Placeholder, PLACEHOLDER_BODY, PLACEHOLDER_TITLE,
};
pub use error::{Error, Result, ResultExt};

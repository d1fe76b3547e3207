//! Configuration and catalog loading for docview
//!
//! Supports:
//! - `.docview/config.toml` - Global settings
//! - `menu.toml` + `docs/*.md` - The documentation catalog

pub mod catalog;
pub mod settings;
pub mod types;

pub use catalog::{load_catalog, parse_menu, Catalog};
pub use settings::{init_config_dir, load_settings};
pub use types::*;

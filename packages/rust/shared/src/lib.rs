//! Shared types, error model, and configuration for termdoc.
//!
//! This crate is the foundation depended on by all other termdoc crates.
//! It provides:
//! - [`TermdocError`]: the unified error type
//! - Domain types ([`Term`], [`Issue`], [`NavigationNode`], [`FileError`])
//! - Configuration ([`AppConfig`], config loading)
//! - [`escape_html`] for the HTML renderers

pub mod config;
pub mod error;
pub mod html;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, NavigationConfig, PathsConfig, ScanConfig, config_dir,
    find_config_file, init_config, load_config, load_config_from,
};
pub use error::{Result, TermdocError};
pub use html::escape_html;
pub use types::{
    FileError, Issue, IssueKind, NavigationNode, NavigationTree, Term, TermPatch, Usage,
};

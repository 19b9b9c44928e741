//! Navigation tree builder.
//!
//! Turns a flat set of relative Markdown paths into an ordered hierarchy:
//!
//! 1. [`NavigationBuilder`] materializes directories and file leaves into a
//!    [`NavigationArena`] (README/index documents only retitle their directory)
//! 2. [`NavigationArena::to_tree`] produces the serializable [`NavigationTree`]
//! 3. [`render`] turns the tree into JSON, an HTML fragment and a breadcrumb map
//!
//! [`NavigationTree`]: termdoc_shared::NavigationTree

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

pub mod arena;
pub mod render;
pub mod title;

pub use arena::{NavigationArena, NavigationBuilder, NodeId};
pub use render::{NavigationArtifacts, breadcrumbs, to_html, to_json};
pub use title::{DEFAULT_ORDER, TitleRules, capitalize_words};

static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)\s*$").expect("valid regex"));

/// Where document titles come from.
///
/// `path` is the `/`-separated path relative to the docs root, exactly as
/// passed to [`NavigationBuilder::build`].
pub trait HeadingSource {
    /// First level-1 heading of the document, if any.
    fn heading(&self, path: &str) -> Option<String>;
}

/// Titles always fall back to the formatted file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeadings;

impl HeadingSource for NoHeadings {
    fn heading(&self, _path: &str) -> Option<String> {
        None
    }
}

/// Pre-extracted headings keyed by relative path.
impl HeadingSource for HashMap<String, String> {
    fn heading(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

/// Text of the first `# ` heading in a Markdown document.
pub fn extract_h1(markdown: &str) -> Option<String> {
    H1_RE
        .captures(markdown)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Whether a file name is a directory index (`README.md`, `index.md`).
pub fn is_index_document(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower == "readme.md" || lower == "index.md"
}

//! Renderers for `navigation.json`, `navigation.html` and `breadcrumbs.json`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use termdoc_shared::{NavigationNode, NavigationTree, Result, TermdocError, escape_html};

/// The three navigation outputs derived from one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationArtifacts {
    pub json: String,
    pub html: String,
    pub breadcrumbs: BTreeMap<String, Vec<String>>,
}

impl NavigationArtifacts {
    pub fn from_tree(tree: &NavigationTree) -> Result<Self> {
        Ok(Self {
            json: to_json(tree)?,
            html: to_html(tree),
            breadcrumbs: breadcrumbs(tree),
        })
    }

    /// Pretty JSON of the breadcrumb map.
    pub fn breadcrumbs_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.breadcrumbs)
            .map_err(|e| TermdocError::Serialization(e.to_string()))
    }
}

/// Pretty-printed JSON of the whole tree. Deterministic for a given tree.
pub fn to_json(tree: &NavigationTree) -> Result<String> {
    serde_json::to_string_pretty(tree).map_err(|e| TermdocError::Serialization(e.to_string()))
}

/// Nested-list HTML fragment. Empty when the tree has no children.
pub fn to_html(tree: &NavigationTree) -> String {
    let mut html = String::new();
    render_list(&tree.children, 0, &mut html);
    html
}

fn render_list(items: &[NavigationNode], level: usize, html: &mut String) {
    if items.is_empty() {
        return;
    }

    let class = if level == 0 { "nav-main" } else { "nav-sub" };
    let _ = write!(html, "<ul class=\"{class}\">");

    for item in items {
        html.push_str("<li>");
        match item {
            NavigationNode::Directory { title, children, .. } => {
                let _ = write!(html, "<span class=\"nav-directory\">{}</span>", escape_html(title));
                render_list(children, level + 1, html);
            }
            NavigationNode::File { title, path, .. } => {
                let _ = write!(
                    html,
                    "<a href=\"{}\" class=\"nav-link\">{}</a>",
                    escape_html(path),
                    escape_html(title)
                );
            }
        }
        html.push_str("</li>");
    }

    html.push_str("</ul>");
}

/// Map of file site path to the titles leading to it, own title last.
/// The site title is not included.
pub fn breadcrumbs(tree: &NavigationTree) -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    let mut trail = Vec::new();
    collect_breadcrumbs(&tree.children, &mut trail, &mut map);
    map
}

fn collect_breadcrumbs(
    items: &[NavigationNode],
    trail: &mut Vec<String>,
    map: &mut BTreeMap<String, Vec<String>>,
) {
    for item in items {
        trail.push(item.title().to_string());
        match item {
            NavigationNode::Directory { children, .. } => collect_breadcrumbs(children, trail, map),
            NavigationNode::File { path, .. } => {
                map.insert(path.clone(), trail.clone());
            }
        }
        trail.pop();
    }
}

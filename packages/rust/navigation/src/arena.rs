//! Arena-backed navigation tree.
//!
//! Nodes live in a flat `Vec` and reference each other by [`NodeId`]; the
//! builder finds existing directories and files through path-keyed maps so
//! each prefix is materialized exactly once.

use std::collections::HashMap;

use tracing::{debug, instrument};

use termdoc_shared::{NavigationConfig, NavigationNode, NavigationTree};

use crate::title::TitleRules;
use crate::{HeadingSource, is_index_document};

/// Index of a node inside a [`NavigationArena`].
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Directory,
    File { order: u32 },
}

#[derive(Debug, Clone)]
struct ArenaNode {
    /// Directory segment or file stem; the per-level sort key.
    key: String,
    title: String,
    /// Site path (`/factors/`, `/factors/factor-01.html`).
    site_path: String,
    kind: NodeKind,
    children: Vec<NodeId>,
}

/// Ordered navigation hierarchy. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct NavigationArena {
    nodes: Vec<ArenaNode>,
}

impl NavigationArena {
    fn with_root(title: &str) -> Self {
        Self {
            nodes: vec![ArenaNode {
                key: String::new(),
                title: title.to_string(),
                site_path: "/".into(),
                kind: NodeKind::Directory,
                children: Vec::new(),
            }],
        }
    }

    fn push(&mut self, parent: NodeId, node: ArenaNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Site title carried by the root.
    pub fn title(&self) -> &str {
        &self.nodes[ROOT].title
    }

    /// Number of nodes, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_title(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.title.as_str())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Convert into the serializable tree.
    pub fn to_tree(&self) -> NavigationTree {
        NavigationTree {
            title: self.title().to_string(),
            children: self.convert_children(ROOT),
        }
    }

    fn convert_children(&self, id: NodeId) -> Vec<NavigationNode> {
        self.nodes[id]
            .children
            .iter()
            .map(|&child| {
                let node = &self.nodes[child];
                match node.kind {
                    NodeKind::Directory => NavigationNode::Directory {
                        title: node.title.clone(),
                        path: node.site_path.clone(),
                        children: self.convert_children(child),
                    },
                    NodeKind::File { order } => NavigationNode::File {
                        title: node.title.clone(),
                        path: node.site_path.clone(),
                        order,
                    },
                }
            })
            .collect()
    }

    /// Reorder every level: canonical section keys first, other keys
    /// alphabetically, then directories before files with files by order.
    fn sort_levels(&mut self, rules: &TitleRules<'_>) {
        for id in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[id].children);

            children.sort_by(|&a, &b| {
                let (ka, kb) = (&self.nodes[a].key, &self.nodes[b].key);
                match (rules.section_rank(ka), rules.section_rank(kb)) {
                    (Some(ra), Some(rb)) => ra.cmp(&rb),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => ka.cmp(kb),
                }
            });

            // Stable: ties keep the key order established above.
            children.sort_by_key(|&c| match self.nodes[c].kind {
                NodeKind::Directory => (0, 0),
                NodeKind::File { order } => (1, order),
            });

            self.nodes[id].children = children;
        }
    }
}

/// Builds a [`NavigationArena`] from relative document paths.
#[derive(Debug, Clone)]
pub struct NavigationBuilder<'a> {
    config: &'a NavigationConfig,
    rules: TitleRules<'a>,
}

impl<'a> NavigationBuilder<'a> {
    pub fn new(config: &'a NavigationConfig) -> Self {
        Self {
            config,
            rules: TitleRules::new(config),
        }
    }

    /// Build the ordered tree. Input order does not affect the result.
    #[instrument(skip_all, fields(paths = paths.len()))]
    pub fn build<S: AsRef<str>>(&self, paths: &[S], headings: &dyn HeadingSource) -> NavigationArena {
        let mut normalized: Vec<String> = paths
            .iter()
            .map(|p| normalize(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();

        let mut arena = NavigationArena::with_root(&self.config.site_title);
        let mut dirs: HashMap<String, NodeId> = HashMap::new();
        let mut files: HashMap<String, NodeId> = HashMap::new();

        for path in &normalized {
            let segments: Vec<&str> = path.split('/').collect();
            let Some((&leaf, parents)) = segments.split_last() else {
                continue;
            };

            let mut parent = ROOT;
            for depth in 0..parents.len() {
                let dir_path = parents[..=depth].join("/");
                parent = match dirs.get(&dir_path) {
                    Some(&id) => id,
                    None => {
                        let segment = parents[depth];
                        let id = arena.push(
                            parent,
                            ArenaNode {
                                key: segment.to_string(),
                                title: self.rules.format_title(segment),
                                site_path: format!("/{dir_path}/"),
                                kind: NodeKind::Directory,
                                children: Vec::new(),
                            },
                        );
                        dirs.insert(dir_path, id);
                        id
                    }
                };
            }

            if is_index_document(leaf) {
                if parent != ROOT {
                    if let Some(title) = headings.heading(path) {
                        debug!(path = %path, title = %title, "directory title from index document");
                        arena.nodes[parent].title = title;
                    }
                }
                continue;
            }

            let stem = strip_markdown_ext(leaf).unwrap_or(leaf);
            let site_path = match strip_markdown_ext(path) {
                Some(base) => format!("/{base}.html"),
                None => format!("/{path}"),
            };
            let node = ArenaNode {
                key: stem.to_string(),
                title: headings
                    .heading(path)
                    .unwrap_or_else(|| self.rules.format_title(stem)),
                site_path,
                kind: NodeKind::File {
                    order: self.rules.file_order(stem),
                },
                children: Vec::new(),
            };

            let file_key = format!("{}/{stem}", parents.join("/"));
            match files.get(&file_key) {
                // `a.md` and `a.MD` share a key; the later path wins.
                Some(&existing) => arena.nodes[existing] = node,
                None => {
                    let id = arena.push(parent, node);
                    files.insert(file_key, id);
                }
            }
        }

        arena.sort_levels(&self.rules);
        debug!(nodes = arena.len(), "navigation tree built");
        arena
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn strip_markdown_ext(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(3)?;
    let (base, ext) = (name.get(..split)?, name.get(split..)?);
    ext.eq_ignore_ascii_case(".md").then_some(base)
}

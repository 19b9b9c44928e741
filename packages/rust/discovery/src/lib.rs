//! Markdown corpus discovery.
//!
//! Every termdoc pass (terminology scan, quality checks, navigation) starts
//! from the same question: which Markdown documents live under the docs root?
//! [`CorpusScanner`] answers it with a `walkdir` traversal filtered by
//! `globset` exclude patterns (build output, tooling internals). Hidden
//! entries (`.git`, `.cache`, dotfiles) are never part of the corpus.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use termdoc_shared::{Result, TermdocError};

/// Extension of corpus documents.
const MARKDOWN_EXTENSION: &str = "md";

/// Discovers Markdown documents under a root, honouring exclude globs.
#[derive(Debug, Clone)]
pub struct CorpusScanner {
    root: PathBuf,
    exclude: GlobSet,
}

impl CorpusScanner {
    /// Create a scanner for `root`. Globs are matched against `/`-separated
    /// paths relative to the root (e.g. `node_modules/**`).
    pub fn new(root: impl Into<PathBuf>, exclude: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in exclude {
            let glob = Glob::new(pattern).map_err(|e| {
                TermdocError::config(format!("invalid exclude pattern '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }
        let exclude = builder
            .build()
            .map_err(|e| TermdocError::config(format!("failed to build exclude set: {e}")))?;

        Ok(Self {
            root: root.into(),
            exclude,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True when `rel_path` (relative, `/`-separated) is excluded.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude.is_match(rel_path)
    }

    /// List all Markdown files as sorted, `/`-separated paths relative to the root.
    ///
    /// Fails only when the root itself cannot be read; unreadable entries
    /// below it are logged and skipped.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn markdown_files(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(TermdocError::io(
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "docs root is not a directory"),
            ));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.depth() == 0 {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walk failed"));
                        return Err(TermdocError::io(&self.root, source));
                    }
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }

            let Some(rel) = relative_path(&self.root, entry.path()) else {
                continue;
            };
            if self.is_excluded(&rel) {
                debug!(path = %rel, "excluded");
                continue;
            }
            files.push(rel);
        }

        files.sort();
        debug!(count = files.len(), "markdown files discovered");
        Ok(files)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

/// `/`-separated path of `path` relative to `root`.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("termdoc-discovery-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, "# Title\n").expect("write");
    }

    fn default_excludes() -> Vec<String> {
        vec!["node_modules/**".into(), "dist/**".into()]
    }

    #[test]
    fn discovers_sorted_markdown_files() {
        let root = temp_dir();
        touch(&root, "README.md");
        touch(&root, "factors/factor-03-own-context.md");
        touch(&root, "factors/factor-01-natural-language.md");
        touch(&root, "assets/logo.png");

        let scanner = CorpusScanner::new(&root, &default_excludes()).expect("scanner");
        let files = scanner.markdown_files().expect("scan");
        assert_eq!(
            files,
            vec![
                "README.md",
                "factors/factor-01-natural-language.md",
                "factors/factor-03-own-context.md",
            ]
        );
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn honours_excludes_and_hidden_dirs() {
        let root = temp_dir();
        touch(&root, "guide.md");
        touch(&root, "dist/guide.md");
        touch(&root, "node_modules/pkg/README.md");
        touch(&root, ".git/notes.md");

        let scanner = CorpusScanner::new(&root, &default_excludes()).expect("scanner");
        let files = scanner.markdown_files().expect("scan");
        assert_eq!(files, vec!["guide.md"]);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = std::env::temp_dir().join(format!("termdoc-missing-{}", uuid::Uuid::now_v7()));
        let scanner = CorpusScanner::new(&root, &[]).expect("scanner");
        assert!(scanner.markdown_files().is_err());
    }

    #[test]
    fn invalid_glob_is_a_config_error() {
        let err = CorpusScanner::new(".", &["[".to_string()]).unwrap_err();
        assert!(err.to_string().contains("invalid exclude pattern"));
    }

    #[test]
    fn relative_path_uses_forward_slashes() {
        let root = Path::new("/docs");
        let path = Path::new("/docs/factors/factor-01.md");
        assert_eq!(relative_path(root, path).as_deref(), Some("factors/factor-01.md"));
        assert_eq!(relative_path(root, root), None);
    }
}

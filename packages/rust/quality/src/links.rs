//! Markdown link existence checks.
//!
//! Every `[text](target)` counts toward the total (images included). Only
//! relative targets are verified: the fragment and any title are dropped and
//! the rest is resolved against the linking file's directory, or against the
//! docs root when it starts with `/`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use termdoc_shared::FileError;

use crate::scorer::LinkTally;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("valid regex"));

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("valid regex"));

/// A relative link whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub total_links: usize,
    pub broken_links: usize,
    /// Relative path → broken links, only for files with at least one.
    pub details: BTreeMap<String, Vec<BrokenLink>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
}

impl LinkReport {
    pub fn tally(&self) -> LinkTally {
        LinkTally {
            total: self.total_links,
            broken: self.broken_links,
        }
    }

    pub fn passed(&self) -> bool {
        self.broken_links == 0
    }
}

/// Check the links of every file in `files` (paths relative to `root`).
#[instrument(skip_all, fields(root = %root.display(), files = files.len()))]
pub fn check_links(root: &Path, files: &[String]) -> LinkReport {
    let mut report = LinkReport::default();

    for rel in files {
        let path = root.join(rel);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %rel, error = %e, "skipping unreadable file");
                report.errors.push(FileError {
                    path: rel.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let base = path.parent().unwrap_or(root);
        let (total, broken) = scan_links(&text, root, base);
        report.total_links += total;
        report.broken_links += broken.len();
        if !broken.is_empty() {
            report.details.insert(rel.clone(), broken);
        }
    }

    debug!(
        total = report.total_links,
        broken = report.broken_links,
        "link check complete"
    );
    report
}

/// Count the links in `text` and return those whose targets are missing.
pub fn scan_links(text: &str, root: &Path, base: &Path) -> (usize, Vec<BrokenLink>) {
    let mut total = 0;
    let mut broken = Vec::new();

    for caps in LINK_RE.captures_iter(text) {
        total += 1;
        let url = &caps[2];
        let Some(target) = local_target(url) else {
            continue;
        };

        let resolved = match target.strip_prefix('/') {
            Some(from_root) => root.join(from_root),
            None => base.join(target),
        };
        if !resolved.exists() {
            broken.push(BrokenLink {
                text: caps[1].to_string(),
                url: url.to_string(),
            });
        }
    }

    (total, broken)
}

/// Filesystem part of a link target, or `None` when it is not verifiable
/// (external, protocol-relative, pure anchor, or empty).
fn local_target(url: &str) -> Option<&str> {
    let url = url.split_whitespace().next()?;
    let url = url.trim_start_matches('<').trim_end_matches('>');
    if url.starts_with('#') || url.starts_with("//") || SCHEME_RE.is_match(url) {
        return None;
    }
    let path = url.split(['#', '?']).next().unwrap_or_default();
    (!path.is_empty()).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_docs() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("termdoc-links-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(dir.join("guide")).expect("mkdir");
        std::fs::write(dir.join("intro.md"), "# Intro").expect("write");
        std::fs::write(dir.join("guide/setup.md"), "# Setup").expect("write");
        dir
    }

    #[test]
    fn classifies_targets() {
        assert_eq!(local_target("https://example.com"), None);
        assert_eq!(local_target("mailto:a@b.c"), None);
        assert_eq!(local_target("//cdn.example.com/x.js"), None);
        assert_eq!(local_target("#section"), None);
        assert_eq!(local_target("setup.md#install"), Some("setup.md"));
        assert_eq!(local_target("../intro.md \"Intro\""), Some("../intro.md"));
        assert_eq!(local_target("<a.md>"), Some("a.md"));
    }

    #[test]
    fn counts_all_links_but_verifies_relative_ones() {
        let root = temp_docs();
        let text = "[ok](setup.md) [up](../intro.md#top) [abs](/intro.md) \
                    [web](https://example.com) [anchor](#x) [gone](missing.md) ![img](pic.png)";
        let (total, broken) = scan_links(text, &root, &root.join("guide"));
        assert_eq!(total, 7);
        let urls: Vec<&str> = broken.iter().map(|b| b.url.as_str()).collect();
        assert_eq!(urls, vec!["missing.md", "pic.png"]);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn report_groups_by_file_and_records_errors() {
        let root = temp_docs();
        std::fs::write(root.join("guide/setup.md"), "[back](../intro.md) [bad](nope.md)")
            .expect("write");
        let files = vec![
            "intro.md".to_string(),
            "guide/setup.md".to_string(),
            "absent.md".to_string(),
        ];

        let report = check_links(&root, &files);
        assert_eq!(report.total_links, 2);
        assert_eq!(report.broken_links, 1);
        assert_eq!(report.details["guide/setup.md"][0].text, "bad");
        assert_eq!(report.errors.len(), 1);
        assert!(!report.passed());
        assert_eq!(report.tally(), LinkTally { total: 2, broken: 1 });
        let _ = std::fs::remove_dir_all(&root);
    }
}

//! Navigation artifact generation (`termdoc nav`).

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use termdoc_discovery::CorpusScanner;
use termdoc_navigation::{HeadingSource, NavigationArtifacts, NavigationBuilder, extract_h1};
use termdoc_shared::{AppConfig, NavigationTree, Result};

use crate::output::write_atomic;
use crate::progress::ProgressReporter;

pub const NAVIGATION_JSON: &str = "navigation.json";
pub const NAVIGATION_HTML: &str = "navigation.html";
pub const BREADCRUMBS_JSON: &str = "breadcrumbs.json";

/// Reads H1 titles from documents under a root directory.
#[derive(Debug, Clone)]
pub struct FsHeadings {
    root: PathBuf,
}

impl FsHeadings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl HeadingSource for FsHeadings {
    fn heading(&self, path: &str) -> Option<String> {
        match std::fs::read_to_string(self.root.join(path)) {
            Ok(text) => extract_h1(&text),
            Err(e) => {
                debug!(path, error = %e, "no heading, falling back to file name");
                None
            }
        }
    }
}

/// Discover documents (navigation excludes applied) and build the tree.
pub fn build_tree(config: &AppConfig) -> Result<NavigationTree> {
    let root = &config.paths.docs_root;
    let files = CorpusScanner::new(root, &config.scan.navigation_globs())?.markdown_files()?;
    let arena = NavigationBuilder::new(&config.navigation).build(&files, &FsHeadings::new(root));
    Ok(arena.to_tree())
}

/// Build the tree and write `navigation.json`, `navigation.html` and
/// `breadcrumbs.json` into `config.paths.output_path()`.
#[instrument(skip_all, fields(root = %config.paths.docs_root.display()))]
pub fn generate(config: &AppConfig, progress: &dyn ProgressReporter) -> Result<NavigationArtifacts> {
    progress.phase("Building navigation");
    let tree = build_tree(config)?;
    let artifacts = NavigationArtifacts::from_tree(&tree)?;

    progress.phase("Writing navigation artifacts");
    let out = config.paths.output_path();
    write_artifacts(&out, &artifacts)?;

    info!(
        out = %out.display(),
        sections = tree.children.len(),
        pages = artifacts.breadcrumbs.len(),
        "navigation generated"
    );
    progress.done(&format!(
        "{} page(s) written to {}",
        artifacts.breadcrumbs.len(),
        out.display()
    ));
    Ok(artifacts)
}

fn write_artifacts(out: &Path, artifacts: &NavigationArtifacts) -> Result<()> {
    write_atomic(&out.join(NAVIGATION_JSON), &artifacts.json)?;
    write_atomic(&out.join(NAVIGATION_HTML), &artifacts.html)?;
    write_atomic(&out.join(BREADCRUMBS_JSON), &artifacts.breadcrumbs_json()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;

    fn docs() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("termdoc-nav-{}", uuid::Uuid::now_v7()));
        for sub in ["factors", "scripts", "dist"] {
            std::fs::create_dir_all(dir.join(sub)).expect("mkdir");
        }
        std::fs::write(dir.join("README.md"), "# Home\n").expect("write");
        std::fs::write(dir.join("factors/README.md"), "# The Factors\n").expect("write");
        std::fs::write(dir.join("factors/factor-02-tools.md"), "# Tools Are Outputs\n").expect("write");
        std::fs::write(dir.join("factors/factor-01-natural-language.md"), "no heading\n").expect("write");
        std::fs::write(dir.join("scripts/notes.md"), "# internal\n").expect("write");
        std::fs::write(dir.join("dist/old.md"), "# stale\n").expect("write");
        dir
    }

    #[test]
    fn tree_uses_headings_and_excludes() {
        let root = docs();
        let mut config = AppConfig::default();
        config.paths.docs_root = root.clone();

        let tree = build_tree(&config).expect("tree");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].title(), "The Factors");

        let crumbs = termdoc_navigation::breadcrumbs(&tree);
        assert_eq!(
            crumbs["/factors/factor-01-natural-language.html"],
            vec!["The Factors".to_string(), "Factor 01: Natural Language".to_string()]
        );
        assert_eq!(
            crumbs["/factors/factor-02-tools.html"],
            vec!["The Factors".to_string(), "Tools Are Outputs".to_string()]
        );
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn generate_writes_three_artifacts() {
        let root = docs();
        let mut config = AppConfig::default();
        config.paths.docs_root = root.clone();

        let artifacts = generate(&config, &NoopProgress).expect("generate");
        let out = root.join("dist");
        let json = std::fs::read_to_string(out.join(NAVIGATION_JSON)).expect("json");
        assert_eq!(json, artifacts.json);
        assert!(std::fs::read_to_string(out.join(NAVIGATION_HTML)).expect("html").contains("nav-main"));
        assert!(out.join(BREADCRUMBS_JSON).is_file());

        // Regenerating is byte-identical.
        let again = generate(&config, &NoopProgress).expect("generate again");
        assert_eq!(again.json, artifacts.json);
        let _ = std::fs::remove_dir_all(&root);
    }
}

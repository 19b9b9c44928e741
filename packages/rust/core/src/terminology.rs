//! Corpus-wide terminology scan (`termdoc check`).

use tracing::{info, instrument};

use termdoc_discovery::CorpusScanner;
use termdoc_shared::{AppConfig, Result};
use termdoc_terminology::{ConsistencyChecker, TerminologyDictionary, TerminologyReport};

use crate::progress::ProgressReporter;

/// Check every Markdown file under `config.paths.docs_root`.
///
/// Unreadable files end up in [`TerminologyReport::errors`]; only a failure
/// to walk the root is an error.
#[instrument(skip_all, fields(root = %config.paths.docs_root.display(), terms = dictionary.len()))]
pub fn scan(
    config: &AppConfig,
    dictionary: &TerminologyDictionary,
    progress: &dyn ProgressReporter,
) -> Result<TerminologyReport> {
    let root = &config.paths.docs_root;

    progress.phase("Discovering documents");
    let files = CorpusScanner::new(root, &config.scan.exclude)?.markdown_files()?;

    progress.phase("Checking terminology");
    let total = files.len();
    let checker = ConsistencyChecker::new(dictionary);
    let report = checker.check_files(root, &files, |path, current| {
        progress.file_checked(path, current, total);
    });

    info!(
        files = total,
        issues = report.total,
        unreadable = report.errors.len(),
        "terminology scan complete"
    );
    progress.done(&format!("{} issue(s) in {total} file(s)", report.total));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;
    use std::sync::Mutex;
    use termdoc_shared::{IssueKind, Term};

    #[derive(Default)]
    struct Recorder {
        files: Mutex<Vec<(String, usize, usize)>>,
    }

    impl ProgressReporter for Recorder {
        fn phase(&self, _name: &str) {}
        fn file_checked(&self, path: &str, current: usize, total: usize) {
            if let Ok(mut files) = self.files.lock() {
                files.push((path.to_string(), current, total));
            }
        }
        fn done(&self, _summary: &str) {}
    }

    fn docs() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("termdoc-scan-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(dir.join("dist")).expect("mkdir");
        std::fs::write(dir.join("a.md"), "The agent runs.").expect("write");
        std::fs::write(dir.join("b.md"), "智能体 is fine").expect("write");
        std::fs::write(dir.join("dist/c.md"), "agent agent").expect("write");
        dir
    }

    #[test]
    fn scans_corpus_with_excludes() {
        let root = docs();
        let mut config = AppConfig::default();
        config.paths.docs_root = root.clone();
        let dict = TerminologyDictionary::from_terms("unused.json", vec![Term::new("agent", "智能体", "concept")]);

        let report = scan(&config, &dict, &NoopProgress).expect("scan");
        assert_eq!(report.total, 1);
        assert_eq!(report.files["a.md"][0].kind, IssueKind::ShouldTranslate);
        assert!(!report.files.contains_key("dist/c.md"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn reports_progress_per_file() {
        let root = docs();
        let mut config = AppConfig::default();
        config.paths.docs_root = root.clone();
        let dict = TerminologyDictionary::from_terms("unused.json", Vec::new());

        let recorder = Recorder::default();
        scan(&config, &dict, &recorder).expect("scan");
        let files = recorder.files.lock().expect("lock").clone();
        assert_eq!(
            files,
            vec![("a.md".to_string(), 1, 2), ("b.md".to_string(), 2, 2)]
        );
        let _ = std::fs::remove_dir_all(&root);
    }
}

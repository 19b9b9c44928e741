//! Full quality run (`termdoc quality`): terminology, links and code blocks,
//! scored into one [`QualityReport`].

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use termdoc_discovery::CorpusScanner;
use termdoc_quality::{Check, QualityReport, check_code_blocks, check_links};
use termdoc_shared::{AppConfig, Result};
use termdoc_terminology::{ConsistencyChecker, TerminologyDictionary};

use crate::output::write_atomic;
use crate::progress::ProgressReporter;

/// Run all checks over `config.paths.docs_root`.
///
/// A dictionary that cannot be loaded aborts the run with
/// [`TermdocError::DictionaryLoad`](termdoc_shared::TermdocError::DictionaryLoad)
/// before any document is checked.
#[instrument(skip_all, fields(root = %config.paths.docs_root.display()))]
pub fn run(config: &AppConfig, progress: &dyn ProgressReporter) -> Result<QualityReport> {
    let root = &config.paths.docs_root;
    let dictionary = TerminologyDictionary::load(config.paths.dictionary_path())?;

    progress.phase("Discovering documents");
    let files = CorpusScanner::new(root, &config.scan.exclude)?.markdown_files()?;
    let total = files.len();

    progress.phase("Checking terminology");
    let checker = ConsistencyChecker::new(&dictionary);
    let terminology = Check::Completed(checker.check_files(root, &files, |path, current| {
        progress.file_checked(path, current, total);
    }));

    progress.phase("Checking links");
    let links = Check::Completed(check_links(root, &files));

    progress.phase("Checking code blocks");
    let code = Check::Completed(check_code_blocks(root, &files));

    let report = QualityReport::new(terminology, links, code);
    info!(
        files = total,
        score = report.overall.score,
        grade = %report.overall.grade,
        "quality run complete"
    );
    progress.done(&format!(
        "score {}/100 ({})",
        report.overall.score, report.overall.grade
    ));
    Ok(report)
}

/// Paths written by [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub json: Option<PathBuf>,
}

/// Write the Markdown report to `path`, plus `<path>.json` when `json` is set.
pub fn write_report(report: &QualityReport, path: &Path, json: bool) -> Result<ReportPaths> {
    write_atomic(path, &report.to_markdown())?;

    let json_path = if json {
        let json_path = path.with_extension("json");
        write_atomic(&json_path, &report.to_json()?)?;
        Some(json_path)
    } else {
        None
    };

    info!(path = %path.display(), "quality report written");
    Ok(ReportPaths {
        markdown: path.to_path_buf(),
        json: json_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;
    use termdoc_quality::Grade;
    use termdoc_shared::TermdocError;

    fn docs() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("termdoc-quality-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(dir.join("config")).expect("mkdir");
        std::fs::write(
            dir.join("config/terminology.json"),
            r#"[{"english":"agent","chinese":"智能体","category":"concept"}]"#,
        )
        .expect("write dictionary");
        std::fs::write(dir.join("intro.md"), "# 介绍\n\n智能体 [guide](guide.md)\n").expect("write");
        std::fs::write(dir.join("guide.md"), "```json\n{\"a\": 1}\n```\n").expect("write");
        dir
    }

    #[test]
    fn clean_corpus_scores_full_marks() {
        let root = docs();
        let mut config = AppConfig::default();
        config.paths.docs_root = root.clone();

        let report = run(&config, &NoopProgress).expect("run");
        assert_eq!(report.overall.score, 100);
        assert_eq!(report.overall.grade, Grade::A);
        assert!(report.overall.passed);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_dictionary_aborts_the_run() {
        let root = docs();
        std::fs::remove_file(root.join("config/terminology.json")).expect("remove");
        let mut config = AppConfig::default();
        config.paths.docs_root = root.clone();

        let err = run(&config, &NoopProgress).unwrap_err();
        assert!(matches!(err, TermdocError::DictionaryLoad { .. }));
        assert!(!root.join("quality-report.md").exists());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn writes_markdown_and_json() {
        let root = docs();
        let mut config = AppConfig::default();
        config.paths.docs_root = root.clone();

        let report = run(&config, &NoopProgress).expect("run");
        let paths = write_report(&report, &config.paths.report_path(), true).expect("write");
        assert_eq!(paths.markdown, root.join("quality-report.md"));
        assert_eq!(paths.json.as_deref(), Some(root.join("quality-report.json").as_path()));
        let md = std::fs::read_to_string(&paths.markdown).expect("read");
        assert!(md.contains("**Overall score**: 100/100 (A)"));
        let _ = std::fs::remove_dir_all(&root);
    }
}

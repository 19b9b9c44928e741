//! Terminology consistency checks over document text.
//!
//! For every dictionary term, independently:
//! 1. count case-insensitive whole-word English occurrences;
//! 2. count literal Chinese occurrences (Chinese has no word boundaries);
//! 3. `keep_english` terms written in Chinese → `should_keep_english`;
//! 4. translatable terms present in English but never in Chinese →
//!    `should_translate` (documents mixing both forms are not flagged);
//! 5. each deprecated alternative found → `alternative_used`.

use std::collections::BTreeMap;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use termdoc_discovery::CorpusScanner;
use termdoc_shared::{FileError, Issue, IssueKind, Result, Term, TermdocError, Usage};

use crate::dictionary::TerminologyDictionary;

/// Issues found across a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TerminologyReport {
    /// Relative path → issues, only for files with at least one issue.
    pub files: BTreeMap<String, Vec<Issue>>,
    /// Total number of issues across all files.
    pub total: usize,
    /// Files that could not be read; the scan continued without them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
}

impl TerminologyReport {
    /// Record one file's issues (files without issues are not listed).
    pub fn record(&mut self, path: impl Into<String>, issues: Vec<Issue>) {
        if issues.is_empty() {
            return;
        }
        self.total += issues.len();
        self.files.insert(path.into(), issues);
    }

    /// Issue counts grouped by kind.
    pub fn type_counts(&self) -> BTreeMap<IssueKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in self.files.values().flatten() {
            *counts.entry(issue.kind).or_default() += 1;
        }
        counts
    }

    pub fn is_clean(&self) -> bool {
        self.total == 0
    }
}

/// A dictionary term with its English matcher compiled once.
#[derive(Debug)]
struct CompiledTerm<'a> {
    term: &'a Term,
    english: Option<Regex>,
}

/// Checks documents against a borrowed [`TerminologyDictionary`].
#[derive(Debug)]
pub struct ConsistencyChecker<'a> {
    terms: Vec<CompiledTerm<'a>>,
}

impl<'a> ConsistencyChecker<'a> {
    pub fn new(dictionary: &'a TerminologyDictionary) -> Self {
        let terms = dictionary
            .terms()
            .map(|term| CompiledTerm {
                term,
                english: english_matcher(&term.english, false),
            })
            .collect();
        Self { terms }
    }

    /// Check one document. Issues follow dictionary order.
    pub fn check(&self, text: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for compiled in &self.terms {
            let term = compiled.term;
            let english_count = compiled
                .english
                .as_ref()
                .map_or(0, |re| re.find_iter(text).count());
            let chinese_count = count_literal(text, &term.chinese);

            match term.usage() {
                Usage::KeepEnglish if chinese_count > 0 => issues.push(Issue {
                    kind: IssueKind::ShouldKeepEnglish,
                    term: term.english.clone(),
                    preferred: None,
                    count: chinese_count,
                    message: format!(
                        "term \"{}\" should stay in English, but \"{}\" appears {} time(s)",
                        term.english, term.chinese, chinese_count
                    ),
                }),
                Usage::Preferred if english_count > 0 && chinese_count == 0 => {
                    issues.push(Issue {
                        kind: IssueKind::ShouldTranslate,
                        term: term.english.clone(),
                        preferred: Some(term.chinese.clone()),
                        count: english_count,
                        message: format!(
                            "term \"{}\" should be translated as \"{}\", found {} untranslated occurrence(s)",
                            term.english, term.chinese, english_count
                        ),
                    });
                }
                _ => {}
            }

            for alternative in term.alternatives() {
                let count = count_literal(text, alternative);
                if count > 0 {
                    issues.push(Issue {
                        kind: IssueKind::AlternativeUsed,
                        term: alternative.clone(),
                        preferred: Some(term.chinese.clone()),
                        count,
                        message: format!(
                            "deprecated alternative \"{alternative}\" used {count} time(s), prefer \"{}\"",
                            term.chinese
                        ),
                    });
                }
            }
        }

        issues
    }

    /// Read and check a single file.
    pub fn check_file(&self, path: &Path) -> Result<Vec<Issue>> {
        let text = std::fs::read_to_string(path).map_err(|e| TermdocError::io(path, e))?;
        Ok(self.check(&text))
    }

    /// Check every Markdown file under `root`, skipping `exclude` globs.
    ///
    /// Unreadable files are recorded in [`TerminologyReport::errors`] and the
    /// scan continues; only an unreadable root fails the whole call.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn check_directory(&self, root: &Path, exclude: &[String]) -> Result<TerminologyReport> {
        let scanner = CorpusScanner::new(root, exclude)?;
        let files = scanner.markdown_files()?;
        Ok(self.check_files(root, &files, |_, _| {}))
    }

    /// Check an already-discovered file list. `on_file` is called after each
    /// file with its relative path and position (1-based).
    pub fn check_files<F>(&self, root: &Path, files: &[String], mut on_file: F) -> TerminologyReport
    where
        F: FnMut(&str, usize),
    {
        let mut report = TerminologyReport::default();

        for (i, rel) in files.iter().enumerate() {
            match self.check_file(&root.join(rel)) {
                Ok(issues) => {
                    debug!(path = %rel, issues = issues.len(), "file checked");
                    report.record(rel.clone(), issues);
                }
                Err(e) => {
                    warn!(path = %rel, error = %e, "skipping unreadable file");
                    report.errors.push(FileError {
                        path: rel.clone(),
                        message: e.to_string(),
                    });
                }
            }
            on_file(rel, i + 1);
        }

        debug!(
            files = files.len(),
            with_issues = report.files.len(),
            total = report.total,
            "directory check complete"
        );
        report
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whole-word matcher for an English label. Metacharacters are escaped and
/// `\b` is Unicode-aware. `None` for an empty label.
pub(crate) fn english_matcher(english: &str, case_sensitive: bool) -> Option<Regex> {
    if english.is_empty() {
        return None;
    }
    let pattern = format!(r"\b{}\b", regex::escape(english));
    match RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(term = english, error = %e, "could not compile term matcher");
            None
        }
    }
}

/// Non-overlapping literal occurrences of `needle`; zero for an empty needle.
pub(crate) fn count_literal(text: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    text.matches(needle).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dictionary(terms: Vec<Term>) -> TerminologyDictionary {
        TerminologyDictionary::from_terms("unused.json", terms)
    }

    fn agent() -> Term {
        Term::new("agent", "智能体", "concept")
    }

    #[test]
    fn untranslated_term_is_flagged() {
        let dict = dictionary(vec![agent()]);
        let issues = ConsistencyChecker::new(&dict).check("The agent runs.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::ShouldTranslate);
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].preferred.as_deref(), Some("智能体"));
    }

    #[test]
    fn english_match_is_case_insensitive_and_whole_word() {
        let dict = dictionary(vec![agent()]);
        let issues = ConsistencyChecker::new(&dict).check("Agent, AGENT and agents and reagent.");
        assert_eq!(issues[0].count, 2);
    }

    #[test]
    fn mixed_presence_is_not_flagged() {
        let dict = dictionary(vec![agent()]);
        let checker = ConsistencyChecker::new(&dict);
        assert!(checker.check("智能体 (agent) 是核心概念").is_empty());
        assert!(checker.check("没有相关术语").is_empty());
    }

    #[test]
    fn keep_english_counts_every_chinese_occurrence() {
        let dict = dictionary(vec![
            Term::new("LLM", "大语言模型", "technical").with_usage(Usage::KeepEnglish),
        ]);
        let issues = ConsistencyChecker::new(&dict).check("大语言模型很强大。大语言模型需要提示。LLM");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::ShouldKeepEnglish);
        assert_eq!(issues[0].count, 2);
    }

    #[test]
    fn keep_english_never_asks_for_translation() {
        let dict = dictionary(vec![
            Term::new("LLM", "大语言模型", "technical").with_usage(Usage::KeepEnglish),
        ]);
        assert!(ConsistencyChecker::new(&dict).check("Use an LLM.").is_empty());
    }

    #[test]
    fn alternatives_produce_one_issue_each() {
        let dict = dictionary(vec![
            Term::new("prompt", "提示词", "concept").with_alternatives(["提示语", "指令"]),
        ]);
        let issues = ConsistencyChecker::new(&dict).check("提示词与提示语，提示语和指令");
        let found: Vec<(IssueKind, &str, usize)> = issues
            .iter()
            .map(|i| (i.kind, i.term.as_str(), i.count))
            .collect();
        assert_eq!(
            found,
            vec![
                (IssueKind::AlternativeUsed, "提示语", 2),
                (IssueKind::AlternativeUsed, "指令", 1),
            ]
        );
    }

    #[test]
    fn regex_metacharacters_are_escaped() {
        let dict = dictionary(vec![Term::new("C.I", "持续集成", "technical")]);
        let checker = ConsistencyChecker::new(&dict);
        assert!(checker.check("CXI pipeline").is_empty());
        assert_eq!(checker.check("the C.I pipeline")[0].count, 1);
    }

    #[test]
    fn issues_follow_dictionary_order_and_are_idempotent() {
        let dict = dictionary(vec![agent(), Term::new("tool", "工具", "tool")]);
        let checker = ConsistencyChecker::new(&dict);
        let text = "A tool for the agent.";
        let first = checker.check(text);
        assert_eq!(first[0].term, "agent");
        assert_eq!(first[1].term, "tool");
        assert_eq!(first, checker.check(text));
    }

    #[test]
    fn empty_forms_never_match() {
        let dict = dictionary(vec![Term::new("", "", "misc").with_alternatives([""])]);
        assert!(ConsistencyChecker::new(&dict).check("anything").is_empty());
    }

    #[test]
    fn check_directory_keys_by_relative_path() {
        let root: PathBuf =
            std::env::temp_dir().join(format!("termdoc-check-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(root.join("factors")).expect("mkdir");
        std::fs::create_dir_all(root.join("dist")).expect("mkdir");
        std::fs::write(root.join("factors/factor-01.md"), "The agent decides.").expect("write");
        std::fs::write(root.join("clean.md"), "智能体").expect("write");
        std::fs::write(root.join("dist/out.md"), "agent agent").expect("write");

        let dict = dictionary(vec![agent()]);
        let report = ConsistencyChecker::new(&dict)
            .check_directory(&root, &["dist/**".to_string()])
            .expect("check");
        assert_eq!(report.total, 1);
        assert_eq!(report.files.keys().collect::<Vec<_>>(), vec!["factors/factor-01.md"]);
        assert!(report.errors.is_empty());
        assert_eq!(report.type_counts().get(&IssueKind::ShouldTranslate), Some(&1));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn unreadable_file_is_recorded_and_scan_continues() {
        let root: PathBuf =
            std::env::temp_dir().join(format!("termdoc-check-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&root).expect("mkdir");
        std::fs::write(root.join("ok.md"), "agent").expect("write");
        // Invalid UTF-8 cannot be read as text.
        std::fs::write(root.join("binary.md"), [0xff_u8, 0xfe, 0xfd]).expect("write");

        let dict = dictionary(vec![agent()]);
        let files = vec!["binary.md".to_string(), "missing.md".to_string(), "ok.md".to_string()];
        let mut seen = Vec::new();
        let report = ConsistencyChecker::new(&dict).check_files(&root, &files, |path, n| {
            seen.push((path.to_string(), n));
        });
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.total, 1);
        assert!(report.files.contains_key("ok.md"));
        assert_eq!(seen.len(), 3);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn report_serializes_files_and_total() {
        let mut report = TerminologyReport::default();
        report.record("a.md", Vec::new());
        assert!(report.is_clean());
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["total"], 0);
        assert!(value.get("errors").is_none());
    }
}

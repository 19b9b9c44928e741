//! Automatic terminology repair.
//!
//! Only `preferred` terms are rewritten: exact-case whole-word English
//! occurrences become the Chinese form, then each deprecated alternative is
//! replaced by the Chinese form. `keep_english` terms are never touched.

use std::path::Path;

use tracing::{info, instrument};

use termdoc_shared::{Result, TermdocError, Usage};

use crate::checker::{count_literal, english_matcher};
use crate::dictionary::TerminologyDictionary;

/// Result of a fix pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Rewritten text.
    pub content: String,
    /// Number of replacements made.
    pub changes: usize,
    /// Whether the file on disk was rewritten.
    pub written: bool,
}

/// Rewrite `text` in memory.
pub fn fix_text(text: &str, dictionary: &TerminologyDictionary) -> FixOutcome {
    let mut content = text.to_string();
    let mut changes = 0;

    for term in dictionary.terms().filter(|t| t.usage() == Usage::Preferred) {
        if term.chinese.is_empty() {
            continue;
        }

        if let Some(re) = english_matcher(&term.english, true) {
            let found = re.find_iter(&content).count();
            if found > 0 {
                content = re.replace_all(&content, term.chinese.as_str()).into_owned();
                changes += found;
            }
        }

        for alternative in term.alternatives() {
            // Alternatives inside the preferred form would be re-reported on every run.
            if alternative.is_empty() || term.chinese.contains(alternative.as_str()) {
                continue;
            }
            let found = count_literal(&content, alternative);
            if found > 0 {
                content = content.replace(alternative.as_str(), &term.chinese);
                changes += found;
            }
        }
    }

    FixOutcome {
        content,
        changes,
        written: false,
    }
}

/// Fix a single file. Dry-run unless `apply` is set; the file is only
/// rewritten when there is at least one change.
#[instrument(skip(dictionary), fields(path = %path.display()))]
pub fn fix_file(path: &Path, dictionary: &TerminologyDictionary, apply: bool) -> Result<FixOutcome> {
    if !path.is_file() {
        return Err(TermdocError::validation(format!(
            "{} is not a file; automatic fixes only support single files",
            path.display()
        )));
    }

    let text = std::fs::read_to_string(path).map_err(|e| TermdocError::io(path, e))?;
    let mut outcome = fix_text(&text, dictionary);

    if apply && outcome.changes > 0 {
        std::fs::write(path, &outcome.content).map_err(|e| TermdocError::io(path, e))?;
        outcome.written = true;
        info!(changes = outcome.changes, "terminology fixes applied");
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use termdoc_shared::Term;

    fn dictionary() -> TerminologyDictionary {
        TerminologyDictionary::from_terms(
            "unused.json",
            vec![
                Term::new("agent", "智能体", "concept").with_alternatives(["代理"]),
                Term::new("LLM", "大语言模型", "technical").with_usage(Usage::KeepEnglish),
            ],
        )
    }

    #[test]
    fn replaces_english_and_alternatives() {
        let outcome = fix_text("The agent is a 代理 powered by an LLM.", &dictionary());
        assert_eq!(outcome.content, "The 智能体 is a 智能体 powered by an LLM.");
        assert_eq!(outcome.changes, 2);
    }

    #[test]
    fn english_replacement_is_case_sensitive() {
        let outcome = fix_text("Agent and agent", &dictionary());
        assert_eq!(outcome.content, "Agent and 智能体");
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn fixing_twice_is_a_noop() {
        let dict = dictionary();
        let once = fix_text("agent 代理", &dict);
        let twice = fix_text(&once.content, &dict);
        assert_eq!(twice.changes, 0);
        assert_eq!(twice.content, once.content);
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let dir = std::env::temp_dir().join(format!("termdoc-fix-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("doc.md");
        std::fs::write(&path, "agent").expect("write");

        let dict = dictionary();
        let preview = fix_file(&path, &dict, false).expect("dry run");
        assert_eq!(preview.changes, 1);
        assert!(!preview.written);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "agent");

        let applied = fix_file(&path, &dict, true).expect("apply");
        assert!(applied.written);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "智能体");

        assert!(fix_file(&dir, &dict, false).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}

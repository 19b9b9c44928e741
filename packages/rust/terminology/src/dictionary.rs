//! The bilingual term registry backed by `terminology.json`.
//!
//! The registry is an explicit owned value: load it once, pass it by
//! reference to the checker and fixer, mutate it through [`add`],
//! [`update`] and [`remove`]. Every mutation rewrites the whole file.
//!
//! [`add`]: TerminologyDictionary::add
//! [`update`]: TerminologyDictionary::update
//! [`remove`]: TerminologyDictionary::remove

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use termdoc_shared::{Issue, IssueKind, Result, Term, TermPatch, TermdocError, Usage};

/// Counts reported by `termdoc stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DictionaryStats {
    pub total: usize,
    pub categories: BTreeMap<String, usize>,
    pub usage: BTreeMap<String, usize>,
}

/// Case-insensitive registry of [`Term`]s, in insertion order.
#[derive(Debug, Clone)]
pub struct TerminologyDictionary {
    path: PathBuf,
    terms: IndexMap<String, Term>,
}

impl TerminologyDictionary {
    /// Load the registry from `path`.
    ///
    /// A missing file or anything other than a JSON array of terms is a
    /// [`TermdocError::DictionaryLoad`]; callers must not continue without it.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| TermdocError::dictionary_load(path, e.to_string()))?;
        let terms: Vec<Term> = serde_json::from_str(&data)
            .map_err(|e| TermdocError::dictionary_load(path, format!("invalid JSON: {e}")))?;

        let dictionary = Self::from_terms(path, terms);
        info!(
            terms = dictionary.len(),
            categories = dictionary.categories().len(),
            "terminology dictionary loaded"
        );
        Ok(dictionary)
    }

    /// Build a registry in memory. `path` is where [`save`](Self::save) writes.
    pub fn from_terms(path: impl Into<PathBuf>, terms: impl IntoIterator<Item = Term>) -> Self {
        let mut map = IndexMap::new();
        for term in terms {
            if let Some(previous) = map.insert(term.key(), term) {
                warn!(term = %previous.english, "duplicate English key, later entry wins");
            }
        }
        Self {
            path: path.into(),
            terms: map,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// All terms in registry order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    /// Case-insensitive lookup by English label.
    pub fn lookup(&self, english: &str) -> Option<&Term> {
        self.terms.get(&english.to_lowercase())
    }

    /// Chinese form of `english`, if registered.
    pub fn translation(&self, english: &str) -> Option<&str> {
        self.lookup(english).map(|t| t.chinese.as_str())
    }

    /// True when `english` is registered with the `keep_english` policy.
    pub fn should_keep_english(&self, english: &str) -> bool {
        self.lookup(english)
            .is_some_and(|t| t.usage() == Usage::KeepEnglish)
    }

    /// Deprecated spellings of `english` (empty when unknown).
    pub fn alternatives(&self, english: &str) -> &[String] {
        self.lookup(english)
            .map(|t| t.alternatives())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Insert `term`, replacing any entry with the same case-folded key in
    /// place, then persist.
    pub fn add(&mut self, term: Term) -> Result<()> {
        let english = term.english.clone();
        let chinese = term.chinese.clone();
        self.terms.insert(term.key(), term);
        self.save()?;
        info!(%english, %chinese, "term added");
        Ok(())
    }

    /// Apply `patch` to an existing term, then persist.
    pub fn update(&mut self, english: &str, patch: &TermPatch) -> Result<&Term> {
        let key = english.to_lowercase();
        let term = self
            .terms
            .get_mut(&key)
            .ok_or_else(|| TermdocError::term_not_found(english))?;
        patch.apply_to(term);
        self.save()?;
        info!(%english, "term updated");
        self.terms
            .get(&key)
            .ok_or_else(|| TermdocError::term_not_found(english))
    }

    /// Remove a term, then persist. Returns the removed entry.
    pub fn remove(&mut self, english: &str) -> Result<Term> {
        let removed = self
            .terms
            .shift_remove(&english.to_lowercase())
            .ok_or_else(|| TermdocError::term_not_found(english))?;
        self.save()?;
        info!(%english, "term removed");
        Ok(removed)
    }

    /// Write the full registry to [`path`](Self::path) as a pretty JSON array.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TermdocError::io(parent, e))?;
        }

        let terms: Vec<&Term> = self.terms.values().collect();
        let mut json = serde_json::to_string_pretty(&terms)
            .map_err(|e| TermdocError::Serialization(e.to_string()))?;
        json.push('\n');

        // Sibling temp file, then rename over the registry.
        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, json).map_err(|e| TermdocError::io(&temp, e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| TermdocError::io(&self.path, e))?;

        debug!(path = %self.path.display(), terms = terms.len(), "dictionary saved");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Read-only consistency pass over the registry itself.
    ///
    /// Reports every term whose Chinese form was already claimed by an
    /// earlier term, then every term without a usage note.
    pub fn validate(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for term in self.terms.values() {
            match seen.get(term.chinese.as_str()) {
                Some(first) => issues.push(Issue {
                    kind: IssueKind::DuplicateChinese,
                    term: term.english.clone(),
                    preferred: Some(term.chinese.clone()),
                    count: 1,
                    message: format!(
                        "Chinese term \"{}\" is used by several English terms: {}, {}",
                        term.chinese, term.english, first
                    ),
                }),
                None => {
                    seen.insert(&term.chinese, &term.english);
                }
            }
        }

        for term in self.terms.values().filter(|t| t.lacks_context()) {
            issues.push(Issue {
                kind: IssueKind::MissingContext,
                term: term.english.clone(),
                preferred: None,
                count: 1,
                message: format!("term \"{}\" has no context note", term.english),
            });
        }

        issues
    }

    /// Terms whose English label (case-insensitive), Chinese label or context
    /// contains `query`.
    pub fn search(&self, query: &str) -> Vec<&Term> {
        let lower = query.to_lowercase();
        self.terms
            .values()
            .filter(|t| {
                t.english.to_lowercase().contains(&lower)
                    || t.chinese.contains(query)
                    || t.context().is_some_and(|c| c.contains(query))
            })
            .collect()
    }

    pub fn terms_by_category(&self, category: &str) -> Vec<&Term> {
        self.terms
            .values()
            .filter(|t| t.category() == category)
            .collect()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> BTreeSet<&str> {
        self.terms.values().map(|t| t.category()).collect()
    }

    pub fn stats(&self) -> DictionaryStats {
        let mut stats = DictionaryStats {
            total: self.terms.len(),
            ..DictionaryStats::default()
        };
        for term in self.terms.values() {
            *stats.categories.entry(term.category().to_string()).or_default() += 1;
            *stats.usage.entry(term.usage().to_string()).or_default() += 1;
        }
        stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

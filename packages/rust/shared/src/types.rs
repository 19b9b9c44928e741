//! Core domain types for termdoc: dictionary terms, issues, and navigation nodes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// Usage policy of a dictionary term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    /// The English form must not be translated.
    KeepEnglish,
    /// The English form must be translated to the Chinese form.
    #[default]
    Preferred,
}

impl Usage {
    /// The wire name of this policy (`keep_english` / `preferred`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeepEnglish => "keep_english",
            Self::Preferred => "preferred",
        }
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Usage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "keep_english" => Ok(Self::KeepEnglish),
            "preferred" => Ok(Self::Preferred),
            other => Err(format!(
                "unknown usage '{other}': expected 'keep_english' or 'preferred'"
            )),
        }
    }
}

/// One bilingual dictionary entry (an element of `terminology.json`).
///
/// Optional fields remember whether the file carried them, so a record
/// saves back exactly as it was loaded. The accessors supply defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Canonical English label; unique under case-folding.
    pub english: String,
    /// Canonical Chinese label.
    pub chinese: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    /// Outer `None`: absent. `Some(None)`: an explicit `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    context: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alternatives: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usage: Option<Usage>,
    /// Fields we do not model, carried through load/save untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Wrap a field that appeared in the input, even as `null`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Term {
    /// Create a `preferred` term with no context or alternatives.
    pub fn new(
        english: impl Into<String>,
        chinese: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            english: english.into(),
            chinese: chinese.into(),
            category: Some(category.into()),
            context: None,
            alternatives: Some(Vec::new()),
            usage: Some(Usage::Preferred),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.set_context(context);
        self
    }

    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_alternatives(alternatives.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.set_usage(usage);
        self
    }

    /// Classification tag used to group the glossary; empty when absent.
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    /// Usage note.
    pub fn context(&self) -> Option<&str> {
        self.context.as_ref().and_then(|c| c.as_deref())
    }

    /// Deprecated or competing Chinese spellings, in order.
    pub fn alternatives(&self) -> &[String] {
        self.alternatives.as_deref().unwrap_or_default()
    }

    /// Usage policy; `preferred` when absent.
    pub fn usage(&self) -> Usage {
        self.usage.unwrap_or_default()
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = Some(category.into());
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = Some(Some(context.into()));
    }

    pub fn set_alternatives(&mut self, alternatives: Vec<String>) {
        self.alternatives = Some(alternatives);
    }

    pub fn set_usage(&mut self, usage: Usage) {
        self.usage = Some(usage);
    }

    /// Case-folded registry key.
    pub fn key(&self) -> String {
        self.english.to_lowercase()
    }

    /// True when the context is absent or blank.
    pub fn lacks_context(&self) -> bool {
        self.context().is_none_or(|c| c.trim().is_empty())
    }
}

/// Partial update applied by `TerminologyDictionary::update`.
#[derive(Debug, Clone, Default)]
pub struct TermPatch {
    pub chinese: Option<String>,
    pub category: Option<String>,
    pub context: Option<String>,
    pub alternatives: Option<Vec<String>>,
    pub usage: Option<Usage>,
}

impl TermPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.chinese.is_none()
            && self.category.is_none()
            && self.context.is_none()
            && self.alternatives.is_none()
            && self.usage.is_none()
    }

    /// Apply every `Some` field to `term`.
    pub fn apply_to(&self, term: &mut Term) {
        if let Some(chinese) = &self.chinese {
            term.chinese.clone_from(chinese);
        }
        if let Some(category) = &self.category {
            term.set_category(category.as_str());
        }
        if let Some(context) = &self.context {
            term.set_context(context.as_str());
        }
        if let Some(alternatives) = &self.alternatives {
            term.set_alternatives(alternatives.clone());
        }
        if let Some(usage) = self.usage {
            term.set_usage(usage);
        }
    }
}

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

/// Classification of a terminology issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    ShouldKeepEnglish,
    ShouldTranslate,
    AlternativeUsed,
    DuplicateChinese,
    MissingContext,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShouldKeepEnglish => "should_keep_english",
            Self::ShouldTranslate => "should_translate",
            Self::AlternativeUsed => "alternative_used",
            Self::DuplicateChinese => "duplicate_chinese",
            Self::MissingContext => "missing_context",
        }
    }

    /// Short human description used in report summaries.
    pub fn description(self) -> &'static str {
        match self {
            Self::ShouldKeepEnglish => "should stay in English",
            Self::ShouldTranslate => "should be translated",
            Self::AlternativeUsed => "deprecated alternative used",
            Self::DuplicateChinese => "duplicate Chinese form",
            Self::MissingContext => "missing context",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected terminology inconsistency. Computed fresh per check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// The offending term (English label, or the alternative spelling found).
    pub term: String,
    /// Canonical Chinese form the document should use, when relevant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred: Option<String>,
    /// Number of occurrences.
    pub count: usize,
    pub message: String,
}

/// A per-file failure recorded during a corpus scan; the scan continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    /// Path relative to the scanned root.
    pub path: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// A node of the rendered navigation tree (`navigation.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavigationNode {
    Directory {
        title: String,
        /// Site path, e.g. `/factors/`.
        path: String,
        children: Vec<NavigationNode>,
    },
    File {
        title: String,
        /// Site path, e.g. `/factors/factor-01-natural-language.html`.
        path: String,
        order: u32,
    },
}

impl NavigationNode {
    pub fn title(&self) -> &str {
        match self {
            Self::Directory { title, .. } | Self::File { title, .. } => title,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path, .. } | Self::File { path, .. } => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

/// Root of `navigation.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTree {
    pub title: String,
    pub children: Vec<NavigationNode>,
}

//! Terminology consistency engine.
//!
//! - [`TerminologyDictionary`]: the persisted bilingual term registry
//! - [`ConsistencyChecker`]: per-document and per-directory issue detection
//! - [`fixer`]: automatic replacement of untranslated and deprecated forms
//! - [`glossary`]: Markdown/HTML glossary export

pub mod checker;
pub mod dictionary;
pub mod fixer;
pub mod glossary;

pub use checker::{ConsistencyChecker, TerminologyReport};
pub use dictionary::{DictionaryStats, TerminologyDictionary};
pub use fixer::{FixOutcome, fix_file, fix_text};
pub use glossary::GlossaryFormat;

//! Documentation quality checks and scoring.
//!
//! Three sections feed one score: terminology issues (from
//! `termdoc-terminology`), broken relative links and invalid code blocks.

pub mod code_blocks;
pub mod links;
pub mod report;
pub mod scorer;

pub use code_blocks::{CodeBlockIssue, CodeBlockProblem, CodeReport, check_code_blocks};
pub use links::{BrokenLink, LinkReport, check_links};
pub use report::QualityReport;
pub use scorer::{Check, CodeTally, Grade, LinkTally, QualityScore, TerminologyTally, score};

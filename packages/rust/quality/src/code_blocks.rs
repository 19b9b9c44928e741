//! Fenced code block checks.
//!
//! Problems are recorded per block and never abort the scan; a block is
//! valid when it has none.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use termdoc_shared::FileError;

use crate::scorer::CodeTally;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)```").expect("valid regex"));

/// Length of the code excerpt stored with a problematic block.
const SNIPPET_CHARS: usize = 100;

const DANGEROUS_COMMANDS: &[&str] = &["rm -rf /"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodeBlockProblem {
    Empty,
    UnbalancedBrackets,
    /// A `json`/`yaml` block that does not parse.
    MalformedStructuredContent { format: String, message: String },
    DangerousCommand { command: String },
}

impl fmt::Display for CodeBlockProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty code block"),
            Self::UnbalancedBrackets => f.write_str("unbalanced brackets"),
            Self::MalformedStructuredContent { format, message } => {
                write!(f, "malformed {format}: {message}")
            }
            Self::DangerousCommand { command } => write!(f, "dangerous command `{command}`"),
        }
    }
}

/// A block with at least one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlockIssue {
    pub language: String,
    pub problems: Vec<CodeBlockProblem>,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeReport {
    pub total_blocks: usize,
    pub valid_blocks: usize,
    /// Relative path → problematic blocks.
    pub issues: BTreeMap<String, Vec<CodeBlockIssue>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
}

impl CodeReport {
    pub fn tally(&self) -> CodeTally {
        CodeTally {
            total: self.total_blocks,
            valid: self.valid_blocks,
        }
    }

    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

#[instrument(skip_all, fields(root = %root.display(), files = files.len()))]
pub fn check_code_blocks(root: &Path, files: &[String]) -> CodeReport {
    let mut report = CodeReport::default();

    for rel in files {
        let text = match std::fs::read_to_string(root.join(rel)) {
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

        let mut file_issues = Vec::new();
        for (language, code) in fenced_blocks(&text) {
            report.total_blocks += 1;
            let problems = validate_block(language, code);
            if problems.is_empty() {
                report.valid_blocks += 1;
            } else {
                file_issues.push(CodeBlockIssue {
                    language: language.to_string(),
                    problems,
                    snippet: snippet(code),
                });
            }
        }

        if !file_issues.is_empty() {
            report.issues.insert(rel.clone(), file_issues);
        }
    }

    debug!(
        total = report.total_blocks,
        valid = report.valid_blocks,
        "code block check complete"
    );
    report
}

/// `(language, body)` of every fenced block; language defaults to `text`.
pub fn fenced_blocks(text: &str) -> impl Iterator<Item = (&str, &str)> {
    FENCE_RE.captures_iter(text).filter_map(|caps| {
        let language = caps.get(1).map_or("text", |m| m.as_str());
        let body = caps.get(2)?.as_str();
        Some((language, body))
    })
}

pub fn validate_block(language: &str, code: &str) -> Vec<CodeBlockProblem> {
    if code.trim().is_empty() {
        return vec![CodeBlockProblem::Empty];
    }

    let mut problems = Vec::new();
    match language.to_ascii_lowercase().as_str() {
        "javascript" | "typescript" | "js" | "ts" => {
            if !brackets_balanced(code) {
                problems.push(CodeBlockProblem::UnbalancedBrackets);
            }
        }
        "json" => {
            if let Err(e) = serde_json::from_str::<serde_json::Value>(code) {
                problems.push(CodeBlockProblem::MalformedStructuredContent {
                    format: "json".into(),
                    message: e.to_string(),
                });
            }
        }
        "yaml" | "yml" => {
            if let Err(e) = serde_yaml::from_str::<serde_yaml::Value>(code) {
                problems.push(CodeBlockProblem::MalformedStructuredContent {
                    format: "yaml".into(),
                    message: e.to_string(),
                });
            }
        }
        "bash" | "shell" | "sh" => {
            for command in DANGEROUS_COMMANDS {
                if code.contains(command) {
                    problems.push(CodeBlockProblem::DangerousCommand {
                        command: (*command).to_string(),
                    });
                }
            }
        }
        _ => {}
    }
    problems
}

/// Whether `()`, `[]` and `{}` nest properly. Brackets inside strings count.
pub fn brackets_balanced(code: &str) -> bool {
    let mut stack = Vec::new();
    for c in code.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

fn snippet(code: &str) -> String {
    let mut out: String = code.chars().take(SNIPPET_CHARS).collect();
    out.push_str("...");
    out
}

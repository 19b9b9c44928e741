//! Weighted quality score.
//!
//! | section     | weight | contribution                                   |
//! |-------------|--------|------------------------------------------------|
//! | terminology | 30     | `30 - min(30, 2 × issues)`                     |
//! | links       | 40     | `40 × (1 - broken / total)`, full when no links |
//! | code        | 30     | `30 × valid / total`, full when no blocks      |
//!
//! The final score is `round(100 × earned / applicable)`, where `applicable`
//! sums the weights of sections that were not skipped.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const TERMINOLOGY_WEIGHT: u32 = 30;
pub const LINKS_WEIGHT: u32 = 40;
pub const CODE_WEIGHT: u32 = 30;

/// Points deducted per terminology issue.
const ISSUE_COST: usize = 2;

/// Score at or above which a run passes.
pub const PASS_THRESHOLD: u8 = 90;

/// Outcome of one quality section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum Check<T> {
    /// The section ran.
    Completed(T),
    /// The section could not run; it earns nothing but keeps its weight.
    Failed(String),
    /// The section was not requested; its weight is not applicable.
    Skipped,
}

impl<T> Check<T> {
    pub fn as_completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }
}

/// Counts the scorer needs from the terminology section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminologyTally {
    pub issues: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTally {
    pub total: usize,
    pub broken: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeTally {
    pub total: usize,
    pub valid: usize,
}

/// Letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(s)
    }
}

/// Overall result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    pub score: u8,
    pub grade: Grade,
    pub passed: bool,
}

impl QualityScore {
    fn from_score(score: u8) -> Self {
        Self {
            score,
            grade: Grade::from_score(score),
            passed: score >= PASS_THRESHOLD,
        }
    }
}

pub fn terminology_points(tally: TerminologyTally) -> f64 {
    let weight = TERMINOLOGY_WEIGHT as usize;
    let deduction = weight.min(tally.issues.saturating_mul(ISSUE_COST));
    (weight - deduction) as f64
}

pub fn link_points(tally: LinkTally) -> f64 {
    let weight = f64::from(LINKS_WEIGHT);
    if tally.broken == 0 || tally.total == 0 {
        return weight;
    }
    let ratio = tally.broken as f64 / tally.total as f64;
    (weight * (1.0 - ratio)).max(0.0)
}

pub fn code_points(tally: CodeTally) -> f64 {
    let weight = f64::from(CODE_WEIGHT);
    if tally.total == 0 {
        return weight;
    }
    weight * (tally.valid.min(tally.total) as f64 / tally.total as f64)
}

/// Combine the three sections into a score. Pure.
pub fn score(
    terminology: &Check<TerminologyTally>,
    links: &Check<LinkTally>,
    code: &Check<CodeTally>,
) -> QualityScore {
    let mut earned = 0.0;
    let mut applicable = 0u32;

    accumulate(terminology, TERMINOLOGY_WEIGHT, terminology_points, &mut earned, &mut applicable);
    accumulate(links, LINKS_WEIGHT, link_points, &mut earned, &mut applicable);
    accumulate(code, CODE_WEIGHT, code_points, &mut earned, &mut applicable);

    if applicable == 0 {
        return QualityScore::from_score(0);
    }

    let percent = (100.0 * earned / f64::from(applicable)).round().clamp(0.0, 100.0);
    QualityScore::from_score(percent as u8)
}

fn accumulate<T: Copy>(
    check: &Check<T>,
    weight: u32,
    points: fn(T) -> f64,
    earned: &mut f64,
    applicable: &mut u32,
) {
    match check {
        Check::Completed(tally) => {
            *earned += points(*tally);
            *applicable += weight;
        }
        Check::Failed(_) => *applicable += weight,
        Check::Skipped => {}
    }
}

//! Combined quality report (`quality-report.md` and its JSON form).

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use termdoc_terminology::TerminologyReport;

use crate::code_blocks::CodeReport;
use crate::links::LinkReport;
use crate::scorer::{Check, QualityScore, TerminologyTally, score};

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub generated_at: DateTime<Utc>,
    pub terminology: Check<TerminologyReport>,
    pub links: Check<LinkReport>,
    pub code: Check<CodeReport>,
    pub overall: QualityScore,
}

impl QualityReport {
    /// Score the three sections and stamp the report with the current time.
    pub fn new(
        terminology: Check<TerminologyReport>,
        links: Check<LinkReport>,
        code: Check<CodeReport>,
    ) -> Self {
        let overall = score(
            &tally(&terminology, |r| TerminologyTally { issues: r.total }),
            &tally(&links, LinkReport::tally),
            &tally(&code, CodeReport::tally),
        );
        Self {
            generated_at: Utc::now(),
            terminology,
            links,
            code,
            overall,
        }
    }

    pub fn to_json(&self) -> termdoc_shared::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| termdoc_shared::TermdocError::Serialization(e.to_string()))
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::from("# Documentation Quality Report\n\n");
        let _ = write!(
            md,
            "**Generated**: {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = write!(
            md,
            "**Overall score**: {}/100 ({})\n\n",
            self.overall.score, self.overall.grade
        );

        md.push_str("## Terminology consistency\n\n");
        match &self.terminology {
            Check::Completed(report) if report.is_clean() => {
                md.push_str("✅ **Passed** - all terms follow the dictionary\n\n");
            }
            Check::Completed(report) => {
                let _ = write!(md, "❌ **Failed** - {} issue(s) found\n\n", report.total);
                for (file, issues) in &report.files {
                    let _ = write!(md, "### {file}\n\n");
                    for issue in issues {
                        let _ = writeln!(md, "- {}", issue.message);
                    }
                    md.push('\n');
                }
            }
            other => section_not_run(&mut md, other),
        }

        md.push_str("## Link validity\n\n");
        match &self.links {
            Check::Completed(report) if report.passed() => {
                let _ = write!(
                    md,
                    "✅ **Passed** - {} link(s) checked, all valid\n\n",
                    report.total_links
                );
            }
            Check::Completed(report) => {
                let _ = write!(
                    md,
                    "❌ **Failed** - {}/{} link(s) broken\n\n",
                    report.broken_links, report.total_links
                );
                for (file, links) in &report.details {
                    let _ = write!(md, "### {file}\n\n");
                    for link in links {
                        let _ = writeln!(md, "- [{}]({}) - target not found", link.text, link.url);
                    }
                    md.push('\n');
                }
            }
            other => section_not_run(&mut md, other),
        }

        md.push_str("## Code examples\n\n");
        match &self.code {
            Check::Completed(report) if report.passed() => {
                let _ = write!(
                    md,
                    "✅ **Passed** - {} code block(s) checked, all valid\n\n",
                    report.total_blocks
                );
            }
            Check::Completed(report) => {
                let _ = write!(
                    md,
                    "❌ **Failed** - {}/{} code block(s) valid\n\n",
                    report.valid_blocks, report.total_blocks
                );
                for (file, issues) in &report.issues {
                    let _ = write!(md, "### {file}\n\n");
                    for issue in issues {
                        let problems: Vec<String> =
                            issue.problems.iter().map(ToString::to_string).collect();
                        let _ = writeln!(md, "- **{}** block: {}", issue.language, problems.join(", "));
                    }
                    md.push('\n');
                }
            }
            other => section_not_run(&mut md, other),
        }

        md
    }
}

fn tally<R, T>(check: &Check<R>, f: impl FnOnce(&R) -> T) -> Check<T> {
    match check {
        Check::Completed(report) => Check::Completed(f(report)),
        Check::Failed(reason) => Check::Failed(reason.clone()),
        Check::Skipped => Check::Skipped,
    }
}

fn section_not_run<T>(md: &mut String, check: &Check<T>) {
    match check {
        Check::Failed(reason) => {
            let _ = write!(md, "❌ **Could not run** - {reason}\n\n");
        }
        _ => md.push_str("⏭️ **Skipped**\n\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::BrokenLink;
    use crate::scorer::Grade;
    use termdoc_shared::{Issue, IssueKind};

    fn terminology_with_issue() -> TerminologyReport {
        let mut report = TerminologyReport::default();
        report.record(
            "intro.md",
            vec![Issue {
                kind: IssueKind::ShouldTranslate,
                term: "agent".into(),
                preferred: Some("智能体".into()),
                count: 1,
                message: "term \"agent\" should be translated".into(),
            }],
        );
        report
    }

    fn broken_links() -> LinkReport {
        let mut report = LinkReport {
            total_links: 4,
            broken_links: 1,
            ..LinkReport::default()
        };
        report.details.insert(
            "guide.md".into(),
            vec![BrokenLink {
                text: "setup".into(),
                url: "setup.md".into(),
            }],
        );
        report
    }

    #[test]
    fn scores_from_section_tallies() {
        let report = QualityReport::new(
            Check::Completed(terminology_with_issue()),
            Check::Completed(broken_links()),
            Check::Completed(CodeReport::default()),
        );
        // 28 + 30 + 30 = 88
        assert_eq!(report.overall.score, 88);
        assert_eq!(report.overall.grade, Grade::B);
    }

    #[test]
    fn markdown_lists_failures_per_file() {
        let report = QualityReport::new(
            Check::Completed(terminology_with_issue()),
            Check::Completed(broken_links()),
            Check::Skipped,
        );
        let md = report.to_markdown();
        assert!(md.contains("### intro.md\n\n- term \"agent\" should be translated"));
        assert!(md.contains("1/4 link(s) broken"));
        assert!(md.contains("- [setup](setup.md) - target not found"));
        assert!(md.contains("## Code examples\n\n⏭️ **Skipped**"));
    }

    #[test]
    fn failed_section_is_reported() {
        let report = QualityReport::new(
            Check::Failed("dictionary missing".into()),
            Check::Completed(LinkReport::default()),
            Check::Completed(CodeReport::default()),
        );
        assert!(report.to_markdown().contains("**Could not run** - dictionary missing"));

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("json")).expect("parse");
        assert_eq!(json["terminology"]["status"], "failed");
        assert_eq!(json["overall"]["score"], 70);
        assert_eq!(json["overall"]["grade"], "C");
    }
}

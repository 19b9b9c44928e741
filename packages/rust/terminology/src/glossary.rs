//! Glossary rendering (`termdoc export`).
//!
//! Categories are sorted by name and terms by English label within each
//! category, so exports diff cleanly between runs.

use std::fmt::Write as _;

use termdoc_shared::{Term, Usage, escape_html};

use crate::dictionary::TerminologyDictionary;

/// Export format of the glossary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlossaryFormat {
    Markdown,
    Html,
}

impl GlossaryFormat {
    /// Default output file name for this format.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Markdown => "terminology.md",
            Self::Html => "terminology.html",
        }
    }
}

/// Render the glossary in `format`.
pub fn render(dictionary: &TerminologyDictionary, format: GlossaryFormat) -> String {
    match format {
        GlossaryFormat::Markdown => to_markdown(dictionary),
        GlossaryFormat::Html => to_html(dictionary),
    }
}

/// Display heading of a category.
pub fn category_title(category: &str) -> &str {
    match category {
        "technical" => "技术术语",
        "concept" => "概念术语",
        "tool" => "工具名称",
        other => other,
    }
}

/// Categories with their terms, both sorted.
fn grouped(dictionary: &TerminologyDictionary) -> Vec<(&str, Vec<&Term>)> {
    dictionary
        .categories()
        .into_iter()
        .map(|category| {
            let mut terms = dictionary.terms_by_category(category);
            terms.sort_by(|a, b| a.english.cmp(&b.english));
            (category, terms)
        })
        .filter(|(_, terms)| !terms.is_empty())
        .collect()
}

pub fn to_markdown(dictionary: &TerminologyDictionary) -> String {
    let mut md = String::from("# 术语表\n\n");

    for (category, terms) in grouped(dictionary) {
        let _ = write!(md, "## {}\n\n", category_title(category));

        for term in terms {
            let _ = write!(md, "### {}\n\n", term.english);
            let _ = write!(md, "**中文翻译**: {}\n\n", term.chinese);
            if let Some(context) = term.context().filter(|c| !c.trim().is_empty()) {
                let _ = write!(md, "**说明**: {context}\n\n");
            }
            if !term.alternatives().is_empty() {
                let _ = write!(md, "**替代词**: {}\n\n", term.alternatives().join(", "));
            }
            if term.usage() == Usage::KeepEnglish {
                md.push_str("**使用建议**: 保持英文\n\n");
            }
            md.push_str("---\n\n");
        }
    }

    md
}

pub fn to_html(dictionary: &TerminologyDictionary) -> String {
    let mut html = String::from("<div class=\"terminology-glossary\">\n");

    for (category, terms) in grouped(dictionary) {
        html.push_str("  <section class=\"category-section\">\n");
        let _ = writeln!(
            html,
            "    <h3 class=\"category-title\">{}</h3>",
            escape_html(category_title(category))
        );
        html.push_str("    <dl class=\"term-list\">\n");

        for term in terms {
            let _ = writeln!(html, "      <dt class=\"term-english\">{}</dt>", escape_html(&term.english));
            html.push_str("      <dd class=\"term-chinese\">\n");
            let _ = writeln!(
                html,
                "        <span class=\"translation\">{}</span>",
                escape_html(&term.chinese)
            );
            if let Some(context) = term.context().filter(|c| !c.trim().is_empty()) {
                let _ = writeln!(html, "        <span class=\"context\">{}</span>", escape_html(context));
            }
            if !term.alternatives().is_empty() {
                let _ = writeln!(
                    html,
                    "        <span class=\"alternatives\">替代词: {}</span>",
                    escape_html(&term.alternatives().join(", "))
                );
            }
            html.push_str("      </dd>\n");
        }

        html.push_str("    </dl>\n");
        html.push_str("  </section>\n");
    }

    html.push_str("</div>\n");
    html
}

//! Display titles and sort priorities derived from file and directory names.

use std::sync::LazyLock;

use regex::Regex;

use termdoc_shared::NavigationConfig;

/// Sort priority of files without a fixed or numeric order.
pub const DEFAULT_ORDER: u32 = 999;

static FACTOR_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"factor-(\d+)-(.+)").expect("valid regex"));

static FACTOR_ORDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"factor-(\d+)").expect("valid regex"));

/// Title and order rules for one navigation build.
#[derive(Debug, Clone)]
pub struct TitleRules<'a> {
    config: &'a NavigationConfig,
}

impl<'a> TitleRules<'a> {
    pub fn new(config: &'a NavigationConfig) -> Self {
        Self { config }
    }

    /// Display title for a directory segment or file stem.
    ///
    /// Fixed labels win; `factor-<N>-<rest>` becomes
    /// `"<prefix> <N>: <Rest Title Cased>"`; anything else is title-cased
    /// with hyphens as spaces.
    pub fn format_title(&self, name: &str) -> String {
        if let Some(label) = self.config.labels.get(name) {
            return label.clone();
        }

        if let Some(caps) = FACTOR_TITLE_RE.captures(name) {
            let number = &caps[1];
            let rest = caps[2].replace('-', " ");
            return format!(
                "{} {number}: {}",
                self.config.factor_prefix,
                capitalize_words(&rest)
            );
        }

        capitalize_words(&name.replace('-', " "))
    }

    /// Sort priority of a file stem: fixed table, else the factor number,
    /// else [`DEFAULT_ORDER`].
    pub fn file_order(&self, stem: &str) -> u32 {
        if let Some(order) = self.config.file_order.get(stem) {
            return *order;
        }

        FACTOR_ORDER_RE
            .captures(stem)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .unwrap_or(DEFAULT_ORDER)
    }

    /// Position of `name` in the canonical section ordering.
    pub fn section_rank(&self, name: &str) -> Option<usize> {
        self.config.section_order.iter().position(|s| s == name)
    }
}

/// Uppercase the first character of every word (a run of alphanumerics or `_`).
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        let word_char = c.is_alphanumeric() || c == '_';
        if word_char && !in_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        in_word = word_char;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_take_precedence() {
        let config = NavigationConfig::default();
        let rules = TitleRules::new(&config);
        assert_eq!(rules.format_title("getting-started"), "快速开始");
        assert_eq!(rules.format_title("factors"), "12个因子");
    }

    #[test]
    fn factor_names_are_numbered() {
        let config = NavigationConfig::default();
        let rules = TitleRules::new(&config);
        assert_eq!(
            rules.format_title("factor-01-natural-language"),
            "Factor 01: Natural Language"
        );
        assert_eq!(rules.format_title("factor-12-stateless-reducer"), "Factor 12: Stateless Reducer");
    }

    #[test]
    fn other_names_are_title_cased() {
        let config = NavigationConfig::default();
        let rules = TitleRules::new(&config);
        assert_eq!(rules.format_title("context-window-tips"), "Context Window Tips");
        assert_eq!(rules.format_title("factor-07"), "Factor 07");
        assert_eq!(rules.format_title("faq"), "Faq");
    }

    #[test]
    fn file_order_rules() {
        let config = NavigationConfig::default();
        let rules = TitleRules::new(&config);
        assert_eq!(rules.file_order("introduction"), 1);
        assert_eq!(rules.file_order("first-agent"), 3);
        assert_eq!(rules.file_order("factor-03-own-context"), 3);
        assert_eq!(rules.file_order("factor-10"), 10);
        assert_eq!(rules.file_order("misc"), DEFAULT_ORDER);
        assert_eq!(rules.file_order("factor-99999999999-overflow"), DEFAULT_ORDER);
    }

    #[test]
    fn section_rank_follows_config() {
        let config = NavigationConfig::default();
        let rules = TitleRules::new(&config);
        assert_eq!(rules.section_rank("getting-started"), Some(0));
        assert_eq!(rules.section_rank("community"), Some(6));
        assert_eq!(rules.section_rank("appendix"), None);
    }

    #[test]
    fn capitalize_handles_non_ascii() {
        assert_eq!(capitalize_words("über cool_stuff"), "Über Cool_stuff");
        assert_eq!(capitalize_words("a.b c"), "A.B C");
    }
}

//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use termdoc_core::ProgressReporter;
use termdoc_quality::{Check, QualityReport};
use termdoc_shared::{AppConfig, Term, TermPatch, Usage, init_config, load_config, load_config_from};
use termdoc_terminology::{GlossaryFormat, TerminologyDictionary, TerminologyReport, fix_file, glossary};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// termdoc: keep bilingual documentation consistent.
#[derive(Parser)]
#[command(
    name = "termdoc",
    version,
    about = "Terminology consistency, quality scoring and navigation for bilingual Markdown docs.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./termdoc.toml, then ~/.termdoc/termdoc.toml).
    #[arg(long, global = true, env = "TERMDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Terminology dictionary, overriding `paths.dictionary`.
    #[arg(long, global = true)]
    pub dictionary: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Glossary export format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ExportFormat {
    Markdown,
    Html,
}

impl From<ExportFormat> for GlossaryFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Markdown => Self::Markdown,
            ExportFormat::Html => Self::Html,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Check terminology consistency of every Markdown file under a directory.
    Check {
        /// Directory to scan (defaults to `paths.docs_root`).
        dir: Option<PathBuf>,
    },

    /// Replace untranslated terms and deprecated alternatives in one file.
    Fix {
        /// Markdown file to fix.
        file: PathBuf,

        /// Write the changes (dry-run otherwise).
        #[arg(long)]
        apply: bool,
    },

    /// Add a term to the dictionary (replaces an existing entry with the same name).
    Add {
        english: String,
        chinese: String,
        category: String,
        /// Usage note.
        context: Option<String>,

        /// Deprecated alternative translation (repeatable).
        #[arg(long = "alt")]
        alternatives: Vec<String>,

        /// The term should stay in English in translated text.
        #[arg(long)]
        keep_english: bool,
    },

    /// Update fields of an existing term.
    Update {
        english: String,

        #[arg(long)]
        chinese: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        context: Option<String>,

        /// Replace the alternatives list (repeatable).
        #[arg(long = "alt")]
        alternatives: Option<Vec<String>>,

        /// `preferred` or `keep_english`.
        #[arg(long)]
        usage: Option<Usage>,
    },

    /// Remove a term from the dictionary.
    Remove { english: String },

    /// Search terms by English, Chinese or context.
    Search { query: String },

    /// Show dictionary statistics.
    Stats,

    /// Validate the dictionary itself (duplicate translations, missing context).
    Validate,

    /// Export the glossary.
    Export {
        #[arg(value_enum, default_value = "markdown")]
        format: ExportFormat,

        /// Output file (defaults to terminology.md / terminology.html).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run terminology, link and code checks and score the docs.
    Quality {
        /// Docs root (defaults to `paths.docs_root`).
        dir: Option<PathBuf>,

        /// Markdown report path (defaults to `paths.report`).
        #[arg(long)]
        report: Option<PathBuf>,

        /// Also write the report as JSON next to the Markdown one.
        #[arg(long)]
        json: bool,
    },

    /// Generate navigation.json, navigation.html and breadcrumbs.json.
    Nav {
        /// Docs root (defaults to `paths.docs_root`).
        dir: Option<PathBuf>,

        /// Output directory (defaults to `paths.output_dir`).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default termdoc.toml into the current directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "termdoc=info",
        1 => "termdoc=debug",
        _ => "termdoc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Global options needed to resolve configuration.
struct Settings {
    config: Option<PathBuf>,
    dictionary: Option<PathBuf>,
}

impl Settings {
    /// Config file (or defaults) with CLI overrides applied.
    fn load(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)?,
            None => load_config()?,
        };
        if let Some(dictionary) = &self.dictionary {
            config.paths.dictionary = std::path::absolute(dictionary)?;
        }
        Ok(config)
    }

    fn dictionary(&self) -> Result<TerminologyDictionary> {
        let config = self.load()?;
        Ok(TerminologyDictionary::load(config.paths.dictionary_path())?)
    }
}

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings {
        config: cli.config,
        dictionary: cli.dictionary,
    };

    match cli.command {
        Command::Check { dir } => cmd_check(&settings, dir),
        Command::Fix { file, apply } => cmd_fix(&settings, &file, apply),
        Command::Add {
            english,
            chinese,
            category,
            context,
            alternatives,
            keep_english,
        } => {
            let mut term = Term::new(english, chinese, category).with_alternatives(alternatives);
            if let Some(context) = context {
                term = term.with_context(context);
            }
            if keep_english {
                term = term.with_usage(Usage::KeepEnglish);
            }
            cmd_add(&settings, term)
        }
        Command::Update {
            english,
            chinese,
            category,
            context,
            alternatives,
            usage,
        } => cmd_update(
            &settings,
            &english,
            &TermPatch {
                chinese,
                category,
                context,
                alternatives,
                usage,
            },
        ),
        Command::Remove { english } => cmd_remove(&settings, &english),
        Command::Search { query } => cmd_search(&settings, &query),
        Command::Stats => cmd_stats(&settings),
        Command::Validate => cmd_validate(&settings),
        Command::Export { format, out } => cmd_export(&settings, format.into(), out),
        Command::Quality { dir, report, json } => cmd_quality(&settings, dir, report, json),
        Command::Nav { dir, out } => cmd_nav(&settings, dir, out),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&settings),
        },
    }
}

fn exit_status(clean: bool) -> ExitCode {
    if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ---------------------------------------------------------------------------
// Terminology commands
// ---------------------------------------------------------------------------

fn cmd_check(settings: &Settings, dir: Option<PathBuf>) -> Result<ExitCode> {
    let mut config = settings.load()?;
    // The dictionary stays where the config puts it, whatever directory is scanned.
    let dictionary = TerminologyDictionary::load(config.paths.dictionary_path())?;
    if let Some(dir) = dir {
        config.paths.docs_root = dir;
    }

    let reporter = CliProgress::new();
    let report = termdoc_core::terminology::scan(&config, &dictionary, &reporter)?;
    print_terminology_report(&report);

    Ok(exit_status(report.is_clean()))
}

fn print_terminology_report(report: &TerminologyReport) {
    println!();
    if report.is_clean() {
        println!("  No terminology issues found.");
    } else {
        println!(
            "  {} terminology issue(s) in {} file(s)",
            report.total,
            report.files.len()
        );
        for (file, issues) in &report.files {
            println!();
            println!("  {file}");
            for issue in issues {
                println!("    - [{}] {}", issue.kind, issue.message);
            }
        }

        println!();
        println!("  By type:");
        for (kind, count) in report.type_counts() {
            println!("    {:<20} {count:>5}  ({})", kind.as_str(), kind.description());
        }
    }

    if !report.errors.is_empty() {
        println!();
        println!("  Skipped {} unreadable file(s):", report.errors.len());
        for error in &report.errors {
            println!("    {}: {}", error.path, error.message);
        }
    }
    println!();
}

fn cmd_fix(settings: &Settings, file: &Path, apply: bool) -> Result<ExitCode> {
    let dictionary = settings.dictionary()?;
    let outcome = fix_file(file, &dictionary, apply)?;

    if outcome.changes == 0 {
        println!("No terminology fixes needed in {}", file.display());
    } else if outcome.written {
        println!("Fixed {} terminology issue(s) in {}", outcome.changes, file.display());
    } else {
        println!("Preview: {} replacement(s) would be made in {}", outcome.changes, file.display());
        println!("Re-run with --apply to write them.");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_add(settings: &Settings, term: Term) -> Result<ExitCode> {
    let config = settings.load()?;
    let path = config.paths.dictionary_path();

    let mut dictionary = if path.exists() {
        TerminologyDictionary::load(&path)?
    } else {
        warn!(path = %path.display(), "dictionary not found, creating a new one");
        TerminologyDictionary::from_terms(path.clone(), Vec::new())
    };

    let summary = format!("{} -> {}", term.english, term.chinese);
    dictionary.add(term)?;
    println!("Added term: {summary}");
    Ok(ExitCode::SUCCESS)
}

fn cmd_update(settings: &Settings, english: &str, patch: &TermPatch) -> Result<ExitCode> {
    if patch.is_empty() {
        return Err(eyre!(
            "nothing to update: pass at least one of --chinese, --category, --context, --alt, --usage"
        ));
    }

    let mut dictionary = settings.dictionary()?;
    let term = dictionary.update(english, patch)?;
    println!("Updated term: {} -> {}", term.english, term.chinese);
    Ok(ExitCode::SUCCESS)
}

fn cmd_remove(settings: &Settings, english: &str) -> Result<ExitCode> {
    let mut dictionary = settings.dictionary()?;
    let removed = dictionary.remove(english)?;
    println!("Removed term: {} -> {}", removed.english, removed.chinese);
    Ok(ExitCode::SUCCESS)
}

fn cmd_search(settings: &Settings, query: &str) -> Result<ExitCode> {
    let dictionary = settings.dictionary()?;
    let results = dictionary.search(query);

    println!("Found {} result(s):", results.len());
    for term in results {
        println!("  {} -> {} ({})", term.english, term.chinese, term.category());
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_stats(settings: &Settings) -> Result<ExitCode> {
    let dictionary = settings.dictionary()?;
    let stats = dictionary.stats();

    println!("Terms: {}", stats.total);
    println!("Categories:");
    for (category, count) in &stats.categories {
        println!("  {category:<20} {count:>5}");
    }
    println!("Usage:");
    for (usage, count) in &stats.usage {
        println!("  {usage:<20} {count:>5}");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(settings: &Settings) -> Result<ExitCode> {
    let dictionary = settings.dictionary()?;
    let issues = dictionary.validate();

    if issues.is_empty() {
        println!("Dictionary is consistent ({} terms).", dictionary.len());
    } else {
        println!("Found {} problem(s):", issues.len());
        for issue in &issues {
            println!("  [{}] {}", issue.kind, issue.message);
        }
    }
    Ok(exit_status(issues.is_empty()))
}

fn cmd_export(settings: &Settings, format: GlossaryFormat, out: Option<PathBuf>) -> Result<ExitCode> {
    let dictionary = settings.dictionary()?;
    let out = out.unwrap_or_else(|| PathBuf::from(format.file_name()));

    termdoc_core::output::write_atomic(&out, &glossary::render(&dictionary, format))?;
    info!(path = %out.display(), terms = dictionary.len(), "glossary exported");
    println!("Glossary written to {}", out.display());
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Quality and navigation
// ---------------------------------------------------------------------------

fn cmd_quality(
    settings: &Settings,
    dir: Option<PathBuf>,
    report_path: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let mut config = settings.load()?;
    if let Some(dir) = dir {
        config.paths.docs_root = dir;
    }

    let reporter = CliProgress::new();
    let report = termdoc_core::quality::run(&config, &reporter)?;
    print_quality_summary(&report);

    let path = report_path.unwrap_or_else(|| config.paths.report_path());
    let written = termdoc_core::quality::write_report(&report, &path, json)?;
    println!("  Report: {}", written.markdown.display());
    if let Some(json_path) = written.json {
        println!("  JSON:   {}", json_path.display());
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

fn print_quality_summary(report: &QualityReport) {
    println!();
    match &report.terminology {
        Check::Completed(t) => println!("  Terminology: {} issue(s)", t.total),
        Check::Failed(reason) => println!("  Terminology: could not run ({reason})"),
        Check::Skipped => println!("  Terminology: skipped"),
    }
    if let Some(links) = report.links.as_completed() {
        println!("  Links:       {}/{} broken", links.broken_links, links.total_links);
    }
    if let Some(code) = report.code.as_completed() {
        println!("  Code blocks: {}/{} valid", code.valid_blocks, code.total_blocks);
    }
    println!();
    println!(
        "  Score: {}/100 ({}){}",
        report.overall.score,
        report.overall.grade,
        if report.overall.passed { "" } else { " - below the passing score" }
    );
}

fn cmd_nav(settings: &Settings, dir: Option<PathBuf>, out: Option<PathBuf>) -> Result<ExitCode> {
    let mut config = settings.load()?;
    if let Some(dir) = dir {
        config.paths.docs_root = dir;
    }
    if let Some(out) = out {
        config.paths.output_dir = std::path::absolute(out)?;
    }

    let reporter = CliProgress::new();
    let artifacts = termdoc_core::navigation::generate(&config, &reporter)?;

    println!();
    println!("  Navigation generated!");
    println!("  Pages:  {}", artifacts.breadcrumbs.len());
    println!("  Output: {}", config.paths.output_path().display());
    println!();
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_checked(&self, path: &str, current: usize, total: usize) {
        self.spinner.set_message(format!("Checking [{current}/{total}] {path}"));
    }

    fn done(&self, summary: &str) {
        self.spinner.finish_and_clear();
        info!(summary, "done");
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<ExitCode> {
    let cwd = std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    let path = init_config(&cwd)?;
    println!("Config initialized at: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(settings: &Settings) -> Result<ExitCode> {
    let config = settings.load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_distinguishes_absent_alternatives() {
        let cli = Cli::try_parse_from(["termdoc", "update", "agent", "--chinese", "代理人"]).expect("parse");
        let Command::Update { alternatives, chinese, usage, .. } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(alternatives, None);
        assert_eq!(chinese.as_deref(), Some("代理人"));
        assert_eq!(usage, None);

        let cli = Cli::try_parse_from([
            "termdoc", "update", "agent", "--alt", "代理", "--alt", "智能代理", "--usage", "keep_english",
        ])
        .expect("parse");
        let Command::Update { alternatives, usage, .. } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(alternatives, Some(vec!["代理".to_string(), "智能代理".to_string()]));
        assert_eq!(usage, Some(Usage::KeepEnglish));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["termdoc", "check", "docs", "--dictionary", "terms.json", "-vv"])
            .expect("parse");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.dictionary, Some(PathBuf::from("terms.json")));
        assert!(matches!(cli.command, Command::Check { dir: Some(_) }));
    }

    #[test]
    fn export_defaults_to_markdown() {
        let cli = Cli::try_parse_from(["termdoc", "export"]).expect("parse");
        let Command::Export { format, out } = cli.command else {
            panic!("expected export");
        };
        assert!(matches!(GlossaryFormat::from(format), GlossaryFormat::Markdown));
        assert!(out.is_none());
    }

    #[test]
    fn invalid_usage_is_rejected() {
        assert!(Cli::try_parse_from(["termdoc", "update", "agent", "--usage", "sometimes"]).is_err());
    }
}

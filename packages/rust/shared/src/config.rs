//! Application configuration for termdoc.
//!
//! Project config lives at `./termdoc.toml`; a user-wide fallback may live at
//! `~/.termdoc/termdoc.toml`. CLI flags override config file values, which
//! override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TermdocError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "termdoc.toml";

/// Default user config directory name under the home directory.
const CONFIG_DIR_NAME: &str = ".termdoc";

// ---------------------------------------------------------------------------
// Config structs (matching termdoc.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Filesystem locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Corpus discovery rules.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Navigation titles and ordering.
    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// `[paths]` section. Relative paths are resolved against `docs_root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the Markdown corpus.
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,

    /// Terminology dictionary (JSON array of terms).
    #[serde(default = "default_dictionary")]
    pub dictionary: PathBuf,

    /// Build output directory (navigation artifacts land here).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Markdown quality report.
    #[serde(default = "default_report")]
    pub report: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            dictionary: default_dictionary(),
            output_dir: default_output_dir(),
            report: default_report(),
        }
    }
}

fn default_docs_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_dictionary() -> PathBuf {
    PathBuf::from("config/terminology.json")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}
fn default_report() -> PathBuf {
    PathBuf::from("quality-report.md")
}

impl PathsConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.docs_root.join(path)
        }
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.resolve(&self.dictionary)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.resolve(&self.report)
    }
}

/// `[scan]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Globs (relative to `docs_root`) excluded from terminology and quality scans.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Extra globs excluded when generating navigation.
    #[serde(default = "default_navigation_exclude")]
    pub navigation_exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            navigation_exclude: default_navigation_exclude(),
        }
    }
}

fn default_exclude() -> Vec<String> {
    vec!["node_modules/**".into(), "dist/**".into()]
}
fn default_navigation_exclude() -> Vec<String> {
    vec!["scripts/**".into()]
}

impl ScanConfig {
    /// Combined excludes for navigation discovery.
    pub fn navigation_globs(&self) -> Vec<String> {
        let mut globs = self.exclude.clone();
        for glob in &self.navigation_exclude {
            if !globs.contains(glob) {
                globs.push(glob.clone());
            }
        }
        globs
    }
}

/// `[navigation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Title of the navigation root.
    #[serde(default = "default_site_title")]
    pub site_title: String,

    /// Canonical ordering of known section names; others follow alphabetically.
    #[serde(default = "default_section_order")]
    pub section_order: Vec<String>,

    /// Prefix used when titling `factor-<N>-<name>` documents.
    #[serde(default = "default_factor_prefix")]
    pub factor_prefix: String,

    /// Fixed display labels for directory and file names.
    #[serde(default = "default_labels")]
    pub labels: BTreeMap<String, String>,

    /// Fixed sort priorities for file names (without extension).
    #[serde(default = "default_file_order")]
    pub file_order: BTreeMap<String, u32>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            site_title: default_site_title(),
            section_order: default_section_order(),
            factor_prefix: default_factor_prefix(),
            labels: default_labels(),
            file_order: default_file_order(),
        }
    }
}

fn default_site_title() -> String {
    "12-Factor Agents".into()
}

fn default_section_order() -> Vec<String> {
    [
        "getting-started",
        "concepts",
        "factors",
        "tutorials",
        "tools",
        "best-practices",
        "community",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_labels() -> BTreeMap<String, String> {
    [
        ("getting-started", "快速开始"),
        ("concepts", "核心概念"),
        ("factors", "12个因子"),
        ("tutorials", "实践教程"),
        ("tools", "工具指南"),
        ("best-practices", "最佳实践"),
        ("community", "社区资源"),
        ("workshop", "Workshop教程"),
        ("examples", "代码示例"),
        ("advanced", "高级教程"),
        ("introduction", "项目介绍"),
        ("installation", "环境配置"),
        ("first-agent", "第一个智能体"),
        ("overview", "概述"),
        ("terminology", "术语表"),
        ("agent-architecture", "智能体架构"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_file_order() -> BTreeMap<String, u32> {
    [
        ("introduction", 1),
        ("installation", 2),
        ("first-agent", 3),
        ("overview", 1),
        ("terminology", 2),
        ("agent-architecture", 3),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_factor_prefix() -> String {
    "Factor".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.termdoc/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TermdocError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Locate the config file to use: `./termdoc.toml`, then the user config.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    let user = config_dir().ok()?.join(CONFIG_FILE_NAME);
    user.is_file().then_some(user)
}

/// Load the application config. Returns defaults if no config file exists.
pub fn load_config() -> Result<AppConfig> {
    match find_config_file() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("config file not found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TermdocError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        TermdocError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default `termdoc.toml` into `dir`. Refuses to overwrite.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| TermdocError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(TermdocError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| TermdocError::config(e.to_string()))?;
    std::fs::write(&path, content).map_err(|e| TermdocError::io(&path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path)
}

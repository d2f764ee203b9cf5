//! # Configuration Module / 配置模块
//!
//! Runner configuration, loaded from an optional TOML file and then
//! overridden by `RUNNER_*` environment variables.
//!
//! 运行器配置：从可选的 TOML 文件加载，然后由 `RUNNER_*` 环境变量覆盖。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::params::ParameterTable;
use crate::core::reports::FilenameSyntax;

pub const ENV_GIT_USERNAME: &str = "RUNNER_GITUSERNAME";
pub const ENV_GIT_TOKEN: &str = "RUNNER_GITTOKEN";
pub const ENV_DATA_DIR: &str = "RUNNER_DATADIR";
pub const ENV_SCRAPER_ENABLED: &str = "RUNNER_SCRAPPERENABLED";
pub const ENV_ARTIFACTS_DIR: &str = "RUNNER_ARTIFACTSDIR";
pub const ENV_BINARY: &str = "RUNNER_BINARY";

/// Settings shared by every execution this runner performs.
/// 本运行器执行的所有任务共享的设置。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// The test binary to invoke / 要调用的测试二进制
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Source-control credentials stamped onto the repository before fetching.
    /// 获取之前写入仓库引用的源代码管理凭据。
    #[serde(default)]
    pub git_username: String,
    #[serde(default)]
    pub git_token: String,

    /// Working data directory; content is checked out under it.
    /// 工作数据目录；内容检出到该目录下。
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub scraper_enabled: bool,

    /// Destination of scraped report directories. Defaults to `<data_dir>/artifacts`.
    #[serde(default)]
    pub artifacts_dir: Option<PathBuf>,

    #[serde(default)]
    pub report_filename_syntax: FilenameSyntax,

    /// Replacement defaults for the parameter table, by key.
    /// 按键替换参数表中的默认值。
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

fn default_binary() -> String {
    "ginkgo".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/data")
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            git_username: String::new(),
            git_token: String::new(),
            data_dir: default_data_dir(),
            scraper_enabled: false,
            artifacts_dir: None,
            report_filename_syntax: FilenameSyntax::default(),
            parameters: BTreeMap::new(),
        }
    }
}

impl RunnerConfig {
    /// Loads the configuration file (if given) and applies the process environment.
    /// 加载配置文件（如果提供）并应用进程环境变量。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => load_config_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.expand_paths()?;
        Ok(config)
    }

    /// Overrides fields from environment lookups. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_BINARY) {
            self.binary = v;
        }
        if let Some(v) = get(ENV_GIT_USERNAME) {
            self.git_username = v;
        }
        if let Some(v) = get(ENV_GIT_TOKEN) {
            self.git_token = v;
        }
        if let Some(v) = get(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_ARTIFACTS_DIR) {
            self.artifacts_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_SCRAPER_ENABLED) {
            self.scraper_enabled = parse_bool(&v)
                .with_context(|| format!("{ENV_SCRAPER_ENABLED} must be a boolean, got '{v}'"))?;
        }
        Ok(())
    }

    fn expand_paths(&mut self) -> Result<()> {
        self.data_dir = expand(&self.data_dir)?;
        if let Some(dir) = &self.artifacts_dir {
            self.artifacts_dir = Some(expand(dir)?);
        }
        Ok(())
    }

    /// True when both credentials are configured.
    pub fn has_git_credentials(&self) -> bool {
        !self.git_username.is_empty() && !self.git_token.is_empty()
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.artifacts_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("artifacts"))
    }

    /// The default Ginkgo table with this configuration's replacements applied.
    /// 应用了本配置替换项的默认 Ginkgo 参数表。
    pub fn parameter_table(&self) -> Result<ParameterTable> {
        self.parameters
            .iter()
            .try_fold(ParameterTable::ginkgo(), |table, (key, value)| {
                table
                    .with_default(key, value.clone())
                    .with_context(|| "invalid [parameters] entry in runner configuration")
            })
    }
}

/// Reads and parses a TOML configuration file.
pub fn load_config_file(path: &Path) -> Result<RunnerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn expand(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

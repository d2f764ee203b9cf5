//! # Configuration Initialization Module / 配置初始化模块
//!
//! Creates a `runner.toml` through a short interactive wizard, or writes the
//! default configuration straight away in non-interactive mode.
//!
//! 通过简短的交互式向导创建 `runner.toml`，或在非交互模式下直接写入默认配置。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::RunnerConfig;
use crate::infra::t;

/// Runs the wizard and writes the configuration to `config_path`.
///
/// An existing file is only replaced when `force` is set, or when the user
/// confirms the overwrite interactively.
///
/// 运行向导并将配置写入 `config_path`。已有文件只有在设置 `force`
/// 或用户交互确认后才会被覆盖。
pub fn run_init_wizard(language: &str, config_path: &Path, non_interactive: bool, force: bool) -> Result<()> {
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", t!("init.welcome", locale = language).cyan().bold());
        println!("{}", t!("init.description", locale = language));
    }

    if config_path.exists() && !force {
        if non_interactive {
            anyhow::bail!(t!("init.exists", locale = language, path = config_path.display()).to_string());
        }
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", locale = language, path = config_path.display()))
            .default(false)
            .interact()
            .context(t!("init.confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted", locale = language));
            return Ok(());
        }
    }

    let config = if non_interactive {
        RunnerConfig::default()
    } else {
        prompt_config(&theme, language)?
    };

    write_config(config_path, &config, language)
}

fn prompt_config(theme: &ColorfulTheme, language: &str) -> Result<RunnerConfig> {
    let defaults = RunnerConfig::default();

    let binary: String = Input::with_theme(theme)
        .with_prompt(t!("init.binary_prompt", locale = language))
        .default(defaults.binary.clone())
        .interact_text()?;

    let data_dir: String = Input::with_theme(theme)
        .with_prompt(t!("init.data_dir_prompt", locale = language))
        .default(defaults.data_dir.display().to_string())
        .interact_text()?;

    let scraper_enabled = Confirm::with_theme(theme)
        .with_prompt(t!("init.scraper_prompt", locale = language))
        .default(defaults.scraper_enabled)
        .interact()?;

    Ok(RunnerConfig {
        binary,
        data_dir: PathBuf::from(data_dir),
        scraper_enabled,
        ..defaults
    })
}

fn write_config(path: &Path, config: &RunnerConfig, language: &str) -> Result<()> {
    let toml_string = toml::to_string_pretty(config)
        .context(t!("init.serialize_failed", locale = language).to_string())?;

    fs::write(path, toml_string)
        .with_context(|| t!("init.write_failed", locale = language, path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init.usage_hint", locale = language));

    Ok(())
}

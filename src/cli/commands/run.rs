//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: it reads one execution request,
//! runs it with the git fetcher, the directory scraper and the environment
//! secret manager, then prints and writes the normalized result.
//!
//! 此模块实现 `run` 命令：读取一个执行请求，使用 git 获取器、目录收集器和
//! 环境机密管理器运行它，然后打印并写出规范化结果。

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::{
    core::{config::RunnerConfig, models::Execution, runner::GinkgoRunner},
    infra::{env::EnvSecretManager, fetch::GitFetcher, scrape::DirectoryScraper, t},
    reporting::{generate_html_report, print_output, print_summary, write_summary},
};

/// Reading the execution from standard input / 从标准输入读取执行请求
pub const STDIN_MARKER: &str = "-";

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `execution` - Path to the execution JSON, or `-` for standard input
/// * `config` - Optional runner configuration file
/// * `output` - Where to write the result JSON. When absent the JSON is the only
///   thing written to standard output and the summary goes to standard error.
/// * `html` - Optional path for an HTML report
///
/// # Returns
/// `Err` when the execution aborts, or when it finishes failed or with errors attached.
pub async fn execute(
    execution: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    html: Option<PathBuf>,
    locale: &str,
) -> Result<()> {
    let runner_config = RunnerConfig::load(config.as_deref())
        .with_context(|| t!("run.config_failed", locale = locale).to_string())?;
    let table = runner_config.parameter_table()?;
    let execution = read_execution(&execution, locale)?;
    let execution_id = execution.id.clone();

    let fetcher = GitFetcher::new(runner_config.data_dir.clone());
    let scraper = DirectoryScraper::new(runner_config.artifacts_dir());
    let mut runner = GinkgoRunner::new(runner_config, table, fetcher, scraper, EnvSecretManager::new());

    let result = runner
        .run(execution)
        .await
        .with_context(|| t!("run.aborted", locale = locale, id = &execution_id).to_string())?;

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize execution result")?;
    match &output {
        Some(path) => {
            print_output(&result, locale);
            print_summary(&result, locale);
            fs::write(path, &json)
                .with_context(|| t!("run.output_write_failed", locale = locale, path = path.display()).to_string())?;
            println!("{}", t!("run.output_written", locale = locale, path = path.display()));
        }
        None => {
            // stdout carries only the result JSON; the output is already inside it
            write_summary(&mut io::stderr().lock(), &result, locale)?;
            println!("{json}");
        }
    }

    if let Some(report_path) = &html {
        eprintln!("\n{}", t!("run.html_generating", locale = locale, path = report_path.display()));
        if let Err(e) = generate_html_report(&result, &execution_id, report_path, locale) {
            eprintln!("{} {:#}", t!("run.html_failed", locale = locale).red(), e);
        }
    }

    if !result.is_success() {
        anyhow::bail!(t!("run.unsuccessful", locale = locale, id = &execution_id).to_string());
    }
    Ok(())
}

/// Reads and parses the execution request.
fn read_execution(source: &Path, locale: &str) -> Result<Execution> {
    let raw = if source == Path::new(STDIN_MARKER) {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read execution from standard input")?;
        buf
    } else {
        fs::read_to_string(source)
            .with_context(|| t!("run.execution_read_failed", locale = locale, path = source.display()).to_string())?
    };
    serde_json::from_str(&raw)
        .with_context(|| t!("run.execution_parse_failed", locale = locale, path = source.display()).to_string())
}

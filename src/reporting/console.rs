//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints a colorful, localized summary of an execution result.
//! The `write_*` functions take any writer, so the `run` command can move the
//! summary to stderr when stdout carries the result JSON.
//!
//! 此模块打印执行结果的彩色本地化摘要。`write_*` 函数接受任意写入器，
//! 因此当 stdout 输出结果 JSON 时，`run` 命令可以将摘要转到 stderr。

use colored::*;
use std::io::{self, Write};

use crate::core::models::{ExecutionResult, ExecutionStatus};
use crate::infra::t;

/// Writes a formatted summary of the execution result.
/// Displays one line per step with status, name and duration, followed by
/// any attached errors.
///
/// 写出格式化的执行结果摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Summary ---
///   - Passed   | Books Suite - [It] Books can be loaded            |      500ms
///   - Failed   | Books Suite - [It] Books can be categorized       |      750ms
/// ```
pub fn write_summary<W: Write>(out: &mut W, result: &ExecutionResult, locale: &str) -> io::Result<()> {
    writeln!(out, "\n{}", t!("summary.banner", locale = locale).bold())?;

    if result.steps.is_empty() {
        writeln!(out, "  {}", t!("summary.no_steps", locale = locale).dimmed())?;
    }

    for step in &result.steps {
        let status = status_label(step.status, locale);
        let status = match step.status {
            ExecutionStatus::Passed => status.green(),
            ExecutionStatus::Failed => status.red(),
        };
        writeln!(out, "  - {:<10} | {:<60} | {:>10}", status, step.name, step.duration)?;
    }

    writeln!(
        out,
        "\n{}",
        t!(
            "summary.totals",
            locale = locale,
            total = result.steps.len(),
            passed = result.passed_count(),
            failed = result.failed_count()
        )
    )?;

    if !result.errors.is_empty() {
        writeln!(out, "\n{}", t!("summary.errors_banner", locale = locale).yellow().bold())?;
        for message in result.errors.messages() {
            writeln!(out, "  - {}", message.yellow())?;
        }
    }

    let overall = status_label(result.status, locale);
    match result.status {
        ExecutionStatus::Passed => writeln!(out, "\n{}", overall.green().bold()),
        ExecutionStatus::Failed => writeln!(out, "\n{}", overall.red().bold()),
    }
}

/// Writes the captured test output between separator lines.
/// 在分隔线之间写出捕获的测试输出。
pub fn write_output<W: Write>(out: &mut W, result: &ExecutionResult, locale: &str) -> io::Result<()> {
    if result.output.trim().is_empty() {
        return Ok(());
    }
    writeln!(out, "\n--- {} ---\n", t!("summary.output_header", locale = locale).yellow())?;
    writeln!(out, "{}", result.output.trim_end())?;
    writeln!(out, "{}", "-".repeat(80))
}

/// Prints the summary to stdout.
pub fn print_summary(result: &ExecutionResult, locale: &str) {
    if let Err(e) = write_summary(&mut io::stdout().lock(), result, locale) {
        eprintln!("Failed to print summary: {}", e);
    }
}

/// Prints the captured output to stdout.
pub fn print_output(result: &ExecutionResult, locale: &str) {
    if let Err(e) = write_output(&mut io::stdout().lock(), result, locale) {
        eprintln!("Failed to print output: {}", e);
    }
}

pub fn status_label(status: ExecutionStatus, locale: &str) -> String {
    match status {
        ExecutionStatus::Passed => t!("report.status_passed", locale = locale).to_string(),
        ExecutionStatus::Failed => t!("report.status_failed", locale = locale).to_string(),
    }
}

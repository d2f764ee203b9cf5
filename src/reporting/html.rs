//! # HTML Reporting Module / HTML 报告模块
//!
//! Renders an execution result as a standalone HTML page: summary counters,
//! a table of steps, the attached errors and the captured output.
//!
//! 将执行结果渲染为独立的 HTML 页面：汇总计数、步骤表、附带的错误和捕获的输出。

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::core::models::{ExecutionResult, ExecutionStatus};
use crate::infra::t;
use crate::reporting::console::status_label;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2rem; color: #222; }
.summary-container { display: flex; gap: 1.5rem; margin-bottom: 1.5rem; }
.summary-item { display: flex; flex-direction: column; align-items: center; }
.count { font-size: 1.8rem; font-weight: bold; }
.passed-text { color: #2e7d32; }
.failed-text { color: #c62828; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; }
.status-passed { color: #2e7d32; font-weight: bold; }
.status-failed { color: #c62828; font-weight: bold; }
.duration-cell { text-align: right; }
.errors li { color: #b26a00; }
pre.output-content { background: #f6f8fa; padding: 1rem; overflow-x: auto; }
"#;

/// Renders the report markup.
/// 渲染报告标记。
pub fn render_html_report(result: &ExecutionResult, execution_id: &str, locale: &str) -> Markup {
    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let status_class = |status: ExecutionStatus| match status {
        ExecutionStatus::Passed => "status-passed",
        ExecutionStatus::Failed => "status-failed",
    };

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale)) " - " (execution_id) }
                style { (maud::PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale)) }
                p {
                    (t!("html_report.generated_at", locale = locale, time = &generated_at))
                    " · "
                    span class=(status_class(result.status)) { (status_label(result.status, locale)) }
                }
                div class="summary-container" {
                    div class="summary-item" {
                        span class="count" { (result.steps.len()) }
                        span class="label" { (t!("html_report.summary.total", locale = locale)) }
                    }
                    div class="summary-item" {
                        span class="count passed-text" { (result.passed_count()) }
                        span class="label" { (t!("html_report.summary.passed", locale = locale)) }
                    }
                    div class="summary-item" {
                        span class="count failed-text" { (result.failed_count()) }
                        span class="label" { (t!("html_report.summary.failed", locale = locale)) }
                    }
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale)) }
                            th { (t!("html_report.table.header.status", locale = locale)) }
                            th class="duration-cell" { (t!("html_report.table.header.duration", locale = locale)) }
                        }
                    }
                    tbody {
                        @for step in &result.steps {
                            tr {
                                td { (step.name) }
                                td class=(status_class(step.status)) { (status_label(step.status, locale)) }
                                td class="duration-cell" { (step.duration) }
                            }
                        }
                    }
                }
                @if !result.errors.is_empty() {
                    h2 { (t!("summary.errors_banner", locale = locale)) }
                    ul class="errors" {
                        @for message in result.errors.messages() {
                            li { (message) }
                        }
                    }
                }
                @if !result.output.trim().is_empty() {
                    h2 { (t!("summary.output_header", locale = locale)) }
                    pre class="output-content" { (result.output) }
                }
            }
        }
    }
}

/// Writes the HTML report for `result` to `output_path`.
///
/// # Errors / 错误
/// Fails when the file can't be written.
pub fn generate_html_report(
    result: &ExecutionResult,
    execution_id: &str,
    output_path: &Path,
    locale: &str,
) -> Result<()> {
    let markup = render_html_report(result, execution_id, locale);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}

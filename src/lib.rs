//! # Ginkgo Runner Library / Ginkgo Runner 库
//!
//! A test-execution adapter for Ginkgo suites. It turns an execution request
//! into a Ginkgo command line, runs it against fetched sources, and normalizes
//! the JUnit report into a structured result.
//!
//! 一个用于 Ginkgo 测试套件的测试执行适配器。它将执行请求转换为 Ginkgo 命令行，
//! 针对获取的源代码运行，并将 JUnit 报告规范化为结构化结果。
//!
//! ## Modules / 模块
//!
//! - `core` - Parameter resolution, argument building, orchestration and result mapping
//! - `infra` - Process execution, file system, environment, fetching and scraping
//! - `reporting` - Console and HTML summaries
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 参数解析、参数构建、编排和结果映射
//! - `infra` - 进程执行、文件系统、环境、获取和收集
//! - `reporting` - 控制台和 HTML 摘要
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::models;
pub use crate::core::{Execution, ExecutionResult, GinkgoRunner, RunnerError};

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// It attempts to match the full locale (e.g., "zh-CN"), then just the
/// language code (e.g., "en"), and finally falls back to "en".
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

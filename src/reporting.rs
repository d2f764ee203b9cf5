//! # Reporting Module / 报告模块
//!
//! This module handles the display of execution results: a colorful,
//! localized console summary and an optional standalone HTML report.
//!
//! 此模块处理执行结果的显示：彩色本地化的控制台摘要和可选的独立 HTML 报告。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_output, print_summary, write_output, write_summary};
pub use html::generate_html_report;

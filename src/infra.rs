//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the runner:
//! process execution, file system operations, environment and secrets,
//! content fetching and artifact scraping.
//!
//! 此模块为运行器提供基础设施服务：
//! 进程执行、文件系统操作、环境与机密、内容获取和产物收集。

pub mod command;
pub mod env;
pub mod fetch;
pub mod fs;
pub mod scrape;

// Re-export i18n functions for easier access
pub use rust_i18n::t;

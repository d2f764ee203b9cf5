//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the runner:
//! the parameter table and resolver, argument construction, report
//! handling, result mapping, validation and the execution orchestrator.
//!
//! 此模块包含运行器的核心功能：
//! 参数表与解析器、参数构建、报告处理、结果映射、校验和执行编排。

pub mod args;
pub mod config;
pub mod error;
pub mod junit;
pub mod models;
pub mod params;
pub mod reports;
pub mod results;
pub mod runner;
pub mod validation;

// Re-exports
pub use error::RunnerError;
pub use models::{Execution, ExecutionResult};
pub use runner::GinkgoRunner;

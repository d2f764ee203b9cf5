//! # Error Kinds Module / 错误类型模块
//!
//! Every way an execution can go wrong, split by whether it aborts the pipeline
//! (validation, environment, secrets, fetch, toolchain, reports directory,
//! relocation) or is attached to the result (invocation, report parse, scrape).
//!
//! 执行过程中可能出现的所有错误，按是否中止流水线进行区分。

use std::path::PathBuf;
use thiserror::Error;

use crate::core::junit::IngestError;

/// A boxed error coming back from an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Rejections produced by request validation, in the order they are checked.
/// 请求校验产生的拒绝原因，按检查顺序排列。
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("can't find any content to run in execution data")]
    MissingContent,
    #[error("ginkgo executor handles only repository based tests, but repository is missing")]
    MissingRepository,
    #[error("can't find branch or commit in repository {uri}")]
    MissingBranchOrCommit { uri: String },
    #[error("passing ginkgo test as single file is not supported")]
    SingleFileUnsupported,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid environment variable '{name}': {reason}")]
    Environment { name: String, reason: &'static str },

    #[error("failed to materialize secret variables")]
    Secrets(#[source] BoxError),

    #[error("failed to fetch test content")]
    Fetch(#[source] BoxError),

    #[error("test binary '{binary}' is not available")]
    Toolchain {
        binary: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to create reports directory {}", .path.display())]
    ReportsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{binary}'")]
    ProcessSpawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{binary}' exited with {}", exit_description(.code))]
    ProcessFailed { binary: String, code: Option<i32> },

    #[error("can't extract report file name from {key} value '{value}'")]
    ReportFileName { key: String, value: String },

    #[error("failed to relocate report {} to {}", .from.display(), .to.display())]
    Relocation {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("failed to parse report {}", .path.display())]
    ReportParse {
        path: PathBuf,
        #[source]
        source: IngestError,
    },

    #[error("failed to scrape artifacts for execution {execution_id}")]
    Scrape {
        execution_id: String,
        #[source]
        source: BoxError,
    },
}

impl RunnerError {
    /// Fatal errors abort the pipeline; the rest are attached to the result.
    /// 致命错误会中止流水线，其余错误附加到结果上。
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RunnerError::ProcessSpawn { .. }
                | RunnerError::ProcessFailed { .. }
                | RunnerError::ReportParse { .. }
                | RunnerError::Scrape { .. }
        )
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_string(),
    }
}

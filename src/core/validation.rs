//! # Validation Module / 校验模块
//!
//! Checks an execution request before anything is fetched or run.
//! Rules run in order and the first failure wins.
//!
//! 在获取或运行任何内容之前检查执行请求。规则按顺序执行，第一个失败即返回。

use crate::core::error::ValidationError;
use crate::core::models::Execution;

pub fn validate(execution: &Execution) -> Result<(), ValidationError> {
    let content = execution
        .content
        .as_ref()
        .ok_or(ValidationError::MissingContent)?;

    let repository = content
        .repository
        .as_ref()
        .ok_or(ValidationError::MissingRepository)?;

    if repository.branch.is_empty() && repository.commit.is_empty() {
        return Err(ValidationError::MissingBranchOrCommit {
            uri: repository.uri.clone(),
        });
    }

    if content.is_file() {
        return Err(ValidationError::SingleFileUnsupported);
    }

    Ok(())
}

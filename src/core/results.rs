//! # Result Mapping Module / 结果映射模块
//!
//! Maps ingested JUnit suites onto the caller-facing execution result.
//!
//! 将解析得到的 JUnit 测试套件映射为面向调用方的执行结果。

use std::time::Duration;

use crate::core::junit::{CaseStatus, Suite};
use crate::core::models::{ExecutionResult, ExecutionStatus, ExecutionStep};

pub const OUTPUT_TYPE: &str = "text/plain";

/// Builds the result: one step per top-level test case, overall status
/// `Failed` iff any step failed. Child suites are not expanded.
///
/// 构建结果：每个顶层测试用例对应一个步骤；当且仅当有步骤失败时整体状态为失败。
pub fn map_junit_to_result(output: String, suites: &[Suite]) -> ExecutionResult {
    let steps: Vec<ExecutionStep> = suites
        .iter()
        .flat_map(|suite| {
            suite.tests.iter().map(move |test| ExecutionStep {
                name: format!("{} - {}", suite.name, test.name),
                duration: format_duration(test.duration),
                status: map_status(test.status),
            })
        })
        .collect();

    let status = if steps.iter().any(|s| s.status == ExecutionStatus::Failed) {
        ExecutionStatus::Failed
    } else {
        ExecutionStatus::Passed
    };

    ExecutionResult {
        status,
        output,
        output_type: OUTPUT_TYPE.to_string(),
        steps,
        ..Default::default()
    }
}

/// Only a raw `passed` counts as passed.
pub fn map_status(status: CaseStatus) -> ExecutionStatus {
    match status.as_str() {
        "passed" => ExecutionStatus::Passed,
        _ => ExecutionStatus::Failed,
    }
}

/// Human form of a duration: `1.5s`, `250ms`, `0s`.
/// 时长的可读形式。
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_string();
    }
    format!("{:?}", duration)
}

//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures that flow through the runner:
//! the execution request handed in by the caller, and the normalized
//! execution result handed back.
//!
//! 此模块定义了在运行器中流转的数据结构：
//! 调用方传入的执行请求，以及返回的规范化执行结果。

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::error::RunnerError;

/// A single request to run a test suite against fetched content.
/// It is constructed by the caller and consumed once.
///
/// 一次针对已获取内容运行测试套件的请求。
/// 由调用方构造，只被消费一次。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    /// Opaque identifier, used to key scraped artifacts / 不透明标识符
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: Option<TestContent>,
    /// Named variables; recognized names become parameters, the rest pass through.
    /// 命名变量；可识别的名称成为参数，其余的透传。
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
    /// Free-form positional arguments forwarded after the separator.
    /// 在分隔符之后转发的自由位置参数。
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment exported to the test process / 导出给测试进程的环境变量
    #[serde(default)]
    pub envs: BTreeMap<String, String>,
}

/// How the test content is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    String,
    FileUri,
    GitFile,
    #[default]
    GitDir,
    Git,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestContent {
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub repository: Option<Repository>,
    /// Inline file content, for `string` content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl TestContent {
    /// Single-file content types. Only directory-shaped content can be run.
    /// 单文件内容类型。只有目录形式的内容可以运行。
    pub fn is_file(&self) -> bool {
        matches!(
            self.content_type,
            ContentType::String | ContentType::FileUri | ContentType::GitFile
        )
    }
}

/// A source-control reference for the test content.
/// 测试内容的源代码仓库引用。
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub uri: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub commit: String,
    /// Test target inside the repository / 仓库中的测试目标路径
    #[serde(default)]
    pub path: String,
    /// Directory the test binary runs in, relative to the checkout root.
    /// 测试二进制运行所在的目录，相对于检出根目录。
    #[serde(default)]
    pub working_dir: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("uri", &self.uri)
            .field("branch", &self.branch)
            .field("commit", &self.commit)
            .field("path", &self.path)
            .field("working_dir", &self.working_dir)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Basic,
    Secret,
}

/// A named value. Secret values are resolved and redacted by the secret manager.
/// 命名值。机密值由机密管理器解析并脱敏。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub variable_type: VariableType,
}

impl Variable {
    pub fn basic(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            variable_type: VariableType::Basic,
        }
    }

    pub fn secret(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            variable_type: VariableType::Secret,
        }
    }

    pub fn is_secret(&self) -> bool {
        self.variable_type == VariableType::Secret
    }
}

/// Overall or per-step status.
/// 整体或单步状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Passed,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Passed => "passed",
            ExecutionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized test case result.
/// 一个规范化的测试用例结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    /// `<suite name> - <test name>`
    pub name: String,
    pub duration: String,
    pub status: ExecutionStatus,
}

/// Independently recoverable errors collected during one run.
/// Each cause is kept; none is dropped in favour of another.
///
/// 一次运行中收集的可独立恢复的错误。保留每一个原因。
#[derive(Debug, Default)]
pub struct ErrorSet(Vec<RunnerError>);

impl ErrorSet {
    pub fn push(&mut self, error: RunnerError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RunnerError> {
        self.0.iter()
    }

    /// Renders each error with its chain of causes.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(error_chain).collect()
    }
}

impl fmt::Display for ErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl Serialize for ErrorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.messages())
    }
}

fn error_chain(error: &RunnerError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// The structured outcome of one execution.
///
/// Invariant: `status` is `Failed` if and only if at least one step failed.
/// A non-zero exit of the test process never changes `status`; it shows up
/// in `errors` instead.
///
/// 一次执行的结构化结果。
/// 不变式：当且仅当至少一个步骤失败时，`status` 为 `Failed`。
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub output: String,
    pub output_type: String,
    pub steps: Vec<ExecutionStep>,
    #[serde(skip_serializing_if = "ErrorSet::is_empty")]
    pub errors: ErrorSet,
}

impl ExecutionResult {
    /// Attaches every present error, in order.
    /// 按顺序附加所有存在的错误。
    pub fn with_errors<I>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = Option<RunnerError>>,
    {
        for error in errors.into_iter().flatten() {
            self.errors.push(error);
        }
        self
    }

    pub fn attach(&mut self, error: RunnerError) {
        self.errors.push(error);
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Passed && self.errors.is_empty()
    }

    pub fn passed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == ExecutionStatus::Passed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.steps.len() - self.passed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_deserializes_from_camel_case_json() {
        let json = r#"{
            "id": "exec-1",
            "content": {
                "type": "git-dir",
                "repository": { "uri": "https://example.com/repo.git", "branch": "main", "workingDir": "tests" }
            },
            "variables": { "FocusFilter": { "name": "FocusFilter", "value": "Login", "type": "basic" } },
            "args": ["--v"],
            "envs": { "GOFLAGS": "-count=1" }
        }"#;

        let execution: Execution = serde_json::from_str(json).unwrap();
        let repo = execution.content.as_ref().unwrap().repository.as_ref().unwrap();

        assert_eq!(execution.id, "exec-1");
        assert_eq!(repo.working_dir, "tests");
        assert_eq!(execution.variables["FocusFilter"].value, "Login");
        assert_eq!(execution.args, vec!["--v"]);
        assert_eq!(execution.envs["GOFLAGS"], "-count=1");
    }

    #[test]
    fn test_repository_debug_hides_credentials() {
        let repo = Repository {
            uri: "https://example.com/repo.git".to_string(),
            token: "s3cr3t".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", repo).contains("s3cr3t"));
    }

    #[test]
    fn test_result_serializes_errors_as_messages() {
        let mut result = ExecutionResult::default();
        result.attach(RunnerError::ProcessFailed {
            binary: "ginkgo".to_string(),
            code: Some(1),
        });

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "passed");
        assert_eq!(json["errors"][0], "'ginkgo' exited with code 1");
    }

    #[test]
    fn test_result_omits_empty_errors() {
        let json = serde_json::to_value(ExecutionResult::default()).unwrap();
        assert!(json.get("errors").is_none());
    }
}

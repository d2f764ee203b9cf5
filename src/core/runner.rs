//! # Execution Orchestrator Module / 执行编排模块
//!
//! Sequences one execution end to end:
//! validate → credentials → environment → secrets → fetch → arguments →
//! reports directory → invoke → redact → relocate reports → map result → scrape.
//!
//! Every stage up to and including the reports directory aborts on failure.
//! Once the binary has been invoked, a non-zero exit no longer stops the
//! pipeline: a failing suite legitimately exits non-zero next to a valid report.
//!
//! Progress events go to stderr so stdout stays free for the result.
//!
//! 端到端地编排一次执行。在调用二进制之前的任何阶段失败都会中止；
//! 调用之后，非零退出码不会中断流水线，因为失败的测试套件会在生成有效报告的同时返回非零退出码。

use colored::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::args::{build_args, build_passthrough, RunPaths};
use crate::core::config::RunnerConfig;
use crate::core::error::{BoxError, RunnerError, ValidationError};
use crate::core::junit;
use crate::core::models::{Execution, ExecutionResult};
use crate::core::params::{resolve, ParameterTable, ResolvedParams};
use crate::core::reports::{plan_reports, relocate_reports, ReportFile, ReportKind, REPORTS_DIR};
use crate::core::results::map_junit_to_result;
use crate::core::validation::validate;
use crate::infra::command::{self, display_command};
use crate::infra::env::{prepare_env, SecretManager};
use crate::infra::fetch::Fetcher;
use crate::infra::scrape::Scraper;
use crate::infra::{fs, t};

/// The fully derived command line for one run.
/// 一次运行的完整命令行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub params: ResolvedParams,
    /// Parameter tokens, target path, then the pass-through vector.
    pub args: Vec<String>,
}

/// Resolves parameters and assembles the argument vector.
///
/// `vendored` prepends `--mod vendor` so Go builds from the vendor directory.
///
/// 解析参数并组装参数向量。
pub fn build_invocation(
    table: &ParameterTable,
    variables: &BTreeMap<String, String>,
    positional: &[String],
    paths: &RunPaths,
    vendored: bool,
) -> Invocation {
    let resolution = resolve(table, variables);

    let mut args = Vec::new();
    if vendored {
        args.extend(["--mod".to_string(), "vendor".to_string()]);
    }
    args.extend(build_args(&resolution.params, paths));
    args.extend(build_passthrough(&resolution.passthrough, positional));

    Invocation {
        params: resolution.params,
        args,
    }
}

/// Runs Ginkgo suites for execution requests.
/// 为执行请求运行 Ginkgo 测试套件。
pub struct GinkgoRunner<F, S, M> {
    config: RunnerConfig,
    table: ParameterTable,
    fetcher: F,
    scraper: S,
    secrets: M,
}

impl<F, S, M> GinkgoRunner<F, S, M>
where
    F: Fetcher,
    S: Scraper,
    M: SecretManager,
{
    pub fn new(config: RunnerConfig, table: ParameterTable, fetcher: F, scraper: S, secrets: M) -> Self {
        Self {
            config,
            table,
            fetcher,
            scraper,
            secrets,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs one execution.
    ///
    /// # Returns
    /// `Err` for validation, environment, secret, fetch, toolchain, reports
    /// directory and relocation failures. Otherwise the result, with any
    /// invocation, report-parse and scrape errors attached to it.
    ///
    /// 运行一次执行。致命错误返回 `Err`；否则返回结果，并附带调用、报告解析和收集错误。
    pub async fn run(&mut self, mut execution: Execution) -> Result<ExecutionResult, RunnerError> {
        eprintln!("{}", t!("run.validating", id = &execution.id).blue());
        validate(&execution)?;

        if self.config.has_git_credentials() {
            if let Some(repo) = execution.content.as_mut().and_then(|c| c.repository.as_mut()) {
                eprintln!("{}", t!("run.credentials").dimmed());
                repo.username = self.config.git_username.clone();
                repo.token = self.config.git_token.clone();
            }
        }

        let env = prepare_env(&execution.envs)?;
        let variables = self
            .secrets
            .materialize(&execution.variables)
            .map_err(|e| RunnerError::Secrets(e.into()))?;

        let content = execution.content.as_ref().ok_or(ValidationError::MissingContent)?;
        let root = self
            .fetcher
            .fetch(content)
            .await
            .map_err(|e| RunnerError::Fetch(e.into()))?;
        let paths = RunPaths::for_checkout(&root, content.repository.as_ref());
        eprintln!("{}", t!("run.content_path", path = paths.content.display()).blue());
        if paths.is_split() {
            eprintln!("{}", t!("run.run_path", path = paths.run.display()).blue());
        }

        self.check_binary(&paths, &env).await?;

        let vendored = fs::is_directory(&paths.run.join("vendor"));
        if vendored {
            eprintln!("{}", t!("run.vendor_found").dimmed());
        }
        let invocation = build_invocation(&self.table, &variables, &execution.args, &paths, vendored);

        let reports_dir = paths.content.join(REPORTS_DIR);
        fs::ensure_dir(&reports_dir).map_err(|source| RunnerError::ReportsDir {
            path: reports_dir.clone(),
            source,
        })?;
        let reports = plan_reports(
            &invocation.params,
            self.config.report_filename_syntax,
            &paths.run,
            &reports_dir,
        )?;

        let binary = self.config.binary.clone();
        let shown = self.secrets.obfuscate(&display_command(&binary, &invocation.args));
        eprintln!("{}", t!("run.command", command = shown).blue());
        let cmd = command::command(&binary, &invocation.args, &paths.run, &env);
        let out = command::spawn_and_capture(cmd).await;
        let invocation_error = match out.status {
            Ok(status) if status.success() => None,
            Ok(status) => Some(RunnerError::ProcessFailed {
                binary: binary.clone(),
                code: status.code(),
            }),
            Err(source) => Some(RunnerError::ProcessSpawn {
                binary: binary.clone(),
                source,
            }),
        };
        if let Some(e) = &invocation_error {
            eprintln!("{}", t!("run.process_failed", error = e).yellow());
        }

        let output = self.secrets.obfuscate(&out.output);

        relocate_reports(&reports)?;
        for report in &reports {
            eprintln!(
                "{}",
                t!("run.relocated", from = report.generated.display(), to = report.relocated.display()).dimmed()
            );
        }

        let (suites, parse_error) = match junit_report(&reports) {
            Some(path) => match junit::ingest_file(&path) {
                Ok(suites) => (suites, None),
                Err(source) => (Vec::new(), Some(RunnerError::ReportParse { path, source })),
            },
            None => (Vec::new(), None),
        };
        let mut result = map_junit_to_result(output, &suites).with_errors([invocation_error, parse_error]);

        if self.config.scraper_enabled {
            eprintln!("{}", t!("run.scraping", path = reports_dir.display()).blue());
            if let Err(e) = self.scraper.scrape(&execution.id, &[reports_dir.clone()]).await {
                eprintln!("{}", t!("run.scrape_failed", error = format!("{e:#}")).yellow());
                result.attach(RunnerError::Scrape {
                    execution_id: execution.id.clone(),
                    source: e.into(),
                });
            }
        }

        eprintln!("{}", t!("run.finished", id = &execution.id, status = result.status));
        Ok(result)
    }

    /// Runs `<binary> version` to make sure the binary can be started.
    async fn check_binary(&self, paths: &RunPaths, env: &BTreeMap<String, String>) -> Result<(), RunnerError> {
        let binary = &self.config.binary;
        let version = vec!["version".to_string()];
        let out = command::spawn_and_capture(command::command(binary, &version, &paths.content, env)).await;
        let toolchain = |source: BoxError| RunnerError::Toolchain {
            binary: binary.clone(),
            source,
        };
        match out.status {
            Ok(status) if status.success() => {
                eprintln!("{}", t!("run.binary_version", version = out.output.trim()).dimmed());
                Ok(())
            }
            Ok(status) => Err(toolchain(
                format!("'{} version' exited with {}: {}", binary, status, out.output.trim()).into(),
            )),
            Err(e) => Err(toolchain(e.into())),
        }
    }
}

/// Where the relocated JUnit report sits, when that report is enabled.
fn junit_report(reports: &[ReportFile]) -> Option<PathBuf> {
    reports
        .iter()
        .find(|r| r.kind == ReportKind::Junit)
        .map(|r| r.relocated.clone())
}

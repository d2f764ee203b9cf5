//! # Report Files Module / 报告文件模块
//!
//! The three report kinds the binary can write, how their file names are read
//! out of the parameter fragments, and relocation of the generated files into
//! the reports directory.
//!
//! 二进制可以写出的三种报告、如何从参数片段中读取它们的文件名，
//! 以及将生成的文件迁移到报告目录。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::args::fragment_tokens;
use crate::core::error::RunnerError;
use crate::core::params::{ResolvedParams, JSON_REPORT_KEY, JUNIT_REPORT_KEY, TEAMCITY_REPORT_KEY};
use crate::infra::fs;

/// Name of the directory, under the content path, that receives the reports.
pub const REPORTS_DIR: &str = "reports";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Json,
    Junit,
    TeamCity,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Json, ReportKind::Junit, ReportKind::TeamCity];

    /// The parameter key whose fragment enables this report.
    pub fn param_key(&self) -> &'static str {
        match self {
            ReportKind::Json => JSON_REPORT_KEY,
            ReportKind::Junit => JUNIT_REPORT_KEY,
            ReportKind::TeamCity => TEAMCITY_REPORT_KEY,
        }
    }
}

/// How a report fragment spells its file name.
/// 报告片段如何书写其文件名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilenameSyntax {
    /// `--junit-report report.xml`: the second token.
    Separated,
    /// `--junit-report=report.xml`: the text after `=` in the first token.
    Assigned,
    /// `separated`, falling back to `assigned`.
    #[default]
    Auto,
}

impl FilenameSyntax {
    /// Extracts the file name from a report fragment.
    /// 从报告片段中提取文件名。
    pub fn file_name(&self, fragment: &str) -> Option<String> {
        let tokens = fragment_tokens(fragment);
        let separated = || tokens.get(1).cloned();
        let assigned = || {
            tokens
                .first()
                .and_then(|t| t.split_once('='))
                .map(|(_, v)| v.to_string())
        };
        let name = match self {
            FilenameSyntax::Separated => separated(),
            FilenameSyntax::Assigned => assigned(),
            FilenameSyntax::Auto => separated().or_else(assigned),
        };
        name.filter(|n| !n.is_empty())
    }
}

/// A report the binary was asked to write, with its source and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub kind: ReportKind,
    pub generated: PathBuf,
    pub relocated: PathBuf,
}

/// Lists the enabled reports and where each one moves.
/// A fragment whose file name can't be extracted is an error.
///
/// 列出已启用的报告及其迁移位置。
pub fn plan_reports(
    params: &ResolvedParams,
    syntax: FilenameSyntax,
    run_dir: &Path,
    reports_dir: &Path,
) -> Result<Vec<ReportFile>, RunnerError> {
    let mut files = Vec::new();
    for kind in ReportKind::ALL {
        let Some(fragment) = params.get(kind.param_key()) else {
            continue;
        };
        let name = syntax
            .file_name(fragment)
            .ok_or_else(|| RunnerError::ReportFileName {
                key: kind.param_key().to_string(),
                value: fragment.to_string(),
            })?;
        let generated = run_dir.join(&name);
        let base = generated
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&name));
        files.push(ReportFile {
            kind,
            generated,
            relocated: reports_dir.join(base),
        });
    }
    Ok(files)
}

/// Moves every planned report into the reports directory. Stops at the first failure.
/// 将每个计划中的报告移动到报告目录，遇到第一个失败即停止。
pub fn relocate_reports(files: &[ReportFile]) -> Result<(), RunnerError> {
    for file in files {
        fs::move_file(&file.generated, &file.relocated).map_err(|e| RunnerError::Relocation {
            from: file.generated.clone(),
            to: file.relocated.clone(),
            source: e.into(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::{resolve, ParameterTable};
    use std::collections::BTreeMap;

    #[test]
    fn test_file_name_syntaxes() {
        assert_eq!(
            FilenameSyntax::Separated.file_name("--junit-report report.xml").as_deref(),
            Some("report.xml")
        );
        assert_eq!(FilenameSyntax::Separated.file_name("--junit-report=report.xml"), None);
        assert_eq!(
            FilenameSyntax::Assigned.file_name("--junit-report=out/r.xml").as_deref(),
            Some("out/r.xml")
        );
        assert_eq!(
            FilenameSyntax::Auto.file_name("--json-report=r.json").as_deref(),
            Some("r.json")
        );
        assert_eq!(FilenameSyntax::Auto.file_name("--json-report"), None);
    }

    #[test]
    fn test_plan_reports_uses_enabled_kinds_only() {
        let params = resolve(&ParameterTable::ginkgo(), &BTreeMap::new()).params;
        let files = plan_reports(
            &params,
            FilenameSyntax::Auto,
            Path::new("/run"),
            Path::new("/src/reports"),
        )
        .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].kind, ReportKind::Json);
        assert_eq!(files[1].generated, PathBuf::from("/run/report.xml"));
        assert_eq!(files[1].relocated, PathBuf::from("/src/reports/report.xml"));
    }

    #[test]
    fn test_plan_reports_rejects_unreadable_fragment() {
        let vars = BTreeMap::from([("JunitReport".to_string(), "--junit-report".to_string())]);
        let params = resolve(&ParameterTable::ginkgo(), &vars).params;

        let err = plan_reports(&params, FilenameSyntax::Auto, Path::new("/r"), Path::new("/s"))
            .unwrap_err();
        assert!(matches!(err, RunnerError::ReportFileName { .. }));
    }

    #[test]
    fn test_relocate_reports_moves_files() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join(REPORTS_DIR);
        std::fs::create_dir_all(&reports).unwrap();
        std::fs::write(dir.path().join("report.xml"), "<testsuites/>").unwrap();

        let files = vec![ReportFile {
            kind: ReportKind::Junit,
            generated: dir.path().join("report.xml"),
            relocated: reports.join("report.xml"),
        }];
        relocate_reports(&files).unwrap();

        assert!(!dir.path().join("report.xml").exists());
        assert!(reports.join("report.xml").exists());
    }

    #[test]
    fn test_relocate_missing_report_fails() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![ReportFile {
            kind: ReportKind::Json,
            generated: dir.path().join("missing.json"),
            relocated: dir.path().join("reports/missing.json"),
        }];
        assert!(matches!(
            relocate_reports(&files),
            Err(RunnerError::Relocation { .. })
        ));
    }
}

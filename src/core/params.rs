//! # Parameter Table Module / 参数表模块
//!
//! The exhaustive set of Ginkgo parameters this runner recognizes, each with
//! its default CLI fragment, and the resolver that merges caller overrides
//! into it.
//!
//! 本运行器识别的 Ginkgo 参数全集（每个参数带有默认的命令行片段），
//! 以及把调用方覆盖值合并进来的解析器。

use anyhow::{bail, Result};
use std::collections::BTreeMap;

/// Key of the positional target-path parameter.
/// 位置型目标路径参数的键。
pub const TARGET_KEY: &str = "TestPackage";
pub const JSON_REPORT_KEY: &str = "JsonReport";
pub const JUNIT_REPORT_KEY: &str = "JunitReport";
pub const TEAMCITY_REPORT_KEY: &str = "TeamCityReport";

/// What kind of command-line fragment a parameter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// A boolean flag such as `-r`.
    Switch(&'static str),
    /// A flag followed by a value, such as `--focus REGEXP`.
    Valued(&'static str),
    /// The package/path argument handed to the binary.
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub kind: ParameterKind,
    /// Empty means "not enabled by default".
    pub default: String,
}

impl ParameterSpec {
    /// Renders a caller-supplied override into the fragment it stands for.
    /// An empty result disables the parameter.
    ///
    /// A switch accepts `true` and `false`. Any other value is passed through
    /// verbatim as an opaque fragment, so `Recursive=yes` puts `yes` on the
    /// command line unchanged.
    ///
    /// 将调用方提供的覆盖值渲染为对应的命令行片段。结果为空表示禁用该参数。
    pub fn render_override(&self, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            return String::new();
        }
        match self.kind {
            ParameterKind::Target => value.to_string(),
            _ if value.starts_with('-') => value.to_string(),
            ParameterKind::Switch(flag) => match value {
                "true" => flag.to_string(),
                "false" => String::new(),
                other => other.to_string(),
            },
            ParameterKind::Valued(flag) => {
                let quoted = shlex::try_quote(value).unwrap_or(value.into());
                format!("{flag} {quoted}")
            }
        }
    }
}

/// Immutable mapping from parameter key to its spec.
/// Built once and passed into the resolver explicitly.
///
/// 参数键到其规格的不可变映射。构建一次，并显式传入解析器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTable {
    specs: BTreeMap<String, ParameterSpec>,
}

impl ParameterTable {
    /// The default Ginkgo table.
    /// 默认的 Ginkgo 参数表。
    pub fn ginkgo() -> Self {
        use ParameterKind::*;

        let entries: [(&str, ParameterKind, &str); 25] = [
            (TARGET_KEY, Target, ""),
            ("Recursive", Switch("-r"), "-r"),
            ("Parallel", Switch("-p"), "-p"),
            ("ParallelProcs", Valued("--procs"), ""),
            ("Compilers", Valued("--compilers"), ""),
            ("Randomize", Switch("--randomize-all"), "--randomize-all"),
            ("RandomizeSuites", Switch("--randomize-suites"), "--randomize-suites"),
            ("LabelFilter", Valued("--label-filter"), ""),
            ("FocusFilter", Valued("--focus"), ""),
            ("SkipFilter", Valued("--skip"), ""),
            ("UntilItFails", Switch("--until-it-fails"), ""),
            ("Repeat", Valued("--repeat"), ""),
            ("FlakeAttempts", Valued("--flake-attempts"), ""),
            ("Timeout", Valued("--timeout"), ""),
            ("SkipPackage", Valued("--skip-package"), ""),
            ("FailFast", Switch("--fail-fast"), ""),
            ("KeepGoing", Switch("--keep-going"), "--keep-going"),
            ("FailOnPending", Switch("--fail-on-pending"), ""),
            ("Cover", Switch("--cover"), ""),
            ("CoverProfile", Valued("--coverprofile"), ""),
            ("Race", Switch("--race"), ""),
            ("Trace", Switch("--trace"), "--trace"),
            (JSON_REPORT_KEY, Valued("--json-report"), "--json-report report.json"),
            (JUNIT_REPORT_KEY, Valued("--junit-report"), "--junit-report report.xml"),
            (TEAMCITY_REPORT_KEY, Valued("--teamcity-report"), ""),
        ];

        let specs = entries
            .into_iter()
            .map(|(key, kind, default)| {
                (
                    key.to_string(),
                    ParameterSpec {
                        kind,
                        default: default.to_string(),
                    },
                )
            })
            .collect();

        Self { specs }
    }

    /// Returns a copy of the table with one default replaced.
    /// Unknown keys are rejected so a typo in configuration can't go unnoticed.
    ///
    /// 返回替换了一个默认值的参数表副本。未知的键会被拒绝。
    pub fn with_default(mut self, key: &str, default: impl Into<String>) -> Result<Self> {
        match self.specs.get_mut(key) {
            Some(spec) => {
                spec.default = default.into();
                Ok(self)
            }
            None => bail!("unknown parameter '{}'", key),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterSpec> {
        self.specs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.specs.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterSpec)> {
        self.specs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::ginkgo()
    }
}

/// Final key/fragment configuration for one invocation. Disabled keys are absent.
/// 一次调用的最终键/片段配置。被禁用的键不存在。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedParams {
    flags: BTreeMap<String, String>,
    target: Option<String>,
}

impl ResolvedParams {
    /// The fragment for `key`, or `None` when the key is disabled.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == TARGET_KEY {
            return self.target.as_deref();
        }
        self.flags.get(key).map(String::as_str)
    }

    /// Flag fragments in key order. The target path is not included.
    /// 按键排序的标志片段，不包含目标路径。
    pub fn flags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

/// Outcome of resolution: the parameters and the variables left over for pass-through.
/// 解析结果：参数，以及剩余用于透传的变量。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub params: ResolvedParams,
    pub passthrough: BTreeMap<String, String>,
}

/// Merges `variables` into the table.
///
/// Every recognized key takes the caller's override if there is one, else the
/// table default. Recognized keys are never part of `passthrough`, even when
/// their override is empty. The input map is left untouched.
///
/// 将 `variables` 合并到参数表中。每个可识别的键优先使用调用方的覆盖值，
/// 否则使用默认值。可识别的键永远不会出现在 `passthrough` 中。输入不会被修改。
pub fn resolve(table: &ParameterTable, variables: &BTreeMap<String, String>) -> Resolution {
    let mut params = ResolvedParams::default();

    for (key, spec) in table.iter() {
        let fragment = match variables.get(key) {
            Some(value) => spec.render_override(value),
            None => spec.default.trim().to_string(),
        };
        if fragment.is_empty() {
            continue;
        }
        if spec.kind == ParameterKind::Target {
            params.target = Some(fragment);
        } else {
            params.flags.insert(key.to_string(), fragment);
        }
    }

    let passthrough = variables
        .iter()
        .filter(|(name, _)| !table.contains(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    Resolution {
        params,
        passthrough,
    }
}

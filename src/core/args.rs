//! # Argument Builder Module / 参数构建模块
//!
//! Turns resolved parameters into the ordered argument vector handed to the
//! test binary, and leftover variables plus positional arguments into the
//! trailing pass-through flags.
//!
//! 将解析后的参数转换为传给测试二进制的有序参数向量，
//! 并将剩余变量和位置参数转换为末尾的透传标志。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::models::Repository;
use crate::core::params::ResolvedParams;

/// Token separating the binary's own flags from flags for the inner test matcher.
pub const PASSTHROUGH_SEPARATOR: &str = "--";

/// Where the content lives and where the binary runs.
/// The two differ when the repository configures a working directory.
///
/// 内容所在位置与二进制运行位置。当仓库配置了工作目录时两者不同。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub content: PathBuf,
    pub run: PathBuf,
}

impl RunPaths {
    /// Both paths point at the same directory.
    pub fn same(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            content: path.clone(),
            run: path,
        }
    }

    /// Derives the paths from a checkout root and the repository reference.
    /// 由检出根目录和仓库引用推导路径。
    pub fn for_checkout(root: &Path, repository: Option<&Repository>) -> Self {
        let content = match repository {
            Some(repo) if !repo.path.is_empty() => root.join(&repo.path),
            _ => root.to_path_buf(),
        };
        match repository {
            Some(repo) if !repo.working_dir.is_empty() => Self {
                content,
                run: root.join(&repo.working_dir),
            },
            _ => Self::same(content),
        }
    }

    pub fn is_split(&self) -> bool {
        self.content != self.run
    }
}

/// Splits one configuration fragment into CLI tokens using shell-word rules.
/// Unbalanced quotes fall back to plain whitespace splitting.
///
/// 使用 shell 词法规则将一个配置片段拆分为命令行标记。
pub fn fragment_tokens(fragment: &str) -> Vec<String> {
    shlex::split(fragment)
        .unwrap_or_else(|| fragment.split_whitespace().map(str::to_string).collect())
}

/// Builds the argument vector for the resolved parameters.
///
/// Flag fragments come first in key order, so the same input always yields
/// the same vector. The target path goes last: joined onto the content path
/// when the run path differs, bare otherwise. With no target and a shared
/// path nothing is appended and the binary uses its working directory.
///
/// 为解析后的参数构建参数向量。标志片段按键排序在前，目标路径在最后。
pub fn build_args(params: &ResolvedParams, paths: &RunPaths) -> Vec<String> {
    let mut args: Vec<String> = params
        .flags()
        .flat_map(|(_, fragment)| fragment_tokens(fragment))
        .collect();

    match (params.target(), paths.is_split()) {
        (Some(target), true) => args.push(paths.content.join(target).display().to_string()),
        (Some(target), false) => args.push(target.to_string()),
        (None, true) => args.push(paths.content.display().to_string()),
        (None, false) => {}
    }

    args
}

/// Builds the trailing `-- --name=value ... positional...` vector.
/// Returns an empty vector, without a bare separator, when there is nothing to pass.
///
/// 构建末尾的透传向量。没有内容时返回空向量，不会产生单独的分隔符。
pub fn build_passthrough(remaining: &BTreeMap<String, String>, positional: &[String]) -> Vec<String> {
    let mut flags: Vec<String> = remaining
        .iter()
        .map(|(name, value)| format!("--{name}={value}"))
        .collect();
    flags.extend(positional.iter().cloned());

    if flags.is_empty() {
        return flags;
    }
    let mut out = Vec::with_capacity(flags.len() + 1);
    out.push(PASSTHROUGH_SEPARATOR.to_string());
    out.extend(flags);
    out
}

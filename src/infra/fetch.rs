//! # Content Fetching Module / 内容获取模块
//!
//! Resolves a content descriptor to a local directory.
//!
//! 将内容描述符解析为本地目录。

use anyhow::{anyhow, bail, Context, Result};
use colored::*;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::core::models::{Repository, TestContent};
use crate::infra::{command, t};

/// Fetches test content and returns the local checkout root.
/// 获取测试内容并返回本地检出根目录。
pub trait Fetcher {
    fn fetch(&self, content: &TestContent) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Clones repositories with the `git` CLI into `<data_dir>/repo`.
/// 使用 `git` 命令行将仓库克隆到 `<data_dir>/repo`。
#[derive(Debug, Clone)]
pub struct GitFetcher {
    data_dir: PathBuf,
}

impl GitFetcher {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn checkout_dir(&self) -> PathBuf {
        self.data_dir.join("repo")
    }
}

impl Fetcher for GitFetcher {
    async fn fetch(&self, content: &TestContent) -> Result<PathBuf> {
        let repo = content
            .repository
            .as_ref()
            .ok_or_else(|| anyhow!("content has no repository to fetch"))?;
        let dest = self.checkout_dir();

        if dest.exists() {
            std::fs::remove_dir_all(&dest)
                .with_context(|| format!("Failed to clean up old checkout: {}", dest.display()))?;
        }
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create data directory: {}", self.data_dir.display()))?;

        eprintln!("{}", t!("fetch.cloning", uri = &repo.uri).blue());
        git(&self.data_dir, &clone_args(repo, &dest)).await?;

        if !repo.commit.is_empty() {
            let checkout = vec!["checkout".to_string(), repo.commit.clone()];
            git(&dest, &checkout).await?;
        }

        Ok(dest)
    }
}

/// Arguments for `git clone`. Shallow unless a specific commit is wanted.
pub fn clone_args(repo: &Repository, dest: &Path) -> Vec<String> {
    let mut args = vec!["clone".to_string()];
    if repo.commit.is_empty() {
        args.extend(["--depth".to_string(), "1".to_string()]);
    }
    if !repo.branch.is_empty() {
        args.extend(["--branch".to_string(), repo.branch.clone()]);
    }
    args.push(authenticated_uri(repo));
    args.push(dest.display().to_string());
    args
}

/// Embeds `username:token` into http(s) URIs when both are set.
/// 当用户名和令牌都存在时，将其嵌入 http(s) URI。
pub fn authenticated_uri(repo: &Repository) -> String {
    if repo.username.is_empty() || repo.token.is_empty() {
        return repo.uri.clone();
    }
    for scheme in ["https://", "http://"] {
        if let Some(rest) = repo.uri.strip_prefix(scheme) {
            return format!("{scheme}{}:{}@{rest}", repo.username, repo.token);
        }
    }
    repo.uri.clone()
}

async fn git(dir: &Path, args: &[String]) -> Result<()> {
    let cmd = command::command("git", args, dir, &BTreeMap::new());
    let out = command::spawn_and_capture(cmd).await;
    let status = out.status.context("Failed to execute 'git'")?;
    if !status.success() {
        bail!("git {} failed: {}", args.first().map_or("", String::as_str), out.output.trim());
    }
    Ok(())
}

//! # Artifact Scraping Module / 产物收集模块
//!
//! Persists report directories once an execution is finished.
//!
//! 在执行完成后持久化报告目录。

use anyhow::{Context, Result};
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::infra::fs;

/// Uploads or stores the given directories under the execution's identifier.
/// 以执行标识符为键上传或存储给定目录。
pub trait Scraper {
    fn scrape(&self, execution_id: &str, directories: &[PathBuf]) -> impl Future<Output = Result<()>> + Send;
}

/// Copies each directory into `<root>/<execution id>/`.
/// 将每个目录复制到 `<root>/<execution id>/`。
#[derive(Debug, Clone)]
pub struct DirectoryScraper {
    root: PathBuf,
}

impl DirectoryScraper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn destination(&self, execution_id: &str) -> PathBuf {
        self.root.join(sanitize(execution_id))
    }
}

impl Scraper for DirectoryScraper {
    async fn scrape(&self, execution_id: &str, directories: &[PathBuf]) -> Result<()> {
        let dest = self.destination(execution_id);
        for dir in directories {
            copy_into(dir, &dest)
                .with_context(|| format!("Failed to scrape {}", dir.display()))?;
        }
        Ok(())
    }
}

fn copy_into(dir: &Path, dest: &Path) -> Result<()> {
    if !fs::is_directory(dir) {
        anyhow::bail!("not a directory: {}", dir.display());
    }
    fs::copy_dir_all(dir, dest)
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

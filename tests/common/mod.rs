// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use ginkgo_runner::core::models::{ContentType, Execution, Repository, TestContent, Variable};
use ginkgo_runner::infra::fetch::Fetcher;
use ginkgo_runner::infra::scrape::Scraper;

/// A stand-in for the `ginkgo` binary. `version` succeeds; every other call
/// echoes its arguments, drops a JUnit and a JSON report into the working
/// directory and exits with `$FAKE_EXIT` (default 1).
///
/// `FAKE_ALL_PASS=1` writes a report without failures, `FAKE_BAD_XML=1` writes
/// a truncated JUnit report, `FAKE_NO_REPORTS=1` writes nothing.
const FAKE_GINKGO: &str = r#"#!/bin/sh
if [ "$1" = "version" ]; then
  echo "Ginkgo Version 2.0.0-fake"
  exit 0
fi
echo "args: $*"
echo "cwd: $(pwd)"
if [ "$FAKE_NO_REPORTS" != "1" ]; then
  echo '[]' > report.json
  if [ "$FAKE_BAD_XML" = "1" ]; then
    printf '<testsuites><testsuite name="Books Suite"><testcase name="cut off"' > report.xml
  elif [ "$FAKE_ALL_PASS" = "1" ]; then
    cat > report.xml <<'XML'
<?xml version="1.0" encoding="UTF-8"?>
<testsuites tests="1">
  <testsuite name="Books Suite" tests="1">
    <testcase name="[It] can be loaded" classname="Books Suite" time="0.5"></testcase>
  </testsuite>
</testsuites>
XML
  else
    cat > report.xml <<'XML'
<?xml version="1.0" encoding="UTF-8"?>
<testsuites tests="2" failures="1">
  <testsuite name="Books Suite" tests="2" failures="1">
    <testcase name="[It] can be loaded" classname="Books Suite" time="0.5"></testcase>
    <testcase name="[It] can be categorized" classname="Books Suite" time="0.75">
      <failure message="Expected 2 to equal 3" type="failed">books_test.go:42</failure>
    </testcase>
  </testsuite>
</testsuites>
XML
  fi
fi
exit "${FAKE_EXIT:-1}"
"#;

/// Path of the fake binary, written once per test process.
pub fn fake_ginkgo() -> &'static Path {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("ginkgo-runner-fake-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("Failed to create fake binary directory");
        let path = dir.join("ginkgo");
        fs::write(&path, FAKE_GINKGO).expect("Failed to write fake binary");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("Failed to mark fake binary executable");
        path
    })
}

/// Returns a fixed checkout root instead of cloning.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    pub root: PathBuf,
}

impl Fetcher for LocalFetcher {
    async fn fetch(&self, _content: &TestContent) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        Ok(self.root.clone())
    }
}

/// Like [`LocalFetcher`], and keeps the content it was asked to fetch.
#[derive(Debug, Clone, Default)]
pub struct RecordingFetcher {
    pub root: PathBuf,
    pub seen: Arc<Mutex<Vec<TestContent>>>,
}

impl RecordingFetcher {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            seen: Arc::default(),
        }
    }

    pub fn last_repository(&self) -> Option<Repository> {
        let seen = self.seen.lock().expect("fetch record poisoned");
        seen.last().and_then(|c| c.repository.clone())
    }
}

impl Fetcher for RecordingFetcher {
    async fn fetch(&self, content: &TestContent) -> anyhow::Result<PathBuf> {
        self.seen.lock().expect("fetch record poisoned").push(content.clone());
        fs::create_dir_all(&self.root)?;
        Ok(self.root.clone())
    }
}

/// Fails every fetch.
#[derive(Debug, Clone, Default)]
pub struct UnreachableFetcher;

impl Fetcher for UnreachableFetcher {
    async fn fetch(&self, content: &TestContent) -> anyhow::Result<PathBuf> {
        let uri = content.repository.as_ref().map(|r| r.uri.clone()).unwrap_or_default();
        anyhow::bail!("repository {uri} is unreachable")
    }
}

/// Fails every scrape.
#[derive(Debug, Clone, Default)]
pub struct FailingScraper;

impl Scraper for FailingScraper {
    async fn scrape(&self, _execution_id: &str, _directories: &[PathBuf]) -> anyhow::Result<()> {
        anyhow::bail!("artifact store unavailable")
    }
}

/// A git-dir execution on `main` with the given variables.
pub fn execution(id: &str, variables: &[Variable]) -> Execution {
    Execution {
        id: id.to_string(),
        name: format!("{id} suite"),
        content: Some(TestContent {
            content_type: ContentType::GitDir,
            repository: Some(Repository {
                uri: "https://example.com/org/books.git".to_string(),
                branch: "main".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        variables: variables
            .iter()
            .map(|v| (v.name.clone(), v.clone()))
            .collect(),
        ..Default::default()
    }
}

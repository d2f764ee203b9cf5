use predicates::prelude::*;
use std::fs;
use assert_cmd::Command;

/// `init --non-interactive` writes a loadable default configuration.
///
/// `init --non-interactive` 写入可加载的默认配置。
#[test]
fn test_init_non_interactive_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runner.toml");

    let mut cmd = Command::cargo_bin("ginkgo-runner").unwrap();
    cmd.args(["--lang", "en", "init", "--non-interactive", "--output"]).arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("binary = \"ginkgo\""));
    assert!(content.contains("report_filename_syntax = \"auto\""));
}

/// An existing configuration is kept unless `--force` is given.
#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runner.toml");
    fs::write(&path, "binary = \"custom\"\n").unwrap();

    let mut cmd = Command::cargo_bin("ginkgo-runner").unwrap();
    cmd.args(["--lang", "en", "init", "--non-interactive", "--output"]).arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "binary = \"custom\"\n");

    let mut cmd = Command::cargo_bin("ginkgo-runner").unwrap();
    cmd.args(["--lang", "en", "init", "--non-interactive", "--force", "--output"]).arg(&path);
    cmd.assert().success();
    assert!(fs::read_to_string(&path).unwrap().contains("binary = \"ginkgo\""));
}

#[test]
fn test_run_rejects_malformed_execution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("execution.json");
    fs::write(&path, "{ \"id\": ").unwrap();

    let mut cmd = Command::cargo_bin("ginkgo-runner").unwrap();
    cmd.args(["--lang", "en", "run", "--execution"]).arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse execution request"));
}

/// Validation failures abort before anything is fetched.
/// 校验失败会在获取任何内容之前中止。
#[test]
fn test_run_reports_validation_failure() {
    let mut cmd = Command::cargo_bin("ginkgo-runner").unwrap();
    cmd.args(["--lang", "en", "run", "--execution", "-"])
        .write_stdin(r#"{ "id": "exec-without-content" }"#);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("can't find any content to run"));
}

#[test]
fn test_run_rejects_unknown_parameter_in_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("runner.toml");
    fs::write(&config, "[parameters]\nNoSuchKey = \"--nope\"\n").unwrap();

    let mut cmd = Command::cargo_bin("ginkgo-runner").unwrap();
    cmd.args(["--lang", "en", "run", "--execution", "-", "--config"])
        .arg(&config)
        .write_stdin(r#"{ "id": "x" }"#);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("NoSuchKey"));
}

#[test]
fn test_chinese_help_text() {
    let mut cmd = Command::cargo_bin("ginkgo-runner").unwrap();
    cmd.args(["--lang", "zh-CN", "run", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("执行请求 JSON 的路径"));
}

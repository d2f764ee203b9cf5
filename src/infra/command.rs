//! # Command Execution Module / 命令执行模块
//!
//! Spawns external processes and captures their combined stdout and stderr.
//!
//! 派生外部进程并捕获其合并后的 stdout 和 stderr。

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;

/// What an external process left behind.
/// 外部进程的运行结果。
#[derive(Debug)]
pub struct CommandOutput {
    /// `Err` when the process couldn't be started or awaited.
    pub status: std::io::Result<ExitStatus>,
    /// Combined stdout and stderr, line by line in arrival order.
    pub output: String,
}

/// Builds a command for `program` with `args`, running in `dir` with `envs` added.
///
/// 为 `program` 构建命令，在 `dir` 中运行并附加 `envs`。
pub fn command(program: &str, args: &[String], dir: &Path, envs: &BTreeMap<String, String>) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args).envs(envs).current_dir(dir).kill_on_drop(true);
    cmd
}

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
///
/// # Returns
/// The exit status (or the error that prevented getting one) and the combined output.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
pub async fn spawn_and_capture(mut cmd: Command) -> CommandOutput {
    let mut child = match cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(e) => {
            return CommandOutput {
                status: Err(e),
                output: String::new(),
            };
        }
    };

    let output = Arc::new(Mutex::new(String::new()));

    let stdout_handle = child
        .stdout
        .take()
        .map(|stdout| tokio::spawn(collect_lines(stdout, Arc::clone(&output))));
    let stderr_handle = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(collect_lines(stderr, Arc::clone(&output))));

    let status = child.wait().await;

    // Wait for both readers so no trailing output is lost.
    // 等待两个读取任务完成，以免丢失末尾输出。
    for handle in [stdout_handle, stderr_handle].into_iter().flatten() {
        if let Err(e) = handle.await {
            eprintln!("Failed to join output reader task: {}", e);
        }
    }

    let output = output.lock().await.clone();
    CommandOutput { status, output }
}

/// Drains `stream` to EOF line by line. Bytes that aren't valid UTF-8 are
/// replaced rather than ending the capture, so the child never writes into a
/// closed pipe.
async fn collect_lines<R>(stream: R, output: Arc<Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                let mut output = output.lock().await;
                output.push_str(text.trim_end_matches(['\n', '\r']));
                output.push('\n');
            }
            Err(e) => {
                eprintln!("Failed to read process output: {}", e);
                break;
            }
        }
    }
}

/// Renders a command line for logs.
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|a| shlex::try_quote(a).map_or_else(|_| a.clone(), |q| q.into_owned())))
        .collect::<Vec<_>>()
        .join(" ")
}

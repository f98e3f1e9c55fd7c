//! Child process launching and output pumping.
//!
//! A launched child is handed to a tokio task that reads stdout and stderr
//! line by line as they arrive and posts them, followed by the exit code, to
//! an unbounded channel. The runner drains that channel from the event loop
//! without ever blocking on the child.

use super::error::RunnerError;
use std::ffi::OsStr;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::{Stream, StreamExt};

/// One message from a running child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProcessEvent {
    Stdout(String),
    Stderr(String),
    /// Both streams are closed and the child has been reaped.
    Exited(Option<i32>),
}

type LineStream = Pin<Box<dyn Stream<Item = std::io::Result<ProcessEvent>> + Send>>;

/// Spawn `program` with the shell-style `arguments` string and start
/// pumping its output.
pub(crate) fn spawn(
    program: &Path,
    arguments: &str,
    working_dir: &Path,
    path_var: &OsStr,
) -> Result<UnboundedReceiver<ProcessEvent>, RunnerError> {
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|_| RunnerError::NoRuntime(program.display().to_string()))?;
    let _guard = runtime.enter();

    let mut cmd = build_command(program, arguments);
    cmd.current_dir(working_dir);
    cmd.env("PATH", path_var);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let child = cmd.spawn().map_err(|source| RunnerError::Spawn {
        program: program.display().to_string(),
        source,
    })?;

    let (tx, rx) = unbounded_channel();
    runtime.spawn(pump(child, tx));
    Ok(rx)
}

/// The argument string is shell-style, so on Unix it is interpreted by
/// `/bin/sh` after the already-resolved program path.
#[cfg(unix)]
fn build_command(program: &Path, arguments: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c")
        .arg(format!("exec {} {}", sh_quote(program), arguments));
    cmd
}

/// Windows programs parse their own command line, so the string is passed
/// through untouched.
#[cfg(windows)]
fn build_command(program: &Path, arguments: &str) -> Command {
    let mut cmd = Command::new(program);
    cmd.raw_arg(arguments);
    cmd
}

#[cfg(unix)]
fn sh_quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

async fn pump(mut child: Child, tx: UnboundedSender<ProcessEvent>) {
    let mut lines: LineStream = Box::pin(tokio_stream::empty());

    if let Some(stdout) = child.stdout.take() {
        let out = LinesStream::new(BufReader::new(stdout).lines())
            .map(|line| line.map(ProcessEvent::Stdout));
        lines = Box::pin(lines.merge(out));
    }
    if let Some(stderr) = child.stderr.take() {
        let err = LinesStream::new(BufReader::new(stderr).lines())
            .map(|line| line.map(ProcessEvent::Stderr));
        lines = Box::pin(lines.merge(err));
    }

    while let Some(item) = lines.next().await {
        match item {
            Ok(event) => {
                if tx.send(event).is_err() {
                    // Runner dropped; keep draining so the child is not blocked on a full pipe.
                    continue;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable output line");
            }
        }
    }

    let code = match child.wait().await {
        Ok(status) => status.code(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to reap child process");
            None
        }
    };
    let _ = tx.send(ProcessEvent::Exited(code));
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    async fn collect(mut rx: UnboundedReceiver<ProcessEvent>) -> Vec<ProcessEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = matches!(event, ProcessEvent::Exited(_));
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn test_pump_preserves_line_order_per_stream() {
        let rx = spawn(
            Path::new("/bin/sh"),
            "-c 'echo one; echo two; echo bad >&2; echo three; exit 4'",
            Path::new("."),
            OsStr::new("/usr/bin:/bin"),
        )
        .unwrap();

        let events = collect(rx).await;

        let stdout: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ProcessEvent::Stdout(line) => Some(line.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(stdout, vec!["one", "two", "three"]);
        assert!(events.contains(&ProcessEvent::Stderr("bad".to_string())));
        assert_eq!(events.last(), Some(&ProcessEvent::Exited(Some(4))));
    }

    #[tokio::test]
    async fn test_spawn_in_missing_dir_fails() {
        let result = spawn(
            Path::new("/bin/sh"),
            "-c true",
            Path::new("/definitely/not/a/dir"),
            OsStr::new("/usr/bin:/bin"),
        );
        assert!(matches!(result, Err(RunnerError::Spawn { .. })));
    }

    #[test]
    fn test_spawn_without_runtime_fails() {
        let result = spawn(
            Path::new("/bin/sh"),
            "-c true",
            Path::new("."),
            OsStr::new("/usr/bin:/bin"),
        );
        assert!(matches!(result, Err(RunnerError::NoRuntime(_))));
    }
}

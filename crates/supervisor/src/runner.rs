//! Process runner: spawns the external encoder for one input file and
//! streams its combined output line-by-line.
//!
//! The runner reports that the process ended and with which code; it does
//! not classify the exit status as success or failure. Failure at this
//! layer means the process could not be launched or its output could not
//! be read.

use crate::encode::{build_encoder_command, EncoderInvocation};
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Error type for encoder supervision
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The encoder process could not be launched
    #[error("failed to launch encoder: {0}")]
    Spawn(#[source] std::io::Error),

    /// Reading the encoder's output or waiting for its exit failed
    #[error("error reading encoder output: {0}")]
    Stream(#[source] std::io::Error),
}

/// Run the encoder for one invocation, forwarding output lines as they
/// arrive.
///
/// Stdout and stderr are consumed together as one line stream; each line
/// has trailing whitespace trimmed and is dropped if empty. The call
/// returns once the child has exited, reporting its `ExitStatus`
/// regardless of the code.
pub async fn run_encoder<F>(
    binary: &str,
    invocation: &EncoderInvocation,
    mut on_line: F,
) -> Result<ExitStatus, RunnerError>
where
    F: FnMut(&str),
{
    let mut cmd = build_encoder_command(binary, invocation);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(
        encoder = binary,
        input = %invocation.input_path.display(),
        output = %invocation.output_path.display(),
        "spawning encoder process"
    );

    let mut child = cmd.spawn().map_err(RunnerError::Spawn)?;

    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    if let Some(stdout) = child.stdout.take() {
        spawn_line_reader(stdout, line_tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_line_reader(stderr, line_tx.clone());
    }
    drop(line_tx);

    let mut stream_error = None;
    while let Some(result) = line_rx.recv().await {
        match result {
            Ok(line) => {
                let line = line.trim_end();
                if !line.is_empty() {
                    on_line(line);
                }
            }
            Err(e) => {
                stream_error = Some(e);
                break;
            }
        }
    }

    if let Some(e) = stream_error {
        // don't leave a child running with no reader attached
        let _ = child.kill().await;
        let _ = child.wait().await;
        return Err(RunnerError::Stream(e));
    }

    let status = child.wait().await.map_err(RunnerError::Stream)?;
    debug!(code = ?status.code(), "encoder process exited");
    Ok(status)
}

/// Forward lines from one child pipe into the merged stream.
fn spawn_line_reader<R>(
    reader: R,
    tx: mpsc::UnboundedSender<std::io::Result<String>>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Write an executable stub encoder script into `dir`.
    ///
    /// The scripts ignore the fixed argument template they receive.
    #[cfg(unix)]
    fn write_stub_encoder(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn test_invocation() -> EncoderInvocation {
        EncoderInvocation::new(PathBuf::from("clip.ts"), PathBuf::from("clip.mp4"))
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_lines_forwarded_in_order() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub_encoder(dir.path(), "encoder", "echo 'frame=1'\necho 'frame=2'");

        let mut lines = Vec::new();
        let status = run_encoder(stub.to_str().unwrap(), &test_invocation(), |line| {
            lines.push(line.to_string())
        })
        .await
        .unwrap();

        assert_eq!(lines, vec!["frame=1", "frame=2"]);
        assert!(status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stderr_lines_are_merged() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub_encoder(
            dir.path(),
            "encoder",
            "echo 'out line'\necho 'err line' 1>&2",
        );

        let mut lines = Vec::new();
        run_encoder(stub.to_str().unwrap(), &test_invocation(), |line| {
            lines.push(line.to_string())
        })
        .await
        .unwrap();

        lines.sort();
        assert_eq!(lines, vec!["err line", "out line"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_trailing_whitespace_trimmed_and_blank_lines_dropped() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub_encoder(
            dir.path(),
            "encoder",
            "printf 'padded   \\n\\n  indented\\n'",
        );

        let mut lines = Vec::new();
        run_encoder(stub.to_str().unwrap(), &test_invocation(), |line| {
            lines.push(line.to_string())
        })
        .await
        .unwrap();

        assert_eq!(lines, vec!["padded", "  indented"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_reported_not_classified() {
        let dir = TempDir::new().unwrap();
        let stub = write_stub_encoder(dir.path(), "encoder", "echo 'partial'\nexit 3");

        let mut lines = Vec::new();
        let status = run_encoder(stub.to_str().unwrap(), &test_invocation(), |line| {
            lines.push(line.to_string())
        })
        .await
        .expect("a clean exit with nonzero code is not a runner error");

        assert_eq!(lines, vec!["partial"]);
        assert!(!status.success());
        assert_eq!(status.code(), Some(3));
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let result = run_encoder(
            "/nonexistent/path/to/encoder",
            &test_invocation(),
            |_line| {},
        )
        .await;

        match result {
            Err(RunnerError::Spawn(_)) => {}
            other => panic!("expected spawn error, got {:?}", other),
        }
    }
}

//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` uses tokio for async process execution with a
//! guaranteed kill when the timeout fires.

use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;
use crate::domain::error::CommandError;

/// Production `CommandRunner`.
///
/// `tokio::time::timeout` around `.output().await` only drops the future and
/// can leave the OS process running, so this uses `tokio::select!` with an
/// explicit `child.kill()`.
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output, CommandError> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(program, e))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    read_all(stdout_handle.as_mut()),
                    read_all(stderr_handle.as_mut()),
                );
                let status = status.map_err(|source| CommandError::Io {
                    program: program.to_string(),
                    source,
                })?;
                Ok::<_, CommandError>(Output { status, stdout, stderr })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                tracing::debug!(program, timeout_secs = timeout.as_secs(), "killed child after timeout");
                Err(CommandError::TimedOut {
                    program: program.to_string(),
                    timeout,
                })
            }
        }
    }
}

async fn read_all(handle: Option<&mut (impl AsyncReadExt + Unpin)>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

fn spawn_error(program: &str, e: io::Error) -> CommandError {
    if e.kind() == io::ErrorKind::NotFound {
        CommandError::NotFound(program.to_string())
    } else {
        CommandError::Io {
            program: program.to_string(),
            source: e,
        }
    }
}

//! Child process execution with timeout

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Captured result of a successful run
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

/// Runs binaries and captures their output
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Kill the process after this long, `None` to wait forever
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Create a runner with the given timeout
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Get the timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Set the timeout
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Execute a binary and capture its output.
    ///
    /// A non-zero exit status is an [`Error::ExecutionFailure`].
    pub async fn run<I, S>(&self, binary: &Path, args: I) -> Result<ProcessOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command_line = command_line(binary, &args);
        tracing::info!("Running command: {}", command_line);

        let child = Command::new(binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                tracing::error!("Failed to spawn {}: {}", command_line, source);
                Error::Spawn {
                    command: command_line.clone(),
                    source,
                }
            })?;

        // Dropping the child on timeout kills it
        let output = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_) => {
                    tracing::error!("Command {} timed out after {:?}", command_line, timeout);
                    return Err(Error::Timeout {
                        command: command_line,
                        timeout,
                    });
                }
            },
            None => child.wait_with_output().await?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::error!(
                "Command {} failed with {:?}: {}",
                command_line,
                output.status.code(),
                stderr.trim()
            );
            return Err(Error::ExecutionFailure {
                command: command_line,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        tracing::debug!("Command {} succeeded", command_line);
        Ok(ProcessOutput { stdout, stderr })
    }
}

/// Render a command line for logs and errors
fn command_line(binary: &Path, args: &[std::ffi::OsString]) -> String {
    std::iter::once(binary.as_os_str())
        .chain(args.iter().map(|a| a.as_os_str()))
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let runner = ProcessRunner::new(Some(Duration::from_secs(10)));
        let output = runner
            .run(Path::new("/bin/sh"), ["-c", "echo hello"])
            .await
            .unwrap();

        assert_eq!(output.stdout, "hello\n");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_failure_keeps_stderr() {
        let runner = ProcessRunner::new(None);
        let err = runner
            .run(Path::new("/bin/sh"), ["-c", "echo boom >&2; exit 3"])
            .await
            .unwrap_err();

        match err {
            Error::ExecutionFailure {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "/bin/sh -c echo boom >&2; exit 3");
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let runner = ProcessRunner::new(Some(Duration::from_millis(100)));
        let err = runner
            .run(Path::new("/bin/sh"), ["-c", "sleep 5"])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_run_missing_binary() {
        let runner = ProcessRunner::new(None);
        let err = runner
            .run(Path::new("/path/to/nowhere/pdftotext"), ["-v"])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Spawn { .. }));
    }
}

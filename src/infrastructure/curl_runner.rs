use crate::application::services::{CommandOutput, CommandRunner};
use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Outputs beyond this are refused rather than buffered.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Failure classes of one subprocess run.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("curl was not found; install curl and make sure it is on your PATH")]
    ToolNotFound,
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
    #[error("curl execution failed: {0}")]
    Execution(String),
}

/// Runs the built invocation through `sh -c`, bounded by the configured
/// wall-clock timeout. The child is killed when the timeout expires.
pub struct CurlRunner;

impl CurlRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurlRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for CurlRunner {
    async fn run(&self, command: &str, timeout_secs: u64) -> Result<CommandOutput, RunnerError> {
        let mut shell = Command::new("sh");
        shell
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), shell.output())
            .await
        {
            Err(_) => return Err(RunnerError::Timeout(timeout_secs)),
            Ok(Err(error)) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(RunnerError::ToolNotFound);
            }
            Ok(Err(error)) => return Err(RunnerError::Execution(error.to_string())),
            Ok(Ok(output)) => output,
        };

        if output.stdout.len() + output.stderr.len() > MAX_OUTPUT_BYTES {
            return Err(RunnerError::Execution(
                "output exceeded the 10 MiB buffer cap".to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!("curl exited with {:?}", output.status.code());

        if !output.status.success() {
            // 127 is the shell's command-not-found exit code.
            if output.status.code() == Some(127) || stderr.contains("command not found") {
                return Err(RunnerError::ToolNotFound);
            }
            let message = if stderr.trim().is_empty() {
                format!("exit status {}", output.status.code().unwrap_or(-1))
            } else {
                stderr.trim().to_string()
            };
            return Err(RunnerError::Execution(message));
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

//! External diagnostic command execution.

use std::future::Future;
use std::time::Duration;

use tokio::process::Command;

use crate::error::{HostwatchError, Result};

/// Default deadline for one command invocation
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs an external program with fixed arguments and returns its stdout
pub trait Executor: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> impl Future<Output = Result<String>> + Send;
}

/// Package to install when a diagnostic tool is missing
pub fn install_hint(program: &str) -> Option<&'static str> {
    match program {
        "sensors" => Some("install lm-sensors and run sensors-detect"),
        "ss" => Some("install iproute2"),
        "top" => Some("install procps"),
        _ => None,
    }
}

/// Executes real binaries found on `PATH`
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    timeout: Duration,
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl SystemExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Executor for SystemExecutor {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let path = which::which(program)
            .map_err(|_| HostwatchError::tool_unavailable(program, install_hint(program)))?;

        log::debug!("Running {} {}", path.display(), args.join(" "));

        let child = Command::new(&path)
            .args(args)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(result) => result
                .map_err(|e| HostwatchError::execution_failed(program, e.to_string()))?,
            Err(_) => {
                return Err(HostwatchError::execution_failed(
                    program,
                    format!("timed out after {:?}", self.timeout),
                ))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HostwatchError::execution_failed(
                program,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

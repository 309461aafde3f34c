//! Command execution primitive for gcu validators.
//!
//! Every external side effect a validator triggers funnels through
//! [`CommandExecutor::execute`]. The production implementation is
//! [`ShellExecutor`]; tests substitute a recording fake.
//!
//! # Example
//!
//! ```ignore
//! use sonic_gcu_common::shell::{CommandExecutor, ShellExecutor};
//!
//! let executor = ShellExecutor::new();
//! let result = executor.execute("systemctl restart dhcp_relay");
//! if !result.success() {
//!     eprintln!("restart failed with code {}", result.exit_code);
//! }
//! ```

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::error::{GcuError, GcuResult};

/// Default shell used to run commands.
pub const SH_CMD: &str = "/bin/sh";

/// Exit code reported when a command could not be spawned or was
/// terminated by a signal.
pub const EXIT_CODE_UNAVAILABLE: i32 = -1;

/// Outcome of running one external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
}

impl CommandResult {
    /// Creates a result from a raw exit code.
    pub fn new(exit_code: i32) -> Self {
        Self { exit_code }
    }

    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<i32> for CommandResult {
    fn from(exit_code: i32) -> Self {
        Self::new(exit_code)
    }
}

/// Runs a single external command and reports its exit status.
///
/// Implementations must not retry or interpret the code.
pub trait CommandExecutor: Send + Sync {
    /// Runs `command` to completion and returns its exit status.
    fn execute(&self, command: &str) -> CommandResult;
}

/// Executor shared between every validator in a registry.
pub type SharedExecutor = Arc<dyn CommandExecutor>;

impl<F> CommandExecutor for F
where
    F: Fn(&str) -> i32 + Send + Sync,
{
    fn execute(&self, command: &str) -> CommandResult {
        CommandResult::new(self(command))
    }
}

/// Executes commands through `/bin/sh -c`, blocking until they exit.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: PathBuf,
}

impl ShellExecutor {
    /// Creates an executor using [`SH_CMD`].
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from(SH_CMD),
        }
    }

    /// Creates an executor using a custom shell.
    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Returns the shell path.
    pub fn shell(&self) -> &PathBuf {
        &self.shell
    }

    /// Runs `cmd`, returning an error only when the process cannot be spawned.
    ///
    /// The child handle is owned by `Command::status`, which waits for the
    /// process, so it is reaped on every path.
    pub fn exec(&self, cmd: &str) -> GcuResult<CommandResult> {
        tracing::debug!(command = %cmd, "Executing shell command");

        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| GcuError::ShellExec {
                command: cmd.to_string(),
                source: e,
            })?;

        let result = CommandResult::new(status.code().unwrap_or(EXIT_CODE_UNAVAILABLE));

        if result.success() {
            tracing::trace!(command = %cmd, "Command succeeded");
        } else {
            tracing::warn!(command = %cmd, exit_code = result.exit_code, "Command failed");
        }

        Ok(result)
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> CommandResult {
        match self.exec(command) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Failed to execute command");
                CommandResult::new(EXIT_CODE_UNAVAILABLE)
            }
        }
    }
}

/// Logs commands instead of running them and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl CommandExecutor for DryRunExecutor {
    fn execute(&self, command: &str) -> CommandResult {
        tracing::info!(command = %command, "Dry run: skipping command");
        CommandResult::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_command_result_success() {
        assert!(CommandResult::new(0).success());
        assert!(!CommandResult::new(1).success());
        assert!(!CommandResult::from(EXIT_CODE_UNAVAILABLE).success());
    }

    #[test]
    fn test_exec_true() {
        let result = ShellExecutor::new().exec("true").unwrap();
        assert!(result.success());
    }

    #[test]
    fn test_exec_exit_code_passthrough() {
        let result = ShellExecutor::new().execute("exit 42");
        assert_eq!(result.exit_code, 42);
    }

    #[test]
    fn test_exec_missing_shell() {
        let executor = ShellExecutor::with_shell("/nonexistent/shell");
        match executor.exec("true") {
            Err(GcuError::ShellExec { command, .. }) => assert_eq!(command, "true"),
            other => panic!("Expected ShellExec error, got {:?}", other),
        }
        assert_eq!(executor.execute("true").exit_code, EXIT_CODE_UNAVAILABLE);
    }

    #[test]
    fn test_dry_run_reports_success() {
        assert!(DryRunExecutor.execute("systemctl restart rsyslog").success());
    }

    #[test]
    fn test_closure_executor() {
        let seen = Mutex::new(Vec::new());
        let executor = |cmd: &str| {
            seen.lock().unwrap().push(cmd.to_string());
            3
        };
        assert_eq!(executor.execute("systemctl restart dhcp_relay").exit_code, 3);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["systemctl restart dhcp_relay".to_string()]
        );
    }
}

//! Fake executors substituted for the shell in tests

use std::collections::VecDeque;
use std::sync::Mutex;

use sonic_gcu_common::{CommandExecutor, CommandResult};

use crate::verification::CommandVerifier;

/// One expected command and the exit code to answer it with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedCall {
    /// Exact command string
    pub cmd: String,
    /// Exit code returned for it
    pub rc: i32,
}

impl ExpectedCall {
    /// Create an expected call
    pub fn new(cmd: impl Into<String>, rc: i32) -> Self {
        Self { cmd: cmd.into(), rc }
    }
}

/// Executor that answers a fixed script of commands in order
///
/// Every call must match the next expected command byte for byte; a
/// mismatch or an unexpected extra call panics with the failing case name.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<ExpectedCall>>,
    calls: Mutex<Vec<String>>,
    case: Mutex<String>,
}

impl ScriptedExecutor {
    /// Create an executor with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an expected command
    pub fn expect(self, cmd: impl Into<String>, rc: i32) -> Self {
        self.push(ExpectedCall::new(cmd, rc));
        self
    }

    /// Append expected commands
    pub fn expect_all<I>(self, calls: I) -> Self
    where
        I: IntoIterator<Item = ExpectedCall>,
    {
        for call in calls {
            self.push(call);
        }
        self
    }

    /// Append an expected command on a shared executor
    pub fn push(&self, call: ExpectedCall) {
        self.script.lock().unwrap().push_back(call);
    }

    /// Label reported when an expectation fails
    pub fn set_case(&self, case: impl Into<String>) {
        *self.case.lock().unwrap() = case.into();
    }

    /// Number of expected commands not yet issued
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    /// Panics if any expected command was never issued
    pub fn assert_exhausted(&self) {
        let script = self.script.lock().unwrap();
        assert!(
            script.is_empty(),
            "case {}: {} expected command(s) not issued: {:?}",
            self.case.lock().unwrap(),
            script.len(),
            script
        );
    }

    /// Commands issued so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifier over the commands issued so far
    pub fn verifier(&self) -> CommandVerifier {
        CommandVerifier::new(self.calls())
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(&self, command: &str) -> CommandResult {
        self.calls.lock().unwrap().push(command.to_string());

        let next = self.script.lock().unwrap().pop_front();
        let case = self.case.lock().unwrap().clone();
        match next {
            Some(expected) => {
                assert_eq!(command, expected.cmd, "case {}: unexpected command", case);
                tracing::debug!(command = %command, rc = expected.rc, "Scripted exec");
                CommandResult::new(expected.rc)
            }
            None => panic!("case {}: unexpected extra command '{}'", case, command),
        }
    }
}

/// Executor that records every command and always returns the same code
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    rc: i32,
    commands: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// Records commands and reports success
    pub fn new() -> Self {
        Self::default()
    }

    /// Records commands and reports `rc`
    pub fn failing_with(rc: i32) -> Self {
        Self {
            rc,
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Commands issued so far
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Forget recorded commands
    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }

    /// Verifier over the commands issued so far
    pub fn verifier(&self) -> CommandVerifier {
        CommandVerifier::new(self.commands())
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&self, command: &str) -> CommandResult {
        self.commands.lock().unwrap().push(command.to_string());
        tracing::debug!(command = %command, rc = self.rc, "Mock exec");
        CommandResult::new(self.rc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripted_executor_replays_codes() {
        let executor = ScriptedExecutor::new()
            .expect("systemctl restart rsyslog", 1)
            .expect("systemctl reset-failed rsyslog", 0);

        assert_eq!(executor.execute("systemctl restart rsyslog").exit_code, 1);
        assert_eq!(executor.remaining(), 1);
        assert!(executor.execute("systemctl reset-failed rsyslog").success());
        executor.assert_exhausted();
        assert_eq!(executor.calls().len(), 2);
    }

    #[test]
    #[should_panic(expected = "unexpected command")]
    fn test_scripted_executor_rejects_wrong_command() {
        let executor = ScriptedExecutor::new().expect("systemctl restart dhcp_relay", 0);
        executor.execute("systemctl restart rsyslog");
    }

    #[test]
    #[should_panic(expected = "unexpected extra command")]
    fn test_scripted_executor_rejects_extra_command() {
        let executor = ScriptedExecutor::new();
        executor.set_case("empty");
        executor.execute("systemctl restart dhcp_relay");
    }

    #[test]
    #[should_panic(expected = "not issued")]
    fn test_scripted_executor_unused_expectation() {
        ScriptedExecutor::new()
            .expect("/usr/bin/rsyslog-config.sh", 0)
            .assert_exhausted();
    }

    #[test]
    fn test_recording_executor() {
        let executor = RecordingExecutor::failing_with(4);
        assert_eq!(executor.execute("systemctl restart ntp").exit_code, 4);
        assert_eq!(executor.commands(), vec!["systemctl restart ntp"]);
        executor.clear();
        assert!(executor.commands().is_empty());
        assert!(RecordingExecutor::new().execute("true").success());
    }
}

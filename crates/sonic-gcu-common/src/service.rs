//! Service actions and the restart protocol built on top of the executor.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::error::{GcuError, GcuResult};
use crate::shell::{CommandExecutor, CommandResult};

/// Path to `systemctl`, invoked through the shell's `PATH` lookup.
pub const SYSTEMCTL_CMD: &str = "systemctl";

/// Restart attempts made by [`ServiceRestarter`] before giving up.
pub const DEFAULT_RESTART_ATTEMPTS: u32 = 3;

/// Characters accepted in systemd unit names.
static UNIT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@._:-]+$").expect("Invalid regex pattern"));

/// Returns true if `unit` is safe to splice into a `systemctl` command line.
pub fn is_valid_unit_name(unit: &str) -> bool {
    UNIT_NAME_RE.is_match(unit)
}

/// A side effect a validator may decide on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceAction {
    /// Run a config regeneration script.
    GenerateConfig(String),
    /// `systemctl restart <unit>`.
    Restart(String),
    /// `systemctl reset-failed <unit>`.
    ResetFailed(String),
    /// Nothing to do.
    NoOp,
}

impl ServiceAction {
    /// Renders the command line for this action, `None` for [`ServiceAction::NoOp`].
    pub fn command(&self) -> Option<String> {
        match self {
            ServiceAction::GenerateConfig(script) => Some(script.clone()),
            ServiceAction::Restart(unit) => Some(format!("{} restart {}", SYSTEMCTL_CMD, unit)),
            ServiceAction::ResetFailed(unit) => {
                Some(format!("{} reset-failed {}", SYSTEMCTL_CMD, unit))
            }
            ServiceAction::NoOp => None,
        }
    }

    /// Runs the action through `executor`. A no-op always succeeds without
    /// touching the executor.
    pub fn run(&self, executor: &dyn CommandExecutor) -> CommandResult {
        match self.command() {
            Some(cmd) => executor.execute(&cmd),
            None => CommandResult::new(0),
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command() {
            Some(cmd) => f.write_str(&cmd),
            None => f.write_str("no-op"),
        }
    }
}

/// Restarts a systemd unit, clearing its failed latch and retrying when the
/// first restart fails.
///
/// Command sequence for `attempts = 3`:
///
/// 1. `systemctl restart <unit>`
/// 2. `systemctl reset-failed <unit>` (result ignored)
/// 3. `systemctl restart <unit>`
/// 4. `systemctl restart <unit>`
///
/// The sequence stops at the first successful restart. With a single
/// attempt there is nothing to retry, so no reset-failed is issued.
#[derive(Debug, Clone)]
pub struct ServiceRestarter {
    unit: String,
    attempts: u32,
}

impl ServiceRestarter {
    /// Creates a restarter for `unit` with [`DEFAULT_RESTART_ATTEMPTS`].
    pub fn new(unit: impl Into<String>) -> GcuResult<Self> {
        let unit = unit.into();
        if !is_valid_unit_name(&unit) {
            return Err(GcuError::InvalidUnitName { unit });
        }
        Ok(Self {
            unit,
            attempts: DEFAULT_RESTART_ATTEMPTS,
        })
    }

    /// Sets the total number of restart attempts (at least one).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Returns the unit name.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the total number of restart attempts.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Runs the restart protocol.
    #[instrument(skip(self, executor), fields(unit = %self.unit))]
    pub fn restart(&self, executor: &dyn CommandExecutor) -> GcuResult<()> {
        let restart = ServiceAction::Restart(self.unit.clone());

        let mut result = restart.run(executor);
        if result.success() {
            info!("Restarted {}", self.unit);
            return Ok(());
        }

        warn!("Restart of {} failed with rc={}", self.unit, result.exit_code);

        if self.attempts > 1 {
            // Too many restarts trip the unit's start limit; clear it first
            let reset = ServiceAction::ResetFailed(self.unit.clone()).run(executor);
            if !reset.success() {
                warn!(
                    "reset-failed for {} returned rc={}, continuing",
                    self.unit, reset.exit_code
                );
            }
        }

        for attempt in 2..=self.attempts {
            result = restart.run(executor);
            if result.success() {
                info!("Restarted {} on attempt {}", self.unit, attempt);
                return Ok(());
            }
            warn!(
                "Restart attempt {} of {} for {} failed with rc={}",
                attempt, self.attempts, self.unit, result.exit_code
            );
        }

        error!(
            "Giving up on {} after {} restart attempts",
            self.unit, self.attempts
        );
        Err(GcuError::service_restart(
            &self.unit,
            self.attempts,
            result.exit_code,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed list of return codes and records every command.
    struct Replay {
        codes: Mutex<VecDeque<i32>>,
        calls: Mutex<Vec<String>>,
    }

    impl Replay {
        fn new(codes: &[i32]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().copied().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandExecutor for Replay {
        fn execute(&self, command: &str) -> CommandResult {
            self.calls.lock().unwrap().push(command.to_string());
            CommandResult::new(self.codes.lock().unwrap().pop_front().unwrap_or(0))
        }
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(
            ServiceAction::Restart("dhcp_relay".into()).command().unwrap(),
            "systemctl restart dhcp_relay"
        );
        assert_eq!(
            ServiceAction::ResetFailed("rsyslog".into()).command().unwrap(),
            "systemctl reset-failed rsyslog"
        );
        assert_eq!(
            ServiceAction::GenerateConfig("/usr/bin/rsyslog-config.sh".into())
                .command()
                .unwrap(),
            "/usr/bin/rsyslog-config.sh"
        );
        assert_eq!(ServiceAction::NoOp.command(), None);
        assert_eq!(ServiceAction::NoOp.to_string(), "no-op");
    }

    #[test]
    fn test_noop_does_not_execute() {
        let replay = Replay::new(&[1]);
        assert!(ServiceAction::NoOp.run(&replay).success());
        assert!(replay.calls().is_empty());
    }

    #[test]
    fn test_unit_name_validation() {
        assert!(is_valid_unit_name("rsyslog"));
        assert!(is_valid_unit_name("dhcp_relay"));
        assert!(is_valid_unit_name("getty@tty1.service"));
        assert!(!is_valid_unit_name(""));
        assert!(!is_valid_unit_name("rsyslog; reboot"));
        assert!(matches!(
            ServiceRestarter::new("a b"),
            Err(GcuError::InvalidUnitName { .. })
        ));
    }

    #[test]
    fn test_restart_first_try() {
        let replay = Replay::new(&[0]);
        let restarter = ServiceRestarter::new("rsyslog").unwrap();
        restarter.restart(&replay).unwrap();
        assert_eq!(replay.calls(), vec!["systemctl restart rsyslog"]);
    }

    #[test]
    fn test_restart_exhausted() {
        let replay = Replay::new(&[1, 1, 1, 1]);
        let restarter = ServiceRestarter::new("rsyslog").unwrap();
        match restarter.restart(&replay) {
            Err(GcuError::ServiceRestart {
                service, attempts, ..
            }) => {
                assert_eq!(service, "rsyslog");
                assert_eq!(attempts, 3);
            }
            other => panic!("Expected ServiceRestart error, got {:?}", other),
        }
        assert_eq!(
            replay.calls(),
            vec![
                "systemctl restart rsyslog",
                "systemctl reset-failed rsyslog",
                "systemctl restart rsyslog",
                "systemctl restart rsyslog",
            ]
        );
    }

    #[test]
    fn test_single_attempt_skips_reset() {
        let replay = Replay::new(&[5, 0]);
        let restarter = ServiceRestarter::new("ntp").unwrap().with_attempts(0);
        assert_eq!(restarter.attempts(), 1);
        let err = restarter.restart(&replay).unwrap_err();
        assert!(matches!(err, GcuError::ServiceRestart { exit_code: 5, .. }));
        assert_eq!(replay.calls(), vec!["systemctl restart ntp"]);
    }
}

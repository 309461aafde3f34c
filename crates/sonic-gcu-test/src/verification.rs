//! Verification helpers for testing service validators
//!
//! Provides assertion helpers over the commands a validator issued

use thiserror::Error;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected command '{expected}' not executed; got {actual:?}")]
    CommandMissing {
        expected: String,
        actual: Vec<String>,
    },

    #[error("Command '{command}' was executed but should not have been")]
    UnexpectedCommand { command: String },

    #[error("Expected {expected} commands, found {actual}")]
    CommandCountMismatch { expected: usize, actual: usize },

    #[error("Command sequence mismatch: expected {expected:?}, got {actual:?}")]
    SequenceMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Command execution verifier
pub struct CommandVerifier {
    captured_commands: Vec<String>,
}

impl CommandVerifier {
    /// Create a new command verifier
    pub fn new(captured_commands: Vec<String>) -> Self {
        Self { captured_commands }
    }

    /// Verify that a specific command was executed (exact match)
    pub fn assert_command_executed(&self, expected: &str) -> VerifyResult<()> {
        if self.captured_commands.iter().any(|cmd| cmd == expected) {
            Ok(())
        } else {
            Err(VerificationError::CommandMissing {
                expected: expected.to_string(),
                actual: self.captured_commands.clone(),
            })
        }
    }

    /// Verify that a command was NOT executed (exact match)
    pub fn assert_command_not_executed(&self, command: &str) -> VerifyResult<()> {
        if self.captured_commands.iter().any(|cmd| cmd == command) {
            Err(VerificationError::UnexpectedCommand {
                command: command.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Verify how many times a command was executed
    pub fn assert_command_times(&self, command: &str, expected: usize) -> VerifyResult<()> {
        let actual = self
            .captured_commands
            .iter()
            .filter(|cmd| *cmd == command)
            .count();
        if actual != expected {
            Err(VerificationError::CommandCountMismatch { expected, actual })
        } else {
            Ok(())
        }
    }

    /// Verify the number of commands executed
    pub fn assert_command_count(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.captured_commands.len();
        if actual != expected {
            Err(VerificationError::CommandCountMismatch { expected, actual })
        } else {
            Ok(())
        }
    }

    /// Verify the exact ordered command sequence
    pub fn assert_sequence(&self, expected: &[&str]) -> VerifyResult<()> {
        if self.captured_commands.iter().map(String::as_str).eq(expected.iter().copied()) {
            Ok(())
        } else {
            Err(VerificationError::SequenceMismatch {
                expected: expected.iter().map(|s| s.to_string()).collect(),
                actual: self.captured_commands.clone(),
            })
        }
    }

    /// Get all captured commands
    pub fn captured_commands(&self) -> &[String] {
        &self.captured_commands
    }
}

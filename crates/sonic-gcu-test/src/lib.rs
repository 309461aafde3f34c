//! Test infrastructure for generic config updater service validators
//!
//! Provides:
//! - Fake executors that script or record command execution
//! - CONFIG_DB snapshot fixtures and scenario tables
//! - Command verification helpers

mod executor;
pub mod fixtures;
mod verification;

pub use executor::{ExpectedCall, RecordingExecutor, ScriptedExecutor};
pub use fixtures::*;
pub use verification::*;

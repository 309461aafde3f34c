//! Common infrastructure for SONiC generic config updater (GCU) validators.
//!
//! This crate provides the pieces every service validator shares:
//!
//! - [`shell`]: the command executor, the single choke point for external effects
//! - [`service`]: service actions and the restart/reset-failed/retry protocol
//! - [`error`]: error types for validator operations
//!
//! # Example
//!
//! ```ignore
//! use sonic_gcu_common::{ServiceRestarter, ShellExecutor};
//!
//! let executor = ShellExecutor::new();
//! ServiceRestarter::new("rsyslog")?.restart(&executor)?;
//! ```

pub mod error;
pub mod service;
pub mod shell;

// Re-export commonly used items at crate root
pub use error::{GcuError, GcuResult};
pub use service::{ServiceAction, ServiceRestarter};
pub use shell::{CommandExecutor, CommandResult, DryRunExecutor, SharedExecutor, ShellExecutor};

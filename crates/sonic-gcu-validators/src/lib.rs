//! gcu-service-validator - service validators for the SONiC generic config updater
//!
//! Compares consecutive CONFIG_DB snapshots produced by the config update
//! engine and runs the service side effects each change requires
//! (dhcp_relay restart, rsyslog regeneration and restart).

mod registry;
mod rsyslog_validator;
pub mod snapshot;
pub mod tables;
mod validator;
mod vlan_validator;

pub use registry::{ApplyReport, ValidatorOutcome, ValidatorRegistry};
pub use rsyslog_validator::RsyslogValidator;
pub use snapshot::{ConfigSnapshot, FieldMap, Table};
pub use validator::{ChangeContext, ServiceValidator};
pub use vlan_validator::{changed_dhcp_vlans, VlanValidator};

//! RsyslogValidator - regenerates rsyslog.conf and restarts rsyslog
//!
//! Protocol, strictly in this order:
//!
//! 1. `/usr/bin/rsyslog-config.sh`; failure is terminal
//! 2. `systemctl restart rsyslog`
//! 3. on failure, `systemctl reset-failed rsyslog` (result only logged)
//! 4. `systemctl restart rsyslog`, up to two more times

use tracing::{debug, error, info, instrument};

use sonic_gcu_common::{GcuError, GcuResult, ServiceAction, ServiceRestarter, SharedExecutor};

use crate::snapshot::{table_changed, ConfigSnapshot};
use crate::tables::{
    services, CFG_SYSLOG_CONFIG_FEATURE_TABLE_NAME, CFG_SYSLOG_CONFIG_TABLE_NAME,
    CFG_SYSLOG_SERVER_TABLE_NAME, RSYSLOG_CONFIG_SCRIPT,
};
use crate::validator::{ChangeContext, ServiceValidator};

const SYSLOG_TABLES: &[&str] = &[
    CFG_SYSLOG_SERVER_TABLE_NAME,
    CFG_SYSLOG_CONFIG_TABLE_NAME,
    CFG_SYSLOG_CONFIG_FEATURE_TABLE_NAME,
];

/// RsyslogValidator watches the syslog tables
pub struct RsyslogValidator {
    executor: SharedExecutor,
    config_script: String,
    restarter: ServiceRestarter,
}

impl RsyslogValidator {
    /// Creates a new RsyslogValidator using `executor` for side effects
    pub fn new(executor: SharedExecutor) -> GcuResult<Self> {
        Ok(Self {
            executor,
            config_script: RSYSLOG_CONFIG_SCRIPT.to_string(),
            restarter: ServiceRestarter::new(services::RSYSLOG)?,
        })
    }

    /// Overrides the config regeneration script
    pub fn with_config_script(mut self, script: impl Into<String>) -> Self {
        self.config_script = script.into();
        self
    }

    /// Returns the config regeneration script
    pub fn config_script(&self) -> &str {
        &self.config_script
    }

    /// Returns true if any syslog table differs between the snapshots
    pub fn needs_regeneration(old: &ConfigSnapshot, new: &ConfigSnapshot) -> bool {
        SYSLOG_TABLES.iter().any(|table| table_changed(old, new, table))
    }

    /// Regenerates the config and restarts rsyslog, unconditionally
    #[instrument(skip(self))]
    pub fn run_protocol(&self) -> GcuResult<()> {
        let generate = ServiceAction::GenerateConfig(self.config_script.clone());
        let result = generate.run(&*self.executor);
        if !result.success() {
            // A broken rsyslog.conf must not be loaded
            error!(
                "{} failed with rc={}, not restarting rsyslog",
                self.config_script, result.exit_code
            );
            return Err(GcuError::config_generation(
                &self.config_script,
                result.exit_code,
            ));
        }

        self.restarter.restart(&*self.executor)?;
        info!("rsyslog reloaded");
        Ok(())
    }
}

impl ServiceValidator for RsyslogValidator {
    fn name(&self) -> &str {
        "rsyslog"
    }

    fn tables(&self) -> &[&str] {
        SYSLOG_TABLES
    }

    #[instrument(skip_all, fields(validator = "rsyslog"))]
    fn validate(
        &self,
        old: &ConfigSnapshot,
        new: &ConfigSnapshot,
        _context: &ChangeContext,
    ) -> GcuResult<()> {
        if !Self::needs_regeneration(old, new) {
            debug!("No syslog changes");
            return Ok(());
        }

        self.run_protocol()
    }
}

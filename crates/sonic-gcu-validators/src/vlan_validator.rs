//! VlanValidator - restarts dhcp_relay when VLAN DHCP server lists change

use std::collections::BTreeSet;
use tracing::{debug, error, info, instrument};

use sonic_gcu_common::{GcuError, GcuResult, ServiceAction, SharedExecutor};

use crate::snapshot::{list_field, ConfigSnapshot};
use crate::tables::{fields, services, CFG_VLAN_TABLE_NAME};
use crate::validator::{ChangeContext, ServiceValidator};

/// Returns the VLAN keys whose `dhcp_servers` list differs between snapshots.
///
/// Lists compare in order, so a reordering is a change. A missing entry and a
/// missing field both read as an empty list.
pub fn changed_dhcp_vlans(old: &ConfigSnapshot, new: &ConfigSnapshot) -> Vec<String> {
    let old_vlans = old.table_or_empty(CFG_VLAN_TABLE_NAME);
    let new_vlans = new.table_or_empty(CFG_VLAN_TABLE_NAME);

    let keys: BTreeSet<&String> = old_vlans.keys().chain(new_vlans.keys()).collect();

    keys.into_iter()
        .filter(|key| {
            list_field(old_vlans.get(*key), fields::DHCP_SERVERS)
                != list_field(new_vlans.get(*key), fields::DHCP_SERVERS)
        })
        .cloned()
        .collect()
}

/// VlanValidator watches the VLAN table
///
/// The DHCP relay agent reads its server list at startup, so any change to a
/// VLAN's `dhcp_servers` needs one `systemctl restart dhcp_relay`, no matter
/// how many VLANs changed.
pub struct VlanValidator {
    executor: SharedExecutor,
}

impl VlanValidator {
    /// Creates a new VlanValidator using `executor` for side effects
    pub fn new(executor: SharedExecutor) -> Self {
        Self { executor }
    }
}

impl ServiceValidator for VlanValidator {
    fn name(&self) -> &str {
        "vlan"
    }

    fn tables(&self) -> &[&str] {
        &[CFG_VLAN_TABLE_NAME]
    }

    #[instrument(skip_all, fields(validator = "vlan"))]
    fn validate(
        &self,
        old: &ConfigSnapshot,
        new: &ConfigSnapshot,
        _context: &ChangeContext,
    ) -> GcuResult<()> {
        let changed = changed_dhcp_vlans(old, new);
        if changed.is_empty() {
            debug!("No DHCP server changes");
            return Ok(());
        }

        info!("DHCP servers changed on {:?}, restarting dhcp_relay", changed);

        let result = ServiceAction::Restart(services::DHCP_RELAY.to_string())
            .run(&*self.executor);
        if !result.success() {
            error!("dhcp_relay restart failed with rc={}", result.exit_code);
            return Err(GcuError::service_restart(
                services::DHCP_RELAY,
                1,
                result.exit_code,
            ));
        }

        Ok(())
    }
}

//! Test fixtures for common config update patterns
//!
//! Snapshots are built as CONFIG_DB JSON values so any crate can
//! deserialize them into its own snapshot type.

use serde_json::{Map, Value};

/// Configuration change operation type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOp {
    /// SET operation (add or update)
    Set,
    /// DEL operation (delete)
    Del,
}

/// Represents a CONFIG_DB change applied to a snapshot
#[derive(Debug, Clone)]
pub struct ConfigChange {
    /// Table name (e.g., "VLAN", "SYSLOG_SERVER")
    pub table: String,
    /// Key within the table
    pub key: String,
    /// Operation type
    pub op: ConfigOp,
    /// Field-value pairs (for SET operations)
    pub fields: Map<String, Value>,
}

impl ConfigChange {
    /// Create a SET operation
    pub fn set(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key: key.into(),
            op: ConfigOp::Set,
            fields: Map::new(),
        }
    }

    /// Create a DEL operation
    pub fn del(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key: key.into(),
            op: ConfigOp::Del,
            fields: Map::new(),
        }
    }

    /// Add a scalar field to a SET operation
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(field.into(), Value::String(value.into()));
        self
    }

    /// Add a list field to a SET operation
    pub fn with_list<I, S>(mut self, field: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|item| Value::String(item.into()))
            .collect();
        self.fields.insert(field.into(), Value::Array(items));
        self
    }

    /// Apply this change to a CONFIG_DB JSON document
    ///
    /// SET replaces the whole entry, DEL removes it and drops the table
    /// once it is empty.
    pub fn apply_to(&self, db: &mut Value) {
        if !db.is_object() {
            *db = Value::Object(Map::new());
        }
        let Some(tables) = db.as_object_mut() else {
            return;
        };

        match self.op {
            ConfigOp::Set => {
                let table = tables
                    .entry(self.table.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Some(entries) = table.as_object_mut() {
                    entries.insert(self.key.clone(), Value::Object(self.fields.clone()));
                }
            }
            ConfigOp::Del => {
                let now_empty = match tables.get_mut(&self.table).and_then(Value::as_object_mut) {
                    Some(entries) => {
                        entries.remove(&self.key);
                        entries.is_empty()
                    }
                    None => false,
                };
                if now_empty {
                    tables.remove(&self.table);
                }
            }
        }
    }
}

/// Build a CONFIG_DB document from a sequence of changes
pub fn config_db<I>(changes: I) -> Value
where
    I: IntoIterator<Item = ConfigChange>,
{
    let mut db = Value::Object(Map::new());
    for change in changes {
        change.apply_to(&mut db);
    }
    db
}

/// Common VLAN / DHCP relay fixtures
pub mod vlan_fixtures {
    use super::*;

    /// VLAN entry with a DHCP server list
    pub fn vlan_with_dhcp(key: &str, servers: &[&str]) -> ConfigChange {
        ConfigChange::set("VLAN", key).with_list("dhcp_servers", servers.iter().copied())
    }

    /// VLAN entry without DHCP servers
    pub fn vlan(vlan_id: u16) -> ConfigChange {
        ConfigChange::set("VLAN", format!("Vlan{}", vlan_id))
            .with_field("vlanid", vlan_id.to_string())
    }

    /// Delete VLAN
    pub fn delete_vlan(key: &str) -> ConfigChange {
        ConfigChange::del("VLAN", key)
    }
}

/// Common syslog fixtures
pub mod syslog_fixtures {
    use super::*;

    /// Remote syslog server
    pub fn syslog_server(ip: &str) -> ConfigChange {
        ConfigChange::set("SYSLOG_SERVER", ip).with_field("port", "514")
    }

    /// Global syslog settings
    pub fn syslog_global(format: &str) -> ConfigChange {
        ConfigChange::set("SYSLOG_CONFIG", "GLOBAL").with_field("format", format)
    }

    /// Delete a remote syslog server
    pub fn delete_syslog_server(ip: &str) -> ConfigChange {
        ConfigChange::del("SYSLOG_SERVER", ip)
    }
}

/// One (old, new) pair and the commands it must produce, in order
#[derive(Debug, Clone)]
pub struct TestScenario {
    /// Scenario name
    pub name: String,
    /// Snapshot before the change
    pub old: Value,
    /// Snapshot after the change
    pub new: Value,
    /// Expected commands
    pub expected_commands: Vec<String>,
}

impl TestScenario {
    /// Create a scenario with empty snapshots and no expected commands
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            old: Value::Object(Map::new()),
            new: Value::Object(Map::new()),
            expected_commands: Vec::new(),
        }
    }

    /// Set the old snapshot
    pub fn old(mut self, old: Value) -> Self {
        self.old = old;
        self
    }

    /// Set the new snapshot
    pub fn new_config(mut self, new: Value) -> Self {
        self.new = new;
        self
    }

    /// Add an expected command
    pub fn expect_command(mut self, cmd: impl Into<String>) -> Self {
        self.expected_commands.push(cmd.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_config_change_set() {
        let change = ConfigChange::set("VLAN", "Vlan100")
            .with_field("vlanid", "100")
            .with_list("dhcp_servers", ["10.0.0.1", "10.0.0.2"]);

        assert_eq!(change.op, ConfigOp::Set);
        assert_eq!(change.fields.len(), 2);
        assert_eq!(
            change.fields.get("dhcp_servers"),
            Some(&json!(["10.0.0.1", "10.0.0.2"]))
        );
    }

    #[test]
    fn test_config_db_builder() {
        let db = config_db([
            vlan_fixtures::vlan_with_dhcp("XXX", &["10.10.10.10"]),
            syslog_fixtures::syslog_server("10.0.0.5"),
        ]);
        assert_eq!(
            db,
            json!({
                "VLAN": { "XXX": { "dhcp_servers": ["10.10.10.10"] } },
                "SYSLOG_SERVER": { "10.0.0.5": { "port": "514" } }
            })
        );
    }

    #[test]
    fn test_delete_drops_empty_table() {
        let db = config_db([
            vlan_fixtures::vlan(100),
            vlan_fixtures::delete_vlan("Vlan100"),
            vlan_fixtures::delete_vlan("Vlan200"),
        ]);
        assert_eq!(db, json!({}));
    }

    #[test]
    fn test_scenario_builder() {
        let scenario = TestScenario::new("server changed")
            .old(config_db([vlan_fixtures::vlan_with_dhcp("XXX", &["10.10.10.10"])]))
            .new_config(config_db([vlan_fixtures::vlan_with_dhcp("XXX", &["10.10.10.11"])]))
            .expect_command("systemctl restart dhcp_relay");

        assert_eq!(scenario.name, "server changed");
        assert_eq!(scenario.expected_commands.len(), 1);
        assert_ne!(scenario.old, scenario.new);
    }
}

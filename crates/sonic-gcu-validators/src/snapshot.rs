//! CONFIG_DB snapshot model.
//!
//! A snapshot is the CONFIG_DB JSON layout: table name → key → field → value.
//! Values stay as generic JSON so list fields such as `dhcp_servers` keep
//! their order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use sonic_gcu_common::{GcuError, GcuResult};

/// Field name → value for one table entry.
pub type FieldMap = BTreeMap<String, Value>;

/// Key → entry for one table.
pub type Table = BTreeMap<String, FieldMap>;

static EMPTY_TABLE: Table = BTreeMap::new();

/// Full configuration database contents at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
    tables: BTreeMap<String, Table>,
}

impl ConfigSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from CONFIG_DB JSON.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Parses a snapshot from YAML with the same layout.
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    /// Loads a snapshot from a file. `.yaml`/`.yml` files are parsed as YAML,
    /// anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> GcuResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GcuError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );

        if is_yaml {
            Self::from_yaml_str(&content)
                .map_err(|e| GcuError::invalid_snapshot(path, e.to_string()))
        } else {
            Self::from_json_str(&content)
                .map_err(|e| GcuError::invalid_snapshot(path, e.to_string()))
        }
    }

    /// Returns a table, if present.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns a table, treating an absent table as empty.
    pub fn table_or_empty(&self, name: &str) -> &Table {
        self.tables.get(name).unwrap_or(&EMPTY_TABLE)
    }

    /// Returns an entry within a table.
    pub fn entry(&self, table: &str, key: &str) -> Option<&FieldMap> {
        self.table(table)?.get(key)
    }

    /// Inserts or replaces an entry.
    pub fn set_entry(&mut self, table: impl Into<String>, key: impl Into<String>, fields: FieldMap) {
        self.tables
            .entry(table.into())
            .or_default()
            .insert(key.into(), fields);
    }

    /// Removes an entry, dropping the table once it is empty.
    pub fn remove_entry(&mut self, table: &str, key: &str) -> Option<FieldMap> {
        let entries = self.tables.get_mut(table)?;
        let removed = entries.remove(key);
        if entries.is_empty() {
            self.tables.remove(table);
        }
        removed
    }

    /// Returns the table names in the snapshot.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Returns true if the snapshot has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Returns a list-valued field as an ordered slice.
///
/// An absent field or `null` reads as an empty list. A scalar reads as a
/// one-element list so it still compares by value.
pub fn list_field<'a>(entry: Option<&'a FieldMap>, field: &str) -> &'a [Value] {
    match entry.and_then(|fields| fields.get(field)) {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => std::slice::from_ref(other),
    }
}

/// Returns true if `table` differs between the two snapshots, absent tables
/// counting as empty.
pub fn table_changed(old: &ConfigSnapshot, new: &ConfigSnapshot, table: &str) -> bool {
    old.table_or_empty(table) != new.table_or_empty(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn snapshot(value: Value) -> ConfigSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_config_db_json() {
        let snap = ConfigSnapshot::from_json_str(
            r#"{ "VLAN": { "Vlan1000": { "vlanid": "1000", "dhcp_servers": ["192.0.0.1"] } } }"#,
        )
        .unwrap();

        let entry = snap.entry("VLAN", "Vlan1000").unwrap();
        assert_eq!(entry.get("vlanid"), Some(&json!("1000")));
        assert_eq!(list_field(Some(entry), "dhcp_servers"), &[json!("192.0.0.1")]);
    }

    #[test]
    fn test_parse_yaml() {
        let snap = ConfigSnapshot::from_yaml_str(
            "SYSLOG_SERVER:\n  10.0.0.5:\n    port: \"514\"\n",
        )
        .unwrap();
        assert_eq!(
            snap.entry("SYSLOG_SERVER", "10.0.0.5").unwrap().get("port"),
            Some(&json!("514"))
        );
    }

    #[test]
    fn test_absent_table_is_empty() {
        let snap = ConfigSnapshot::new();
        assert!(snap.table("VLAN").is_none());
        assert!(snap.table_or_empty("VLAN").is_empty());
        assert!(snap.is_empty());
    }

    #[test]
    fn test_list_field_shapes() {
        let snap = snapshot(json!({
            "VLAN": {
                "A": { "dhcp_servers": null },
                "B": { "dhcp_servers": "10.0.0.1" },
                "C": {}
            }
        }));
        assert!(list_field(snap.entry("VLAN", "A"), "dhcp_servers").is_empty());
        assert_eq!(
            list_field(snap.entry("VLAN", "B"), "dhcp_servers"),
            &[json!("10.0.0.1")]
        );
        assert!(list_field(snap.entry("VLAN", "C"), "dhcp_servers").is_empty());
        assert!(list_field(None, "dhcp_servers").is_empty());
    }

    #[test]
    fn test_set_and_remove_entry() {
        let mut snap = ConfigSnapshot::new();
        let mut fields = FieldMap::new();
        fields.insert("port".to_string(), json!("514"));
        snap.set_entry("SYSLOG_SERVER", "10.0.0.5", fields);
        assert_eq!(snap.table_names().collect::<Vec<_>>(), vec!["SYSLOG_SERVER"]);

        assert!(snap.remove_entry("SYSLOG_SERVER", "10.0.0.5").is_some());
        assert!(snap.is_empty());
        assert!(snap.remove_entry("SYSLOG_SERVER", "10.0.0.5").is_none());
    }

    #[test]
    fn test_table_changed() {
        let old = snapshot(json!({ "SYSLOG_CONFIG": {} }));
        let new = ConfigSnapshot::new();
        assert!(!table_changed(&old, &new, "SYSLOG_CONFIG"));

        let new = snapshot(json!({ "SYSLOG_CONFIG": { "GLOBAL": { "format": "welf" } } }));
        assert!(table_changed(&old, &new, "SYSLOG_CONFIG"));
    }

    #[test]
    fn test_round_trip_layout() {
        let value = json!({ "VLAN": { "Vlan10": { "dhcp_servers": ["a", "b"] } } });
        let snap = snapshot(value.clone());
        assert_eq!(serde_json::to_value(&snap).unwrap(), value);
    }
}

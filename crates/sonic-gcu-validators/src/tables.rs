//! Table, field and command constants for the service validators

/// CONFIG_DB VLAN table name
pub const CFG_VLAN_TABLE_NAME: &str = "VLAN";

/// CONFIG_DB SYSLOG_SERVER table name
pub const CFG_SYSLOG_SERVER_TABLE_NAME: &str = "SYSLOG_SERVER";

/// CONFIG_DB SYSLOG_CONFIG table name
pub const CFG_SYSLOG_CONFIG_TABLE_NAME: &str = "SYSLOG_CONFIG";

/// CONFIG_DB SYSLOG_CONFIG_FEATURE table name
pub const CFG_SYSLOG_CONFIG_FEATURE_TABLE_NAME: &str = "SYSLOG_CONFIG_FEATURE";

/// Field names
pub mod fields {
    /// DHCP relay server list on a VLAN entry
    pub const DHCP_SERVERS: &str = "dhcp_servers";
}

/// systemd unit names
pub mod services {
    /// DHCP relay container service
    pub const DHCP_RELAY: &str = "dhcp_relay";

    /// rsyslog daemon
    pub const RSYSLOG: &str = "rsyslog";
}

/// Script regenerating /etc/rsyslog.conf from CONFIG_DB
pub const RSYSLOG_CONFIG_SCRIPT: &str = "/usr/bin/rsyslog-config.sh";

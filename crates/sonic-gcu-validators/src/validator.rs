//! The validator capability shared by every config domain.

use serde_json::Value;

use sonic_gcu_common::GcuResult;

use crate::snapshot::ConfigSnapshot;

/// Metadata the orchestration engine passes alongside a snapshot pair.
///
/// Validators carry it through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeContext(Value);

impl ChangeContext {
    /// Wraps engine-defined metadata.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the wrapped metadata.
    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// Decides whether a config change needs a service side effect, and applies it.
///
/// `validate` must not issue any command when the validator's tables are
/// identical between `old` and `new`.
pub trait ServiceValidator: Send + Sync {
    /// Returns the registry name (e.g., "vlan", "rsyslog").
    fn name(&self) -> &str;

    /// Returns the CONFIG_DB tables this validator inspects.
    fn tables(&self) -> &[&str];

    /// Compares the snapshots and runs whatever service action is needed.
    ///
    /// `Ok(())` means either nothing was needed or the action succeeded.
    fn validate(
        &self,
        old: &ConfigSnapshot,
        new: &ConfigSnapshot,
        context: &ChangeContext,
    ) -> GcuResult<()>;
}

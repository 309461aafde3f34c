//! Validator registry: domain name → validator.
//!
//! The config update engine calls [`ValidatorRegistry::validate_all`] once per
//! apply step. Validators run one after another in registration order.

use tracing::{error, info, instrument, warn};

use sonic_gcu_common::{GcuError, GcuResult, SharedExecutor};

use crate::rsyslog_validator::RsyslogValidator;
use crate::snapshot::ConfigSnapshot;
use crate::validator::{ChangeContext, ServiceValidator};
use crate::vlan_validator::VlanValidator;

/// Outcome of one validator within an apply step.
#[derive(Debug)]
pub struct ValidatorOutcome {
    /// Registry name of the validator.
    pub name: String,
    /// What the validator reported.
    pub result: GcuResult<()>,
}

/// Outcomes of every validator run during one apply step.
#[derive(Debug, Default)]
pub struct ApplyReport {
    outcomes: Vec<ValidatorOutcome>,
}

impl ApplyReport {
    /// Returns true if every validator succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Returns the outcomes in execution order.
    pub fn outcomes(&self) -> &[ValidatorOutcome] {
        &self.outcomes
    }

    /// Returns `(validator name, error)` for every failed validator.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &GcuError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(()) => None,
            Err(e) => Some((o.name.as_str(), e)),
        })
    }

    fn push(&mut self, name: &str, result: GcuResult<()>) {
        self.outcomes.push(ValidatorOutcome {
            name: name.to_string(),
            result,
        });
    }
}

/// Ordered set of service validators.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn ServiceValidator>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in validators (`vlan`, `rsyslog`),
    /// all sharing `executor`.
    pub fn with_defaults(executor: SharedExecutor) -> GcuResult<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(VlanValidator::new(executor.clone())));
        registry.register(Box::new(RsyslogValidator::new(executor)?));
        Ok(registry)
    }

    /// Adds a validator, replacing any existing one with the same name in place.
    pub fn register(&mut self, validator: Box<dyn ServiceValidator>) {
        match self
            .validators
            .iter_mut()
            .find(|v| v.name() == validator.name())
        {
            Some(slot) => {
                warn!("Replacing validator {}", validator.name());
                *slot = validator;
            }
            None => self.validators.push(validator),
        }
    }

    /// Returns a validator by name.
    pub fn get(&self, name: &str) -> Option<&dyn ServiceValidator> {
        self.validators
            .iter()
            .find(|v| v.name() == name)
            .map(|v| &**v)
    }

    /// Returns the registered names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Returns the number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no validator is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Returns the names of validators that watch `table`.
    pub fn validators_for_table(&self, table: &str) -> Vec<&str> {
        self.validators
            .iter()
            .filter(|v| v.tables().iter().any(|t| *t == table))
            .map(|v| v.name())
            .collect()
    }

    /// Runs a single validator by name.
    pub fn validate_one(
        &self,
        name: &str,
        old: &ConfigSnapshot,
        new: &ConfigSnapshot,
        context: &ChangeContext,
    ) -> GcuResult<()> {
        let validator = self
            .get(name)
            .ok_or_else(|| GcuError::unknown_validator(name))?;
        validator.validate(old, new, context)
    }

    /// Runs every validator. A failing validator does not stop the rest.
    #[instrument(skip_all, fields(validators = self.validators.len()))]
    pub fn validate_all(
        &self,
        old: &ConfigSnapshot,
        new: &ConfigSnapshot,
        context: &ChangeContext,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for validator in &self.validators {
            let result = validator.validate(old, new, context);
            if let Err(e) = &result {
                error!("Validator {} failed: {}", validator.name(), e);
            }
            report.push(validator.name(), result);
        }

        if report.is_success() {
            info!("All service validators succeeded");
        }
        report
    }
}

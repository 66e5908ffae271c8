//! Rule evaluation for hosts.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::registry::Rule;
use crate::value::FieldValue;

/// One field to check: its label, the rule to apply and the extracted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCheck {
    pub field: String,
    pub rule: Rule,
    #[serde(default)]
    pub value: FieldValue,
}

impl FieldCheck {
    pub fn new(field: impl Into<String>, rule: Rule, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            rule,
            value: value.into(),
        }
    }
}

/// Diagnostics of one [`FieldCheck`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub field: String,
    pub rule: Rule,
    #[serde(flatten)]
    pub diagnostics: Diagnostics,
}

/// Result of [`Engine::check_all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckReport {
    pub checks: Vec<CheckOutcome>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.total_errors == 0
    }

    /// Outcomes that carry at least one error.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| c.diagnostics.has_errors())
    }
}

/// Evaluates rules with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check `value` against `rule`.
    #[instrument(skip(self, rule, value), fields(rule = %rule), level = "debug")]
    pub fn validate(&self, rule: &Rule, value: &FieldValue, field: &str) -> Diagnostics {
        let diags = rule.validator(&self.config).validate(value, field);
        debug!(
            errors = diags.error_count(),
            warnings = diags.warnings.len(),
            "validated"
        );
        diags
    }

    /// Like [`Engine::validate`], with the rule given by name.
    pub fn validate_named(&self, rule: &str, value: &FieldValue, field: &str) -> Result<Diagnostics> {
        let rule: Rule = rule.parse()?;
        Ok(self.validate(&rule, value, field))
    }

    /// Run every check. Checks are independent; all of them run even when
    /// earlier ones fail.
    #[instrument(skip_all, fields(checks = checks.len()))]
    pub fn check_all(&self, checks: &[FieldCheck]) -> CheckReport {
        let mut report = CheckReport::default();
        for check in checks {
            let diagnostics = self.validate(&check.rule, &check.value, &check.field);
            report.total_errors += diagnostics.error_count();
            report.total_warnings += diagnostics.warnings.len();
            report.checks.push(CheckOutcome {
                field: check.field.clone(),
                rule: check.rule,
                diagnostics,
            });
        }
        debug!(
            errors = report.total_errors,
            warnings = report.total_warnings,
            "check run finished"
        );
        report
    }
}

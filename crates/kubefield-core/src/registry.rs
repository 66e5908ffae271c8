//! Named rules.
//!
//! A host wires a field to a validator by rule name, e.g. `labels` or
//! `int_at_least:3`. [`Rule`] is the closed set of those names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::rules::{self, CronExpression, IntAtLeast, RelativePath};
use crate::validator::BoxedValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rule {
    Name,
    GenerateName,
    QualifiedKey,
    Annotations,
    Labels,
    Base64,
    Base64Map,
    ResourceList,
    ResourceQuantity,
    NonNegativeInt,
    PositiveInt,
    TerminationGracePeriodSeconds,
    IntAtLeast(i64),
    PortNumber,
    PortName,
    PortNumberOrName,
    NullableStringInt,
    NullableStringIntOrPercent,
    ModeBits,
    Path,
    Cron,
}

const INT_AT_LEAST: &str = "int_at_least";

impl Rule {
    /// Every rule, in listing order. `IntAtLeast` appears with a floor of 0.
    pub fn all() -> [Rule; 21] {
        [
            Rule::Name,
            Rule::GenerateName,
            Rule::QualifiedKey,
            Rule::Annotations,
            Rule::Labels,
            Rule::Base64,
            Rule::Base64Map,
            Rule::ResourceList,
            Rule::ResourceQuantity,
            Rule::NonNegativeInt,
            Rule::PositiveInt,
            Rule::TerminationGracePeriodSeconds,
            Rule::IntAtLeast(0),
            Rule::PortNumber,
            Rule::PortName,
            Rule::PortNumberOrName,
            Rule::NullableStringInt,
            Rule::NullableStringIntOrPercent,
            Rule::ModeBits,
            Rule::Path,
            Rule::Cron,
        ]
    }

    /// Name without parameters.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Name => "name",
            Rule::GenerateName => "generate_name",
            Rule::QualifiedKey => "qualified_key",
            Rule::Annotations => "annotations",
            Rule::Labels => "labels",
            Rule::Base64 => "base64",
            Rule::Base64Map => "base64_map",
            Rule::ResourceList => "resource_list",
            Rule::ResourceQuantity => "resource_quantity",
            Rule::NonNegativeInt => "non_negative_int",
            Rule::PositiveInt => "positive_int",
            Rule::TerminationGracePeriodSeconds => "termination_grace_period_seconds",
            Rule::IntAtLeast(_) => INT_AT_LEAST,
            Rule::PortNumber => "port_number",
            Rule::PortName => "port_name",
            Rule::PortNumberOrName => "port_number_or_name",
            Rule::NullableStringInt => "nullable_string_int",
            Rule::NullableStringIntOrPercent => "nullable_string_int_or_percent",
            Rule::ModeBits => "mode_bits",
            Rule::Path => "path",
            Rule::Cron => "cron",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::Name => "object name: a DNS-1123 subdomain",
            Rule::GenerateName => "generateName prefix: a DNS-1123 label, trailing '-' allowed",
            Rule::QualifiedKey => "a single [prefix/]name key",
            Rule::Annotations => "map whose keys are qualified names (case-folded)",
            Rule::Labels => "map of qualified-name keys to label values",
            Rule::Base64 => "standard padded base64 string",
            Rule::Base64Map => "map of base64 strings",
            Rule::ResourceList => "map of integers or resource quantities",
            Rule::ResourceQuantity => "integer or resource quantity such as 500m or 2Gi",
            Rule::NonNegativeInt => "integer >= 0",
            Rule::PositiveInt => "integer > 0",
            Rule::TerminationGracePeriodSeconds => "grace period in seconds, >= 0",
            Rule::IntAtLeast(_) => "int_at_least:<min>, integer >= min",
            Rule::PortNumber => "integer port, 1-65535",
            Rule::PortName => "IANA service name, at most 15 characters",
            Rule::PortNumberOrName => "port number, numeric string, or port name",
            Rule::NullableStringInt => "string-encoded 64-bit integer, \"\" for unset",
            Rule::NullableStringIntOrPercent => {
                "string-encoded integer or 0%-100%, \"\" for unset"
            }
            Rule::ModeBits => "octal file mode with leading 0, at most 0777",
            Rule::Path => "relative path without '..' segments",
            Rule::Cron => "five-field cron schedule or @descriptor",
        }
    }

    /// Build the validator for this rule.
    pub fn validator(&self, config: &EngineConfig) -> BoxedValidator {
        match *self {
            Rule::Name => Box::new(rules::validate_name),
            Rule::GenerateName => Box::new(rules::validate_generate_name),
            Rule::QualifiedKey => Box::new(rules::validate_qualified_key),
            Rule::Annotations => Box::new(rules::validate_annotations),
            Rule::Labels => Box::new(rules::validate_labels),
            Rule::Base64 => Box::new(rules::validate_base64),
            Rule::Base64Map => Box::new(rules::validate_base64_encoded_map),
            Rule::ResourceList => Box::new(rules::validate_resource_list),
            Rule::ResourceQuantity => Box::new(rules::validate_resource_quantity),
            Rule::NonNegativeInt => Box::new(rules::validate_non_negative_integer),
            Rule::PositiveInt => Box::new(rules::validate_positive_integer),
            Rule::TerminationGracePeriodSeconds => {
                Box::new(rules::validate_termination_grace_period_seconds)
            }
            Rule::IntAtLeast(min) => Box::new(IntAtLeast::new(min)),
            Rule::PortNumber => Box::new(rules::validate_port_number),
            Rule::PortName => Box::new(rules::validate_port_name),
            Rule::PortNumberOrName => Box::new(rules::validate_port_number_or_name),
            Rule::NullableStringInt => Box::new(rules::validate_nullable_string_int),
            Rule::NullableStringIntOrPercent => {
                Box::new(rules::validate_nullable_string_int_or_percent)
            }
            Rule::ModeBits => Box::new(rules::validate_mode_bits),
            Rule::Path => Box::new(RelativePath::new(config.normalize_path_separators)),
            Rule::Cron => Box::new(CronExpression::new(config.cron_messages)),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::IntAtLeast(min) => write!(f, "{INT_AT_LEAST}:{min}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Rule {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(param) = s.strip_prefix(INT_AT_LEAST) {
            let Some(min) = param.strip_prefix(':') else {
                return Err(EngineError::InvalidRuleParameter {
                    rule: INT_AT_LEAST.to_string(),
                    reason: "expected int_at_least:<min>".to_string(),
                });
            };
            return min
                .trim()
                .parse()
                .map(Rule::IntAtLeast)
                .map_err(|e| EngineError::InvalidRuleParameter {
                    rule: INT_AT_LEAST.to_string(),
                    reason: format!("{min:?}: {e}"),
                });
        }

        Rule::all()
            .into_iter()
            .filter(|rule| !matches!(rule, Rule::IntAtLeast(_)))
            .find(|rule| rule.name() == s)
            .ok_or_else(|| EngineError::UnknownRule(s.to_string()))
    }
}

impl TryFrom<String> for Rule {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names_round_trip() {
        for rule in Rule::all() {
            assert_eq!(rule.to_string().parse::<Rule>().ok(), Some(rule));
        }
        assert_eq!("int_at_least:-5".parse::<Rule>().ok(), Some(Rule::IntAtLeast(-5)));
    }

    #[test]
    fn test_unknown_and_malformed() {
        assert!(matches!(
            "hostname".parse::<Rule>(),
            Err(EngineError::UnknownRule(name)) if name == "hostname"
        ));
        assert!(matches!(
            "int_at_least".parse::<Rule>(),
            Err(EngineError::InvalidRuleParameter { .. })
        ));
        assert!(matches!(
            "int_at_least:ten".parse::<Rule>(),
            Err(EngineError::InvalidRuleParameter { .. })
        ));
    }

    #[test]
    fn test_serde_uses_rule_names() {
        let rule: Rule = serde_json::from_str("\"int_at_least:3\"").unwrap();
        assert_eq!(rule, Rule::IntAtLeast(3));
        assert_eq!(serde_json::to_string(&Rule::ModeBits).unwrap(), "\"mode_bits\"");
        assert!(serde_json::from_str::<Rule>("\"nope\"").is_err());
    }

    #[test]
    fn test_validator_honours_config() {
        let compatible = EngineConfig {
            cron_messages: crate::config::CronMessages::Compatible,
            ..EngineConfig::default()
        };
        let diags = Rule::Cron
            .validator(&compatible)
            .validate(&FieldValue::from("bad"), "schedule");
        assert_eq!(diags.messages(), vec!["should be a valid Cron expression".to_string()]);

        let literal = EngineConfig {
            normalize_path_separators: false,
            ..EngineConfig::default()
        };
        assert!(Rule::Path
            .validator(&literal)
            .validate(&FieldValue::from("a\\..\\b"), "path")
            .is_valid());
    }
}

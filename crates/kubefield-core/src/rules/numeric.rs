//! Integer bounds, ports, quantities and string-encoded integers.

use super::{grammar_errors, parse_i32_saturating, require_int, require_str};
use crate::apimachinery::{is_valid_port_name, is_valid_port_num};
use crate::diagnostics::{Diagnostics, ErrorDetail};
use crate::quantity::parse_quantity;
use crate::validator::Validator;
use crate::value::FieldValue;

fn at_least(value: &FieldValue, field: &str, min: i64) -> Diagnostics {
    match require_int(value, field) {
        Ok(v) if v < min => Diagnostics::from_error(
            ErrorDetail::grammar(field, format!("must be greater than or equal to {min}"))
                .with_rule("int-min"),
        ),
        Ok(_) => Diagnostics::new(),
        Err(shape) => shape,
    }
}

/// `value >= 0`
pub fn validate_non_negative_integer(value: &FieldValue, field: &str) -> Diagnostics {
    at_least(value, field, 0)
}

/// `value > 0`
pub fn validate_positive_integer(value: &FieldValue, field: &str) -> Diagnostics {
    match require_int(value, field) {
        Ok(v) if v <= 0 => Diagnostics::from_error(
            ErrorDetail::grammar(field, "must be greater than 0").with_rule("int-min"),
        ),
        Ok(_) => Diagnostics::new(),
        Err(shape) => shape,
    }
}

/// `terminationGracePeriodSeconds`: zero (kill immediately) or more.
pub fn validate_termination_grace_period_seconds(value: &FieldValue, field: &str) -> Diagnostics {
    at_least(value, field, 0)
}

/// An integer no smaller than a floor fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntAtLeast {
    min: i64,
}

impl IntAtLeast {
    pub fn new(min: i64) -> Self {
        Self { min }
    }

    pub fn min(&self) -> i64 {
        self.min
    }
}

impl Validator for IntAtLeast {
    fn validate(&self, value: &FieldValue, field: &str) -> Diagnostics {
        at_least(value, field, self.min)
    }
}

fn port_number_errors(port: i64, field: &str) -> Diagnostics {
    grammar_errors(field, "port-range", is_valid_port_num(port))
}

/// A TCP/UDP port number, 1 through 65535.
pub fn validate_port_number(value: &FieldValue, field: &str) -> Diagnostics {
    match require_int(value, field) {
        Ok(port) => port_number_errors(port, field),
        Err(shape) => shape,
    }
}

/// A named port (IANA service name).
pub fn validate_port_name(value: &FieldValue, field: &str) -> Diagnostics {
    match require_str(value, field) {
        Ok(name) => grammar_errors(field, "port-name", is_valid_port_name(name)),
        Err(shape) => shape,
    }
}

/// Either a port number or a port name.
///
/// A string that parses as an integer is checked as a number, any other string
/// as a name.
pub fn validate_port_number_or_name(value: &FieldValue, field: &str) -> Diagnostics {
    match value {
        FieldValue::Str(s) => match s.parse::<i64>() {
            Ok(port) => port_number_errors(port, field),
            Err(_) => validate_port_name(value, field),
        },
        FieldValue::Int(port) => port_number_errors(*port, field),
        other => Diagnostics::from_error(ErrorDetail::shape(
            field,
            format!("must be a string or an integer, got {}", other.type_name()),
        )),
    }
}

fn quantity_errors(quantity: &str, field: &str) -> Diagnostics {
    match parse_quantity(quantity) {
        Ok(_) => Diagnostics::new(),
        Err(e) => Diagnostics::from_error(
            ErrorDetail::grammar(field, format!("{quantity:?}: {e}")).with_rule("quantity"),
        ),
    }
}

/// A single resource quantity. Integers are accepted as-is.
pub fn validate_resource_quantity(value: &FieldValue, field: &str) -> Diagnostics {
    match value {
        FieldValue::Int(_) => Diagnostics::new(),
        FieldValue::Str(quantity) => quantity_errors(quantity, field),
        other => Diagnostics::from_error(ErrorDetail::shape(
            field,
            format!("must be a quantity string or an integer, got {}", other.type_name()),
        )),
    }
}

/// An optional 64-bit integer carried as a string. `""` means unset.
pub fn validate_nullable_string_int(value: &FieldValue, field: &str) -> Diagnostics {
    let s = match require_str(value, field) {
        Ok(s) => s,
        Err(shape) => return shape,
    };
    if s.is_empty() {
        return Diagnostics::new();
    }

    match s.parse::<i64>() {
        Ok(_) => Diagnostics::new(),
        Err(e) => Diagnostics::from_error(
            ErrorDetail::grammar(field, format!("cannot parse {s:?} as int: {e}"))
                .with_rule("int-parse"),
        ),
    }
}

/// An optional integer or percentage carried as a string, like
/// `maxUnavailable`. `""` means unset; `"N%"` needs `0 <= N <= 100`.
pub fn validate_nullable_string_int_or_percent(value: &FieldValue, field: &str) -> Diagnostics {
    let s = match require_str(value, field) {
        Ok(s) => s,
        Err(shape) => return shape,
    };
    if s.is_empty() {
        return Diagnostics::new();
    }

    let mut diags = Diagnostics::new();
    if let Some(percent) = s.strip_suffix('%') {
        let (parsed, err) = parse_i32_saturating(percent, 10);
        if let Some(e) = err {
            diags.push(
                ErrorDetail::grammar(field, format!("cannot parse {s:?} as percent: {e}"))
                    .with_rule("percent-parse"),
            );
        }
        if !(0..=100).contains(&parsed) {
            diags.push(
                ErrorDetail::grammar(field, format!("{s:?} is not between 0% and 100%"))
                    .with_rule("percent-range"),
            );
        }
    } else if let Err(e) = s.parse::<i32>() {
        diags.push(
            ErrorDetail::grammar(field, format!("cannot parse {s:?} as int or percent: {e}"))
                .with_rule("int-parse"),
        );
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integer_bounds() {
        assert!(validate_non_negative_integer(&0.into(), "f").is_valid());
        assert!(!validate_non_negative_integer(&(-1).into(), "f").is_valid());

        assert!(validate_positive_integer(&1.into(), "f").is_valid());
        assert_eq!(
            validate_positive_integer(&0.into(), "f").messages(),
            vec!["must be greater than 0".to_string()]
        );

        assert!(validate_termination_grace_period_seconds(&0.into(), "f").is_valid());
        assert!(!validate_termination_grace_period_seconds(&(-30).into(), "f").is_valid());
    }

    #[test]
    fn test_integer_shape() {
        let diags = validate_non_negative_integer(&"5".into(), "replicas");
        assert_eq!(diags.errors[0].kind, ErrorKind::ShapeMismatch);
        assert_eq!(diags.errors[0].message, "must be an integer, got string");
    }

    #[test]
    fn test_int_at_least_keeps_its_floor() {
        let check = IntAtLeast::new(3);
        assert_eq!(check.min(), 3);
        assert!(check.validate(&3.into(), "f").is_valid());
        assert_eq!(
            check.validate(&2.into(), "f").messages(),
            vec!["must be greater than or equal to 3".to_string()]
        );

        let negative = IntAtLeast::new(-10);
        assert!(negative.validate(&(-10).into(), "f").is_valid());
    }

    #[test]
    fn test_port_number() {
        assert!(validate_port_number(&80.into(), "port").is_valid());
        assert_eq!(
            validate_port_number(&70000.into(), "port").messages(),
            vec!["must be between 1 and 65535, inclusive".to_string()]
        );
        assert!(!validate_port_number(&"80".into(), "port").is_valid());
    }

    #[test]
    fn test_port_number_or_name_dispatch() {
        assert_eq!(
            validate_port_number_or_name(&"80".into(), "port"),
            validate_port_number(&80.into(), "port")
        );
        assert_eq!(
            validate_port_number_or_name(&"0".into(), "port"),
            validate_port_number(&0.into(), "port")
        );
        assert_eq!(
            validate_port_number_or_name(&"https".into(), "port"),
            validate_port_name(&"https".into(), "port")
        );
        assert_eq!(
            validate_port_number_or_name(&"HTTPS".into(), "port"),
            validate_port_name(&"HTTPS".into(), "port")
        );
        assert_eq!(
            validate_port_number_or_name(&8080.into(), "port"),
            validate_port_number(&8080.into(), "port")
        );

        let diags = validate_port_number_or_name(&FieldValue::Bool(true), "port");
        assert_eq!(diags.errors[0].kind, ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_resource_quantity() {
        assert!(validate_resource_quantity(&"250m".into(), "cpu").is_valid());
        assert!(validate_resource_quantity(&4.into(), "cpu").is_valid());

        let diags = validate_resource_quantity(&"1ki".into(), "cpu");
        assert_eq!(
            diags.messages(),
            vec!["\"1ki\": unable to parse quantity's suffix".to_string()]
        );
        assert!(!validate_resource_quantity(&FieldValue::Null, "cpu").is_valid());
    }

    #[test]
    fn test_nullable_string_int() {
        assert!(validate_nullable_string_int(&"".into(), "f").is_valid());
        assert!(validate_nullable_string_int(&"-9223372036854775808".into(), "f").is_valid());
        assert!(!validate_nullable_string_int(&"9223372036854775808".into(), "f").is_valid());
        assert!(!validate_nullable_string_int(&"1.5".into(), "f").is_valid());
        assert!(!validate_nullable_string_int(&5.into(), "f").is_valid());
    }

    #[test]
    fn test_nullable_string_int_or_percent() {
        let check = validate_nullable_string_int_or_percent;
        assert!(check(&"".into(), "f").is_valid());
        assert!(check(&"50%".into(), "f").is_valid());
        assert!(check(&"0%".into(), "f").is_valid());
        assert!(check(&"100%".into(), "f").is_valid());
        assert!(check(&"3".into(), "f").is_valid());

        let over = check(&"150%".into(), "f");
        assert_eq!(over.messages(), vec!["\"150%\" is not between 0% and 100%".to_string()]);

        let garbage = check(&"abc".into(), "f");
        assert_eq!(garbage.error_count(), 1);
        assert_eq!(garbage.errors[0].rule.as_deref(), Some("int-parse"));

        let bad_percent = check(&"x%".into(), "f");
        assert_eq!(bad_percent.error_count(), 1);
        assert_eq!(bad_percent.errors[0].rule.as_deref(), Some("percent-parse"));

        let overflow = check(&"99999999999%".into(), "f");
        assert_eq!(overflow.error_count(), 2);

        assert!(!check(&"3000000000".into(), "f").is_valid());
    }
}

//! Field validators.
//!
//! Every public `validate_*` function has the shape
//! `fn(&FieldValue, &str) -> Diagnostics` and so implements
//! [`Validator`](crate::Validator) directly. Rules that take a parameter are
//! structs built once and reused: [`IntAtLeast`], [`CronExpression`] and
//! [`RelativePath`].
//!
//! Shape checks are total. A validator handed a value of the wrong shape
//! reports a single shape-mismatch error instead of guessing.

mod identity;
mod mapping;
mod numeric;
mod text;

pub use identity::{validate_generate_name, validate_name, validate_qualified_key};
pub use mapping::{
    validate_annotations, validate_base64_encoded_map, validate_labels, validate_resource_list,
};
pub use numeric::{
    validate_non_negative_integer, validate_nullable_string_int,
    validate_nullable_string_int_or_percent, validate_port_name, validate_port_number,
    validate_port_number_or_name, validate_positive_integer, validate_resource_quantity,
    validate_termination_grace_period_seconds, IntAtLeast,
};
pub use text::{
    validate_base64, validate_cron_expression, validate_mode_bits, validate_path,
    CronExpression, RelativePath,
};

use std::collections::BTreeMap;
use std::num::{IntErrorKind, ParseIntError};

use crate::diagnostics::{Diagnostics, ErrorDetail};
use crate::value::FieldValue;

fn shape_error(field: &str, expected: &str, value: &FieldValue) -> Diagnostics {
    Diagnostics::from_error(ErrorDetail::shape(
        field,
        format!("must be {expected}, got {}", value.type_name()),
    ))
}

pub(crate) fn require_str<'a>(value: &'a FieldValue, field: &str) -> Result<&'a str, Diagnostics> {
    value
        .as_str()
        .ok_or_else(|| shape_error(field, "a string", value))
}

pub(crate) fn require_int(value: &FieldValue, field: &str) -> Result<i64, Diagnostics> {
    value
        .as_int()
        .ok_or_else(|| shape_error(field, "an integer", value))
}

pub(crate) fn require_map<'a>(
    value: &'a FieldValue,
    field: &str,
    expected: &str,
) -> Result<&'a BTreeMap<String, FieldValue>, Diagnostics> {
    value.as_map().ok_or_else(|| shape_error(field, expected, value))
}

/// Turn a list of rule messages into grammar errors for `field`.
pub(crate) fn grammar_errors(field: &str, rule: &str, messages: Vec<String>) -> Diagnostics {
    messages
        .into_iter()
        .map(|m| ErrorDetail::grammar(field, m).with_rule(rule))
        .collect()
}

/// Parse a base-`radix` 32-bit integer. On overflow the value saturates to
/// the nearest bound and the error is still returned, so callers can report
/// both the parse failure and the resulting range violation.
pub(crate) fn parse_i32_saturating(s: &str, radix: u32) -> (i32, Option<ParseIntError>) {
    match i32::from_str_radix(s, radix) {
        Ok(v) => (v, None),
        Err(e) => {
            let v = match e.kind() {
                IntErrorKind::PosOverflow => i32::MAX,
                IntErrorKind::NegOverflow => i32::MIN,
                _ => 0,
            };
            (v, Some(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_i32_saturating() {
        assert_eq!(parse_i32_saturating("0755", 8), (0o755, None));
        assert_eq!(parse_i32_saturating("-12", 10), (-12, None));

        let (v, err) = parse_i32_saturating("99999999999", 10);
        assert_eq!(v, i32::MAX);
        assert!(err.is_some());

        let (v, err) = parse_i32_saturating("-99999999999", 10);
        assert_eq!(v, i32::MIN);
        assert!(err.is_some());

        let (v, err) = parse_i32_saturating("abc", 10);
        assert_eq!(v, 0);
        assert!(err.is_some());
    }

    #[test]
    fn test_shape_error_names_the_received_type() {
        let diags = require_str(&FieldValue::Int(1), "f").unwrap_err();
        assert_eq!(diags.errors[0].message, "must be a string, got integer");
        assert!(diags.errors[0].is_shape_mismatch());
    }
}

//! Map-valued fields.
//!
//! Mapping validators visit every entry and report each violation with the
//! entry's key, so one pass surfaces every problem in the map.

use super::{require_map, text::validate_base64};
use crate::apimachinery::{is_qualified_name, is_valid_label_value};
use crate::diagnostics::{Diagnostics, ErrorDetail};
use crate::quantity::parse_quantity;
use crate::value::FieldValue;

fn key_errors(diags: &mut Diagnostics, field: &str, key: &str, checked: &str) {
    for message in is_qualified_name(checked) {
        diags.push(
            ErrorDetail::grammar(field, message)
                .in_entry(key)
                .with_rule("qualified-name"),
        );
    }
}

/// Annotation keys must be qualified names. Values are free-form.
///
/// Keys are lower-cased before the check, so `Example.com/Key` passes even
/// though the prefix grammar is lowercase only. This matches what the
/// provider has always accepted for annotations; labels are checked as
/// written (see [`validate_labels`]).
pub fn validate_annotations(value: &FieldValue, field: &str) -> Diagnostics {
    let entries = match require_map(value, field, "a map of strings") {
        Ok(entries) => entries,
        Err(shape) => return shape,
    };

    let mut diags = Diagnostics::new();
    for key in entries.keys() {
        key_errors(&mut diags, field, key, &key.to_lowercase());
    }
    diags
}

/// Label keys must be qualified names and label values must be strings
/// matching the label-value grammar.
///
/// A non-string value is reported once for its entry; the value-format check
/// is skipped for that entry only.
pub fn validate_labels(value: &FieldValue, field: &str) -> Diagnostics {
    let entries = match require_map(value, field, "a map of strings") {
        Ok(entries) => entries,
        Err(shape) => return shape,
    };

    let mut diags = Diagnostics::new();
    for (key, entry) in entries {
        key_errors(&mut diags, field, key, key);

        let Some(label) = entry.as_str() else {
            diags.push(
                ErrorDetail::shape(
                    field,
                    format!("expected value to be string, got {} ({entry})", entry.type_name()),
                )
                .in_entry(key),
            );
            continue;
        };
        for message in is_valid_label_value(label) {
            diags.push(
                ErrorDetail::grammar(field, format!("value {label:?} {message}"))
                    .in_entry(key)
                    .with_rule("label-value"),
            );
        }
    }
    diags
}

/// Every value must be a base64-encoded string.
pub fn validate_base64_encoded_map(value: &FieldValue, field: &str) -> Diagnostics {
    let entries = match require_map(value, field, "a map of strings to base64 encoded strings") {
        Ok(entries) => entries,
        Err(shape) => return shape,
    };

    let mut diags = Diagnostics::new();
    for (key, entry) in entries {
        diags.merge(validate_base64(entry, key).for_entry(field, key));
    }
    diags
}

/// Resource requests and limits: every value is an integer or a quantity
/// string such as `"500m"` or `"2Gi"`.
pub fn validate_resource_list(value: &FieldValue, field: &str) -> Diagnostics {
    let entries = match require_map(value, field, "a map of resource quantities") {
        Ok(entries) => entries,
        Err(shape) => return shape,
    };

    let mut diags = Diagnostics::new();
    for (key, entry) in entries {
        match entry {
            FieldValue::Int(_) => {}
            FieldValue::Str(quantity) => {
                if let Err(e) = parse_quantity(quantity) {
                    diags.push(
                        ErrorDetail::grammar(field, format!("{quantity:?}: {e}"))
                            .in_entry(key)
                            .with_rule("quantity"),
                    );
                }
            }
            other => diags.push(
                ErrorDetail::shape(
                    field,
                    format!("{other}: value can be either string or int"),
                )
                .in_entry(key),
            ),
        }
    }
    diags
}

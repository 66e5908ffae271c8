//! The validator capability.
//!
//! Every rule in this crate is a [`Validator`]: something that maps a value and
//! a field label to [`Diagnostics`]. Plain functions implement the trait
//! automatically; parameterized rules are small structs holding their
//! parameter.
//!
//! # Example
//!
//! ```rust
//! use kubefield_core::{FieldValue, Validator};
//! use kubefield_core::rules::{validate_name, IntAtLeast};
//!
//! let name = FieldValue::from("my-app");
//! assert!(validate_name.validate(&name, "metadata.name").is_valid());
//!
//! let replicas = IntAtLeast::new(2);
//! assert!(!replicas.validate(&FieldValue::from(1), "spec.replicas").is_valid());
//! ```

use crate::diagnostics::Diagnostics;
use crate::value::FieldValue;

/// Trait for field validators.
///
/// Implementations must be pure: the same input always yields the same
/// diagnostics, and nothing is shared between calls. They must also be total:
/// any input shape produces diagnostics, never a panic.
pub trait Validator: Send + Sync {
    /// Validate `value`, using `field` only to label messages.
    fn validate(&self, value: &FieldValue, field: &str) -> Diagnostics;
}

impl<F> Validator for F
where
    F: Fn(&FieldValue, &str) -> Diagnostics + Send + Sync,
{
    fn validate(&self, value: &FieldValue, field: &str) -> Diagnostics {
        self(value, field)
    }
}

/// A boxed validator, as handed out by the rule registry.
pub type BoxedValidator = Box<dyn Validator>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorDetail;

    fn reject_all(_: &FieldValue, field: &str) -> Diagnostics {
        Diagnostics::from_error(ErrorDetail::grammar(field, "always rejected"))
    }

    #[test]
    fn test_functions_are_validators() {
        let boxed: BoxedValidator = Box::new(reject_all);
        let diags = boxed.validate(&FieldValue::Null, "x");
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.errors[0].field, "x");
    }

    #[test]
    fn test_closures_are_validators() {
        let limit = 3;
        let short = move |value: &FieldValue, field: &str| match value.as_str() {
            Some(s) if s.len() > limit => {
                Diagnostics::from_error(ErrorDetail::grammar(field, "too long"))
            }
            _ => Diagnostics::new(),
        };
        assert!(short.validate(&"abc".into(), "f").is_valid());
        assert!(!short.validate(&"abcd".into(), "f").is_valid());
    }
}

//! Object names and qualified keys.

use super::{grammar_errors, require_str};
use crate::apimachinery::{is_qualified_name, name_is_dns_label, name_is_dns_subdomain};
use crate::diagnostics::Diagnostics;
use crate::value::FieldValue;

/// `metadata.name`: a DNS-1123 subdomain.
pub fn validate_name(value: &FieldValue, field: &str) -> Diagnostics {
    let name = match require_str(value, field) {
        Ok(name) => name,
        Err(shape) => return shape,
    };
    grammar_errors(field, "dns-subdomain", name_is_dns_subdomain(name, false))
}

/// `metadata.generateName`: a DNS-1123 label prefix. The random suffix the API
/// server appends is not part of the value, so a trailing `-` is accepted.
pub fn validate_generate_name(value: &FieldValue, field: &str) -> Diagnostics {
    let prefix = match require_str(value, field) {
        Ok(prefix) => prefix,
        Err(shape) => return shape,
    };
    grammar_errors(field, "dns-label", name_is_dns_label(prefix, true))
}

/// A label or annotation key on its own: `[prefix/]name`, checked as written.
pub fn validate_qualified_key(value: &FieldValue, field: &str) -> Diagnostics {
    let key = match require_str(value, field) {
        Ok(key) => key,
        Err(shape) => return shape,
    };
    grammar_errors(field, "qualified-name", is_qualified_name(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;

    #[test]
    fn test_name() {
        assert!(validate_name(&"my-app.v2".into(), "metadata.name").is_valid());

        let diags = validate_name(&"My_App".into(), "metadata.name");
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.errors[0].field, "metadata.name");
        assert_eq!(diags.errors[0].rule.as_deref(), Some("dns-subdomain"));

        let too_long = format!("{}-", "a".repeat(253));
        assert_eq!(validate_name(&too_long.into(), "metadata.name").error_count(), 2);
    }

    #[test]
    fn test_name_shape() {
        let diags = validate_name(&FieldValue::Int(7), "metadata.name");
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.errors[0].kind, ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_generate_name_allows_trailing_dash() {
        assert!(validate_generate_name(&"web-".into(), "metadata.generate_name").is_valid());
        assert!(validate_generate_name(&"web".into(), "metadata.generate_name").is_valid());

        let diags = validate_generate_name(&"web.app-".into(), "metadata.generate_name");
        assert_eq!(diags.messages(), vec!["must not contain dots".to_string()]);

        let long = "a".repeat(64);
        assert!(!validate_generate_name(&long.into(), "metadata.generate_name").is_valid());
    }

    #[test]
    fn test_qualified_key() {
        assert!(validate_qualified_key(&"app.kubernetes.io/Name".into(), "key").is_valid());
        assert!(!validate_qualified_key(&"Example.com/name".into(), "key").is_valid());
    }
}

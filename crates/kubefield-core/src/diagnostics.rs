//! Diagnostic types produced by field validators.
//!
//! A validator never fails: every problem it finds becomes an [`ErrorDetail`]
//! inside the returned [`Diagnostics`]. Warnings are informational and never
//! affect whether a value is accepted.

use std::fmt;

use serde::Serialize;

/// Category of a single violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The value does not have the shape the validator expects
    /// (e.g. an integer where a string is required).
    ShapeMismatch,
    /// The value has the right shape but breaks a named rule
    /// (length, charset, bound, parse failure).
    GrammarViolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ShapeMismatch => write!(f, "SHAPE_MISMATCH"),
            ErrorKind::GrammarViolation => write!(f, "GRAMMAR_VIOLATION"),
        }
    }
}

/// A single validation error with location and context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Label of the field being validated, as supplied by the caller.
    ///
    /// Only used for messages, never for logic.
    pub field: String,

    /// Human-readable error message.
    pub message: String,

    /// Whether this is a shape or a grammar problem.
    pub kind: ErrorKind,

    /// Map key of the offending entry, for mapping validators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// The check that was violated (if known).
    ///
    /// Examples:
    /// - `"dns-subdomain"` - name does not match the subdomain grammar
    /// - `"port-range"` - port number out of range
    /// - `"octal-prefix"` - mode bits missing the leading `0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl ErrorDetail {
    /// Create a new error of the given kind.
    pub fn new(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
            entry: None,
            rule: None,
        }
    }

    /// The value broke a grammar or range rule.
    pub fn grammar(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, ErrorKind::GrammarViolation, message)
    }

    /// The value had the wrong shape.
    pub fn shape(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, ErrorKind::ShapeMismatch, message).with_rule("shape")
    }

    /// Attach the map key of the offending entry.
    pub fn in_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Set the rule that was violated.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn is_shape_mismatch(&self) -> bool {
        self.kind == ErrorKind::ShapeMismatch
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.entry, self.field.is_empty()) {
            (Some(entry), _) => write!(f, "{} ({:?}): {}", self.field, entry, self.message)?,
            (None, true) => write!(f, "{}", self.message)?,
            (None, false) => write!(f, "{}: {}", self.field, self.message)?,
        }

        if let Some(rule) = &self.rule {
            write!(f, " [{}]", rule)?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorDetail {}

/// Outcome of validating one value: warnings plus errors, both in the order
/// they were found.
///
/// A result with zero errors means the value is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Informational messages; never block.
    pub warnings: Vec<String>,
    /// Violations; any entry here rejects the value.
    pub errors: Vec<ErrorDetail>,
}

impl Diagnostics {
    /// An empty (passing) result.
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding exactly one error.
    pub fn from_error(error: ErrorDetail) -> Self {
        Self {
            warnings: Vec::new(),
            errors: vec![error],
        }
    }

    /// Add an error.
    pub fn push(&mut self, error: ErrorDetail) {
        self.errors.push(error);
    }

    /// Add a warning.
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// True when no errors were recorded. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Append everything from `other`, keeping order.
    pub fn merge(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    /// Re-home every error under `field`, tagged with the map `entry` it came
    /// from. Used when a mapping validator delegates to a scalar one.
    pub fn for_entry(mut self, field: &str, entry: &str) -> Self {
        for error in &mut self.errors {
            error.field = field.to_string();
            error.entry = Some(entry.to_string());
        }
        self
    }

    /// Messages of all errors, in order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Convert into a `Result`, yielding the warnings on success.
    pub fn into_result(self) -> Result<Vec<String>, Diagnostics> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "No validation errors")
        } else if self.errors.len() == 1 {
            write!(f, "Validation error: {}", self.errors[0])
        } else {
            writeln!(f, "{} validation errors:", self.errors.len())?;
            for (i, error) in self.errors.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, error)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for Diagnostics {}

impl From<ErrorDetail> for Diagnostics {
    fn from(error: ErrorDetail) -> Self {
        Self::from_error(error)
    }
}

impl FromIterator<ErrorDetail> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = ErrorDetail>>(iter: I) -> Self {
        Self {
            warnings: Vec::new(),
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = ErrorDetail;
    type IntoIter = std::vec::IntoIter<ErrorDetail>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a ErrorDetail;
    type IntoIter = std::slice::Iter<'a, ErrorDetail>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_display() {
        let error = ErrorDetail::grammar("metadata.name", "must be no more than 253 characters")
            .with_rule("dns-subdomain");

        let display = format!("{}", error);
        assert_eq!(
            display,
            "metadata.name: must be no more than 253 characters [dns-subdomain]"
        );
    }

    #[test]
    fn test_entry_is_quoted_in_display() {
        let error = ErrorDetail::grammar("data", "must be a base64-encoded string").in_entry("key");
        assert_eq!(error.to_string(), "data (\"key\"): must be a base64-encoded string");
    }

    #[test]
    fn test_shape_errors_carry_kind() {
        let error = ErrorDetail::shape("port", "must be a string or an integer");
        assert!(error.is_shape_mismatch());
        assert_eq!(error.rule.as_deref(), Some("shape"));
    }

    #[test]
    fn test_warnings_do_not_reject() {
        let mut diags = Diagnostics::new();
        diags.warn("deprecated field");
        assert!(diags.is_valid());
        assert!(diags.has_warnings());
        assert_eq!(diags.into_result(), Ok(vec!["deprecated field".to_string()]));
    }

    #[test]
    fn test_for_entry_relabels_errors() {
        let diags = Diagnostics::from_error(ErrorDetail::grammar("k", "bad"));
        let relabelled = diags.for_entry("data", "k");

        assert_eq!(relabelled.errors[0].field, "data");
        assert_eq!(relabelled.errors[0].entry.as_deref(), Some("k"));
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = Diagnostics::from_error(ErrorDetail::grammar("a", "one"));
        let mut second = Diagnostics::new();
        second.push(ErrorDetail::grammar("b", "two"));
        second.push(ErrorDetail::grammar("c", "three"));

        first.merge(second);
        assert_eq!(first.messages(), vec!["one", "two", "three"]);
        assert!(first.to_string().starts_with("3 validation errors:"));
    }
}

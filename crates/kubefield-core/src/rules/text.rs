//! Single-string formats: file modes, relative paths, cron schedules and
//! base64 payloads.

use std::sync::LazyLock;

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use super::{parse_i32_saturating, require_str};
use crate::config::CronMessages;
use crate::cron::parse_standard;
use crate::diagnostics::{Diagnostics, ErrorDetail};
use crate::validator::Validator;
use crate::value::FieldValue;

/// Largest permission-bit value, `0777`.
const MAX_MODE: i32 = 0o777;

/// Standard alphabet, padding required, non-zero trailing bits tolerated.
static STANDARD_LENIENT: LazyLock<GeneralPurpose> = LazyLock::new(|| {
    GeneralPurpose::new(
        &alphabet::STANDARD,
        GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
    )
});

fn octal(v: i32) -> String {
    match v {
        0 => "0".to_string(),
        v if v < 0 => format!("-0{:o}", v.unsigned_abs()),
        v => format!("0{v:o}"),
    }
}

/// An octal file mode such as `"0644"`.
///
/// Every failing check is reported: a value without the leading `0` that
/// also overflows gets the prefix, parse and range errors together.
pub fn validate_mode_bits(value: &FieldValue, field: &str) -> Diagnostics {
    let s = match require_str(value, field) {
        Ok(s) => s,
        Err(shape) => return shape,
    };

    let mut diags = Diagnostics::new();
    if !s.starts_with('0') {
        diags.push(
            ErrorDetail::grammar(field, format!("value {s} should start with '0' (octal numeral)"))
                .with_rule("octal-prefix"),
        );
    }

    let (mode, err) = parse_i32_saturating(s, 8);
    if let Some(e) = err {
        diags.push(
            ErrorDetail::grammar(field, format!("cannot parse octal numeral ({s:?}): {e}"))
                .with_rule("octal-parse"),
        );
    }
    if !(0..=MAX_MODE).contains(&mode) {
        diags.push(
            ErrorDetail::grammar(
                field,
                format!(
                    "{} expects octal notation (a value between 0 and 0777)",
                    octal(mode)
                ),
            )
            .with_rule("octal-range"),
        );
    }
    diags
}

/// A path that stays below the directory it is resolved against.
///
/// Stops at the first failing check: absolute, then a leading `..`, then a
/// `..` segment anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativePath {
    normalize_separators: bool,
}

impl RelativePath {
    /// `normalize_separators` makes `\` split segments like `/` does.
    pub fn new(normalize_separators: bool) -> Self {
        Self {
            normalize_separators,
        }
    }

    fn check(&self, path: &str) -> Option<(&'static str, &'static str)> {
        if path.starts_with('/') {
            return Some(("must be a relative path", "relative-path"));
        }
        if path.starts_with("..") {
            return Some(("must not start with \"..\"", "path-traversal"));
        }

        let has_parent_segment = if self.normalize_separators {
            path.split(['/', '\\']).any(|segment| segment == "..")
        } else {
            path.split('/').any(|segment| segment == "..")
        };
        has_parent_segment.then_some(("must not contain \"..\"", "path-traversal"))
    }
}

impl Default for RelativePath {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Validator for RelativePath {
    fn validate(&self, value: &FieldValue, field: &str) -> Diagnostics {
        let path = match require_str(value, field) {
            Ok(path) => path,
            Err(shape) => return shape,
        };
        match self.check(path) {
            Some((message, rule)) => {
                Diagnostics::from_error(ErrorDetail::grammar(field, message).with_rule(rule))
            }
            None => Diagnostics::new(),
        }
    }
}

/// [`RelativePath`] with separator normalization on.
pub fn validate_path(value: &FieldValue, field: &str) -> Diagnostics {
    RelativePath::default().validate(value, field)
}

/// A five-field cron schedule, or a descriptor like `@daily`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CronExpression {
    messages: CronMessages,
}

impl CronExpression {
    pub fn new(messages: CronMessages) -> Self {
        Self { messages }
    }
}

impl Validator for CronExpression {
    fn validate(&self, value: &FieldValue, field: &str) -> Diagnostics {
        let spec = match require_str(value, field) {
            Ok(spec) => spec,
            Err(shape) => return shape,
        };
        let Err(e) = parse_standard(spec) else {
            return Diagnostics::new();
        };

        let message = match self.messages {
            CronMessages::Detailed => format!("should be a valid Cron expression: {e}"),
            CronMessages::Compatible => "should be a valid Cron expression".to_string(),
        };
        Diagnostics::from_error(ErrorDetail::grammar(field, message).with_rule("cron"))
    }
}

/// [`CronExpression`] with detailed messages.
pub fn validate_cron_expression(value: &FieldValue, field: &str) -> Diagnostics {
    CronExpression::default().validate(value, field)
}

/// Standard, padded base64. Line breaks are ignored.
pub fn validate_base64(value: &FieldValue, field: &str) -> Diagnostics {
    let Some(encoded) = value.as_str() else {
        return Diagnostics::from_error(ErrorDetail::shape(
            field,
            "must be a non-nil base64-encoded string",
        ));
    };

    let stripped: String = encoded.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    match STANDARD_LENIENT.decode(stripped.as_bytes()) {
        Ok(_) => Diagnostics::new(),
        Err(_) => Diagnostics::from_error(
            ErrorDetail::grammar(field, "must be a base64-encoded string").with_rule("base64"),
        ),
    }
}

//! Resource quantity parsing.
//!
//! Quantities are the fixed-point numbers Kubernetes uses for compute and
//! memory sizing:
//!
//! ```text
//! <quantity>        ::= <signedNumber><suffix>
//! <signedNumber>    ::= <number> | <sign><number>
//! <number>          ::= <digits> | <digits>.<digits> | <digits>. | .<digits>
//! <sign>            ::= "+" | "-"
//! <suffix>          ::= <binarySI> | <decimalExponent> | <decimalSI>
//! <binarySI>        ::= Ki | Mi | Gi | Ti | Pi | Ei
//! <decimalSI>       ::= n | u | m | "" | k | M | G | T | P | E
//! <decimalExponent> ::= "e" <signedNumber> | "E" <signedNumber>
//! ```
//!
//! Only syntax is checked here; the value is not normalized or rounded.

use thiserror::Error;

/// Why a string is not a quantity. The messages match the API server's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantities must match the regular expression '^([+-]?[0-9.]+)([eEinumkKMGTP]*[-+]?[0-9]*)$'")]
    FormatWrong,

    #[error("unable to parse numeric part of quantity")]
    Numeric,

    #[error("unable to parse quantity's suffix")]
    Suffix,
}

/// How the suffix of a quantity scales its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityFormat {
    /// `e3`, `E-2`: base 10 with an explicit exponent.
    DecimalExponent,
    /// `Ki`, `Mi`, ...: base 2.
    BinarySI,
    /// `m`, `k`, `M`, ...: base 10 with an SI prefix.
    DecimalSI,
}

/// The pieces of a successfully parsed quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuantity {
    pub negative: bool,
    /// Integer digits with leading zeros stripped (`"0"` when there are none).
    pub integer: String,
    /// Digits after the decimal point, possibly empty.
    pub fraction: String,
    /// The raw suffix text.
    pub suffix: String,
    /// 10 or 2.
    pub base: u32,
    pub exponent: i32,
    pub format: QuantityFormat,
}

struct Parts<'a> {
    negative: bool,
    /// Sign and number as written, used for the numeric check.
    value: &'a str,
    num: &'a str,
    denom: &'a str,
    suffix: &'a str,
}

fn is_suffix_char(b: u8) -> bool {
    b"eEinumkKMGTP".contains(&b)
}

/// Split `s` into sign, numerator, denominator and suffix without
/// interpreting the suffix.
fn split_quantity(s: &str) -> Result<Parts<'_>, QuantityError> {
    let bytes = s.as_bytes();
    let end = bytes.len();
    let mut pos = 0;
    let mut negative = false;

    match bytes.first() {
        Some(b'-') => {
            negative = true;
            pos += 1;
        }
        Some(b'+') => pos += 1,
        _ => {}
    }

    // Leading zeros. A value that is nothing but zeros is zero.
    while pos < end && bytes[pos] == b'0' {
        pos += 1;
    }
    if pos >= end {
        return Ok(Parts {
            negative,
            value: "0",
            num: "0",
            denom: "",
            suffix: "",
        });
    }

    let num_start = pos;
    while pos < end && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut num = &s[num_start..pos];
    if pos >= end {
        return Ok(Parts {
            negative,
            value: s,
            num,
            denom: "",
            suffix: "",
        });
    }
    if num.is_empty() {
        num = "0";
    }

    let mut denom = "";
    if bytes[pos] == b'.' {
        pos += 1;
        let denom_start = pos;
        while pos < end && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        denom = &s[denom_start..pos];
        if pos >= end {
            return Ok(Parts {
                negative,
                value: s,
                num,
                denom,
                suffix: "",
            });
        }
    }
    let value = &s[..pos];

    let suffix_start = pos;
    while pos < end && is_suffix_char(bytes[pos]) {
        pos += 1;
    }
    if pos < end && (bytes[pos] == b'-' || bytes[pos] == b'+') {
        pos += 1;
    }
    while pos < end && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < end {
        // Something other than an exponent follows the suffix.
        return Err(QuantityError::FormatWrong);
    }

    Ok(Parts {
        negative,
        value,
        num,
        denom,
        suffix: &s[suffix_start..],
    })
}

fn interpret_suffix(suffix: &str) -> Option<(u32, i32, QuantityFormat)> {
    use QuantityFormat::{BinarySI, DecimalExponent, DecimalSI};

    let known = match suffix {
        "" => (10, 0, DecimalSI),
        "n" => (10, -9, DecimalSI),
        "u" => (10, -6, DecimalSI),
        "m" => (10, -3, DecimalSI),
        "k" => (10, 3, DecimalSI),
        "M" => (10, 6, DecimalSI),
        "G" => (10, 9, DecimalSI),
        "T" => (10, 12, DecimalSI),
        "P" => (10, 15, DecimalSI),
        "E" => (10, 18, DecimalSI),
        "Ki" => (2, 10, BinarySI),
        "Mi" => (2, 20, BinarySI),
        "Gi" => (2, 30, BinarySI),
        "Ti" => (2, 40, BinarySI),
        "Pi" => (2, 50, BinarySI),
        "Ei" => (2, 60, BinarySI),
        _ => {
            let exponent = suffix
                .strip_prefix('e')
                .or_else(|| suffix.strip_prefix('E'))?;
            // Parsed as 64 bits, then truncated to 32 like the API server does.
            let exponent = exponent.parse::<i64>().ok()? as i32;
            (10, exponent, DecimalExponent)
        }
    };
    Some(known)
}

/// Digits of precision an `i64` holds for any value.
const MAX_INT64_FACTORS: i64 = 18;

/// Smallest scale the integer fast path represents (nano).
const MIN_FAST_SCALE: i64 = -9;

/// Whether the API server reads this quantity as a scaled `i64` instead of
/// an arbitrary-precision decimal. Only the decimal path rejects a number
/// without digits such as `"."`; the fast path reads it as zero.
fn fits_int64(parts: &Parts<'_>, exponent: i32, format: QuantityFormat) -> bool {
    let num = parts.num.len() as i64;
    let denom = parts.denom.len() as i64;
    let exponent = i64::from(exponent);

    let (precision, scale) = match format {
        QuantityFormat::DecimalExponent | QuantityFormat::DecimalSI => {
            (MAX_INT64_FACTORS - num - denom, exponent)
        }
        QuantityFormat::BinarySI if exponent >= 0 && denom == 0 => {
            (15 - num - exponent * 3 / 10 - 1, 0)
        }
        QuantityFormat::BinarySI => return false,
    };
    precision >= 0 && scale - denom >= MIN_FAST_SCALE
}

/// The decimal path needs at least one digit on either side of the point.
fn has_digits(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
}

/// Parse `s` as a resource quantity such as `"500m"`, `"1.5"` or `"2Gi"`.
pub fn parse_quantity(s: &str) -> Result<ParsedQuantity, QuantityError> {
    if s.is_empty() {
        return Err(QuantityError::FormatWrong);
    }

    let parts = split_quantity(s)?;
    let (base, exponent, format) =
        interpret_suffix(parts.suffix).ok_or(QuantityError::Suffix)?;
    if !fits_int64(&parts, exponent, format) && !has_digits(parts.value) {
        return Err(QuantityError::Numeric);
    }

    Ok(ParsedQuantity {
        negative: parts.negative,
        integer: parts.num.to_string(),
        fraction: parts.denom.to_string(),
        suffix: parts.suffix.to_string(),
        base,
        exponent,
        format,
    })
}

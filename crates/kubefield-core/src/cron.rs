//! Standard cron schedule parsing.
//!
//! Accepts the classic five-field form (`minute hour day-of-month month
//! day-of-week`), the `@yearly`-style descriptors and `@every <duration>`.
//! Each field is a comma-separated list of `*`, `?`, `N`, or `N-M`, optionally
//! followed by `/step`. Months and weekdays also accept three-letter names.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// One of the five schedule fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CronField {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl CronField {
    const ALL: [CronField; 5] = [
        CronField::Minute,
        CronField::Hour,
        CronField::DayOfMonth,
        CronField::Month,
        CronField::DayOfWeek,
    ];

    fn bounds(self) -> (u32, u32) {
        match self {
            CronField::Minute => (0, 59),
            CronField::Hour => (0, 23),
            CronField::DayOfMonth => (1, 31),
            CronField::Month => (1, 12),
            CronField::DayOfWeek => (0, 6),
        }
    }

    fn names(self) -> &'static [(&'static str, u32)] {
        match self {
            CronField::Month => &[
                ("jan", 1),
                ("feb", 2),
                ("mar", 3),
                ("apr", 4),
                ("may", 5),
                ("jun", 6),
                ("jul", 7),
                ("aug", 8),
                ("sep", 9),
                ("oct", 10),
                ("nov", 11),
                ("dec", 12),
            ],
            CronField::DayOfWeek => &[
                ("sun", 0),
                ("mon", 1),
                ("tue", 2),
                ("wed", 3),
                ("thu", 4),
                ("fri", 5),
                ("sat", 6),
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CronField::Minute => "minute",
            CronField::Hour => "hour",
            CronField::DayOfMonth => "day-of-month",
            CronField::Month => "month",
            CronField::DayOfWeek => "day-of-week",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    #[error("empty spec string")]
    Empty,

    #[error("expected exactly 5 fields, found {found}: {spec}")]
    FieldCount { found: usize, spec: String },

    #[error("unrecognized descriptor: {0}")]
    UnknownDescriptor(String),

    #[error("failed to parse duration {input}: {reason}")]
    Duration { input: String, reason: String },

    #[error("{field} field {expr:?}: {reason}")]
    InvalidField {
        field: CronField,
        expr: String,
        reason: String,
    },
}

/// Bitset of the values a field fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSet(u64);

impl FieldSet {
    pub fn contains(&self, value: u32) -> bool {
        value < 64 && self.0 & (1u64 << value) != 0
    }

    pub fn values(&self) -> Vec<u32> {
        (0..64).filter(|v| self.contains(*v)).collect()
    }

    fn insert_range(&mut self, start: u32, end: u32, step: u32) {
        let mut v = start;
        while v <= end {
            self.0 |= 1u64 << v;
            v = v.saturating_add(step);
        }
    }
}

/// A parsed five-field schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecSchedule {
    pub minute: FieldSet,
    pub hour: FieldSet,
    pub day_of_month: FieldSet,
    pub month: FieldSet,
    pub day_of_week: FieldSet,
}

/// Result of parsing a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Spec(SpecSchedule),
    /// `@every <duration>`, at one-second resolution and at least one second.
    Every(Duration),
}

/// Parse a standard cron expression.
pub fn parse_standard(spec: &str) -> Result<Schedule, CronError> {
    if spec.is_empty() {
        return Err(CronError::Empty);
    }
    if spec.starts_with('@') {
        return parse_descriptor(spec);
    }

    let fields: Vec<&str> = spec.split_whitespace().collect();
    if fields.len() != CronField::ALL.len() {
        return Err(CronError::FieldCount {
            found: fields.len(),
            spec: spec.to_string(),
        });
    }

    Ok(Schedule::Spec(SpecSchedule {
        minute: parse_field(fields[0], CronField::Minute)?,
        hour: parse_field(fields[1], CronField::Hour)?,
        day_of_month: parse_field(fields[2], CronField::DayOfMonth)?,
        month: parse_field(fields[3], CronField::Month)?,
        day_of_week: parse_field(fields[4], CronField::DayOfWeek)?,
    }))
}

fn parse_descriptor(spec: &str) -> Result<Schedule, CronError> {
    let fixed = match spec {
        "@yearly" | "@annually" => Some("0 0 1 1 *"),
        "@monthly" => Some("0 0 1 * *"),
        "@weekly" => Some("0 0 * * 0"),
        "@daily" | "@midnight" => Some("0 0 * * *"),
        "@hourly" => Some("0 * * * *"),
        _ => None,
    };
    if let Some(expanded) = fixed {
        return parse_standard(expanded);
    }

    if let Some(input) = spec.strip_prefix("@every ") {
        let nanos = parse_go_duration(input).map_err(|reason| CronError::Duration {
            input: input.to_string(),
            reason,
        })?;
        // Sub-second intervals are raised to one second; the rest are
        // truncated to whole seconds.
        let seconds = (nanos / 1e9).trunc().max(1.0);
        return Ok(Schedule::Every(Duration::from_secs(seconds as u64)));
    }

    Err(CronError::UnknownDescriptor(spec.to_string()))
}

fn parse_field(expr: &str, field: CronField) -> Result<FieldSet, CronError> {
    let mut set = FieldSet::default();
    for part in expr.split(',').filter(|part| !part.is_empty()) {
        parse_range(part, field, &mut set)?;
    }
    Ok(set)
}

fn parse_range(expr: &str, field: CronField, set: &mut FieldSet) -> Result<(), CronError> {
    let invalid = |reason: String| CronError::InvalidField {
        field,
        expr: expr.to_string(),
        reason,
    };
    let (min, max) = field.bounds();

    let range_and_step: Vec<&str> = expr.split('/').collect();
    let low_and_high: Vec<&str> = range_and_step[0].split('-').collect();
    let single = low_and_high.len() == 1;

    let (start, mut end) = if low_and_high[0] == "*" || low_and_high[0] == "?" {
        (min, max)
    } else {
        let start = parse_int_or_name(low_and_high[0], field).map_err(invalid)?;
        let end = match low_and_high.len() {
            1 => start,
            2 => parse_int_or_name(low_and_high[1], field).map_err(invalid)?,
            _ => return Err(invalid("too many hyphens".to_string())),
        };
        (start, end)
    };

    let step = match range_and_step.len() {
        1 => 1,
        2 => {
            let step = parse_int(range_and_step[1]).map_err(invalid)?;
            // "N/step" means "from N to the end of the range".
            if single {
                end = max;
            }
            step
        }
        _ => return Err(invalid("too many slashes".to_string())),
    };

    if start < min {
        return Err(invalid(format!(
            "beginning of range ({start}) below minimum ({min})"
        )));
    }
    if end > max {
        return Err(invalid(format!("end of range ({end}) above maximum ({max})")));
    }
    if start > end {
        return Err(invalid(format!(
            "beginning of range ({start}) beyond end of range ({end})"
        )));
    }
    if step == 0 {
        return Err(invalid("step of range should be a positive number".to_string()));
    }

    set.insert_range(start, end, step);
    Ok(())
}

fn parse_int_or_name(token: &str, field: CronField) -> Result<u32, String> {
    let lower = token.to_ascii_lowercase();
    if let Some((_, value)) = field.names().iter().find(|(name, _)| *name == lower) {
        return Ok(*value);
    }
    parse_int(token)
}

fn parse_int(token: &str) -> Result<u32, String> {
    let value: i64 = token
        .parse()
        .map_err(|e| format!("failed to parse int from {token}: {e}"))?;
    if value < 0 {
        return Err(format!("negative number ({value}) not allowed"));
    }
    u32::try_from(value).map_err(|e| format!("failed to parse int from {token}: {e}"))
}

/// Parse a Go-style duration (`"1h30m"`, `"1.5s"`, `"500ms"`) into
/// nanoseconds.
pub fn parse_go_duration(input: &str) -> Result<f64, String> {
    let invalid = || format!("time: invalid duration {input:?}");

    let mut s = input;
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s == "0" {
        return Ok(0.0);
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total = 0.0_f64;
    while !s.is_empty() {
        let number_end = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let number = &s[..number_end];
        if number.is_empty() || number == "." || number.matches('.').count() > 1 {
            return Err(invalid());
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;
        s = &s[number_end..];

        let unit_end = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        let unit = &s[..unit_end];
        let scale = match unit {
            "" => return Err(format!("time: missing unit in duration {input:?}")),
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            other => {
                return Err(format!(
                    "time: unknown unit {other:?} in duration {input:?}"
                ))
            }
        };
        total += value * scale;
        s = &s[unit_end..];
    }

    if total > i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(if negative { -total } else { total })
}

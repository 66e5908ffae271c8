//! Library interface for the kubefield CLI commands

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use kubefield_core::{CheckReport, Engine, EngineConfig, FieldCheck, FieldValue, Rule};
use tracing::{debug, info};

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Rendered command output and whether any check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub failed: bool,
}

/// Load the engine configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            info!("Loading config from {:?}", path);
            EngineConfig::from_path(path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Read a list of field checks from a YAML or JSON file.
pub fn load_checks(path: &Path) -> Result<Vec<FieldCheck>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let checks: Vec<FieldCheck> = if is_json {
        serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()))?
    } else {
        serde_yaml::from_str(&source)
            .with_context(|| format!("Failed to parse {} as YAML", path.display()))?
    };

    debug!(checks = checks.len(), "Loaded checks from {:?}", path);
    Ok(checks)
}

/// Parse a command-line value the way YAML would, so `80` is an integer,
/// `"80"` a string and `{a: b}` a map. An empty argument is the empty string.
pub fn parse_value(raw: &str) -> Result<FieldValue> {
    if raw.is_empty() {
        return Ok(FieldValue::from(""));
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(raw).with_context(|| format!("Failed to parse value {raw:?}"))?;
    Ok(FieldValue::from(value))
}

/// Render a report for humans or machines.
pub fn render_report(report: &CheckReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for outcome in &report.checks {
                for warning in &outcome.diagnostics.warnings {
                    writeln!(out, "warning: {}: {}", outcome.field, warning)?;
                }
                for error in &outcome.diagnostics.errors {
                    writeln!(out, "error: {error}")?;
                }
            }
            writeln!(
                out,
                "{} checks, {} errors, {} warnings",
                report.checks.len(),
                report.total_errors,
                report.total_warnings
            )?;
            Ok(out)
        }
    }
}

/// `kubefield check <FILE>`
pub fn run_check(engine: &Engine, path: &Path, format: OutputFormat) -> Result<Outcome> {
    let checks = load_checks(path)?;
    let report = engine.check_all(&checks);
    Ok(Outcome {
        output: render_report(&report, format)?,
        failed: !report.is_valid(),
    })
}

/// `kubefield validate --rule <RULE> --field <LABEL> <VALUE>`
pub fn run_validate(
    engine: &Engine,
    rule: &str,
    field: &str,
    raw_value: &str,
    format: OutputFormat,
) -> Result<Outcome> {
    let rule: Rule = rule.parse()?;
    let value = parse_value(raw_value)?;
    let report = engine.check_all(&[FieldCheck::new(field, rule, value)]);
    Ok(Outcome {
        output: render_report(&report, format)?,
        failed: !report.is_valid(),
    })
}

/// `kubefield rules`
pub fn render_rules() -> String {
    let rules = Rule::all();
    let width = rules
        .iter()
        .map(|rule| rule.name().len())
        .max()
        .unwrap_or_default();

    rules
        .iter()
        .map(|rule| format!("{:width$}  {}\n", rule.name(), rule.description()))
        .collect()
}

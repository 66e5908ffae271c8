use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kubefield::{load_config, render_rules, run_check, run_validate, Outcome, OutputFormat};
use kubefield_core::Engine;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kubefield")]
#[command(about = "Check configuration values against Kubernetes field rules", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Engine configuration file (TOML)
    #[arg(long, global = true, env = "KUBEFIELD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every check listed in a YAML or JSON file
    Check {
        /// File holding a list of {field, rule, value} entries
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the available rules
    Rules,

    /// Check a single value
    Validate {
        /// Rule name, e.g. labels or int_at_least:1
        #[arg(short, long)]
        rule: String,

        /// Field label used in messages
        #[arg(long, default_value = "value")]
        field: String,

        /// The value, parsed as YAML
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        LevelFilter::TRACE
    } else if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(cli.debug) // Show target module in debug mode
        .init();

    let engine = Engine::new(load_config(cli.config.as_deref())?);

    let outcome = match cli.command {
        Commands::Check { file, format } => run_check(&engine, &file, format)?,
        Commands::Rules => Outcome {
            output: render_rules(),
            failed: false,
        },
        Commands::Validate {
            rule,
            field,
            value,
            format,
        } => run_validate(&engine, &rule, &field, &value, format)?,
    };

    print!("{}", outcome.output);
    Ok(if outcome.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_value(args: &[&str]) -> String {
        match Cli::try_parse_from(args).map(|cli| cli.command) {
            Ok(Commands::Validate { value, .. }) => value,
            Ok(_) => panic!("expected the validate command"),
            Err(e) => panic!("{args:?}: {e}"),
        }
    }

    #[test]
    fn test_validate_accepts_negative_values() {
        let value = validate_value(&["kubefield", "validate", "--rule", "non_negative_int", "-5"]);
        assert_eq!(value, "-5");

        let value = validate_value(&["kubefield", "validate", "-r", "resource_quantity", "-.5Gi"]);
        assert_eq!(value, "-.5Gi");
    }

    #[test]
    fn test_negative_value_fails_the_rule() {
        let value = validate_value(&["kubefield", "validate", "--rule", "non_negative_int", "-5"]);
        let outcome =
            run_validate(&Engine::default(), "non_negative_int", "value", &value, OutputFormat::Text)
                .expect("validate");
        assert!(outcome.failed);
    }
}

mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::assess::AssessArgs;
use commands::analysis::RecordArgs;

/// Solvency risk assessment from financial statements
#[derive(Parser)]
#[command(
    name = "vecthor",
    version,
    about = "Solvency risk assessment from financial statements",
    long_about = "Scores a company-year of financial figures with classical bankruptcy \
                  models (Altman, Springate, Taffler, Fulmer, Grover, Zmijewski, Ohlson), \
                  standard ratios and ESG inputs, and blends them with an optional \
                  external model probability into one banded risk score."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full risk assessment: ratios, distress models, ESG and blended score
    Assess(AssessArgs),
    /// Standard financial ratios
    Ratios(RecordArgs),
    /// Classical distress-model scores and DSCR
    Distress(RecordArgs),
    /// Resolve the ESG signal from rating, sliders or overall score
    Esg(RecordArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Assess(args) => commands::assess::run_assess(args),
        Commands::Ratios(args) => commands::analysis::run_ratios(args),
        Commands::Distress(args) => commands::analysis::run_distress(args),
        Commands::Esg(args) => commands::analysis::run_esg(args),
        Commands::Version => {
            println!("vecthor {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_assess_accepts_ml_probability() {
        let cli = Cli::try_parse_from([
            "vecthor",
            "assess",
            "--input",
            "kestrel.json",
            "--ml-probability",
            "0.35",
            "--ml-calibrated",
        ])
        .unwrap();
        match cli.command {
            Commands::Assess(args) => {
                assert_eq!(args.input.as_deref(), Some("kestrel.json"));
                assert_eq!(args.ml_probability, Some(Decimal::from_str("0.35").unwrap()));
                assert!(args.ml_calibrated);
            }
            _ => panic!("expected the assess subcommand"),
        }
    }

    #[test]
    fn test_ml_calibrated_requires_probability() {
        assert!(Cli::try_parse_from(["vecthor", "assess", "--ml-calibrated"]).is_err());
    }

    #[test]
    fn test_single_stage_subcommands_parse() {
        for name in ["ratios", "distress", "esg"] {
            let cli = Cli::try_parse_from(["vecthor", name, "--input", "record.json", "--output", "table"])
                .unwrap();
            assert!(matches!(cli.output, OutputFormat::Table));
            assert!(!matches!(cli.command, Commands::Assess(_) | Commands::Version));
        }
    }
}

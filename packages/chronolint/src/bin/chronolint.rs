//! chronolint CLI.
//!
//! # Usage
//!
//! ```bash
//! # Lint a tree, human-readable output
//! chronolint ./cmd ./internal
//!
//! # Machine-readable output for CI
//! chronolint --format json .
//!
//! # Extend the signature catalog
//! chronolint --config chronolint.yaml .
//! ```
//!
//! Exit codes: 0 clean, 1 findings, 2 usage or driver error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use chronolint::{
    AnalyzerRegistry, CatalogConfig, Driver, DriverOptions, SignatureCatalog, UnixUtcAnalyzer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "chronolint")]
#[command(
    about = "Flags epoch-built time values serialized without UTC normalization",
    long_about = None
)]
struct Cli {
    /// Files or directories to analyze
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// YAML file with additional catalog entries
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip *_test.go files
    #[arg(long)]
    skip_tests: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = match cli.config.as_deref().map(CatalogConfig::load).transpose() {
        Ok(Some(config)) => SignatureCatalog::with_config(&config),
        Ok(None) => SignatureCatalog::new(),
        Err(err) => {
            eprintln!("chronolint: {err}");
            return ExitCode::from(2);
        }
    };

    let registry =
        AnalyzerRegistry::new().register(Box::new(UnixUtcAnalyzer::with_catalog(catalog)));
    let driver = Driver::with_options(
        registry,
        DriverOptions {
            skip_tests: cli.skip_tests,
        },
    );

    let diagnostics = match driver.run(&cli.paths) {
        Ok(diagnostics) => diagnostics,
        Err(err) => {
            eprintln!("chronolint: {err}");
            return ExitCode::from(2);
        }
    };

    match cli.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&diagnostics) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("chronolint: {err}");
                return ExitCode::from(2);
            }
        },
        OutputFormat::Text => {
            for diag in &diagnostics {
                println!(
                    "{}:{}: {}: {} [{}]",
                    diag.path,
                    diag.span,
                    diag.severity.as_str(),
                    diag.message,
                    diag.analyzer
                );
                if let Some(fix) = &diag.fix {
                    println!("  suggested fix: insert {:?} at byte {}", fix.text, fix.insert_at);
                }
            }
        }
    }

    if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

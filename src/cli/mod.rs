//! Command-line interface for the product photo standardizer
//!
//! Usage: `productshot <input> <grade> <output_path>` where `<input>` is an
//! HTTP(S) URL or a local file path, `<grade>` is a single-letter condition
//! code (S/A/B/V composite a badge, anything else is accepted without one),
//! and `<output_path>` is where the standardized JPEG is written.

use crate::config::StudioConfig;
use crate::loader::ImageSource;
use crate::processor::ProductShotProcessor;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Product photo standardizer for e-commerce listings
#[derive(Parser)]
#[command(name = "productshot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input image: HTTP(S) URL or local file path
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Grade code (first letter used, case-insensitive; S/A/B/V have badges)
    #[arg(value_name = "GRADE")]
    pub grade: String,

    /// Output path for the standardized JPEG
    #[arg(value_name = "OUTPUT_PATH")]
    pub output: PathBuf,

    /// Directory holding the grade badge assets
    /// [default: assets/grades next to the executable]
    #[arg(long, value_name = "DIR")]
    pub badge_dir: Option<PathBuf>,

    /// Path to an ONNX segmentation model (requires the `tract` feature;
    /// without it, or when the file is missing, the background is kept)
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Enable verbose logging (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Map repeated `-v` flags to a tracing filter
fn verbosity_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(verbosity)));
    // Diagnostics go to stderr; stdout is reserved for the result line
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute(cli: &Cli) -> Result<PathBuf> {
    let mut builder = StudioConfig::builder();
    if let Some(dir) = &cli.badge_dir {
        builder = builder.badge_dir(dir);
    }
    if let Some(model) = &cli.model {
        builder = builder.model_path(model);
    }
    let config = builder.build()?;

    let processor = ProductShotProcessor::new(config)?;
    let source = ImageSource::parse(&cli.input);
    let output = processor.process(&source, &cli.grade, &cli.output)?;
    Ok(output)
}

/// CLI entry point
///
/// Exit status follows the contract: 0 with `Success: <path>` on stdout;
/// 1 with a usage message on stdout for missing arguments; 1 with
/// `Error: <description>` on stderr for any fatal pipeline error.
#[must_use]
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = err.print();
                return ExitCode::SUCCESS;
            }
            // Argument errors report usage on stdout, per the invocation
            // contract
            println!("Usage: productshot <INPUT> <GRADE> <OUTPUT_PATH>");
            println!("{err}");
            return ExitCode::FAILURE;
        },
    };

    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(output) => {
            println!("Success: {}", output.display());
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_positional_arguments() {
        let cli = Cli::try_parse_from([
            "productshot",
            "https://example.com/item.jpg",
            "S",
            "/tmp/out.jpg",
        ])
        .unwrap();

        assert_eq!(cli.input, "https://example.com/item.jpg");
        assert_eq!(cli.grade, "S");
        assert_eq!(cli.output, PathBuf::from("/tmp/out.jpg"));
        assert_eq!(cli.verbose, 0);
        assert!(cli.badge_dir.is_none());
    }

    #[test]
    fn test_cli_rejects_missing_arguments() {
        assert!(Cli::try_parse_from(["productshot"]).is_err());
        assert!(Cli::try_parse_from(["productshot", "input.jpg"]).is_err());
        assert!(Cli::try_parse_from(["productshot", "input.jpg", "S"]).is_err());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "productshot",
            "item.png",
            "b",
            "out.jpg",
            "--badge-dir",
            "/opt/badges",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.badge_dir, Some(PathBuf::from("/opt/badges")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_verbosity_filter_mapping() {
        assert_eq!(verbosity_filter(0), "warn");
        assert_eq!(verbosity_filter(1), "info");
        assert_eq!(verbosity_filter(2), "debug");
        assert_eq!(verbosity_filter(9), "trace");
    }
}

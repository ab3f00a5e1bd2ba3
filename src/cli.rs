//! Command-line entry point: argument parsing, logging setup, and exit codes.

use crate::config::ReportConfig;
use crate::model::{is_valid_domain, records_from_json, AssessmentMetadata, PayloadSummary};
use crate::report::composer::ReportComposer;
use crate::ReportError;
use clap::error::ErrorKind;
use clap::Parser;
use log::LevelFilter;
use std::ffi::OsString;
use std::path::PathBuf;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_DOMAIN: u8 = 2;

pub const LOG_LEVELS: [&str; 5] = ["debug", "info", "warning", "error", "critical"];

#[derive(Parser, Debug)]
#[command(
    name = "tpt-reports",
    version,
    about = "Create a technical payload testing (TPT) PDF report"
)]
pub struct Cli {
    /// One of debug, info, warning, error, critical
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", env = "TPT_REPORTS_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(value_name = "ASSESSMENT_ID")]
    pub assessment_id: String,

    #[arg(value_name = "ELECTION_NAME")]
    pub election_name: String,

    #[arg(value_name = "DOMAIN_TESTED")]
    pub domain_tested: String,

    /// Payload results: an array of records or an object with a `payloads` array
    #[arg(value_name = "JSON_FILE")]
    pub json_file: PathBuf,

    #[arg(value_name = "OUTPUT_DIRECTORY")]
    pub output_directory: PathBuf,
}

pub fn parse_log_level(level: &str) -> Option<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warning" => Some(LevelFilter::Warn),
        "error" | "critical" => Some(LevelFilter::Error),
        _ => None,
    }
}

/// Parses `args` and runs the command. `--version` prints the bare version
/// string. Returns the process exit code.
pub fn run_from<I, T>(args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => run(cli),
        Err(err) if err.kind() == ErrorKind::DisplayVersion => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            EXIT_SUCCESS
        }
        Err(err) => {
            let _ = err.print();
            u8::try_from(err.exit_code()).unwrap_or(EXIT_FAILURE)
        }
    }
}

/// Runs the command and returns the process exit code.
pub fn run(cli: Cli) -> u8 {
    let Some(level) = parse_log_level(&cli.log_level) else {
        eprintln!(
            "Invalid log level '{}'; expected one of: {}",
            cli.log_level,
            LOG_LEVELS.join(", ")
        );
        return EXIT_FAILURE;
    };
    let _ = env_logger::Builder::default()
        .filter_level(level)
        .parse_env(env_logger::Env::default().filter("TPT_REPORTS_LOG"))
        .try_init();

    if !is_valid_domain(&cli.domain_tested) {
        log::error!("'{}' is not a valid domain", cli.domain_tested);
        return EXIT_INVALID_DOMAIN;
    }

    match generate(&cli) {
        Ok(path) => {
            log::info!("Report written to {}", path.display());
            EXIT_SUCCESS
        }
        Err(err) => {
            log::error!("Failed to generate report: {}", err);
            EXIT_FAILURE
        }
    }
}

fn generate(cli: &Cli) -> Result<PathBuf, ReportError> {
    let config = match &cli.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };

    log::debug!("Reading payload results from {}", cli.json_file.display());
    let text = std::fs::read_to_string(&cli.json_file).map_err(|e| {
        ReportError::Argument(format!("cannot read {}: {}", cli.json_file.display(), e))
    })?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let records = records_from_json(&value)?;

    let metadata = AssessmentMetadata {
        assessment_id: cli.assessment_id.clone(),
        domain_tested: cli.domain_tested.clone(),
        election_name: cli.election_name.clone(),
        output_directory: cli.output_directory.clone(),
        payload_summary: PayloadSummary::from_records(&records),
    };

    let template = ReportComposer::with_config(config).compose(&metadata, &records)?;
    Ok(template.filename().to_path_buf())
}

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use llmd_dataset_rust::config::AppConfig;
use llmd_dataset_rust::logging::init_logging;
use llmd_dataset_rust::Converter;

/// Convert JSON/YAML conversation files to SQLite database
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to folder containing conversation files
    data_folder_path: PathBuf,

    /// Path for output SQLite database file
    db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides configuration
    #[arg(long)]
    log_level: Option<String>,

    /// Also write JSON logs to a daily-rotated file at this path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {e:#}");
            }
            return ExitCode::FAILURE;
        }
    };

    let log_file = config.logging.file_path.as_ref().map(PathBuf::from);
    let _guard = match init_logging(Some(&config.get_log_level()), log_file.as_deref(), &config.logging.format) {
        Ok(guard) => guard,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {e:#}");
            }
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load configuration and apply command-line overrides
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load()?;

    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(file) = &cli.log_file {
        config.logging.file_path = Some(file.display().to_string());
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli, config: &AppConfig) -> Result<()> {
    info!(
        source = %cli.data_folder_path.display(),
        destination = %cli.db_path.display(),
        "Starting conversion"
    );

    Converter::new()
        .convert(&cli.data_folder_path, &cli.db_path, &config.database)
        .with_context(|| format!("Failed to convert {}", cli.data_folder_path.display()))?;

    Ok(())
}

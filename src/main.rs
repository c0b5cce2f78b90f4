use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

use trainsum::batch::load_packages;
use trainsum::export::{self, json};
use trainsum::logging::init_logging;
use trainsum::{
    create_record, AppConfig, BatchProcessor, BatchReport, ErrorPolicy, ExportFormat,
    InputFormat, LogLevel, OutputFormat, Package, Summary, TrainSumError,
};

/// Batches larger than this get a progress spinner
const SPINNER_THRESHOLD: usize = 10_000;

/// trainsum - Training summaries from fitness-tracker readings
///
/// Converts step/stroke counts, duration and body weight into distance,
/// average speed and calories for running, race walking and swimming.
#[derive(Parser)]
#[command(name = "trainsum")]
#[command(version)]
#[command(about = "Training summaries from fitness-tracker readings", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format (text, table, json, csv)
    #[arg(short = 'o', long, global = true)]
    output_format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the built-in sample readings
    Sample,

    /// Compute a single reading
    Calc {
        /// Activity code (SWM, RUN, WLK)
        code: String,

        /// Positional parameters: action, duration_h, weight_kg[, height_cm | pool_length_m, pool_laps]
        #[arg(allow_negative_numbers = true, num_args = 0..)]
        params: Vec<f64>,
    },

    /// Process a batch file of readings
    Batch {
        /// Input file path (JSON or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Input format (auto-detect from extension if not specified)
        #[arg(short = 'f', long)]
        format: Option<String>,

        /// Write the batch report to this file (format from extension)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Process packages in parallel
        #[arg(long)]
        parallel: bool,

        /// Stop at the first invalid package
        #[arg(long)]
        fail_fast: bool,
    },

    /// Manage the configuration file
    Config {
        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,

        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Print the configuration file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Activity")]
    activity: String,
    #[tabled(rename = "Duration (h)")]
    duration: String,
    #[tabled(rename = "Distance (km)")]
    distance: String,
    #[tabled(rename = "Avg speed (km/h)")]
    speed: String,
    #[tabled(rename = "Calories")]
    calories: String,
}

impl From<&Summary> for SummaryRow {
    fn from(summary: &Summary) -> Self {
        SummaryRow {
            activity: summary.activity_name().to_string(),
            duration: format!("{:.2}", summary.duration_h()),
            distance: format!("{:.2}", summary.distance_km()),
            speed: format!("{:.2}", summary.mean_speed_kmh()),
            calories: format!("{:.2}", summary.calories_kcal()),
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.logging.level = LogLevel::from_verbosity(config.logging.level, cli.verbose);
    init_logging(&config.logging)?;

    if let Some(path) = cli.config.as_deref().filter(|p| !p.exists()) {
        if !matches!(cli.command, Commands::Config { init: true, .. }) {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
        }
    }

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli.output_format.unwrap_or(config.output.format);

    match cli.command {
        Commands::Sample => {
            let report = config.batch.processor().process(&Package::sample_dataset())?;
            print_report(&report, format)?;
            Ok(exit_code(&report))
        }

        Commands::Calc { code, params } => match create_record(&code, &params) {
            Ok(record) => {
                print_summaries(&[record.summarize()], format)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                let err = TrainSumError::from(err);
                err.log("Rejected reading");
                eprintln!("{} {}", "invalid reading:".yellow().bold(), err.user_message());
                Ok(ExitCode::from(2))
            }
        },

        Commands::Batch {
            file,
            format: input_format,
            output,
            parallel,
            fail_fast,
        } => {
            let input_format = input_format
                .as_deref()
                .map(InputFormat::from_str)
                .transpose()?;
            let packages = load_packages(&file, input_format)?;

            let policy = if fail_fast {
                ErrorPolicy::Abort
            } else {
                config.batch.error_policy
            };
            let processor = BatchProcessor::new(policy, parallel || config.batch.parallel);

            let spinner = (packages.len() > SPINNER_THRESHOLD && io::stderr().is_terminal())
                .then(|| processing_spinner(packages.len()));
            let result = processor.process(&packages);
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            let report = result?;

            if let Some(path) = output {
                let export_format = ExportFormat::from_path(&path)?;
                export::export_report(&report, &path, export_format)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                eprintln!(
                    "{}",
                    format!("✓ Report written to {}", path.display()).green()
                );
            }

            print_report(&report, format)?;
            Ok(exit_code(&report))
        }

        Commands::Config {
            init,
            force,
            show,
            path,
        } => {
            let config_path = cli
                .config
                .clone()
                .unwrap_or_else(AppConfig::default_config_path);

            if path {
                println!("{}", config_path.display());
            }
            if init {
                if config_path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        config_path.display()
                    );
                }
                let mut fresh = AppConfig::default();
                fresh.save_to_file(&config_path)?;
                println!(
                    "{}",
                    format!("✓ Configuration written to {}", config_path.display()).green()
                );
            }
            if show || !(init || path) {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn processing_spinner(count: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Processing {} packages...", count));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn exit_code(report: &BatchReport) -> ExitCode {
    if report.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn print_summaries(summaries: &[Summary], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for summary in summaries {
                println!("{}", summary.to_string().cyan());
            }
        }
        OutputFormat::Table => {
            let rows: Vec<SummaryRow> = summaries.iter().map(SummaryRow::from).collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        OutputFormat::Json => json::write_json(summaries, io::stdout().lock())?,
        OutputFormat::Csv => export::csv::write_summaries(summaries, io::stdout().lock())?,
    }

    Ok(())
}

fn print_report(report: &BatchReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::write_json(report, io::stdout().lock())?,
        OutputFormat::Csv => export::csv::write_report(report, io::stdout().lock())?,
        OutputFormat::Text | OutputFormat::Table => {
            let summaries: Vec<Summary> = report.summaries().cloned().collect();
            print_summaries(&summaries, format)?;

            for outcome in report.outcomes.iter().filter(|o| !o.is_success()) {
                eprintln!(
                    "{} package {} ({}): {}",
                    "skipped".yellow().bold(),
                    outcome.index,
                    outcome.code,
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }

            if report.failed > 0 {
                eprintln!(
                    "{}",
                    format!(
                        "{} processed, {} skipped",
                        report.succeeded, report.failed
                    )
                    .dimmed()
                );
            }
        }
    }

    Ok(())
}

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meteo-normalizer")]
#[command(about = "Normalize weather-station staging rows into cleaned, failed and raw partitions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Append logs to this file instead of stderr")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one batch over every configured source
    Run {
        #[arg(short, long, env = "CONFIG", help = "Pipeline configuration file")]
        config: PathBuf,

        #[arg(
            short,
            long,
            help = "Partition date (YYYY-MM-DD) [default: today in the civil timezone]"
        )]
        date: Option<NaiveDate>,

        #[arg(short, long, help = "Write the run summary as JSON to this path")]
        report: Option<PathBuf>,

        #[arg(long, help = "Classify rows without writing partitions or rotating staging")]
        dry_run: bool,

        #[arg(short, long, help = "Hide progress bars")]
        quiet: bool,
    },

    /// Load and validate the configuration, then print the resolved setup
    CheckConfig {
        #[arg(short, long, env = "CONFIG")]
        config: PathBuf,
    },

    /// Clean a single raw measurement with the configured canonical unit
    Clean {
        #[arg(short, long, env = "CONFIG")]
        config: PathBuf,

        #[arg(short, long, help = "Measurement column, e.g. temperature")]
        field: String,

        #[arg(long, help = "Raw value as found in staging, e.g. \"68 F\"")]
        value: String,

        #[arg(long, help = "Raw wind speed, used when cleaning wind_direction")]
        wind_speed: Option<String>,
    },
}

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cleaners::{clean_direction, TimestampNormalizer, UnitRegistry};
use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::cleaned::Conversion;
use crate::models::schema::Field;
use crate::processors::Pipeline;
use crate::readers::StagingReader;

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Run {
            config,
            date,
            report,
            dry_run,
            quiet,
        } => {
            let config = PipelineConfig::load(&config)?;

            let mut pipeline = Pipeline::new(config)?
                .with_dry_run(dry_run)
                .with_silent(quiet);
            if let Some(date) = date {
                pipeline = pipeline.with_run_date(date);
            }

            let summary = pipeline.run()?;
            println!("{}", summary.generate_summary());

            if let Some(path) = report {
                let file = File::create(&path)?;
                serde_json::to_writer_pretty(file, &summary)?;
                info!("Run report written to {}", path.display());
            }

            if summary.io_errors() > 0 {
                warn!(
                    "{} source(s) aborted; unrouted rows were kept in staging",
                    summary.io_errors()
                );
            }
        }

        Commands::CheckConfig { config } => {
            let config = PipelineConfig::load(&config)?;
            let units = UnitRegistry::from_config(&config.units)?;
            let timestamps = TimestampNormalizer::from_name(&config.civil_timezone)?;

            println!("Configuration OK");
            println!("Farms: 1..={}", config.farm_count);
            println!("Civil timezone: {}", timestamps.timezone());
            println!("Canonical units:");
            for field in Field::ALL {
                if let Some(unit) = units.canonical(field) {
                    println!("  {:<16} {}", field.name(), unit.symbol());
                }
            }

            println!("Sources:");
            for (source, source_config) in config.sources()? {
                StagingReader::for_label(&source_config.encoding)?;
                println!(
                    "  {} ({:?} timestamps, {})",
                    source,
                    source.timestamp_format(),
                    source_config.encoding
                );
                println!("    staging: {}", source_config.staging.display());
                println!("    raw:     {}", source_config.raw.display());
                println!("    cleaned: {}", source_config.cleaned.display());
                println!("    failed:  {}", source_config.failed.display());
            }
        }

        Commands::Clean {
            config,
            field,
            value,
            wind_speed,
        } => {
            let config = PipelineConfig::load(&config)?;
            let units = UnitRegistry::from_config(&config.units)?;
            let field: Field = field.parse()?;

            let conversion = match field {
                Field::WindDirection => {
                    let speed = units.clean(Field::WindSpeed, wind_speed.as_deref()).value();
                    clean_direction(Some(&value), speed)
                }
                f if f.is_basic() => {
                    return Err(ProcessingError::InvalidFormat(format!(
                        "'{}' is not a measurement column",
                        f
                    )));
                }
                f => units.clean(f, Some(&value)),
            };

            match conversion {
                Conversion::Value(v) => println!("{} = {}", field, v),
                Conversion::Missing => println!("{} = null", field),
                Conversion::Invalid { raw } => println!("{}: cannot convert '{}'", field, raw),
            }
        }
    }

    Ok(())
}

/// Initialise tracing; `RUST_LOG` takes precedence over `--verbose`
pub fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("meteo_normalizer={}", log_level)));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
                .map_err(|e| ProcessingError::InvalidConfig(format!("Logging setup failed: {}", e)))?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_level(true)
                        .with_timer(fmt::time::uptime())
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| ProcessingError::InvalidConfig(format!("Logging setup failed: {}", e)))?;
        }
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

//! Pipeline configuration.
//!
//! Loaded once per process from a file (YAML, TOML or JSON) with
//! `METEO_NORMALIZER__*` environment overrides, validated, and then handed to
//! each component as an immutable value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::schema::{Field, BASIC_FIELDS, MEASUREMENT_FIELDS};
use crate::models::source::SourceKind;
use crate::utils::constants::{CONFIG_ENV_PREFIX, DEFAULT_CIVIL_TIMEZONE, DEFAULT_STAGING_ENCODING};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Number of farms; farm indices run from 1 to this value
    #[validate(range(min = 1))]
    pub farm_count: u32,

    #[serde(default = "default_civil_timezone")]
    #[validate(length(min = 1))]
    pub civil_timezone: String,

    #[validate(nested)]
    pub units: UnitsConfig,

    #[serde(default)]
    pub schema: Option<SchemaConfig>,

    pub sources: BTreeMap<String, SourceConfig>,
}

/// Canonical unit label per quantity; optional quantities are disabled when absent
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnitsConfig {
    #[validate(length(min = 1))]
    pub temperature: String,
    #[validate(length(min = 1))]
    pub humidity: String,
    #[validate(length(min = 1))]
    pub wind_speed: String,
    #[validate(length(min = 1))]
    pub wind_direction: String,
    #[validate(length(min = 1))]
    pub precipitation: String,
    #[validate(length(min = 1))]
    pub pressure: String,
    #[serde(default)]
    pub dew_point: Option<String>,
    #[serde(default)]
    pub heat_index: Option<String>,
    #[serde(default)]
    pub wind_chill: Option<String>,
    #[serde(default)]
    pub solar_radiation: Option<String>,
}

/// Column lists as deployed; must agree with the built-in schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub basic: Vec<String>,
    pub measurements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    pub staging: PathBuf,
    pub raw: PathBuf,
    pub cleaned: PathBuf,
    pub failed: PathBuf,

    #[serde(default = "default_staging_encoding")]
    #[validate(length(min = 1))]
    pub encoding: String,
}

fn default_civil_timezone() -> String {
    DEFAULT_CIVIL_TIMEZONE.to_string()
}

fn default_staging_encoding() -> String {
    DEFAULT_STAGING_ENCODING.to_string()
}

impl PipelineConfig {
    /// Load from a config file, layering environment overrides on top
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.check()?;

        debug!(
            "Loaded configuration from {} ({} sources)",
            path.display(),
            config.sources.len()
        );
        Ok(config)
    }

    /// Structural checks beyond what deserialization enforces
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        for (key, source) in &self.sources {
            key.parse::<SourceKind>()?;
            source.validate()?;
            for path in [&source.staging, &source.raw, &source.cleaned, &source.failed] {
                if path.as_os_str().is_empty() {
                    return Err(ProcessingError::InvalidConfig(format!(
                        "Source '{}' has an empty path",
                        key
                    )));
                }
            }
        }

        if let Some(schema) = &self.schema {
            check_columns("basic", &schema.basic, &BASIC_FIELDS)?;
            check_columns("measurement", &schema.measurements, &MEASUREMENT_FIELDS)?;
        }

        Ok(())
    }

    /// Configured sources in deterministic order
    pub fn sources(&self) -> Result<Vec<(SourceKind, &SourceConfig)>> {
        self.sources
            .iter()
            .map(|(key, source)| Ok((key.parse::<SourceKind>()?, source)))
            .collect()
    }
}

fn check_columns(group: &str, configured: &[String], expected: &[Field]) -> Result<()> {
    let matches = configured.len() == expected.len()
        && configured
            .iter()
            .zip(expected)
            .all(|(name, field)| name.trim().eq_ignore_ascii_case(field.name()));

    if matches {
        Ok(())
    } else {
        Err(ProcessingError::InvalidConfig(format!(
            "Configured {} fields {:?} do not match schema {:?}",
            group,
            configured,
            expected.iter().map(|f| f.name()).collect::<Vec<_>>()
        )))
    }
}

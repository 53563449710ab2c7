//! Shared fixtures for unit tests.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{PipelineConfig, SourceConfig, UnitsConfig};
use crate::models::raw_row::RawRow;

pub fn sample_units() -> UnitsConfig {
    UnitsConfig {
        temperature: "c".to_string(),
        humidity: "%".to_string(),
        wind_speed: "km/h".to_string(),
        wind_direction: "deg".to_string(),
        precipitation: "mm".to_string(),
        pressure: "hpa".to_string(),
        dew_point: Some("c".to_string()),
        heat_index: Some("c".to_string()),
        wind_chill: Some("c".to_string()),
        solar_radiation: Some("w/m2".to_string()),
    }
}

pub fn sample_config() -> PipelineConfig {
    PipelineConfig {
        farm_count: 4,
        civil_timezone: "Europe/Athens".to_string(),
        units: sample_units(),
        schema: None,
        sources: BTreeMap::new(),
    }
}

/// Source layout rooted in a scratch directory
pub fn source_config(root: &Path, key: &str) -> SourceConfig {
    SourceConfig {
        staging: root.join("staging").join(format!("{}.csv", key)),
        raw: root.join("raw").join(key),
        cleaned: root.join("cleaned").join(key),
        failed: root.join("failed").join(key),
        encoding: "utf-8".to_string(),
    }
}

pub fn raw_row(cells: &[&str]) -> RawRow {
    RawRow::new(2, cells.iter().map(|c| c.to_string()).collect())
}

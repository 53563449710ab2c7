use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Identity and location columns, in canonical order
pub const BASIC_FIELDS: [Field; 6] = [
    Field::Farm,
    Field::Source,
    Field::Timestamp,
    Field::CrawlTime,
    Field::City,
    Field::Region,
];

/// Measurement columns, in canonical order
pub const MEASUREMENT_FIELDS: [Field; 10] = [
    Field::Temperature,
    Field::Humidity,
    Field::WindSpeed,
    Field::WindDirection,
    Field::Precipitation,
    Field::Pressure,
    Field::DewPoint,
    Field::HeatIndex,
    Field::WindChill,
    Field::SolarRadiation,
];

pub const SCHEMA_LEN: usize = BASIC_FIELDS.len() + MEASUREMENT_FIELDS.len();

/// One column of the canonical station-reading schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Farm,
    Source,
    Timestamp,
    CrawlTime,
    City,
    Region,
    Temperature,
    Humidity,
    WindSpeed,
    WindDirection,
    Precipitation,
    Pressure,
    DewPoint,
    HeatIndex,
    WindChill,
    SolarRadiation,
}

impl Field {
    pub const ALL: [Field; SCHEMA_LEN] = [
        Field::Farm,
        Field::Source,
        Field::Timestamp,
        Field::CrawlTime,
        Field::City,
        Field::Region,
        Field::Temperature,
        Field::Humidity,
        Field::WindSpeed,
        Field::WindDirection,
        Field::Precipitation,
        Field::Pressure,
        Field::DewPoint,
        Field::HeatIndex,
        Field::WindChill,
        Field::SolarRadiation,
    ];

    /// Position of this column in a staging or partition row
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Farm => "farm",
            Field::Source => "source",
            Field::Timestamp => "timestamp",
            Field::CrawlTime => "crawl_time",
            Field::City => "city",
            Field::Region => "region",
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::WindSpeed => "wind_speed",
            Field::WindDirection => "wind_direction",
            Field::Precipitation => "precipitation",
            Field::Pressure => "pressure",
            Field::DewPoint => "dew_point",
            Field::HeatIndex => "heat_index",
            Field::WindChill => "wind_chill",
            Field::SolarRadiation => "solar_radiation",
        }
    }

    pub fn is_basic(self) -> bool {
        self.index() < BASIC_FIELDS.len()
    }

    /// Measurements that every accepted row must carry
    pub fn is_required_measurement(self) -> bool {
        matches!(
            self,
            Field::Temperature
                | Field::Humidity
                | Field::WindSpeed
                | Field::WindDirection
                | Field::Precipitation
                | Field::Pressure
        )
    }

    /// Measurements where null is acceptable
    pub fn is_optional_measurement(self) -> bool {
        !self.is_basic() && !self.is_required_measurement()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Field::ALL
            .into_iter()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| ProcessingError::InvalidFormat(format!("Unknown field: '{}'", s)))
    }
}

/// Canonical header row: basic fields first, measurements second
pub fn header() -> Vec<&'static str> {
    Field::ALL.iter().map(|f| f.name()).collect()
}

/// True when a staging record is a header rather than a reading.
///
/// Column labels are compared ignoring case, with spaces and hyphens read as
/// underscores (`Crawl Time` matches `crawl_time`). A record whose farm cell
/// is the bare label `farm` is also a header: no farm reading can be unnumbered.
pub fn is_header_record<S: AsRef<str>>(record: &[S]) -> bool {
    let Some(first) = record.first() else {
        return false;
    };
    if normalize_label(first.as_ref()) == Field::Farm.name() {
        return true;
    }

    record.len() == SCHEMA_LEN
        && record
            .iter()
            .zip(Field::ALL)
            .all(|(cell, field)| normalize_label(cell.as_ref()) == field.name())
}

fn normalize_label(cell: &str) -> String {
    cell.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

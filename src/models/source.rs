use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Native timestamp representation written by an upstream source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimestampFormat {
    /// Seconds since the Unix epoch, UTC
    EpochSeconds,
    /// `2:30 PM on June 21, 2024 EEST`
    TwelveHourWithZone,
    /// `21/06/2024 14:30`
    DayMonthYear,
    /// `2024-06-21 14:30:00`
    YearMonthDaySeconds,
}

/// Known upstream providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Soda,
    OpenMeteo,
    OpenWeatherMap,
    #[serde(rename = "wu")]
    WeatherUnderground,
    Meteo,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Soda,
        SourceKind::OpenMeteo,
        SourceKind::OpenWeatherMap,
        SourceKind::WeatherUnderground,
        SourceKind::Meteo,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SourceKind::Soda => "soda",
            SourceKind::OpenMeteo => "open-meteo",
            SourceKind::OpenWeatherMap => "open-weather-map",
            SourceKind::WeatherUnderground => "wu",
            SourceKind::Meteo => "meteo",
        }
    }

    pub fn timestamp_format(self) -> TimestampFormat {
        match self {
            SourceKind::Soda => TimestampFormat::YearMonthDaySeconds,
            SourceKind::OpenMeteo | SourceKind::OpenWeatherMap => TimestampFormat::EpochSeconds,
            SourceKind::WeatherUnderground => TimestampFormat::TwelveHourWithZone,
            SourceKind::Meteo => TimestampFormat::DayMonthYear,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SourceKind {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.key() == wanted)
            .ok_or_else(|| ProcessingError::UnknownSource(s.to_string()))
    }
}

/// Output dataset a row is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Raw,
    Cleaned,
    Failed,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Raw => f.write_str("raw"),
            DatasetKind::Cleaned => f.write_str("cleaned"),
            DatasetKind::Failed => f.write_str("failed"),
        }
    }
}

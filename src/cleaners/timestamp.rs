use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;

use crate::error::{ProcessingError, Result};
use crate::models::source::{SourceKind, TimestampFormat};
use crate::utils::constants::CANONICAL_TIMESTAMP_FORMAT;

const TWELVE_HOUR_FORMAT: &str = "%I:%M %p on %B %d, %Y";
const DAY_MONTH_YEAR_FORMAT: &str = "%d/%m/%Y %H:%M";
const YEAR_MONTH_DAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts each source's native timestamp into canonical local civil time
#[derive(Debug, Clone, Copy)]
pub struct TimestampNormalizer {
    timezone: Tz,
}

impl TimestampNormalizer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Build from an IANA timezone name such as `Europe/Athens`
    pub fn from_name(name: &str) -> Result<Self> {
        let timezone = name
            .trim()
            .parse::<Tz>()
            .map_err(|e| ProcessingError::InvalidTimezone(format!("{}: {}", name, e)))?;
        Ok(Self::new(timezone))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Canonical `YYYY-MM-DD HH:MM:SS.ffffff` string, or `None` when the raw
    /// value does not match the source's declared format. No fallback formats
    /// are tried.
    pub fn normalize(&self, source: SourceKind, raw: &str) -> Option<String> {
        self.parse_local(source.timestamp_format(), raw)
            .map(|local| local.format(CANONICAL_TIMESTAMP_FORMAT).to_string())
    }

    /// Parse into local civil time according to one declared format
    pub fn parse_local(&self, format: TimestampFormat, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        match format {
            TimestampFormat::EpochSeconds => {
                let seconds = raw.parse::<i64>().ok()?;
                let utc = DateTime::from_timestamp(seconds, 0)?;
                Some(utc.with_timezone(&self.timezone).naive_local())
            }
            TimestampFormat::TwelveHourWithZone => {
                NaiveDateTime::parse_from_str(strip_zone_abbreviation(raw), TWELVE_HOUR_FORMAT)
                    .ok()
            }
            TimestampFormat::DayMonthYear => {
                NaiveDateTime::parse_from_str(raw, DAY_MONTH_YEAR_FORMAT).ok()
            }
            TimestampFormat::YearMonthDaySeconds => {
                NaiveDateTime::parse_from_str(raw, YEAR_MONTH_DAY_FORMAT).ok()
            }
        }
    }
}

/// Drop a trailing timezone abbreviation (`EEST`, `EET`, `UTC`)
fn strip_zone_abbreviation(raw: &str) -> &str {
    match raw.rsplit_once(char::is_whitespace) {
        Some((head, tail))
            if (2..=5).contains(&tail.len())
                && tail.chars().all(|c| c.is_ascii_uppercase())
                && tail != "AM"
                && tail != "PM" =>
        {
            head.trim_end()
        }
        _ => raw,
    }
}

use tracing::debug;

use crate::cleaners::{clean_direction, clean_farm, clean_text, TimestampNormalizer, UnitRegistry};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::cleaned::{CleanedField, CleanedRow, Conversion, FieldValue};
use crate::models::raw_row::RawRow;
use crate::models::schema::Field;
use crate::models::source::SourceKind;
use crate::processors::derived_metrics::DerivedMetricCalculator;

/// Runs every field cleaner over one full-length staging row
#[derive(Debug, Clone, Copy)]
pub struct RowCleaner {
    farm_count: u32,
    units: UnitRegistry,
    timestamps: TimestampNormalizer,
    derived: DerivedMetricCalculator,
}

impl RowCleaner {
    pub fn new(farm_count: u32, units: UnitRegistry, timestamps: TimestampNormalizer) -> Self {
        Self {
            farm_count,
            units,
            timestamps,
            derived: DerivedMetricCalculator::new(units),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(
            config.farm_count,
            UnitRegistry::from_config(&config.units)?,
            TimestampNormalizer::from_name(&config.civil_timezone)?,
        ))
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn timestamps(&self) -> &TimestampNormalizer {
        &self.timestamps
    }

    /// Clean all columns. Never fails: unusable values come back as invalid
    /// fields. Derived metrics use the cleaned inputs, not the raw strings.
    pub fn clean(&self, source: SourceKind, raw: &RawRow) -> CleanedRow {
        let farm = clean_farm(raw.value(Field::Farm), self.farm_count);
        let timestamp = self.clean_timestamp(source, raw.value(Field::Timestamp));

        let temperature = self.units.clean(Field::Temperature, raw.value(Field::Temperature));
        let humidity = self.units.clean(Field::Humidity, raw.value(Field::Humidity));
        let wind_speed = self.units.clean(Field::WindSpeed, raw.value(Field::WindSpeed));
        let wind_direction = clean_direction(raw.value(Field::WindDirection), wind_speed.value());
        let precipitation = self
            .units
            .clean(Field::Precipitation, raw.value(Field::Precipitation));
        let pressure = self.units.clean(Field::Pressure, raw.value(Field::Pressure));
        let dew_point = self.units.clean(Field::DewPoint, raw.value(Field::DewPoint));
        let heat_index = self.derived.heat_index(
            raw.value(Field::HeatIndex).is_some(),
            temperature.value(),
            humidity.value(),
        );
        let wind_chill = self.derived.wind_chill(
            raw.value(Field::WindChill).is_some(),
            temperature.value(),
            wind_speed.value(),
        );
        let solar_radiation = self
            .units
            .clean(Field::SolarRadiation, raw.value(Field::SolarRadiation));

        let measurements = [
            (Field::Temperature, temperature),
            (Field::Humidity, humidity),
            (Field::WindSpeed, wind_speed),
            (Field::WindDirection, wind_direction),
            (Field::Precipitation, precipitation),
            (Field::Pressure, pressure),
            (Field::DewPoint, dew_point),
            (Field::HeatIndex, heat_index),
            (Field::WindChill, wind_chill),
            (Field::SolarRadiation, solar_radiation),
        ];

        let mut fields = vec![
            farm,
            clean_text(Field::Source, raw.value(Field::Source)),
            timestamp,
            clean_text(Field::CrawlTime, raw.value(Field::CrawlTime)),
            clean_text(Field::City, raw.value(Field::City)),
            clean_text(Field::Region, raw.value(Field::Region)),
        ];

        for (field, conversion) in measurements {
            if let Conversion::Invalid { raw: ref value } = conversion {
                debug!(
                    "line {}: {} value '{}' not convertible",
                    raw.line(),
                    field,
                    value
                );
            }
            fields.push(CleanedField::from_conversion(field, conversion));
        }

        CleanedRow::new(fields)
    }

    fn clean_timestamp(&self, source: SourceKind, raw: Option<&str>) -> CleanedField {
        let Some(raw) = raw else {
            return CleanedField::invalid(Field::Timestamp, FieldValue::Null);
        };

        match self.timestamps.normalize(source, raw) {
            Some(canonical) => CleanedField::text(Field::Timestamp, canonical),
            None => {
                debug!("{}: timestamp '{}' does not match source format", source, raw);
                CleanedField::invalid(Field::Timestamp, FieldValue::Text(raw.to_string()))
            }
        }
    }
}

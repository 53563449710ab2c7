use serde::Serialize;

use crate::cleaners::measurement::clean_quantity;
use crate::cleaners::units::{Quantity, Unit};
use crate::config::UnitsConfig;
use crate::error::{ProcessingError, Result};
use crate::models::cleaned::Conversion;
use crate::models::schema::Field;

const DIRECTION_LABELS: [&str; 4] = ["deg", "degrees", "°", "compass"];

/// Canonical unit of every unit-bearing measurement column, resolved once
/// from configuration. Optional columns are `None` when not requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitRegistry {
    pub temperature: Unit,
    pub humidity: Unit,
    pub wind_speed: Unit,
    pub precipitation: Unit,
    pub pressure: Unit,
    pub dew_point: Option<Unit>,
    pub heat_index: Option<Unit>,
    pub wind_chill: Option<Unit>,
    pub solar_radiation: Option<Unit>,
}

impl UnitRegistry {
    pub fn from_config(units: &UnitsConfig) -> Result<Self> {
        let optional = |quantity: Quantity, label: &Option<String>| -> Result<Option<Unit>> {
            label
                .as_deref()
                .map(|label| Unit::from_label(quantity, label))
                .transpose()
        };

        let direction = units.wind_direction.trim().to_lowercase();
        if !DIRECTION_LABELS.contains(&direction.as_str()) {
            return Err(ProcessingError::UnknownUnit {
                quantity: "wind direction".to_string(),
                unit: units.wind_direction.clone(),
            });
        }

        Ok(Self {
            temperature: Unit::from_label(Quantity::Temperature, &units.temperature)?,
            humidity: Unit::from_label(Quantity::Humidity, &units.humidity)?,
            wind_speed: Unit::from_label(Quantity::Speed, &units.wind_speed)?,
            precipitation: Unit::from_label(Quantity::Precipitation, &units.precipitation)?,
            pressure: Unit::from_label(Quantity::Pressure, &units.pressure)?,
            dew_point: optional(Quantity::Temperature, &units.dew_point)?,
            heat_index: optional(Quantity::Temperature, &units.heat_index)?,
            wind_chill: optional(Quantity::Temperature, &units.wind_chill)?,
            solar_radiation: optional(Quantity::Irradiance, &units.solar_radiation)?,
        })
    }

    /// Quantity measured by a unit-bearing column
    pub fn quantity(field: Field) -> Option<Quantity> {
        match field {
            Field::Temperature | Field::DewPoint | Field::HeatIndex | Field::WindChill => {
                Some(Quantity::Temperature)
            }
            Field::Humidity => Some(Quantity::Humidity),
            Field::WindSpeed => Some(Quantity::Speed),
            Field::Precipitation => Some(Quantity::Precipitation),
            Field::Pressure => Some(Quantity::Pressure),
            Field::SolarRadiation => Some(Quantity::Irradiance),
            _ => None,
        }
    }

    /// Declared canonical unit of a column, `None` if unit-less or not requested
    pub fn canonical(&self, field: Field) -> Option<Unit> {
        match field {
            Field::Temperature => Some(self.temperature),
            Field::Humidity => Some(self.humidity),
            Field::WindSpeed => Some(self.wind_speed),
            Field::Precipitation => Some(self.precipitation),
            Field::Pressure => Some(self.pressure),
            Field::DewPoint => self.dew_point,
            Field::HeatIndex => self.heat_index,
            Field::WindChill => self.wind_chill,
            Field::SolarRadiation => self.solar_radiation,
            _ => None,
        }
    }

    /// Clean a unit-bearing column into its canonical unit. Columns whose
    /// unit is not configured are `Missing` regardless of the raw value.
    pub fn clean(&self, field: Field, raw: Option<&str>) -> Conversion {
        match (Self::quantity(field), self.canonical(field)) {
            (Some(quantity), Some(canonical)) => clean_quantity(quantity, raw, canonical),
            _ => Conversion::Missing,
        }
    }
}

//! Unit registry: canonical units per quantity and the textual unit tokens
//! recognized in raw staging values.
//!
//! Every unit is an affine map onto its quantity's base unit
//! (`base = value * scale + offset`), so a raw value can be converted to any
//! canonical unit of the same quantity via the base.

use serde::Serialize;
use std::fmt;

use crate::error::{ProcessingError, Result};

/// Physical dimension of a measurement column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Temperature,
    Humidity,
    Speed,
    Precipitation,
    Pressure,
    Irradiance,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::Temperature => "temperature",
            Quantity::Humidity => "humidity",
            Quantity::Speed => "wind speed",
            Quantity::Precipitation => "precipitation",
            Quantity::Pressure => "pressure",
            Quantity::Irradiance => "solar radiation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Kelvin,
    Percent,
    KilometresPerHour,
    MetresPerSecond,
    MilesPerHour,
    Knots,
    Millimetres,
    Centimetres,
    Inches,
    Hectopascals,
    Millibars,
    Kilopascals,
    MillimetresOfMercury,
    InchesOfMercury,
    WattsPerSquareMetre,
    KilowattsPerSquareMetre,
}

/// Raw-value tokens per quantity, most specific first so that substring
/// matching never stops at a shorter token (`inches` before `in`)
const TEMPERATURE_TOKENS: &[(&str, Unit)] = &[
    ("fahrenheit", Unit::Fahrenheit),
    ("celsius", Unit::Celsius),
    ("kelvin", Unit::Kelvin),
    ("°f", Unit::Fahrenheit),
    ("°c", Unit::Celsius),
    ("f", Unit::Fahrenheit),
    ("c", Unit::Celsius),
    ("k", Unit::Kelvin),
];

const HUMIDITY_TOKENS: &[(&str, Unit)] = &[("%", Unit::Percent)];

const SPEED_TOKENS: &[(&str, Unit)] = &[
    ("km/h", Unit::KilometresPerHour),
    ("kmh", Unit::KilometresPerHour),
    ("kph", Unit::KilometresPerHour),
    ("knots", Unit::Knots),
    ("kts", Unit::Knots),
    ("kt", Unit::Knots),
    ("m/s", Unit::MetresPerSecond),
    ("mph", Unit::MilesPerHour),
];

const PRECIPITATION_TOKENS: &[(&str, Unit)] = &[
    ("inches", Unit::Inches),
    ("inch", Unit::Inches),
    ("mm", Unit::Millimetres),
    ("cm", Unit::Centimetres),
    ("in", Unit::Inches),
];

const PRESSURE_TOKENS: &[(&str, Unit)] = &[
    ("mmhg", Unit::MillimetresOfMercury),
    ("inhg", Unit::InchesOfMercury),
    ("mbar", Unit::Millibars),
    ("hpa", Unit::Hectopascals),
    ("kpa", Unit::Kilopascals),
    ("mb", Unit::Millibars),
    ("in", Unit::InchesOfMercury),
];

const IRRADIANCE_TOKENS: &[(&str, Unit)] = &[
    ("kw/m²", Unit::KilowattsPerSquareMetre),
    ("kw/m2", Unit::KilowattsPerSquareMetre),
    ("w/m²", Unit::WattsPerSquareMetre),
    ("w/m2", Unit::WattsPerSquareMetre),
];

impl Quantity {
    /// Recognized tokens in match order
    pub fn tokens(self) -> &'static [(&'static str, Unit)] {
        match self {
            Quantity::Temperature => TEMPERATURE_TOKENS,
            Quantity::Humidity => HUMIDITY_TOKENS,
            Quantity::Speed => SPEED_TOKENS,
            Quantity::Precipitation => PRECIPITATION_TOKENS,
            Quantity::Pressure => PRESSURE_TOKENS,
            Quantity::Irradiance => IRRADIANCE_TOKENS,
        }
    }

    /// First recognized token contained in a lower-cased raw value
    pub fn match_token(self, lowered: &str) -> Option<(&'static str, Unit)> {
        self.tokens()
            .iter()
            .copied()
            .find(|(token, _)| lowered.contains(token))
    }
}

impl Unit {
    pub fn quantity(self) -> Quantity {
        match self {
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => Quantity::Temperature,
            Unit::Percent => Quantity::Humidity,
            Unit::KilometresPerHour | Unit::MetresPerSecond | Unit::MilesPerHour | Unit::Knots => {
                Quantity::Speed
            }
            Unit::Millimetres | Unit::Centimetres | Unit::Inches => Quantity::Precipitation,
            Unit::Hectopascals
            | Unit::Millibars
            | Unit::Kilopascals
            | Unit::MillimetresOfMercury
            | Unit::InchesOfMercury => Quantity::Pressure,
            Unit::WattsPerSquareMetre | Unit::KilowattsPerSquareMetre => Quantity::Irradiance,
        }
    }

    /// `(scale, offset)` onto the quantity's base unit
    fn affine(self) -> (f64, f64) {
        match self {
            Unit::Celsius => (1.0, 0.0),
            Unit::Fahrenheit => (1.0 / 1.8, -32.0 / 1.8),
            Unit::Kelvin => (1.0, -273.15),
            Unit::Percent => (1.0, 0.0),
            Unit::KilometresPerHour => (1.0, 0.0),
            Unit::MetresPerSecond => (3.6, 0.0),
            Unit::MilesPerHour => (1.60934, 0.0),
            Unit::Knots => (1.852, 0.0),
            Unit::Millimetres => (1.0, 0.0),
            Unit::Centimetres => (10.0, 0.0),
            Unit::Inches => (25.4, 0.0),
            Unit::Hectopascals | Unit::Millibars => (1.0, 0.0),
            Unit::Kilopascals => (10.0, 0.0),
            Unit::MillimetresOfMercury => (1.33322, 0.0),
            Unit::InchesOfMercury => (33.8639, 0.0),
            Unit::WattsPerSquareMetre => (1.0, 0.0),
            Unit::KilowattsPerSquareMetre => (1000.0, 0.0),
        }
    }

    pub fn to_base(self, value: f64) -> f64 {
        let (scale, offset) = self.affine();
        value * scale + offset
    }

    pub fn from_base(self, value: f64) -> f64 {
        let (scale, offset) = self.affine();
        (value - offset) / scale
    }

    /// Convert between two units of the same quantity
    pub fn convert(self, value: f64, target: Unit) -> f64 {
        debug_assert_eq!(self.quantity(), target.quantity());
        if self == target {
            value
        } else {
            target.from_base(self.to_base(value))
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Kelvin => "K",
            Unit::Percent => "%",
            Unit::KilometresPerHour => "km/h",
            Unit::MetresPerSecond => "m/s",
            Unit::MilesPerHour => "mph",
            Unit::Knots => "kt",
            Unit::Millimetres => "mm",
            Unit::Centimetres => "cm",
            Unit::Inches => "in",
            Unit::Hectopascals => "hPa",
            Unit::Millibars => "mb",
            Unit::Kilopascals => "kPa",
            Unit::MillimetresOfMercury => "mmHg",
            Unit::InchesOfMercury => "inHg",
            Unit::WattsPerSquareMetre => "W/m²",
            Unit::KilowattsPerSquareMetre => "kW/m²",
        }
    }

    /// Resolve a configured canonical unit label for a quantity
    pub fn from_label(quantity: Quantity, label: &str) -> Result<Unit> {
        let lowered = label.trim().to_lowercase();
        quantity
            .tokens()
            .iter()
            .find(|(token, _)| *token == lowered)
            .map(|(_, unit)| *unit)
            .or_else(|| extra_label(&lowered).filter(|unit| unit.quantity() == quantity))
            .ok_or_else(|| ProcessingError::UnknownUnit {
                quantity: quantity.to_string(),
                unit: label.to_string(),
            })
    }
}

/// Labels accepted in configuration that are not raw-value tokens
fn extra_label(lowered: &str) -> Option<Unit> {
    match lowered {
        "percent" => Some(Unit::Percent),
        "hectopascal" | "hectopascals" => Some(Unit::Hectopascals),
        "millimetres" | "millimeters" => Some(Unit::Millimetres),
        _ => None,
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_temperature_conversion() {
        assert!(close(Unit::Fahrenheit.convert(68.0, Unit::Celsius), 20.0));
        assert!(close(Unit::Celsius.convert(20.0, Unit::Fahrenheit), 68.0));
        assert!(close(Unit::Kelvin.convert(273.15, Unit::Celsius), 0.0));
    }

    #[test]
    fn test_linear_conversions() {
        assert!(close(Unit::MetresPerSecond.convert(10.0, Unit::KilometresPerHour), 36.0));
        assert!(close(Unit::MilesPerHour.convert(1.0, Unit::KilometresPerHour), 1.60934));
        assert!(close(Unit::Inches.convert(1.0, Unit::Millimetres), 25.4));
        assert!(close(Unit::Centimetres.convert(1.2, Unit::Millimetres), 12.0));
        assert!(close(Unit::InchesOfMercury.convert(1.0, Unit::Hectopascals), 33.8639));
        assert!(close(Unit::Millimetres.convert(25.4, Unit::Inches), 1.0));
    }

    #[test]
    fn test_token_order_prefers_specific_tokens() {
        assert_eq!(
            Quantity::Precipitation.match_token("0.5 inches"),
            Some(("inches", Unit::Inches))
        );
        assert_eq!(
            Quantity::Pressure.match_token("29.92 inhg"),
            Some(("inhg", Unit::InchesOfMercury))
        );
        assert_eq!(
            Quantity::Temperature.match_token("68°f"),
            Some(("°f", Unit::Fahrenheit))
        );
        assert_eq!(Quantity::Speed.match_token("12"), None);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Unit::from_label(Quantity::Temperature, "C").unwrap(), Unit::Celsius);
        assert_eq!(Unit::from_label(Quantity::Pressure, "hPa").unwrap(), Unit::Hectopascals);
        assert_eq!(Unit::from_label(Quantity::Humidity, "percent").unwrap(), Unit::Percent);
        assert!(Unit::from_label(Quantity::Speed, "mm").is_err());
        assert!(Unit::from_label(Quantity::Precipitation, "hectopascal").is_err());
    }
}

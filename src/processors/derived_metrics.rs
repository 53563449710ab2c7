//! Heat index and wind chill, computed from already-cleaned temperature,
//! humidity and wind speed.

use crate::cleaners::registry::UnitRegistry;
use crate::cleaners::units::Unit;
use crate::models::cleaned::Conversion;
use crate::utils::constants::{
    HEAT_INDEX_MIN_TEMP_F, WIND_CHILL_MAX_TEMP_C, WIND_CHILL_MIN_SPEED_KPH,
};
use crate::utils::rounding::round_one_decimal;

/// NWS Rothfusz regression with the low- and high-humidity adjustments.
/// Undefined below 80 °F or outside 0..=100 % humidity.
pub fn heat_index_fahrenheit(temp_f: f64, humidity_pct: f64) -> Option<f64> {
    if temp_f < HEAT_INDEX_MIN_TEMP_F || !(0.0..=100.0).contains(&humidity_pct) {
        return None;
    }

    let t = temp_f;
    let rh = humidity_pct;
    let mut hi = -42.379 + 2.04901523 * t + 10.14333127 * rh
        - 0.22475541 * t * rh
        - 0.00683783 * t * t
        - 0.05481717 * rh * rh
        + 0.00122874 * t * t * rh
        + 0.00085282 * t * rh * rh
        - 0.00000199 * t * t * rh * rh;

    if rh < 13.0 && t <= 112.0 {
        hi -= ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
    } else if rh > 85.0 && t <= 87.0 {
        hi += ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0);
    }

    Some(hi)
}

/// Heat index in °C from °C and relative humidity
pub fn heat_index(temp_c: f64, humidity_pct: f64) -> Option<f64> {
    let temp_f = Unit::Celsius.convert(temp_c, Unit::Fahrenheit);
    heat_index_fahrenheit(temp_f, humidity_pct).map(|hi| Unit::Fahrenheit.convert(hi, Unit::Celsius))
}

/// 2001 JAG/TI wind chill in °C. Undefined above 10 °C or at 3 mph and below.
pub fn wind_chill(temp_c: f64, wind_kph: f64) -> Option<f64> {
    if temp_c > WIND_CHILL_MAX_TEMP_C || wind_kph <= WIND_CHILL_MIN_SPEED_KPH {
        return None;
    }

    let v = wind_kph.powf(0.16);
    Some(13.12 + 0.6215 * temp_c - 11.37 * v + 0.3965 * temp_c * v)
}

/// Applies the derived-metric formulas in the configured units.
///
/// A metric is `Missing` when its unit is not configured, when the source did
/// not report the column, when a dependency failed cleaning, or when the
/// formula is undefined for the inputs.
#[derive(Debug, Clone, Copy)]
pub struct DerivedMetricCalculator {
    units: UnitRegistry,
}

impl DerivedMetricCalculator {
    pub fn new(units: UnitRegistry) -> Self {
        Self { units }
    }

    pub fn heat_index(
        &self,
        reported: bool,
        temperature: Option<f64>,
        humidity: Option<f64>,
    ) -> Conversion {
        let Some(target) = self.units.heat_index.filter(|_| reported) else {
            return Conversion::Missing;
        };
        let (Some(temperature), Some(humidity)) = (temperature, humidity) else {
            return Conversion::Missing;
        };

        let temp_c = self.units.temperature.convert(temperature, Unit::Celsius);
        to_conversion(heat_index(temp_c, humidity), target)
    }

    pub fn wind_chill(
        &self,
        reported: bool,
        temperature: Option<f64>,
        wind_speed: Option<f64>,
    ) -> Conversion {
        let Some(target) = self.units.wind_chill.filter(|_| reported) else {
            return Conversion::Missing;
        };
        let (Some(temperature), Some(wind_speed)) = (temperature, wind_speed) else {
            return Conversion::Missing;
        };

        let temp_c = self.units.temperature.convert(temperature, Unit::Celsius);
        let wind_kph = self
            .units
            .wind_speed
            .convert(wind_speed, Unit::KilometresPerHour);
        to_conversion(wind_chill(temp_c, wind_kph), target)
    }
}

fn to_conversion(celsius: Option<f64>, target: Unit) -> Conversion {
    match celsius {
        Some(value) => Conversion::Value(round_one_decimal(Unit::Celsius.convert(value, target))),
        None => Conversion::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(heat_index: Option<Unit>, wind_chill: Option<Unit>) -> UnitRegistry {
        UnitRegistry {
            temperature: Unit::Celsius,
            humidity: Unit::Percent,
            wind_speed: Unit::KilometresPerHour,
            precipitation: Unit::Millimetres,
            pressure: Unit::Hectopascals,
            dew_point: None,
            heat_index,
            wind_chill,
            solar_radiation: None,
        }
    }

    #[test]
    fn test_heat_index_formula() {
        assert_eq!(heat_index(32.0, 70.0).map(round_one_decimal), Some(40.4));
        assert_eq!(heat_index(30.0, 50.0).map(round_one_decimal), Some(31.0));
        // high-humidity adjustment
        assert_eq!(heat_index(27.0, 90.0).map(round_one_decimal), Some(31.1));
    }

    #[test]
    fn test_heat_index_out_of_domain() {
        assert_eq!(heat_index(20.0, 60.0), None);
        assert_eq!(heat_index(32.0, 120.0), None);
    }

    #[test]
    fn test_wind_chill_formula() {
        assert_eq!(wind_chill(-5.0, 20.0).map(round_one_decimal), Some(-11.6));
        assert_eq!(wind_chill(5.0, 10.0).map(round_one_decimal), Some(2.7));
        assert_eq!(wind_chill(15.0, 20.0), None);
        assert_eq!(wind_chill(0.0, 3.0), None);
    }

    #[test]
    fn test_calculator_gates() {
        let enabled = DerivedMetricCalculator::new(registry(Some(Unit::Celsius), Some(Unit::Celsius)));
        assert_eq!(enabled.heat_index(true, Some(32.0), Some(70.0)), Conversion::Value(40.4));
        assert_eq!(enabled.heat_index(false, Some(32.0), Some(70.0)), Conversion::Missing);
        assert_eq!(enabled.heat_index(true, None, Some(70.0)), Conversion::Missing);
        assert_eq!(enabled.wind_chill(true, Some(0.0), Some(30.0)), Conversion::Value(-6.5));
        assert_eq!(enabled.wind_chill(true, Some(0.0), None), Conversion::Missing);

        let disabled = DerivedMetricCalculator::new(registry(None, None));
        assert_eq!(disabled.heat_index(true, Some(32.0), Some(70.0)), Conversion::Missing);
        assert_eq!(disabled.wind_chill(true, Some(0.0), Some(30.0)), Conversion::Missing);
    }

    #[test]
    fn test_calculator_output_unit() {
        let fahrenheit = DerivedMetricCalculator::new(registry(Some(Unit::Fahrenheit), None));
        assert_eq!(
            fahrenheit.heat_index(true, Some(32.0), Some(70.0)),
            Conversion::Value(104.7)
        );
    }
}

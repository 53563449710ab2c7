use crate::cleaners::measurement::parse_number;
use crate::models::cleaned::Conversion;
use crate::utils::constants::{CALM_DIRECTION, COMPASS_POINTS, COMPASS_STEP_DEGREES};

/// Bearing of a 16-point compass abbreviation (`"NNE"` -> 22.5)
pub fn compass_bearing(text: &str) -> Option<f64> {
    let upper = text.trim().to_uppercase();
    COMPASS_POINTS
        .iter()
        .position(|point| *point == upper)
        .map(|index| index as f64 * COMPASS_STEP_DEGREES)
}

/// Clean a wind direction given the already-cleaned wind speed.
///
/// Accepts degrees in 0..=360 (optionally suffixed with a degree mark) or a
/// compass abbreviation. Calm wind has no direction: when the direction is
/// absent or unusable and the wind speed is exactly zero the result is the
/// calm sentinel. Degrees are not rounded.
pub fn clean_direction(raw: Option<&str>, wind_speed: Option<f64>) -> Conversion {
    let parsed = raw.map(|raw| (raw, parse_direction(raw)));

    match parsed {
        Some((_, Some(bearing))) => Conversion::Value(bearing),
        _ if wind_speed == Some(0.0) => Conversion::Value(CALM_DIRECTION),
        Some((raw, None)) => Conversion::invalid(raw),
        None => Conversion::Missing,
    }
}

fn parse_direction(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("calm") {
        return Some(CALM_DIRECTION);
    }
    if let Some(bearing) = compass_bearing(trimmed) {
        return Some(bearing);
    }

    let lowered = trimmed.to_lowercase();
    let number_text = lowered
        .trim_end_matches("degrees")
        .trim_end_matches("deg")
        .trim_end_matches('°');

    parse_number(number_text).filter(|deg| (0.0..=360.0).contains(deg))
}

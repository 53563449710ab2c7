use crate::cleaners::units::{Quantity, Unit};
use crate::models::cleaned::Conversion;
use crate::utils::rounding::round_one_decimal;

/// Clean one raw measurement into `canonical`.
///
/// The value is lower-cased and trimmed, the first recognized unit token of
/// the quantity is stripped and the remaining number converted. A bare number
/// (optionally with a lone degree mark) is taken to be in the canonical unit
/// already. Results are rounded to one decimal place.
pub fn clean_quantity(quantity: Quantity, raw: Option<&str>, canonical: Unit) -> Conversion {
    let Some(raw) = raw else {
        return Conversion::Missing;
    };

    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return Conversion::Missing;
    }

    let (number_text, unit) = match quantity.match_token(&lowered) {
        Some((token, unit)) => (lowered.replace(token, ""), unit),
        None => (lowered.replace('°', ""), canonical),
    };

    match parse_number(&number_text) {
        Some(value) => Conversion::Value(round_one_decimal(unit.convert(value, canonical))),
        None => Conversion::invalid(raw),
    }
}

/// Finite decimal number, surrounding whitespace ignored
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

use crate::models::cleaned::{CleanedField, FieldValue};
use crate::models::schema::Field;

/// Decode a farm label (`"farm2"`, `"Farm 2"`, `"2"`) into its index string.
/// Valid only when the index lies in `1..=farm_count`.
pub fn clean_farm(raw: Option<&str>, farm_count: u32) -> CleanedField {
    let Some(raw) = raw else {
        return CleanedField::invalid(Field::Farm, FieldValue::Null);
    };

    let lowered = raw.trim().to_lowercase();
    let digits = lowered.strip_prefix("farm").unwrap_or(&lowered).trim();

    match digits.parse::<u32>() {
        Ok(index) if (1..=farm_count).contains(&index) => {
            CleanedField::text(Field::Farm, index.to_string())
        }
        _ => CleanedField::invalid(Field::Farm, FieldValue::Text(raw.to_string())),
    }
}

/// Identity and location text columns: trimmed, must be present
pub fn clean_text(field: Field, raw: Option<&str>) -> CleanedField {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => CleanedField::text(field, text),
        _ => CleanedField::invalid(field, FieldValue::Null),
    }
}

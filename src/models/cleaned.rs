use serde::{Deserialize, Serialize};

use crate::models::schema::{Field, SCHEMA_LEN};

/// Result of converting one raw measurement
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Converted to the canonical unit
    Value(f64),
    /// Not reported, or not requested by configuration
    Missing,
    /// Present but not convertible; carries the original raw text
    Invalid { raw: String },
}

impl Conversion {
    pub fn invalid(raw: &str) -> Self {
        Conversion::Invalid {
            raw: raw.to_string(),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Conversion::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Conversion::Invalid { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

/// A cleaned column: name, canonical value and whether conversion succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedField {
    pub field: Field,
    pub value: FieldValue,
    pub valid: bool,
}

impl CleanedField {
    pub fn number(field: Field, value: f64) -> Self {
        Self {
            field,
            value: FieldValue::Number(value),
            valid: true,
        }
    }

    pub fn text(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: FieldValue::Text(value.into()),
            valid: true,
        }
    }

    /// Null that is acceptable where the column allows it
    pub fn null(field: Field) -> Self {
        Self {
            field,
            value: FieldValue::Null,
            valid: true,
        }
    }

    /// Failed conversion; the raw text is kept only when the value is textual
    pub fn invalid(field: Field, value: FieldValue) -> Self {
        Self {
            field,
            value,
            valid: false,
        }
    }

    /// Map a measurement conversion; a missing value counts as invalid when
    /// the column is required
    pub fn from_conversion(field: Field, conversion: Conversion) -> Self {
        match conversion {
            Conversion::Value(v) => Self::number(field, v),
            Conversion::Missing if field.is_required_measurement() => {
                Self::invalid(field, FieldValue::Null)
            }
            Conversion::Missing => Self::null(field),
            Conversion::Invalid { .. } => Self::invalid(field, FieldValue::Null),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            FieldValue::Number(v) if self.valid => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(s) if self.valid => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Every column of one row after cleaning, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRow {
    fields: Vec<CleanedField>,
}

impl CleanedRow {
    /// Panics in debug builds if columns are not in schema order
    pub fn new(fields: Vec<CleanedField>) -> Self {
        debug_assert_eq!(fields.len(), SCHEMA_LEN);
        debug_assert!(fields
            .iter()
            .zip(Field::ALL)
            .all(|(cleaned, field)| cleaned.field == field));
        Self { fields }
    }

    pub fn get(&self, field: Field) -> &CleanedField {
        &self.fields[field.index()]
    }

    pub fn fields(&self) -> &[CleanedField] {
        &self.fields
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().filter(|f| !f.valid).map(|f| f.field)
    }

    /// Typed record, available only when every column is valid
    pub fn to_record(&self) -> Option<CleanedRecord> {
        if self.fields.iter().any(|f| !f.valid) {
            return None;
        }

        let text = |field: Field| self.get(field).as_text().map(str::to_string);
        let number = |field: Field| self.get(field).as_number();

        Some(CleanedRecord {
            farm: text(Field::Farm)?,
            source: text(Field::Source)?,
            timestamp: text(Field::Timestamp)?,
            crawl_time: text(Field::CrawlTime)?,
            city: text(Field::City)?,
            region: text(Field::Region)?,
            temperature: number(Field::Temperature)?,
            humidity: number(Field::Humidity)?,
            wind_speed: number(Field::WindSpeed)?,
            wind_direction: number(Field::WindDirection)?,
            precipitation: number(Field::Precipitation)?,
            pressure: number(Field::Pressure)?,
            dew_point: number(Field::DewPoint),
            heat_index: number(Field::HeatIndex),
            wind_chill: number(Field::WindChill),
            solar_radiation: number(Field::SolarRadiation),
        })
    }
}

/// Accepted reading in canonical form; field order is the partition column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub farm: String,
    pub source: String,
    pub timestamp: String,
    pub crawl_time: String,
    pub city: String,
    pub region: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub precipitation: f64,
    pub pressure: f64,
    pub dew_point: Option<f64>,
    pub heat_index: Option<f64>,
    pub wind_chill: Option<f64>,
    pub solar_radiation: Option<f64>,
}

impl CleanedRecord {
    pub fn is_calm(&self) -> bool {
        self.wind_direction < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted_row() -> CleanedRow {
        let fields = Field::ALL
            .iter()
            .map(|&field| {
                if field.is_basic() {
                    CleanedField::text(field, format!("{}-value", field))
                } else if field.is_required_measurement() {
                    CleanedField::number(field, 1.5)
                } else {
                    CleanedField::null(field)
                }
            })
            .collect();
        CleanedRow::new(fields)
    }

    #[test]
    fn test_missing_required_is_invalid() {
        let temp = CleanedField::from_conversion(Field::Temperature, Conversion::Missing);
        assert!(!temp.valid);

        let dew = CleanedField::from_conversion(Field::DewPoint, Conversion::Missing);
        assert!(dew.valid);
        assert_eq!(dew.value, FieldValue::Null);

        let bad = CleanedField::from_conversion(Field::DewPoint, Conversion::invalid("12 furlongs"));
        assert!(!bad.valid);
    }

    #[test]
    fn test_to_record() {
        let row = accepted_row();
        let record = row.to_record().unwrap();
        assert_eq!(record.farm, "farm-value");
        assert_eq!(record.pressure, 1.5);
        assert_eq!(record.heat_index, None);
        assert!(!record.is_calm());
        assert_eq!(row.invalid_fields().count(), 0);
    }

    #[test]
    fn test_to_record_rejects_invalid_columns() {
        let mut fields = accepted_row().fields().to_vec();
        fields[Field::Humidity.index()] =
            CleanedField::from_conversion(Field::Humidity, Conversion::invalid("wet"));
        let row = CleanedRow::new(fields);

        assert!(row.to_record().is_none());
        assert_eq!(row.invalid_fields().collect::<Vec<_>>(), vec![Field::Humidity]);
    }
}

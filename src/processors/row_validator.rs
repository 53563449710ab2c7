use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::outcome::RowOutcome;
use crate::models::raw_row::RawRow;
use crate::models::schema::{Field, SCHEMA_LEN};
use crate::models::source::SourceKind;
use crate::processors::row_cleaner::RowCleaner;

/// Classifies each staging row as accepted or rejected.
///
/// Checks run in order: column count, then identity fields, then
/// measurements. A wrong column count stops before any cleaning; otherwise
/// every column is cleaned so rejected rows still carry their partial result.
#[derive(Debug, Clone, Copy)]
pub struct RowValidator {
    cleaner: RowCleaner,
}

impl RowValidator {
    pub fn new(cleaner: RowCleaner) -> Self {
        Self { cleaner }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(RowCleaner::from_config(config)?))
    }

    pub fn cleaner(&self) -> &RowCleaner {
        &self.cleaner
    }

    pub fn validate(&self, source: SourceKind, raw: &RawRow) -> RowOutcome {
        if raw.len() != SCHEMA_LEN {
            return RowOutcome::LengthError {
                expected: SCHEMA_LEN,
                found: raw.len(),
            };
        }

        let cleaned = self.cleaner.clean(source, raw);

        let basic: Vec<Field> = cleaned.invalid_fields().filter(|f| f.is_basic()).collect();
        if !basic.is_empty() {
            return RowOutcome::BasicFieldError {
                fields: basic,
                partial: cleaned,
            };
        }

        // required columns must be numbers; optional ones may be null but not unconvertible
        let measurements: Vec<Field> = cleaned.invalid_fields().collect();
        if !measurements.is_empty() {
            return RowOutcome::MeasurementError {
                fields: measurements,
                partial: cleaned,
            };
        }

        match cleaned.to_record() {
            Some(record) => RowOutcome::Success(record),
            None => RowOutcome::MeasurementError {
                fields: Vec::new(),
                partial: cleaned,
            },
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::cleaned::{CleanedRecord, CleanedRow};
use crate::models::schema::Field;

/// Why a row was sent to the failed partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Wrong number of columns; no cleaning attempted
    Length,
    /// Farm, source, timestamp, crawl time, city or region unusable
    BasicField,
    /// A measurement failed conversion
    Measurement,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Length => f.write_str("length error"),
            RejectionReason::BasicField => f.write_str("basic field error"),
            RejectionReason::Measurement => f.write_str("measurement error"),
        }
    }
}

/// Per-row classification, consumed immediately by the partition router
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Success(CleanedRecord),
    LengthError {
        expected: usize,
        found: usize,
    },
    /// `partial` keeps whatever cleaning produced, for diagnostics only
    BasicFieldError {
        fields: Vec<Field>,
        partial: CleanedRow,
    },
    MeasurementError {
        fields: Vec<Field>,
        partial: CleanedRow,
    },
}

impl RowOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RowOutcome::Success(_))
    }

    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            RowOutcome::Success(_) => None,
            RowOutcome::LengthError { .. } => Some(RejectionReason::Length),
            RowOutcome::BasicFieldError { .. } => Some(RejectionReason::BasicField),
            RowOutcome::MeasurementError { .. } => Some(RejectionReason::Measurement),
        }
    }

    /// Columns responsible for the rejection
    pub fn failed_fields(&self) -> &[Field] {
        match self {
            RowOutcome::BasicFieldError { fields, .. }
            | RowOutcome::MeasurementError { fields, .. } => fields,
            _ => &[],
        }
    }
}

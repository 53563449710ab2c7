pub mod cleaned;
pub mod outcome;
pub mod raw_row;
pub mod schema;
pub mod source;

pub use cleaned::{CleanedField, CleanedRecord, CleanedRow, Conversion, FieldValue};
pub use outcome::{RejectionReason, RowOutcome};
pub use raw_row::RawRow;
pub use schema::{Field, BASIC_FIELDS, MEASUREMENT_FIELDS, SCHEMA_LEN};
pub use source::{DatasetKind, SourceKind, TimestampFormat};

use crate::models::schema::Field;
use crate::utils::constants::NULL_MARKERS;

/// One unparsed staging row, kept verbatim for the raw and failed partitions
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    line: u64,
    fields: Vec<String>,
}

impl RawRow {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Staging line the row was read from (1-based)
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Verbatim cells, as read
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Trimmed value of a schema column, `None` for null markers or short rows
    pub fn value(&self, field: Field) -> Option<&str> {
        let cell = self.fields.get(field.index())?.trim();
        if is_null_marker(cell) {
            None
        } else {
            Some(cell)
        }
    }

    /// True when every cell is blank
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|cell| cell.trim().is_empty())
    }
}

pub fn is_null_marker(cell: &str) -> bool {
    let cell = cell.trim();
    NULL_MARKERS
        .iter()
        .any(|marker| cell.eq_ignore_ascii_case(marker))
}

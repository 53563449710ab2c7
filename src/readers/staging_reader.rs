use encoding_rs::Encoding;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{ProcessingError, Result};
use crate::models::raw_row::RawRow;
use crate::models::schema::is_header_record;

/// Rows read from one staging file
#[derive(Debug, Clone, Default)]
pub struct StagingBatch {
    /// Header as found in the file, when the first record was one
    pub header: Option<Vec<String>>,
    pub rows: Vec<RawRow>,
}

/// Reads a delimited staging file into raw rows, in file order
pub struct StagingReader {
    encoding: &'static Encoding,
}

impl StagingReader {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Reader for a WHATWG encoding label such as `utf-8` or `windows-1253`
    pub fn for_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(Self::new)
            .ok_or_else(|| ProcessingError::UnknownEncoding(label.to_string()))
    }

    pub fn read(&self, path: &Path) -> Result<StagingBatch> {
        let bytes = fs::read(path).map_err(|source| ProcessingError::Staging {
            path: path.to_path_buf(),
            source,
        })?;

        let (text, used, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            warn!(
                "{}: malformed {} sequences replaced while decoding",
                path.display(),
                used.name()
            );
        }

        self.parse(&text)
    }

    /// Parse decoded staging text. Blank lines are skipped; rows of any
    /// length are kept so that length errors can be reported downstream.
    pub fn parse(&self, text: &str) -> Result<StagingBatch> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut batch = StagingBatch::default();

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 1);
            let fields: Vec<String> = record.iter().map(str::to_string).collect();

            if index == 0 && is_header_record(&fields) {
                batch.header = Some(fields);
                continue;
            }

            let row = RawRow::new(line, fields);
            if row.is_blank() {
                continue;
            }
            batch.rows.push(row);
        }

        Ok(batch)
    }
}

impl Default for StagingReader {
    fn default() -> Self {
        Self::new(encoding_rs::UTF_8)
    }
}

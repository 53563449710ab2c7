use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::outcome::{RejectionReason, RowOutcome};

/// Row counts for one source in one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub rows_read: usize,
    pub accepted: usize,
    pub rejected_length: usize,
    pub rejected_basic: usize,
    pub rejected_measurement: usize,
    /// Set when the source was aborted by an I/O failure
    pub io_error: Option<String>,
}

impl SourceSummary {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome.rejection_reason() {
            None => self.accepted += 1,
            Some(RejectionReason::Length) => self.rejected_length += 1,
            Some(RejectionReason::BasicField) => self.rejected_basic += 1,
            Some(RejectionReason::Measurement) => self.rejected_measurement += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected_length + self.rejected_basic + self.rejected_measurement
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.accepted as f64 / self.rows_read as f64) * 100.0
        }
    }
}

/// Outcome of one batch run over every configured source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_date: NaiveDate,
    pub dry_run: bool,
    pub sources: Vec<SourceSummary>,
}

impl RunSummary {
    pub fn new(run_date: NaiveDate, dry_run: bool) -> Self {
        Self {
            run_date,
            dry_run,
            sources: Vec::new(),
        }
    }

    pub fn rows_read(&self) -> usize {
        self.sources.iter().map(|s| s.rows_read).sum()
    }

    pub fn accepted(&self) -> usize {
        self.sources.iter().map(|s| s.accepted).sum()
    }

    pub fn rejected(&self) -> usize {
        self.sources.iter().map(|s| s.rejected()).sum()
    }

    pub fn io_errors(&self) -> usize {
        self.sources.iter().filter(|s| s.io_error.is_some()).count()
    }

    pub fn source(&self, name: &str) -> Option<&SourceSummary> {
        self.sources.iter().find(|s| s.source == name)
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!("Normalization Run {}", self.run_date));
        if self.dry_run {
            summary.push_str(" (dry run)");
        }
        summary.push_str("\n=================================\n");
        summary.push_str(&format!("Rows read: {}\n", self.rows_read()));
        summary.push_str(&format!("Accepted: {}\n", self.accepted()));
        summary.push_str(&format!("Rejected: {}\n", self.rejected()));
        summary.push_str(&format!("Sources with I/O errors: {}\n", self.io_errors()));

        for source in &self.sources {
            summary.push_str(&format!("\n[{}]\n", source.source));
            if let Some(error) = &source.io_error {
                summary.push_str(&format!("  aborted: {}\n", error));
            }
            summary.push_str(&format!(
                "  read {}, accepted {} ({:.1}%)\n",
                source.rows_read,
                source.accepted,
                source.acceptance_rate()
            ));
            summary.push_str(&format!(
                "  rejected: length {}, basic fields {}, measurements {}\n",
                source.rejected_length, source.rejected_basic, source.rejected_measurement
            ));
        }

        summary
    }
}

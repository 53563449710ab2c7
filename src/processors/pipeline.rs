use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::config::{PipelineConfig, SourceConfig};
use crate::error::Result;
use crate::models::outcome::RowOutcome;
use crate::models::raw_row::RawRow;
use crate::models::source::{DatasetKind, SourceKind};
use crate::processors::row_validator::RowValidator;
use crate::processors::run_summary::{RunSummary, SourceSummary};
use crate::readers::StagingReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::{rotate_staging, PartitionBases, PartitionRouter, PartitionRow};

/// One batch run over every configured source.
///
/// Sources are processed sequentially in configuration order, rows in
/// staging order. An I/O failure aborts only the source it happened in;
/// that source's staging file is cut back to the rows not yet routed, so the
/// next run neither skips nor repeats a row.
pub struct Pipeline {
    config: PipelineConfig,
    validator: RowValidator,
    run_date: NaiveDate,
    dry_run: bool,
    silent: bool,
}

impl Pipeline {
    /// Pipeline partitioning by today's date in the configured civil timezone
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let validator = RowValidator::from_config(&config)?;
        let timezone = validator.cleaner().timestamps().timezone();
        let run_date = Utc::now().with_timezone(&timezone).date_naive();

        Ok(Self {
            config,
            validator,
            run_date,
            dry_run: false,
            silent: false,
        })
    }

    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    /// Classify rows without writing partitions or rotating staging
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Hide progress bars
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    pub fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::new(self.run_date, self.dry_run);

        info!(
            "Starting run for {} ({} sources{})",
            self.run_date,
            self.config.sources.len(),
            if self.dry_run { ", dry run" } else { "" }
        );

        for (source, source_config) in self.config.sources()? {
            let mut source_summary = SourceSummary::new(source.key());

            match self.process_source(source, source_config, &mut source_summary) {
                Ok(()) => info!(
                    "{}: read {}, accepted {}, rejected {} (length {}, basic {}, measurement {})",
                    source,
                    source_summary.rows_read,
                    source_summary.accepted,
                    source_summary.rejected(),
                    source_summary.rejected_length,
                    source_summary.rejected_basic,
                    source_summary.rejected_measurement
                ),
                Err(e) => {
                    error!("{}: source aborted: {}", source, e);
                    source_summary.io_error = Some(e.to_string());
                }
            }

            summary.sources.push(source_summary);
        }

        Ok(summary)
    }

    fn process_source(
        &self,
        source: SourceKind,
        source_config: &SourceConfig,
        summary: &mut SourceSummary,
    ) -> Result<()> {
        let reader = StagingReader::for_label(&source_config.encoding)?;
        let batch = reader.read(&source_config.staging)?;
        debug!(
            "{}: {} staging rows from {}",
            source,
            batch.rows.len(),
            source_config.staging.display()
        );

        let mut router =
            PartitionRouter::new().with_source(source, PartitionBases::from(source_config));
        let progress = ProgressReporter::new(batch.rows.len() as u64, source.key(), self.silent);

        for (index, raw) in batch.rows.iter().enumerate() {
            if let Err(e) = self.route_row(source, &mut router, raw, summary) {
                if !self.dry_run {
                    // rows from this one on were not routed; keep them for the next run
                    let pending = &batch.rows[index..];
                    if let Err(rotate_error) =
                        rotate_staging(&source_config.staging, batch.header.as_deref(), pending)
                    {
                        error!("{}: cannot rotate staging: {}", source, rotate_error);
                    }
                }
                return Err(e);
            }
            progress.increment(1);
        }

        progress.finish_with_message(&format!("{}: {} rows", source, summary.rows_read));

        if self.dry_run {
            return Ok(());
        }

        // every row is already flushed, so staging is emptied even if closing fails
        let closed = router.close_source(source);
        rotate_staging(&source_config.staging, batch.header.as_deref(), &[])?;
        closed
    }

    /// Classify one row and write it to the raw partition and to its outcome
    /// partition. Both partitions are opened before either write, so a row is
    /// written to both or to neither.
    fn route_row(
        &self,
        source: SourceKind,
        router: &mut PartitionRouter,
        raw: &RawRow,
        summary: &mut SourceSummary,
    ) -> Result<()> {
        let outcome = self.validator.validate(source, raw);
        let target = if outcome.is_success() {
            DatasetKind::Cleaned
        } else {
            DatasetKind::Failed
        };

        if !self.dry_run {
            router.open(DatasetKind::Raw, source, self.run_date)?;
            router.open(target, source, self.run_date)?;

            router.write(DatasetKind::Raw, source, self.run_date, PartitionRow::Raw(raw))?;
            let row = match &outcome {
                RowOutcome::Success(record) => PartitionRow::Cleaned(record),
                _ => PartitionRow::Raw(raw),
            };
            router.write(target, source, self.run_date, row)?;
        }

        match &outcome {
            RowOutcome::Success(_) => {}
            RowOutcome::LengthError { expected, found } => warn!(
                "{} line {}: expected {} fields, found {}",
                source,
                raw.line(),
                expected,
                found
            ),
            RowOutcome::BasicFieldError { fields, .. }
            | RowOutcome::MeasurementError { fields, .. } => {
                let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
                warn!(
                    "{} line {}: rejected, invalid {}",
                    source,
                    raw.line(),
                    names.join(", ")
                );
            }
        }

        summary.rows_read += 1;
        summary.record(&outcome);
        Ok(())
    }
}

//! Date-partitioned raw, cleaned and failed outputs.
//!
//! Each (dataset, source, day) pair maps to one append-only CSV file at
//! `{base}/{YYYY}/{MM}/{DD}.csv`. Files are opened lazily on first write in a
//! run and receive the canonical header only when empty.

use chrono::{Datelike, NaiveDate};
use csv::Writer;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::SourceConfig;
use crate::error::{ProcessingError, Result};
use crate::models::cleaned::CleanedRecord;
use crate::models::raw_row::RawRow;
use crate::models::schema::header;
use crate::models::source::{DatasetKind, SourceKind};
use crate::utils::constants::PARTITION_EXTENSION;

/// Identifies one partition file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    pub kind: DatasetKind,
    pub source: SourceKind,
    pub date: NaiveDate,
}

/// Base directories of one source's three datasets
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionBases {
    pub raw: PathBuf,
    pub cleaned: PathBuf,
    pub failed: PathBuf,
}

impl PartitionBases {
    pub fn base(&self, kind: DatasetKind) -> &Path {
        match kind {
            DatasetKind::Raw => &self.raw,
            DatasetKind::Cleaned => &self.cleaned,
            DatasetKind::Failed => &self.failed,
        }
    }
}

impl From<&SourceConfig> for PartitionBases {
    fn from(config: &SourceConfig) -> Self {
        Self {
            raw: config.raw.clone(),
            cleaned: config.cleaned.clone(),
            failed: config.failed.clone(),
        }
    }
}

/// Partition file path for a base directory and day
pub fn partition_path(base: &Path, date: NaiveDate) -> PathBuf {
    base.join(format!("{:04}", date.year()))
        .join(format!("{:02}", date.month()))
        .join(format!("{:02}.{}", date.day(), PARTITION_EXTENSION))
}

/// A row routed to a partition
#[derive(Debug, Clone, Copy)]
pub enum PartitionRow<'a> {
    /// Staging cells, verbatim
    Raw(&'a RawRow),
    /// Canonical record
    Cleaned(&'a CleanedRecord),
}

struct OpenPartition {
    path: PathBuf,
    writer: Writer<File>,
}

pub struct PartitionRouter {
    bases: HashMap<SourceKind, PartitionBases>,
    open: HashMap<PartitionKey, OpenPartition>,
}

impl PartitionRouter {
    pub fn new() -> Self {
        Self {
            bases: HashMap::new(),
            open: HashMap::new(),
        }
    }

    pub fn with_source(mut self, source: SourceKind, bases: PartitionBases) -> Self {
        self.register(source, bases);
        self
    }

    pub fn register(&mut self, source: SourceKind, bases: PartitionBases) {
        self.bases.insert(source, bases);
    }

    /// Path a row for `kind`/`source` on `date` would be written to
    pub fn path_for(&self, kind: DatasetKind, source: SourceKind, date: NaiveDate) -> Result<PathBuf> {
        resolve_path(&self.bases, kind, source, date)
    }

    /// Open (creating if needed) the partition without writing a row
    pub fn open(&mut self, kind: DatasetKind, source: SourceKind, date: NaiveDate) -> Result<()> {
        self.partition(kind, source, date).map(|_| ())
    }

    /// Append one row; the row is flushed before returning
    pub fn write(
        &mut self,
        kind: DatasetKind,
        source: SourceKind,
        date: NaiveDate,
        row: PartitionRow<'_>,
    ) -> Result<()> {
        let partition = self.partition(kind, source, date)?;

        let written = match row {
            PartitionRow::Raw(raw) => partition.writer.write_record(raw.fields()),
            PartitionRow::Cleaned(record) => partition.writer.serialize(record),
        };
        written?;

        partition
            .writer
            .flush()
            .map_err(|source| ProcessingError::Partition {
                path: partition.path.clone(),
                source,
            })
    }

    /// Flush and close every partition of one source
    pub fn close_source(&mut self, source: SourceKind) -> Result<()> {
        let keys: Vec<PartitionKey> = self
            .open
            .keys()
            .filter(|key| key.source == source)
            .copied()
            .collect();

        for key in keys {
            if let Some(mut partition) = self.open.remove(&key) {
                partition
                    .writer
                    .flush()
                    .map_err(|e| ProcessingError::Partition {
                        path: partition.path.clone(),
                        source: e,
                    })?;
                debug!("Closed partition {}", partition.path.display());
            }
        }
        Ok(())
    }

    pub fn open_partitions(&self) -> usize {
        self.open.len()
    }

    fn partition(
        &mut self,
        kind: DatasetKind,
        source: SourceKind,
        date: NaiveDate,
    ) -> Result<&mut OpenPartition> {
        let key = PartitionKey { kind, source, date };
        match self.open.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = resolve_path(&self.bases, kind, source, date)?;
                Ok(entry.insert(open_partition(path)?))
            }
        }
    }
}

impl Default for PartitionRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_path(
    bases: &HashMap<SourceKind, PartitionBases>,
    kind: DatasetKind,
    source: SourceKind,
    date: NaiveDate,
) -> Result<PathBuf> {
    let bases = bases.get(&source).ok_or_else(|| {
        ProcessingError::InvalidConfig(format!("No partition paths registered for {}", source))
    })?;
    Ok(partition_path(bases.base(kind), date))
}

fn open_partition(path: PathBuf) -> Result<OpenPartition> {
    let partition_error = |source| ProcessingError::Partition {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(partition_error)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(partition_error)?;
    let is_empty = file.metadata().map_err(partition_error)?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    if is_empty {
        writer.write_record(header())?;
        debug!("Created partition {}", path.display());
    }

    Ok(OpenPartition { path, writer })
}

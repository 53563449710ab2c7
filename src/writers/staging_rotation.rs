use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::models::raw_row::RawRow;
use crate::models::schema::header;

/// Rewrite a staging file so it holds its header followed by `pending`.
///
/// After a complete run `pending` is empty. After an aborted run it holds the
/// rows that were not routed, so the next run picks up exactly those. The
/// replacement is written next to the staging file and renamed over it, so a
/// failure leaves the original rows in place. `existing_header` is preserved
/// verbatim; the canonical header is used when the file had none.
pub fn rotate_staging(
    path: &Path,
    existing_header: Option<&[String]>,
    pending: &[RawRow],
) -> Result<()> {
    let staging_error = |source| ProcessingError::Staging {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(staging_error)?;

    let mut replacement = NamedTempFile::new_in(dir).map_err(staging_error)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(replacement.as_file_mut());
        match existing_header {
            Some(cells) => writer.write_record(cells)?,
            None => writer.write_record(header())?,
        }
        for row in pending {
            writer.write_record(row.fields())?;
        }
        writer.flush().map_err(staging_error)?;
    }
    replacement.as_file_mut().sync_all().map_err(staging_error)?;

    replacement
        .persist(path)
        .map_err(|e| staging_error(e.error))?;

    if pending.is_empty() {
        info!("Rotated staging file {}", path.display());
    } else {
        info!(
            "Rotated staging file {}, {} unrouted rows kept",
            path.display(),
            pending.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rotation_keeps_only_header() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("meteo.csv");
        fs::write(&path, "farm,source\nfarm1,meteo\nfarm2,meteo\n")?;

        let header = vec!["farm".to_string(), "source".to_string()];
        rotate_staging(&path, Some(&header), &[])?;

        assert_eq!(fs::read_to_string(&path)?, "farm,source\n");
        Ok(())
    }

    #[test]
    fn test_rotation_writes_canonical_header() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("soda.csv");
        fs::write(&path, "farm1,soda\n")?;

        rotate_staging(&path, None, &[])?;

        let contents = fs::read_to_string(&path)?;
        assert_eq!(contents.trim_end(), header().join(","));
        Ok(())
    }

    #[test]
    fn test_rotation_keeps_pending_rows() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("wu.csv");
        fs::write(&path, "farm,source\nfarm1,wu\nfarm2,wu,extra\nfarm3,wu\n")?;

        let header = vec!["farm".to_string(), "source".to_string()];
        let pending = vec![
            RawRow::new(3, vec!["farm2".into(), "wu".into(), "extra".into()]),
            RawRow::new(4, vec!["farm3".into(), "wu".into()]),
        ];
        rotate_staging(&path, Some(&header), &pending)?;

        assert_eq!(
            fs::read_to_string(&path)?,
            "farm,source\nfarm2,wu,extra\nfarm3,wu\n"
        );
        Ok(())
    }
}

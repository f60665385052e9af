//! CSV output of scraped records.
//!
//! The file is created (or truncated) at the given path, a fixed
//! `title,summary,url,date` header is written, then one row per record
//! in input order. Quoting follows RFC 4180. A failed write leaves
//! whatever was already flushed in place.

use crate::error::WriteError;
use crate::models::{ArticleRecord, CSV_HEADER};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Write `records` to `path`, returning the number of rows written.
///
/// # Arguments
///
/// * `records` - Records to save, in output order
/// * `path` - Destination file; created or truncated
///
/// # Returns
///
/// The number of data rows written (the header is not counted), or a
/// [`WriteError`] if the file cannot be created, written or flushed.
/// Rows written before a failure are left in place.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), count = records.len()))]
pub fn write_records(records: &[ArticleRecord], path: impl AsRef<Path>) -> Result<usize, WriteError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let csv_err = |source: ::csv::Error| WriteError::Csv {
        path: display.clone(),
        source,
    };

    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for record in records {
        writer.write_record(record.as_row()).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| WriteError::Io {
        path: display.clone(),
        source,
    })?;
    debug!("Flushed CSV writer");

    info!(rows = records.len(), "Saved articles");
    Ok(records.len())
}

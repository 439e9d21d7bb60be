//! CSV loading into ordered record tables.
//!
//! Field values are kept verbatim: typing, trimming, and validation are all
//! downstream concerns. The only rows dropped here are structurally
//! malformed ones (field count differing from the header), which are
//! logged and counted but never abort the load.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use cohort_model::{Record, RecordTable};

use crate::error::{IngestError, Result};

/// Counters from one file load.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadStats {
    /// Data rows kept.
    pub rows: usize,
    /// Malformed rows skipped.
    pub skipped: usize,
}

/// Read a delimited file with a header row into a [`RecordTable`].
///
/// Rows whose field count does not match the header are skipped and
/// counted in [`LoadStats::skipped`]. A file without a header row is an
/// error; a header-only file yields an empty table.
pub fn read_record_table(path: &Path) -> Result<(RecordTable, LoadStats)> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(IngestError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mut table = RecordTable::new(headers);
    let mut stats = LoadStats::default();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, |position| position.line());
        if record.len() != table.headers.len() {
            warn!(
                line,
                found = record.len(),
                expected = table.headers.len(),
                "skipping malformed row"
            );
            stats.skipped += 1;
            continue;
        }
        table.rows.push(Record {
            line,
            fields: record.iter().map(str::to_string).collect(),
        });
        stats.rows += 1;
    }

    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = stats.rows,
        skipped = stats.skipped,
        "loaded record table"
    );
    Ok((table, stats))
}

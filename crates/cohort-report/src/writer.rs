//! CSV output assembly.
//!
//! Two outputs: the cleaned registry (retained rows, original column
//! order) and the merged assessment set (one row per subject calendar
//! day). The assessment header order is the output field map's insertion
//! order: identity and timestamp columns, the indicator columns, then the
//! sanitized test result.

use std::path::Path;

use csv::Writer;
use tracing::info;

use cohort_model::{RecordTable, SubjectFlags};
use cohort_transform::MergedRow;

use crate::error::{ReportError, Result};

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> ReportError + '_ {
    move |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Write registry rows whose flag set is empty. Returns the row count.
pub fn write_registry(
    path: &Path,
    table: &RecordTable,
    status: &[SubjectFlags],
) -> Result<usize> {
    let mut writer = Writer::from_path(path).map_err(csv_error(path))?;
    writer.write_record(&table.headers).map_err(csv_error(path))?;

    let mut written = 0usize;
    for (row, flags) in status.iter().enumerate() {
        if flags.is_empty() {
            writer
                .write_record(&table.rows[row].fields)
                .map_err(csv_error(path))?;
            written += 1;
        }
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), rows = written, "wrote cleaned registry");
    Ok(written)
}

/// Header row for the merged assessment output.
pub fn assessment_headers(indicator_names: &[&str]) -> Vec<String> {
    let mut headers = vec![
        "id".to_string(),
        "patient_id".to_string(),
        "created_at".to_string(),
        "updated_at".to_string(),
    ];
    headers.extend(indicator_names.iter().map(|name| (*name).to_string()));
    headers.push("tested_covid_positive".to_string());
    headers
}

/// Write one row per merged day-record. Returns the row count.
pub fn write_assessments(
    path: &Path,
    indicator_names: &[&str],
    rows: &[MergedRow],
) -> Result<usize> {
    let mut writer = Writer::from_path(path).map_err(csv_error(path))?;
    writer
        .write_record(assessment_headers(indicator_names))
        .map_err(csv_error(path))?;

    for row in rows {
        let mut record = Vec::with_capacity(4 + row.indicators.len() + 1);
        record.push(row.assessment_id.clone());
        record.push(row.subject_id.clone());
        record.push(row.created_at.clone());
        record.push(row.updated_at.clone());
        for indicator in &row.indicators {
            record.push(if *indicator { "true" } else { "false" }.to_string());
        }
        record.push(row.result.label().to_string());
        writer.write_record(&record).map_err(csv_error(path))?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), rows = rows.len(), "wrote merged assessments");
    Ok(rows.len())
}

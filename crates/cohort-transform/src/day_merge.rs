//! Day-level merge of repeated assessments.
//!
//! A subject often submits several assessments in one day; analysis wants
//! one logical record per (subject, calendar day). Within a time-ordered,
//! already-filtered subject group, consecutive rows sharing a day collapse
//! into one output row: identity and timestamp fields take the
//! last-processed row's values, every boolean indicator ORs across the
//! day's contributors, and the sanitized diagnostic result takes the last
//! (within a group it is monotonic, so also the day's maximum).

use chrono::NaiveDate;
use tracing::debug;

use cohort_model::{RecordTable, TestResult};

use crate::compact::CleanAssessments;

/// Calendar-day key of a timestamp. Timestamps carry a `YYYY-MM-DD`
/// prefix; anything that does not parse keeps the whole raw string as its
/// key so malformed values never merge with real days.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DayKey<'a> {
    Day(NaiveDate),
    Raw(&'a str),
}

fn day_key(timestamp: &str) -> DayKey<'_> {
    timestamp
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .map_or(DayKey::Raw(timestamp), DayKey::Day)
}

/// Source columns the merge reads besides the indicator set.
#[derive(Debug, Clone, Copy)]
pub struct MergeColumns {
    pub assessment_id: usize,
    pub subject_id: usize,
    pub created_at: usize,
    pub updated_at: usize,
}

/// One output row: a subject's collapsed calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub assessment_id: String,
    pub subject_id: String,
    pub created_at: String,
    pub updated_at: String,
    /// Aligned with the indicator column names.
    pub indicators: Vec<bool>,
    pub result: TestResult,
}

/// Number of rows the merge will emit for the given groups: total rows
/// minus consecutive same-day duplicates. Lets the assembler pre-size its
/// buffers and gives the summary its merged-row count.
pub fn count_merged_rows(
    table: &RecordTable,
    updated_col: usize,
    groups: &[(usize, usize)],
) -> usize {
    let mut merged = 0usize;
    for &(start, end) in groups {
        for row in start + 1..=end {
            if day_key(table.value(row - 1, updated_col)) == day_key(table.value(row, updated_col))
            {
                merged += 1;
            }
        }
    }
    table.len() - merged
}

/// Collapse same-day rows per subject group into merged output rows.
///
/// `groups` must be the contiguous per-subject ranges of the clean table
/// in timestamp order. The first row of each group always opens a new
/// output row; a day-boundary change advances the output cursor.
pub fn merge_by_day(
    clean: &CleanAssessments,
    columns: MergeColumns,
    groups: &[(usize, usize)],
) -> Vec<MergedRow> {
    let table = &clean.table;
    let mut rows: Vec<MergedRow> =
        Vec::with_capacity(count_merged_rows(table, columns.updated_at, groups));

    for &(start, end) in groups {
        let mut merged = open_row(clean, columns, start);
        let mut prev_day = day_key(table.value(start, columns.updated_at));
        for row in start + 1..=end {
            let day = day_key(table.value(row, columns.updated_at));
            if day != prev_day {
                rows.push(merged);
                merged = open_row(clean, columns, row);
            } else {
                fold_row(&mut merged, clean, columns, row);
            }
            prev_day = day;
        }
        rows.push(merged);
    }

    debug!(
        input_rows = table.len(),
        output_rows = rows.len(),
        "merged assessments by day"
    );
    rows
}

/// Start a fresh output row from one contributing row.
fn open_row(clean: &CleanAssessments, columns: MergeColumns, row: usize) -> MergedRow {
    let table = &clean.table;
    MergedRow {
        assessment_id: table.value(row, columns.assessment_id).to_string(),
        subject_id: table.value(row, columns.subject_id).to_string(),
        created_at: table.value(row, columns.created_at).to_string(),
        updated_at: table.value(row, columns.updated_at).to_string(),
        indicators: clean
            .indicators
            .columns
            .iter()
            .map(|column| column[row])
            .collect(),
        result: clean.results[row],
    }
}

/// Merge one more same-day row into the open output row. Scalars take the
/// later value, indicators OR.
fn fold_row(merged: &mut MergedRow, clean: &CleanAssessments, columns: MergeColumns, row: usize) {
    let table = &clean.table;
    merged.assessment_id = table.value(row, columns.assessment_id).to_string();
    merged.subject_id = table.value(row, columns.subject_id).to_string();
    merged.created_at = table.value(row, columns.created_at).to_string();
    merged.updated_at = table.value(row, columns.updated_at).to_string();
    for (indicator, column) in merged.indicators.iter_mut().zip(&clean.indicators.columns) {
        *indicator |= column[row];
    }
    merged.result = clean.results[row];
}

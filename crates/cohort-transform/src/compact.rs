//! Discarding flagged assessment rows.
//!
//! After validation, the merge engine only sees rows whose flag set is
//! empty. Compaction rebuilds the table together with its aligned
//! indicator columns and sanitized results so row indices keep lining up.

use cohort_model::{AssessmentFlags, RecordTable, TestResult};

use crate::categorical::IndicatorColumns;

/// A flag-clean assessment set with its derived columns, index-aligned.
#[derive(Debug)]
pub struct CleanAssessments {
    pub table: RecordTable,
    pub indicators: IndicatorColumns,
    pub results: Vec<TestResult>,
}

/// Keep only rows with no flags set, preserving order.
pub fn retain_clean(
    table: &RecordTable,
    status: &[AssessmentFlags],
    indicators: &IndicatorColumns,
    results: &[TestResult],
) -> CleanAssessments {
    let keep: Vec<usize> = (0..table.len())
        .filter(|&row| status[row].is_empty())
        .collect();

    let mut clean_table = RecordTable::new(table.headers.clone());
    clean_table.rows = keep.iter().map(|&row| table.rows[row].clone()).collect();

    let clean_indicators = IndicatorColumns {
        names: indicators.names.clone(),
        columns: indicators
            .columns
            .iter()
            .map(|column| keep.iter().map(|&row| column[row]).collect())
            .collect(),
        any_symptoms: keep.iter().map(|&row| indicators.any_symptoms[row]).collect(),
    };

    CleanAssessments {
        table: clean_table,
        indicators: clean_indicators,
        results: keep.iter().map(|&row| results[row]).collect(),
    }
}

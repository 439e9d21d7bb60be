//! Per-subject diagnostic progression validation.
//!
//! Walks each subject's time-ordered assessments with a monotonic state
//! machine and sanitizes every row's result to the running maximum, so a
//! stale empty report after a positive test reads back as positive. One
//! illegal transition invalidates the subject's entire run: a regression
//! means the history cannot be trusted, so every row in the group is
//! flagged and its sanitized result reset.

use tracing::debug;

use cohort_model::{AssessmentFlags, RecordTable, TestResult};

use crate::error::{Result, ValidateError};

/// Result of progression validation over the whole assessment table.
#[derive(Debug)]
pub struct ProgressionOutcome {
    /// Per-row sanitized result, aligned with the table's rows.
    pub sanitized: Vec<TestResult>,
    /// Number of subject groups invalidated.
    pub invalid_groups: usize,
}

/// Validate diagnostic progression per subject group.
///
/// `groups` must be the contiguous per-subject ranges of `table` in
/// timestamp order. A raw value outside the fixed vocabulary aborts with
/// [`ValidateError::UnknownResult`].
pub fn validate_progression(
    table: &RecordTable,
    status: &mut [AssessmentFlags],
    result_col: usize,
    groups: &[(usize, usize)],
) -> Result<ProgressionOutcome> {
    let mut sanitized = vec![TestResult::Unset; table.len()];
    let mut invalid_groups = 0usize;

    for &(start, end) in groups {
        let mut max_state = TestResult::Unset;
        let mut invalid = false;
        for row in start..=end {
            let raw = table.value(row, result_col);
            let value = TestResult::parse(raw).ok_or_else(|| ValidateError::UnknownResult {
                line: table.rows[row].line,
                value: raw.to_string(),
            })?;
            if !max_state.allows(value) {
                invalid = true;
                break;
            }
            if max_state.upgrades_to(value) {
                max_state = value;
            }
            sanitized[row] = max_state;
        }

        if invalid {
            invalid_groups += 1;
            for row in start..=end {
                sanitized[row] = TestResult::Unset;
                status[row] |= AssessmentFlags::INVALID_PROGRESSION;
            }
        }
    }

    debug!(groups = groups.len(), invalid_groups, "validated progression");
    Ok(ProgressionOutcome {
        sanitized,
        invalid_groups,
    })
}

//! Grouping and ordering over per-subject record runs.
//!
//! The per-subject validators and the day merge both walk maximal
//! contiguous runs of rows sharing a subject id. Sorting happens here, not
//! in the caller, and the range walk re-checks the ordering contract: a
//! decreasing key (which any interleaving of subjects implies somewhere)
//! fails fast instead of silently splitting a subject across groups.

use cohort_model::RecordTable;

use crate::error::{Result, ValidateError};

/// Sort registry rows by subject id. Stable, so ties keep file order.
pub fn sort_by_subject(table: &mut RecordTable, subject_col: usize) {
    table.sort_rows_by_key(|record| record.field(subject_col).to_string());
}

/// Sort assessment rows by (subject id, timestamp). Stable, so same-day
/// rows keep file order, which is the merge tie-break.
pub fn sort_by_subject_and_time(table: &mut RecordTable, subject_col: usize, time_col: usize) {
    table.sort_rows_by_key(|record| {
        (
            record.field(subject_col).to_string(),
            record.field(time_col).to_string(),
        )
    });
}

/// Inclusive [start, end] index ranges of each maximal contiguous run
/// sharing a subject id, in input order.
///
/// Covers every row exactly once: singleton groups are single-element
/// ranges, the final group is always flushed, and empty input yields no
/// ranges. Returns [`ValidateError::UnsortedInput`] if the key column ever
/// decreases.
pub fn subject_ranges(table: &RecordTable, subject_col: usize) -> Result<Vec<(usize, usize)>> {
    let mut ranges = Vec::new();
    if table.is_empty() {
        return Ok(ranges);
    }

    let mut start = 0usize;
    let mut current = table.value(0, subject_col);
    for row in 1..table.len() {
        let key = table.value(row, subject_col);
        if key == current {
            continue;
        }
        if key < current {
            return Err(ValidateError::UnsortedInput {
                row,
                previous: current.to_string(),
                current: key.to_string(),
            });
        }
        ranges.push((start, row - 1));
        start = row;
        current = key;
    }
    ranges.push((start, table.len() - 1));
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_model::Record;

    fn table_of(ids: &[&str]) -> RecordTable {
        let mut table = RecordTable::new(vec!["patient_id".into()]);
        for (i, id) in ids.iter().enumerate() {
            table.rows.push(Record {
                line: i as u64 + 2,
                fields: vec![(*id).to_string()],
            });
        }
        table
    }

    #[test]
    fn empty_input_yields_no_ranges() {
        let table = table_of(&[]);
        assert!(subject_ranges(&table, 0).unwrap().is_empty());
    }

    #[test]
    fn singleton_and_final_groups_are_flushed() {
        let table = table_of(&["a", "b", "b", "c"]);
        let ranges = subject_ranges(&table, 0).unwrap();
        assert_eq!(ranges, vec![(0, 0), (1, 2), (3, 3)]);
    }

    #[test]
    fn single_group_spans_whole_input() {
        let table = table_of(&["a", "a", "a"]);
        let ranges = subject_ranges(&table, 0).unwrap();
        assert_eq!(ranges, vec![(0, 2)]);
    }

    #[test]
    fn unsorted_input_fails_fast() {
        let table = table_of(&["a", "b", "a"]);
        let error = subject_ranges(&table, 0).unwrap_err();
        assert!(matches!(error, ValidateError::UnsortedInput { row: 2, .. }));
    }

    #[test]
    fn sort_by_subject_and_time_orders_both_keys() {
        let mut table = RecordTable::new(vec!["patient_id".into(), "updated_at".into()]);
        for (id, ts) in [
            ("b", "2020-04-02 10:00:00"),
            ("a", "2020-04-03 09:00:00"),
            ("a", "2020-04-01 12:00:00"),
            ("b", "2020-04-01 08:00:00"),
        ] {
            table.rows.push(Record {
                line: 0,
                fields: vec![id.into(), ts.into()],
            });
        }
        sort_by_subject_and_time(&mut table, 0, 1);
        let keys: Vec<(&str, &str)> = (0..table.len())
            .map(|row| (table.value(row, 0), table.value(row, 1)))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a", "2020-04-01 12:00:00"),
                ("a", "2020-04-03 09:00:00"),
                ("b", "2020-04-01 08:00:00"),
                ("b", "2020-04-02 10:00:00"),
            ]
        );
    }
}

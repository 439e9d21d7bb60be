//! Cross-dataset and intra-record consistency checks.
//!
//! Registry filtering runs first; these checks then propagate its outcome
//! into the assessment set and catch contradictions inside single
//! assessment rows. None of them depend on sort order.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use cohort_model::{AssessmentFlags, RecordTable, SubjectFlags};

/// All subject ids present in the registry.
pub fn registry_subject_ids(table: &RecordTable, subject_col: usize) -> HashSet<String> {
    (0..table.len())
        .map(|row| table.value(row, subject_col).to_string())
        .collect()
}

/// Subject ids whose registry row carries no flags.
pub fn clean_subject_ids(
    table: &RecordTable,
    status: &[SubjectFlags],
    subject_col: usize,
) -> HashSet<String> {
    (0..table.len())
        .filter(|&row| status[row].is_empty())
        .map(|row| table.value(row, subject_col).to_string())
        .collect()
}

/// Propagate registry exclusion into the assessment set.
///
/// An assessment whose subject id is absent from the registry entirely is
/// flagged `invalid_subject_id`; one whose subject exists but was filtered
/// is flagged `subject_filtered`. Either way the row is excluded downstream
/// regardless of its own field validity.
pub fn flag_orphaned_assessments(
    table: &RecordTable,
    status: &mut [AssessmentFlags],
    subject_col: usize,
    registry_ids: &HashSet<String>,
    clean_ids: &HashSet<String>,
) {
    for (row, flags) in status.iter_mut().enumerate() {
        let subject = table.value(row, subject_col);
        if !registry_ids.contains(subject) {
            *flags |= AssessmentFlags::INVALID_SUBJECT_ID;
        } else if !clean_ids.contains(subject) {
            *flags |= AssessmentFlags::SUBJECT_FILTERED;
        }
    }
}

/// Number of assessment rows per subject id.
pub fn assessment_counts(table: &RecordTable, subject_col: usize) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..table.len() {
        *counts
            .entry(table.value(row, subject_col).to_string())
            .or_insert(0) += 1;
    }
    debug!(subjects = counts.len(), "counted assessments per subject");
    counts
}

/// Flag registry rows whose subject reported too few assessments to be
/// useful for time-series analysis: none at all, or a single one.
pub fn flag_sparse_subjects(
    table: &RecordTable,
    status: &mut [SubjectFlags],
    subject_col: usize,
    counts: &HashMap<String, usize>,
) {
    for (row, flags) in status.iter_mut().enumerate() {
        match counts.get(table.value(row, subject_col)).copied() {
            None | Some(0) => *flags |= SubjectFlags::NO_ASSESSMENTS,
            Some(1) => *flags |= SubjectFlags::ONE_ASSESSMENT,
            Some(_) => {}
        }
    }
}

/// Flag rows whose test-taken field contradicts the reported result: a
/// result without a test, or a test with no result.
pub fn flag_testing_inconsistencies(
    table: &RecordTable,
    status: &mut [AssessmentFlags],
    had_test_col: usize,
    result_col: usize,
) {
    for (row, flags) in status.iter_mut().enumerate() {
        let had_test = table.value(row, had_test_col) == "True";
        let has_result = !table.value(row, result_col).is_empty();
        if !had_test && has_result {
            *flags |= AssessmentFlags::INCONSISTENT_NOT_TESTED;
        }
        if had_test && !has_result {
            *flags |= AssessmentFlags::INCONSISTENT_TESTED;
        }
    }
}

/// Flag rows whose self-reported health status contradicts the encoded
/// symptom indicators.
pub fn flag_symptom_inconsistencies(
    table: &RecordTable,
    status: &mut [AssessmentFlags],
    health_status_col: usize,
    any_symptoms: &[bool],
) {
    for (row, flags) in status.iter_mut().enumerate() {
        match table.value(row, health_status_col) {
            "healthy" if any_symptoms[row] => *flags |= AssessmentFlags::INCONSISTENT_SYMPTOMS,
            "not_healthy" if !any_symptoms[row] => {
                *flags |= AssessmentFlags::INCONSISTENT_NO_SYMPTOMS;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_model::Record;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RecordTable {
        let mut table = RecordTable::new(headers.iter().map(|h| (*h).to_string()).collect());
        for fields in rows {
            table.rows.push(Record {
                line: 0,
                fields: fields.iter().map(|f| (*f).to_string()).collect(),
            });
        }
        table
    }

    #[test]
    fn orphaned_assessments_are_always_flagged() {
        let registry = table(&["id"], &[&["a"], &["b"]]);
        let reg_status = vec![SubjectFlags::empty(), SubjectFlags::OUT_OF_RANGE_BMI];
        let registry_ids = registry_subject_ids(&registry, 0);
        let clean_ids = clean_subject_ids(&registry, &reg_status, 0);

        let assessments = table(&["patient_id"], &[&["a"], &["b"], &["ghost"]]);
        let mut status = vec![AssessmentFlags::empty(); 3];
        flag_orphaned_assessments(&assessments, &mut status, 0, &registry_ids, &clean_ids);

        assert!(status[0].is_empty());
        assert!(status[1].contains(AssessmentFlags::SUBJECT_FILTERED));
        assert!(status[2].contains(AssessmentFlags::INVALID_SUBJECT_ID));
    }

    #[test]
    fn sparse_subjects_get_count_flags() {
        let registry = table(&["id"], &[&["a"], &["b"], &["c"]]);
        let assessments = table(&["patient_id"], &[&["a"], &["a"], &["b"]]);
        let counts = assessment_counts(&assessments, 0);

        let mut status = vec![SubjectFlags::empty(); 3];
        flag_sparse_subjects(&registry, &mut status, 0, &counts);

        assert!(status[0].is_empty());
        assert!(status[1].contains(SubjectFlags::ONE_ASSESSMENT));
        assert!(status[2].contains(SubjectFlags::NO_ASSESSMENTS));
    }

    #[test]
    fn testing_contradictions_are_flagged() {
        let assessments = table(
            &["had_covid_test", "tested_covid_positive"],
            &[
                &["True", "yes"],
                &["True", ""],
                &["False", "no"],
                &["", ""],
            ],
        );
        let mut status = vec![AssessmentFlags::empty(); 4];
        flag_testing_inconsistencies(&assessments, &mut status, 0, 1);

        assert!(status[0].is_empty());
        assert!(status[1].contains(AssessmentFlags::INCONSISTENT_TESTED));
        assert!(status[2].contains(AssessmentFlags::INCONSISTENT_NOT_TESTED));
        assert!(status[3].is_empty());
    }

    #[test]
    fn health_status_contradictions_are_flagged() {
        let assessments = table(
            &["health_status"],
            &[&["healthy"], &["healthy"], &["not_healthy"], &["not_healthy"], &[""]],
        );
        let any_symptoms = [true, false, true, false, true];
        let mut status = vec![AssessmentFlags::empty(); 5];
        flag_symptom_inconsistencies(&assessments, &mut status, 0, &any_symptoms);

        assert!(status[0].contains(AssessmentFlags::INCONSISTENT_SYMPTOMS));
        assert!(status[1].is_empty());
        assert!(status[2].is_empty());
        assert!(status[3].contains(AssessmentFlags::INCONSISTENT_NO_SYMPTOMS));
        assert!(status[4].is_empty());
    }
}

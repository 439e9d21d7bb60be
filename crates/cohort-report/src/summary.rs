//! Flag-count summaries, value histograms, and the machine-readable run
//! report.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use cohort_model::{FlagSet, RecordTable, count_clean, count_set};

/// How many records carry one named flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagCount {
    pub label: String,
    pub count: usize,
}

/// Totals for one dataset after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Rows loaded.
    pub rows: usize,
    /// Malformed rows skipped at load time.
    pub skipped: usize,
    /// Rows with no flags set.
    pub clean: usize,
    /// Per-flag counts, in bit order.
    pub flags: Vec<FlagCount>,
}

impl DatasetSummary {
    pub fn new<F: FlagSet>(status: &[F], skipped: usize) -> Self {
        Self {
            rows: status.len(),
            skipped,
            clean: count_clean(status),
            flags: flag_summary(status),
        }
    }

    /// Rows with at least one flag set.
    pub fn flagged(&self) -> usize {
        self.rows - self.clean
    }
}

/// Count every named flag across a status array.
pub fn flag_summary<F: FlagSet>(status: &[F]) -> Vec<FlagCount> {
    F::LABELS
        .iter()
        .map(|(flag, label)| FlagCount {
            label: (*label).to_string(),
            count: count_set(status, *flag),
        })
        .collect()
}

/// Distinct values of one column with their frequencies, most frequent
/// first, ties by value. When `status` is given, flagged rows are skipped.
pub fn value_histogram<F: FlagSet>(
    table: &RecordTable,
    column: usize,
    status: Option<&[F]>,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in 0..table.len() {
        if let Some(status) = status {
            if !status[row].is_empty() {
                continue;
            }
        }
        *counts.entry(table.value(row, column)).or_insert(0) += 1;
    }
    let mut histogram: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    histogram.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    histogram
}

/// Full machine-readable result of one cleansing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub registry_input: PathBuf,
    pub assessments_input: PathBuf,
    pub registry: DatasetSummary,
    pub assessments: DatasetSummary,
    /// Assessment rows surviving all filters, before the day merge.
    pub retained_assessments: usize,
    /// Rows in the merged assessment output.
    pub merged_rows: usize,
    /// Subject groups invalidated by the progression check.
    pub invalid_progression_groups: usize,
    pub registry_output: Option<PathBuf>,
    pub assessments_output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_model::{Record, SubjectFlags};

    #[test]
    fn dataset_summary_partitions_rows() {
        let status = vec![
            SubjectFlags::empty(),
            SubjectFlags::MISSING_BMI,
            SubjectFlags::MISSING_BMI | SubjectFlags::OTHER_TERRITORY,
        ];
        let summary = DatasetSummary::new(&status, 1);

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.clean, 1);
        assert_eq!(summary.flagged(), 2);
        assert_eq!(summary.skipped, 1);

        let bmi = summary
            .flags
            .iter()
            .find(|flag| flag.label == "missing_bmi")
            .unwrap();
        assert_eq!(bmi.count, 2);
        let territory = summary
            .flags
            .iter()
            .find(|flag| flag.label == "other_territory")
            .unwrap();
        assert_eq!(territory.count, 1);
    }

    #[test]
    fn histogram_orders_by_frequency_then_value() {
        let mut table = RecordTable::new(vec!["country_code".into()]);
        for value in ["GB", "US", "GB", "DE", "US", "GB"] {
            table.rows.push(Record {
                line: 0,
                fields: vec![value.to_string()],
            });
        }
        let histogram = value_histogram::<SubjectFlags>(&table, 0, None);
        assert_eq!(
            histogram,
            vec![
                ("GB".to_string(), 3),
                ("US".to_string(), 2),
                ("DE".to_string(), 1),
            ]
        );
    }

    #[test]
    fn histogram_skips_flagged_rows() {
        let mut table = RecordTable::new(vec!["country_code".into()]);
        for value in ["GB", "US"] {
            table.rows.push(Record {
                line: 0,
                fields: vec![value.to_string()],
            });
        }
        let status = vec![SubjectFlags::empty(), SubjectFlags::OTHER_TERRITORY];
        let histogram = value_histogram(&table, 0, Some(&status));
        assert_eq!(histogram, vec![("GB".to_string(), 1)]);
    }

    #[test]
    fn run_report_round_trips_as_json() {
        let report = RunReport {
            registry_input: PathBuf::from("in/registry.csv"),
            assessments_input: PathBuf::from("in/assessments.csv"),
            registry: DatasetSummary::new(&[SubjectFlags::empty()], 0),
            assessments: DatasetSummary::new::<cohort_model::AssessmentFlags>(&[], 0),
            retained_assessments: 0,
            merged_rows: 0,
            invalid_progression_groups: 0,
            registry_output: Some(PathBuf::from("out/registry.csv")),
            assessments_output: None,
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: RunReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round, report);
    }
}

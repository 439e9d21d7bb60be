//! Fixed-vocabulary categorical encoding.
//!
//! Each symptomatic and exposure field carries a closed text vocabulary
//! mapping to a boolean indicator. The empty string is always a legal key
//! (an unanswered question is not a symptom). A value outside the
//! vocabulary aborts the run: the upstream survey schema has changed and
//! silently mis-encoding it would poison every downstream count.

use tracing::debug;

use cohort_model::RecordTable;

use crate::error::{Result, TransformError};

/// Symptomatic fields, in output column order. Their encoded indicators
/// feed the any-symptom accumulator.
pub const SYMPTOMATIC_FIELDS: [&str; 14] = [
    "fatigue",
    "shortness_of_breath",
    "abdominal_pain",
    "chest_pain",
    "delirium",
    "diarrhoea",
    "fever",
    "headache",
    "hoarse_voice",
    "loss_of_smell",
    "persistent_cough",
    "skipped_meals",
    "sore_throat",
    "unusual_muscle_pains",
];

/// Exposure fields, in output column order. Encoded with the same
/// machinery but excluded from the any-symptom accumulator.
pub const EXPOSURE_FIELDS: [&str; 5] = [
    "always_used_shortage",
    "have_used_PPE",
    "never_used_shortage",
    "sometimes_used_shortage",
    "treated_patients_with_covid",
];

const TRUE_FALSE: &[(&str, bool)] = &[("", false), ("False", false), ("True", true)];
const FATIGUE: &[(&str, bool)] = &[("", false), ("no", false), ("mild", true), ("severe", true)];
const SHORTNESS_OF_BREATH: &[(&str, bool)] = &[
    ("", false),
    ("no", false),
    ("mild", true),
    ("significant", true),
    ("severe", true),
];
const ALWAYS_USED_SHORTAGE: &[(&str, bool)] =
    &[("", false), ("all_needed", false), ("reused", true)];
const HAVE_USED_PPE: &[(&str, bool)] = &[
    ("", false),
    ("never", false),
    ("sometimes", true),
    ("always", true),
];
const NEVER_USED_SHORTAGE: &[(&str, bool)] =
    &[("", false), ("not_needed", false), ("not_available", true)];
const SOMETIMES_USED_SHORTAGE: &[(&str, bool)] = &[
    ("", false),
    ("all_needed", false),
    ("reused", true),
    ("not_enough", true),
];
const TREATED_PATIENTS_WITH_COVID: &[(&str, bool)] = &[
    ("", false),
    ("no", false),
    ("yes_suspected", true),
    ("yes_documented_suspected", true),
    ("yes_documented", true),
];

/// The fixed vocabulary for a categorical field, if one is defined.
pub fn vocabulary(field: &str) -> Option<&'static [(&'static str, bool)]> {
    match field {
        "fatigue" => Some(FATIGUE),
        "shortness_of_breath" => Some(SHORTNESS_OF_BREATH),
        "abdominal_pain" | "chest_pain" | "delirium" | "diarrhoea" | "fever" | "headache"
        | "hoarse_voice" | "loss_of_smell" | "persistent_cough" | "skipped_meals"
        | "sore_throat" | "unusual_muscle_pains" => Some(TRUE_FALSE),
        "always_used_shortage" => Some(ALWAYS_USED_SHORTAGE),
        "have_used_PPE" => Some(HAVE_USED_PPE),
        "never_used_shortage" => Some(NEVER_USED_SHORTAGE),
        "sometimes_used_shortage" => Some(SOMETIMES_USED_SHORTAGE),
        "treated_patients_with_covid" => Some(TREATED_PATIENTS_WITH_COVID),
        _ => None,
    }
}

/// Encode one categorical field into an aligned boolean column.
pub fn encode_field(table: &RecordTable, field: &str) -> Result<Vec<bool>> {
    let vocab = vocabulary(field).ok_or_else(|| TransformError::UnknownField {
        field: field.to_string(),
    })?;
    let column = table.index_of(field)?;

    let mut encoded = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let value = table.value(row, column);
        let indicator = vocab
            .iter()
            .find(|(key, _)| *key == value)
            .map(|(_, indicator)| *indicator)
            .ok_or_else(|| TransformError::UnmappedValue {
                field: field.to_string(),
                value: value.to_string(),
                line: table.rows[row].line,
            })?;
        encoded.push(indicator);
    }
    Ok(encoded)
}

/// All encoded indicator columns plus the any-symptom accumulator.
#[derive(Debug, Clone, Default)]
pub struct IndicatorColumns {
    /// Column names: the 14 symptomatic fields then the 5 exposure fields.
    pub names: Vec<&'static str>,
    /// Boolean columns aligned with the table's rows, one per name.
    pub columns: Vec<Vec<bool>>,
    /// Per-row OR across the symptomatic columns only.
    pub any_symptoms: Vec<bool>,
}

/// Encode every symptomatic and exposure field, accumulating the
/// any-symptom OR incrementally as each symptomatic column is produced.
pub fn encode_indicators(table: &RecordTable) -> Result<IndicatorColumns> {
    let mut indicators = IndicatorColumns {
        any_symptoms: vec![false; table.len()],
        ..IndicatorColumns::default()
    };

    for field in SYMPTOMATIC_FIELDS {
        let column = encode_field(table, field)?;
        for (any, value) in indicators.any_symptoms.iter_mut().zip(&column) {
            *any |= value;
        }
        debug!(
            field,
            set = column.iter().filter(|v| **v).count(),
            any = indicators.any_symptoms.iter().filter(|v| **v).count(),
            "encoded symptomatic field"
        );
        indicators.names.push(field);
        indicators.columns.push(column);
    }

    for field in EXPOSURE_FIELDS {
        let column = encode_field(table, field)?;
        indicators.names.push(field);
        indicators.columns.push(column);
    }

    Ok(indicators)
}

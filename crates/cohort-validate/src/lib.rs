//! Validation engines for the cohort cleansing pipeline.
//!
//! - **groups**: per-subject grouping with a checked ordering contract
//! - **fields**: generic bounds filtering over record fields
//! - **consistency**: cross-dataset propagation and intra-row checks
//! - **progression**: monotonic diagnostic-result state machine

pub mod consistency;
pub mod error;
pub mod fields;
pub mod groups;
pub mod limits;
pub mod progression;

pub use consistency::{
    assessment_counts, clean_subject_ids, flag_orphaned_assessments, flag_sparse_subjects,
    flag_symptom_inconsistencies, flag_testing_inconsistencies, registry_subject_ids,
};
pub use error::{Result, ValidateError};
pub use fields::{
    Bounds, filter_field, filter_territory, filter_values, normalized_temperatures, parse_float,
    parse_year,
};
pub use groups::{sort_by_subject, sort_by_subject_and_time, subject_ranges};
pub use progression::{ProgressionOutcome, validate_progression};

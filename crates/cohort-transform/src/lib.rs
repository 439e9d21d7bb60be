//! Derived-column transforms for assessment records.
//!
//! - **categorical**: fixed text→bool vocabularies and the any-symptom OR
//! - **compact**: dropping flagged rows while keeping columns aligned
//! - **day_merge**: collapsing a subject's same-day assessments

pub mod categorical;
pub mod compact;
pub mod day_merge;
pub mod error;

pub use categorical::{
    EXPOSURE_FIELDS, IndicatorColumns, SYMPTOMATIC_FIELDS, encode_field, encode_indicators,
    vocabulary,
};
pub use compact::{CleanAssessments, retain_clean};
pub use day_merge::{MergeColumns, MergedRow, count_merged_rows, merge_by_day};
pub use error::{Result, TransformError};

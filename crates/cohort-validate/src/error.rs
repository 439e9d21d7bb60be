use cohort_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(
        "input not sorted by subject id: {current:?} after {previous:?} at row index {row}"
    )]
    UnsortedInput {
        row: usize,
        previous: String,
        current: String,
    },
    #[error("unknown diagnostic result {value:?} on line {line}")]
    UnknownResult { line: u64, value: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ValidateError>;

use cohort_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A categorical field held a value outside its fixed vocabulary.
    /// This is schema drift, not a per-row data problem, so it aborts the
    /// run instead of flagging the record.
    #[error("field {field:?}: unmapped value {value:?} on line {line}")]
    UnmappedValue {
        field: String,
        value: String,
        line: u64,
    },
    #[error("no categorical vocabulary defined for field {field:?}")]
    UnknownField { field: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, TransformError>;

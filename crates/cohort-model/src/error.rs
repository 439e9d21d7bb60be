use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("column {name:?} not present in header")]
    MissingColumn { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;

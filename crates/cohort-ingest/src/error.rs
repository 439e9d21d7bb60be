use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: no header row")]
    MissingHeader { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, IngestError>;

pub mod error;
pub mod summary;
pub mod writer;

pub use error::{ReportError, Result};
pub use summary::{DatasetSummary, FlagCount, RunReport, flag_summary, value_histogram};
pub use writer::{assessment_headers, write_assessments, write_registry};

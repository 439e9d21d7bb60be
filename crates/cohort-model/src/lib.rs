pub mod error;
pub mod flags;
pub mod record;
pub mod result;

pub use error::{ModelError, Result};
pub use flags::{AssessmentFlags, FlagSet, SubjectFlags, count_clean, count_not_set, count_set};
pub use record::{Record, RecordTable};
pub use result::TestResult;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_as_lowercase() {
        let json = serde_json::to_string(&TestResult::Waiting).expect("serialize");
        assert_eq!(json, "\"waiting\"");
        let round: TestResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round, TestResult::Waiting);
    }
}

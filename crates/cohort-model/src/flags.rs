//! Per-record validation flag sets.
//!
//! Every record carries a flag set alongside the immutable payload. Checks
//! OR failure bits into the set; a record is retained only while its set
//! stays empty. The bit layouts for the two datasets are independent.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Operations shared by the dataset-specific flag sets, so counting and
/// summary helpers can stay generic over both.
pub trait FlagSet: Copy + Eq + Default + BitOrAssign + 'static {
    /// All named bits with their summary labels, in bit order.
    const LABELS: &'static [(Self, &'static str)];

    fn is_empty(self) -> bool;
    fn intersects(self, other: Self) -> bool;
}

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($flag:ident = $bit:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
        pub struct $name(u32);

        impl $name {
            $(pub const $flag: Self = Self($bit);)+

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }
        }

        impl FlagSet for $name {
            const LABELS: &'static [(Self, &'static str)] = &[
                $((Self::$flag, $label),)+
            ];

            fn is_empty(self) -> bool {
                self.0 == 0
            }

            fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                if self.is_empty() {
                    write!(f, "none")?;
                } else {
                    let mut first = true;
                    for (flag, label) in <Self as FlagSet>::LABELS {
                        if self.intersects(*flag) {
                            if !first {
                                write!(f, "|")?;
                            }
                            write!(f, "{label}")?;
                            first = false;
                        }
                    }
                }
                write!(f, ")")
            }
        }
    };
}

flag_set! {
    /// Validation failures recorded against a subject registry row.
    SubjectFlags {
        OTHER_TERRITORY = 0x1 => "other_territory",
        NO_ASSESSMENTS = 0x2 => "no_assessments",
        ONE_ASSESSMENT = 0x4 => "one_assessment",
        MISSING_YEAR_OF_BIRTH = 0x8 => "missing_year_of_birth",
        OUT_OF_RANGE_YEAR_OF_BIRTH = 0x10 => "out_of_range_year_of_birth",
        MISSING_HEIGHT = 0x20 => "missing_height",
        OUT_OF_RANGE_HEIGHT = 0x40 => "out_of_range_height",
        MISSING_WEIGHT = 0x80 => "missing_weight",
        OUT_OF_RANGE_WEIGHT = 0x100 => "out_of_range_weight",
        MISSING_BMI = 0x200 => "missing_bmi",
        OUT_OF_RANGE_BMI = 0x400 => "out_of_range_bmi",
    }
}

flag_set! {
    /// Validation failures recorded against an assessment row.
    AssessmentFlags {
        INVALID_SUBJECT_ID = 0x1 => "invalid_subject_id",
        SUBJECT_FILTERED = 0x2 => "subject_filtered",
        MISSING_TEMPERATURE = 0x4 => "missing_temperature",
        OUT_OF_RANGE_TEMPERATURE = 0x8 => "out_of_range_temperature",
        INCONSISTENT_NOT_TESTED = 0x10 => "inconsistent_testing_not_tested",
        INCONSISTENT_TESTED = 0x20 => "inconsistent_testing_was_tested",
        INCONSISTENT_SYMPTOMS = 0x40 => "inconsistent_symptoms",
        INCONSISTENT_NO_SYMPTOMS = 0x80 => "inconsistent_no_symptoms",
        INVALID_PROGRESSION = 0x100 => "invalid_covid_progression",
    }
}

/// Count records whose flag set intersects `flag`.
pub fn count_set<F: FlagSet>(status: &[F], flag: F) -> usize {
    status.iter().filter(|s| s.intersects(flag)).count()
}

/// Count records whose flag set does not intersect `flag`.
pub fn count_not_set<F: FlagSet>(status: &[F], flag: F) -> usize {
    status.iter().filter(|s| !s.intersects(flag)).count()
}

/// Count records with no flags set.
pub fn count_clean<F: FlagSet>(status: &[F]) -> usize {
    status.iter().filter(|s| s.is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_bits() {
        let mut flags = SubjectFlags::empty();
        assert!(flags.is_empty());
        flags |= SubjectFlags::MISSING_HEIGHT;
        flags |= SubjectFlags::OUT_OF_RANGE_BMI;
        assert!(flags.contains(SubjectFlags::MISSING_HEIGHT));
        assert!(flags.contains(SubjectFlags::OUT_OF_RANGE_BMI));
        assert!(!flags.contains(SubjectFlags::OTHER_TERRITORY));
        assert!(!flags.is_empty());
    }

    #[test]
    fn labels_cover_distinct_bits() {
        let mut seen = 0u32;
        for (flag, _) in SubjectFlags::LABELS {
            assert_eq!(seen & flag.bits(), 0, "overlapping bit {:?}", flag);
            seen |= flag.bits();
        }
        assert_eq!(SubjectFlags::LABELS.len(), 11);
        assert_eq!(AssessmentFlags::LABELS.len(), 9);
    }

    #[test]
    fn set_and_clear_counts_partition() {
        let status = vec![
            AssessmentFlags::empty(),
            AssessmentFlags::SUBJECT_FILTERED,
            AssessmentFlags::SUBJECT_FILTERED | AssessmentFlags::OUT_OF_RANGE_TEMPERATURE,
        ];
        let flag = AssessmentFlags::SUBJECT_FILTERED;
        let set = count_set(&status, flag);
        let clear = count_not_set(&status, flag);
        assert_eq!(set + clear, status.len());
        assert_eq!(set, 2);
        assert_eq!(count_clean(&status), 1);
    }

    #[test]
    fn debug_renders_labels() {
        let flags = SubjectFlags::MISSING_BMI | SubjectFlags::OTHER_TERRITORY;
        let rendered = format!("{flags:?}");
        assert_eq!(rendered, "SubjectFlags(other_territory|missing_bmi)");
        assert_eq!(format!("{:?}", SubjectFlags::empty()), "SubjectFlags(none)");
    }
}

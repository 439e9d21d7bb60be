//! Generic per-field filtering.
//!
//! Filters never remove records. A value that fails to parse ORs the
//! missing-value flag into the record's status; a parsed value outside the
//! declared bounds ORs the bad-value flag. Passing the empty flag set for
//! either makes that failure mode a no-op, which is how "an absent value
//! counts as valid" variants are expressed.

use cohort_model::{FlagSet, RecordTable, SubjectFlags};

use crate::limits::MAX_TEMPERATURE_C;

/// Range membership test, inclusive or exclusive of its endpoints.
#[derive(Debug, Clone, Copy)]
pub enum Bounds {
    Inclusive { min: f64, max: f64 },
    Exclusive { min: f64, max: f64 },
}

impl Bounds {
    pub fn contains(self, value: f64) -> bool {
        match self {
            Self::Inclusive { min, max } => value >= min && value <= max,
            Self::Exclusive { min, max } => value > min && value < max,
        }
    }
}

/// Float parser. Tolerates surrounding whitespace, rejects empty values.
pub fn parse_float(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Integer-via-float parser: "1990.0" is a valid year. Truncates toward
/// zero like the source data's historical handling.
pub fn parse_year(value: &str) -> Option<f64> {
    parse_float(value).map(f64::trunc)
}

/// Filter one field of every record against `bounds`.
pub fn filter_field<F: FlagSet>(
    table: &RecordTable,
    status: &mut [F],
    field: usize,
    missing_flag: F,
    bad_flag: F,
    parser: fn(&str) -> Option<f64>,
    bounds: Bounds,
) {
    for (row, flags) in status.iter_mut().enumerate() {
        match parser(table.value(row, field)) {
            None => *flags |= missing_flag,
            Some(value) => {
                if !bounds.contains(value) {
                    *flags |= bad_flag;
                }
            }
        }
    }
}

/// Filter a pre-computed value column against `bounds`. Used where the raw
/// field needs normalization before range checking.
pub fn filter_values<F: FlagSet>(
    values: &[Option<f64>],
    status: &mut [F],
    missing_flag: F,
    bad_flag: F,
    bounds: Bounds,
) {
    for (value, flags) in values.iter().zip(status.iter_mut()) {
        match value {
            None => *flags |= missing_flag,
            Some(value) => {
                if !bounds.contains(*value) {
                    *flags |= bad_flag;
                }
            }
        }
    }
}

/// Parse temperatures, converting assumed-Fahrenheit readings to Celsius.
///
/// Any parsed reading above the Celsius plausibility ceiling is treated as
/// Fahrenheit and converted via (t - 32) / 1.8 before range filtering.
pub fn normalized_temperatures(table: &RecordTable, field: usize) -> Vec<Option<f64>> {
    (0..table.len())
        .map(|row| {
            parse_float(table.value(row, field)).map(|t| {
                if t > MAX_TEMPERATURE_C {
                    (t - 32.0) / 1.8
                } else {
                    t
                }
            })
        })
        .collect()
}

/// Flag registry rows whose country code differs from `territory`.
pub fn filter_territory(
    table: &RecordTable,
    status: &mut [SubjectFlags],
    country_col: usize,
    territory: &str,
) {
    for (row, flags) in status.iter_mut().enumerate() {
        if table.value(row, country_col) != territory {
            *flags |= SubjectFlags::OTHER_TERRITORY;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_model::Record;

    fn one_column(values: &[&str]) -> RecordTable {
        let mut table = RecordTable::new(vec!["value".into()]);
        for value in values {
            table.rows.push(Record {
                line: 0,
                fields: vec![(*value).to_string()],
            });
        }
        table
    }

    #[test]
    fn inclusive_bounds_keep_endpoints() {
        let table = one_column(&["1930", "2004", "1929", "2005", ""]);
        let mut status = vec![SubjectFlags::empty(); table.len()];
        filter_field(
            &table,
            &mut status,
            0,
            SubjectFlags::MISSING_YEAR_OF_BIRTH,
            SubjectFlags::OUT_OF_RANGE_YEAR_OF_BIRTH,
            parse_year,
            Bounds::Inclusive {
                min: 1930.0,
                max: 2004.0,
            },
        );
        assert!(status[0].is_empty());
        assert!(status[1].is_empty());
        assert!(status[2].contains(SubjectFlags::OUT_OF_RANGE_YEAR_OF_BIRTH));
        assert!(status[3].contains(SubjectFlags::OUT_OF_RANGE_YEAR_OF_BIRTH));
        assert!(status[4].contains(SubjectFlags::MISSING_YEAR_OF_BIRTH));
    }

    #[test]
    fn exclusive_bounds_reject_endpoints() {
        let bounds = Bounds::Exclusive {
            min: 35.0,
            max: 42.0,
        };
        assert!(bounds.contains(36.6));
        assert!(!bounds.contains(35.0));
        assert!(!bounds.contains(42.0));
    }

    #[test]
    fn year_parser_accepts_float_forms() {
        assert_eq!(parse_year("1990"), Some(1990.0));
        assert_eq!(parse_year("1990.0"), Some(1990.0));
        assert_eq!(parse_year("1990.7"), Some(1990.0));
        assert_eq!(parse_year("x"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn empty_missing_flag_is_a_no_op() {
        let table = one_column(&["", "not-a-number"]);
        let mut status = vec![SubjectFlags::empty(); table.len()];
        filter_field(
            &table,
            &mut status,
            0,
            SubjectFlags::empty(),
            SubjectFlags::OUT_OF_RANGE_BMI,
            parse_float,
            Bounds::Inclusive {
                min: 15.0,
                max: 55.0,
            },
        );
        assert!(status.iter().all(|flags| flags.is_empty()));
    }

    #[test]
    fn fahrenheit_readings_are_converted() {
        let table = one_column(&["98.6", "37.2", "", "abc"]);
        let values = normalized_temperatures(&table, 0);
        assert!((values[0].unwrap() - 37.0).abs() < 1e-9);
        assert_eq!(values[1], Some(37.2));
        assert_eq!(values[2], None);
        assert_eq!(values[3], None);
    }

    #[test]
    fn territory_mismatch_is_flagged() {
        let table = one_column(&["GB", "US", "GB"]);
        let mut status = vec![SubjectFlags::empty(); table.len()];
        filter_territory(&table, &mut status, 0, "GB");
        assert!(status[0].is_empty());
        assert!(status[1].contains(SubjectFlags::OTHER_TERRITORY));
        assert!(status[2].is_empty());
    }
}

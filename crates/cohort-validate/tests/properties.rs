//! Property tests for grouping and flag accounting.

use proptest::prelude::*;

use cohort_model::{FlagSet, Record, RecordTable, SubjectFlags, count_not_set, count_set};
use cohort_validate::subject_ranges;

fn table_of(ids: &[String]) -> RecordTable {
    let mut table = RecordTable::new(vec!["patient_id".into()]);
    for (i, id) in ids.iter().enumerate() {
        table.rows.push(Record {
            line: i as u64 + 2,
            fields: vec![id.clone()],
        });
    }
    table
}

proptest! {
    /// Yielded ranges cover every index exactly once, in order, and each
    /// range holds a single subject id.
    #[test]
    fn ranges_partition_sorted_input(raw in prop::collection::vec(0u8..20, 0..60)) {
        let mut keys: Vec<String> = raw.iter().map(|k| format!("s{k:03}")).collect();
        keys.sort();
        let table = table_of(&keys);

        let ranges = subject_ranges(&table, 0).unwrap();

        let mut next = 0usize;
        for &(start, end) in &ranges {
            prop_assert_eq!(start, next);
            prop_assert!(end >= start);
            for row in start..=end {
                prop_assert_eq!(table.value(row, 0), table.value(start, 0));
            }
            if start > 0 {
                prop_assert_ne!(table.value(start - 1, 0), table.value(start, 0));
            }
            next = end + 1;
        }
        prop_assert_eq!(next, table.len());
    }

    /// A key that decreases anywhere is rejected.
    #[test]
    fn decreasing_keys_are_rejected(
        raw in prop::collection::vec(0u8..10, 2..40),
        split in 1usize..39,
    ) {
        let mut keys: Vec<String> = raw.iter().map(|k| format!("s{k:03}")).collect();
        keys.sort();
        let split = split.min(keys.len() - 1);
        keys[split..].rotate_left(1);
        let table = table_of(&keys);

        let unsorted = keys.windows(2).any(|pair| pair[0] > pair[1]);
        prop_assert_eq!(subject_ranges(&table, 0).is_err(), unsorted);
    }

    /// For any flag F, set and not-set counts partition the record set.
    #[test]
    fn flag_counts_partition_records(
        picks in prop::collection::vec(prop::collection::vec(any::<bool>(), 11), 0..50)
    ) {
        let status: Vec<SubjectFlags> = picks
            .iter()
            .map(|bits| {
                let mut flags = SubjectFlags::empty();
                for (pick, (flag, _)) in bits.iter().zip(SubjectFlags::LABELS) {
                    if *pick {
                        flags |= *flag;
                    }
                }
                flags
            })
            .collect();

        for (flag, _) in SubjectFlags::LABELS {
            let set = count_set(&status, *flag);
            let not_set = count_not_set(&status, *flag);
            prop_assert_eq!(set + not_set, status.len());
        }
    }
}

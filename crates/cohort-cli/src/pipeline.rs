//! Cleansing pipeline with explicit stages.
//!
//! The pipeline runs these stages in order:
//! 1. **Load**: read both CSV files into record tables
//! 2. **Order**: sort registry by subject, assessments by (subject, time)
//! 3. **Registry validation**: territory, field ranges, optional
//!    assessment-count propagation
//! 4. **Assessment validation**: registry exclusion propagation,
//!    temperature, testing consistency
//! 5. **Encoding**: categorical indicators plus symptom consistency
//! 6. **Progression**: per-subject diagnostic state machine
//! 7. **Merge**: drop flagged rows, collapse same-day assessments
//!
//! Stages execute strictly in sequence; the per-record flag arrays are the
//! only shared mutable state, written by successive stages and never
//! concurrently.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use cohort_ingest::{LoadStats, read_record_table};
use cohort_model::{AssessmentFlags, RecordTable, SubjectFlags, count_clean, count_set};
use cohort_report::value_histogram;
use cohort_transform::{
    CleanAssessments, MergeColumns, MergedRow, encode_indicators, merge_by_day, retain_clean,
};
use cohort_validate::{
    Bounds, assessment_counts, clean_subject_ids, filter_field, filter_territory, filter_values,
    flag_orphaned_assessments, flag_sparse_subjects, flag_symptom_inconsistencies,
    flag_testing_inconsistencies, limits, normalized_temperatures, parse_float, parse_year,
    registry_subject_ids, sort_by_subject, sort_by_subject_and_time, subject_ranges,
    validate_progression,
};

/// Processing options for one cleansing run.
#[derive(Debug, Default)]
pub struct CleanOptions<'a> {
    /// When set, registry rows outside this territory are flagged.
    pub territory: Option<&'a str>,
    /// Flag subjects reporting fewer than two assessments.
    pub require_repeat_assessments: bool,
}

// ============================================================================
// Stage 1: Load
// ============================================================================

/// Both input tables plus their load counters.
#[derive(Debug)]
pub struct Datasets {
    pub registry: RecordTable,
    pub registry_stats: LoadStats,
    pub assessments: RecordTable,
    pub assessments_stats: LoadStats,
}

/// Read both input files.
pub fn load(registry_path: &Path, assessments_path: &Path) -> Result<Datasets> {
    let (registry, registry_stats) = read_record_table(registry_path)
        .with_context(|| format!("load registry {}", registry_path.display()))?;
    info!(
        rows = registry_stats.rows,
        skipped = registry_stats.skipped,
        "loaded registry"
    );

    let (assessments, assessments_stats) = read_record_table(assessments_path)
        .with_context(|| format!("load assessments {}", assessments_path.display()))?;
    info!(
        rows = assessments_stats.rows,
        skipped = assessments_stats.skipped,
        "loaded assessments"
    );

    Ok(Datasets {
        registry,
        registry_stats,
        assessments,
        assessments_stats,
    })
}

// ============================================================================
// Stages 2-7: validation and merge
// ============================================================================

/// Everything the later output stage needs from one run.
#[derive(Debug)]
pub struct CleanOutcome {
    pub registry_status: Vec<SubjectFlags>,
    pub assessment_status: Vec<AssessmentFlags>,
    /// Flag-clean assessments with aligned derived columns.
    pub clean: CleanAssessments,
    pub merged: Vec<MergedRow>,
    pub invalid_progression_groups: usize,
}

/// Run the full validation and merge sequence over loaded datasets.
///
/// Sorts both tables in place; all other state lives in the returned
/// outcome.
pub fn run(datasets: &mut Datasets, options: &CleanOptions<'_>) -> Result<CleanOutcome> {
    // Stage 2: Order
    let reg_subject = datasets.registry.index_of("id")?;
    sort_by_subject(&mut datasets.registry, reg_subject);
    let asmt_subject = datasets.assessments.index_of("patient_id")?;
    let asmt_updated = datasets.assessments.index_of("updated_at")?;
    sort_by_subject_and_time(&mut datasets.assessments, asmt_subject, asmt_updated);

    let registry = &datasets.registry;
    let assessments = &datasets.assessments;
    let mut registry_status = vec![SubjectFlags::empty(); registry.len()];
    let mut assessment_status = vec![AssessmentFlags::empty(); assessments.len()];

    // Stage 3: Registry validation
    if let Some(territory) = options.territory {
        let country = registry.index_of("country_code")?;
        filter_territory(registry, &mut registry_status, country, territory);
        info!(
            territory,
            flagged = count_set(&registry_status, SubjectFlags::OTHER_TERRITORY),
            "filtered other territories"
        );
    }

    let registry_fields: [(&str, SubjectFlags, SubjectFlags, fn(&str) -> Option<f64>, Bounds); 4] = [
        (
            "year_of_birth",
            SubjectFlags::MISSING_YEAR_OF_BIRTH,
            SubjectFlags::OUT_OF_RANGE_YEAR_OF_BIRTH,
            parse_year,
            Bounds::Inclusive {
                min: limits::MIN_YEAR_OF_BIRTH,
                max: limits::MAX_YEAR_OF_BIRTH,
            },
        ),
        (
            "height_cm",
            SubjectFlags::MISSING_HEIGHT,
            SubjectFlags::OUT_OF_RANGE_HEIGHT,
            parse_float,
            Bounds::Inclusive {
                min: limits::MIN_HEIGHT_CM,
                max: limits::MAX_HEIGHT_CM,
            },
        ),
        (
            "weight_kg",
            SubjectFlags::MISSING_WEIGHT,
            SubjectFlags::OUT_OF_RANGE_WEIGHT,
            parse_float,
            Bounds::Inclusive {
                min: limits::MIN_WEIGHT_KG,
                max: limits::MAX_WEIGHT_KG,
            },
        ),
        (
            "bmi",
            SubjectFlags::MISSING_BMI,
            SubjectFlags::OUT_OF_RANGE_BMI,
            parse_float,
            Bounds::Inclusive {
                min: limits::MIN_BMI,
                max: limits::MAX_BMI,
            },
        ),
    ];
    for (name, missing_flag, bad_flag, parser, bounds) in registry_fields {
        let column = registry.index_of(name)?;
        filter_field(
            registry,
            &mut registry_status,
            column,
            missing_flag,
            bad_flag,
            parser,
            bounds,
        );
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                field = name,
                missing = count_set(&registry_status, missing_flag),
                out_of_range = count_set(&registry_status, bad_flag),
                unique = value_histogram::<SubjectFlags>(registry, column, None).len(),
                "validated registry field"
            );
        }
    }

    if options.require_repeat_assessments {
        let counts = assessment_counts(assessments, asmt_subject);
        flag_sparse_subjects(registry, &mut registry_status, reg_subject, &counts);
        info!(
            none = count_set(&registry_status, SubjectFlags::NO_ASSESSMENTS),
            single = count_set(&registry_status, SubjectFlags::ONE_ASSESSMENT),
            "flagged subjects with insufficient assessments"
        );
    }

    info!(
        total = registry.len(),
        clean = count_clean(&registry_status),
        "validated registry"
    );

    // Stage 4: Assessment validation
    let registry_ids = registry_subject_ids(registry, reg_subject);
    let clean_ids = clean_subject_ids(registry, &registry_status, reg_subject);
    flag_orphaned_assessments(
        assessments,
        &mut assessment_status,
        asmt_subject,
        &registry_ids,
        &clean_ids,
    );
    info!(
        unknown = count_set(&assessment_status, AssessmentFlags::INVALID_SUBJECT_ID),
        filtered = count_set(&assessment_status, AssessmentFlags::SUBJECT_FILTERED),
        "propagated registry exclusions"
    );

    let temperature = assessments.index_of("temperature")?;
    let temperatures = normalized_temperatures(assessments, temperature);
    // An absent temperature counts as valid; only implausible readings flag.
    filter_values(
        &temperatures,
        &mut assessment_status,
        AssessmentFlags::empty(),
        AssessmentFlags::OUT_OF_RANGE_TEMPERATURE,
        Bounds::Exclusive {
            min: limits::MIN_TEMPERATURE_C,
            max: limits::MAX_TEMPERATURE_C,
        },
    );
    debug!(
        out_of_range = count_set(&assessment_status, AssessmentFlags::OUT_OF_RANGE_TEMPERATURE),
        "validated temperatures"
    );

    let had_test = assessments.index_of("had_covid_test")?;
    let result_col = assessments.index_of("tested_covid_positive")?;
    flag_testing_inconsistencies(assessments, &mut assessment_status, had_test, result_col);

    // Stage 5: Encoding
    let indicators = encode_indicators(assessments)?;
    let health_status = assessments.index_of("health_status")?;
    flag_symptom_inconsistencies(
        assessments,
        &mut assessment_status,
        health_status,
        &indicators.any_symptoms,
    );

    // Stage 6: Progression
    let groups = subject_ranges(assessments, asmt_subject)?;
    let progression =
        validate_progression(assessments, &mut assessment_status, result_col, &groups)?;
    info!(
        groups = groups.len(),
        invalid = progression.invalid_groups,
        "validated diagnostic progression"
    );
    info!(
        total = assessments.len(),
        clean = count_clean(&assessment_status),
        "validated assessments"
    );

    // Stage 7: Merge
    let clean = retain_clean(
        assessments,
        &assessment_status,
        &indicators,
        &progression.sanitized,
    );
    let columns = MergeColumns {
        assessment_id: clean.table.index_of("id")?,
        subject_id: clean.table.index_of("patient_id")?,
        created_at: clean.table.index_of("created_at")?,
        updated_at: clean.table.index_of("updated_at")?,
    };
    let clean_groups = subject_ranges(&clean.table, columns.subject_id)?;
    let merged = merge_by_day(&clean, columns, &clean_groups);
    info!(
        retained = clean.table.len(),
        merged = merged.len(),
        "merged assessments by day"
    );

    Ok(CleanOutcome {
        registry_status,
        assessment_status,
        clean,
        merged,
        invalid_progression_groups: progression.invalid_groups,
    })
}

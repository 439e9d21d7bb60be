//! Subcommand implementations.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use cohort_model::{AssessmentFlags, FlagSet, SubjectFlags};
use cohort_report::{DatasetSummary, RunReport, write_assessments, write_registry};
use cohort_transform::{EXPOSURE_FIELDS, SYMPTOMATIC_FIELDS, vocabulary};
use cohort_validate::limits;

use crate::cli::CleanArgs;
use crate::pipeline::{self, CleanOptions};

/// Run the full cleansing pipeline and return its report.
pub fn run_clean(args: &CleanArgs) -> Result<RunReport> {
    let mut datasets = pipeline::load(&args.registry, &args.assessments)?;
    let options = CleanOptions {
        territory: args.territory.as_deref(),
        require_repeat_assessments: args.require_repeat_assessments,
    };
    let outcome = pipeline::run(&mut datasets, &options)?;

    let (registry_output, assessments_output) = if args.dry_run {
        info!("dry run: skipping output files");
        (None, None)
    } else {
        let output_dir = output_dir(args);
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("create output dir {}", output_dir.display()))?;

        let registry_path = output_dir.join("cleaned_registry.csv");
        write_registry(&registry_path, &datasets.registry, &outcome.registry_status)?;

        let assessments_path = output_dir.join("cleaned_assessments.csv");
        write_assessments(
            &assessments_path,
            &outcome.clean.indicators.names,
            &outcome.merged,
        )?;

        (Some(registry_path), Some(assessments_path))
    };

    let report = RunReport {
        registry_input: args.registry.clone(),
        assessments_input: args.assessments.clone(),
        registry: DatasetSummary::new(&outcome.registry_status, datasets.registry_stats.skipped),
        assessments: DatasetSummary::new(
            &outcome.assessment_status,
            datasets.assessments_stats.skipped,
        ),
        retained_assessments: outcome.clean.table.len(),
        merged_rows: outcome.merged.len(),
        invalid_progression_groups: outcome.invalid_progression_groups,
        registry_output,
        assessments_output,
    };

    if let Some(path) = &args.report_json {
        let file = File::create(path)
            .with_context(|| format!("create report file {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)
            .with_context(|| format!("write report {}", path.display()))?;
        info!(path = %path.display(), "wrote run report");
    }

    Ok(report)
}

fn output_dir(args: &CleanArgs) -> PathBuf {
    match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .registry
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    }
}

/// Print the expected input schema: validated fields with their bounds,
/// categorical vocabularies, and the flag vocabulary of both datasets.
pub fn run_fields() {
    println!("Registry fields");
    println!("  id                      subject identifier (unique)");
    println!("  country_code            checked against --territory when given");
    println!(
        "  year_of_birth           [{:.0}, {:.0}]",
        limits::MIN_YEAR_OF_BIRTH,
        limits::MAX_YEAR_OF_BIRTH
    );
    println!(
        "  height_cm               [{:.0}, {:.0}]",
        limits::MIN_HEIGHT_CM,
        limits::MAX_HEIGHT_CM
    );
    println!(
        "  weight_kg               [{:.0}, {:.0}]",
        limits::MIN_WEIGHT_KG,
        limits::MAX_WEIGHT_KG
    );
    println!("  bmi                     [{:.0}, {:.0}]", limits::MIN_BMI, limits::MAX_BMI);

    println!();
    println!("Assessment fields");
    println!("  id, patient_id, created_at, updated_at");
    println!(
        "  temperature             ({:.0}, {:.0}) Celsius, readings above {:.0} converted from Fahrenheit",
        limits::MIN_TEMPERATURE_C,
        limits::MAX_TEMPERATURE_C,
        limits::MAX_TEMPERATURE_C
    );
    println!("  had_covid_test          True / False");
    println!("  tested_covid_positive   '' / waiting / no / yes, monotonic per subject");
    println!("  health_status           healthy / not_healthy");

    println!();
    println!("Symptomatic fields (feed the any-symptom check)");
    for field in SYMPTOMATIC_FIELDS {
        println!("  {:<23} {}", field, vocabulary_line(field));
    }

    println!();
    println!("Exposure fields");
    for field in EXPOSURE_FIELDS {
        println!("  {:<23} {}", field, vocabulary_line(field));
    }

    println!();
    println!("Registry flags");
    for (_, label) in SubjectFlags::LABELS {
        println!("  {label}");
    }
    println!();
    println!("Assessment flags");
    for (_, label) in AssessmentFlags::LABELS {
        println!("  {label}");
    }
}

fn vocabulary_line(field: &str) -> String {
    let vocab = vocabulary(field).unwrap_or(&[]);
    let values: Vec<String> = vocab
        .iter()
        .map(|(key, indicator)| {
            let key = if key.is_empty() { "''" } else { key };
            format!("{key}={}", if *indicator { "1" } else { "0" })
        })
        .collect();
    values.join(" ")
}

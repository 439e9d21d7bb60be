//! Run summary rendering.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cohort_report::{DatasetSummary, RunReport};

/// Print the post-run summary: output paths, dataset totals, and per-flag
/// counts for both datasets.
pub fn print_summary(report: &RunReport) {
    if let Some(path) = &report.registry_output {
        println!("Registry output: {}", path.display());
    }
    if let Some(path) = &report.assessments_output {
        println!("Assessments output: {}", path.display());
    }

    let mut totals = Table::new();
    apply_table_style(&mut totals);
    totals.set_header(vec![
        header_cell("Dataset"),
        header_cell("Rows"),
        header_cell("Skipped"),
        header_cell("Clean"),
        header_cell("Flagged"),
    ]);
    for column in 1..5 {
        if let Some(column) = totals.column_mut(column) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    totals.add_row(dataset_row("registry", &report.registry));
    totals.add_row(dataset_row("assessments", &report.assessments));
    println!("{totals}");

    println!(
        "Retained assessments: {} -> {} merged day rows",
        report.retained_assessments, report.merged_rows
    );
    if report.invalid_progression_groups > 0 {
        println!(
            "Subjects with invalid diagnostic progression: {}",
            report.invalid_progression_groups
        );
    }

    let mut flags = Table::new();
    apply_table_style(&mut flags);
    flags.set_header(vec![
        header_cell("Dataset"),
        header_cell("Flag"),
        header_cell("Count"),
    ]);
    if let Some(column) = flags.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for flag in &report.registry.flags {
        flags.add_row(vec![
            Cell::new("registry"),
            Cell::new(&flag.label),
            count_cell(flag.count),
        ]);
    }
    for flag in &report.assessments.flags {
        flags.add_row(vec![
            Cell::new("assessments"),
            Cell::new(&flag.label),
            count_cell(flag.count),
        ]);
    }
    println!("{flags}");
}

fn dataset_row(name: &str, summary: &DatasetSummary) -> Vec<Cell> {
    vec![
        Cell::new(name).fg(Color::Blue).add_attribute(Attribute::Bold),
        Cell::new(summary.rows),
        Cell::new(summary.skipped),
        Cell::new(summary.clean)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        count_cell(summary.flagged()),
    ]
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

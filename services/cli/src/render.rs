use std::path::Path;
use zip_opportunity::housing::HousingSummary;
use zip_opportunity::income::IncomeStatus;
use zip_opportunity::pipeline::PipelineReport;

pub(crate) fn render_score_report(report: &PipelineReport, top: usize) {
    println!("ZIP opportunity scores");
    println!(
        "Boundaries: {} loaded, {} skipped, {} inside the search radius",
        report.boundaries_loaded, report.boundaries_skipped, report.zctas_in_region
    );
    println!("Housing rows: {}", report.housing_rows);

    println!("{}", income_line(&report.income));

    println!(
        "Rows written: {} ({} with a score)",
        report.rows.len(),
        report.scored_rows()
    );

    if top > 0 && !report.rows.is_empty() {
        println!("\nTop {} ZIPs", top.min(report.rows.len()));
        println!(
            "{:<6} {:>10} {:>12} {:>16}",
            "ZIP", "Homes", "Income", "Score"
        );
        for row in report.rows.iter().take(top) {
            println!(
                "{:<6} {:>10} {:>12} {:>16}",
                row.zip.as_str(),
                cell(row.total_single_family_homes),
                cell(row.median_household_income),
                cell(row.adjusted_opportunity_score)
            );
        }
    }

    println!("\nOutput saved to: {}", report.output_path.display());
}

pub(crate) fn render_housing_summary(path: &Path, summary: &HousingSummary) {
    println!("Housing extract: {}", path.display());
    println!("- rows: {}", summary.rows);
    println!("- rows with a ZIP: {}", summary.rows_with_zip);
    println!("- rows with single-family homes: {}", summary.rows_with_homes);
}

fn income_line(status: &IncomeStatus) -> String {
    match status {
        IncomeStatus::Loaded { rows } => format!("Income: pulled {rows} ZIPs"),
        IncomeStatus::Unavailable { category, reason } => {
            format!("Income: unavailable ({category}): {reason}")
        }
        IncomeStatus::Skipped => "Income: skipped (--skip-income)".to_string(),
    }
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(number) => number.to_string(),
        None => "-".to_string(),
    }
}

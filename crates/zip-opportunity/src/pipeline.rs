use crate::config::PipelineConfig;
use crate::error::AppError;
use crate::geography::{filter_intersecting, BoundaryLayer, BufferRegion};
use crate::housing::HousingTable;
use crate::income::{fetch_or_empty, IncomeSource, IncomeStatus, IncomeTable, StaticIncomeSource};
use crate::output::write_scores;
use crate::scoring::{score_region, ScoredZip};
use std::path::PathBuf;
use tracing::{debug, info};

const SAMPLE_SIZE: usize = 5;

/// Stage counts and ranked rows from one completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub boundaries_loaded: usize,
    pub boundaries_skipped: usize,
    pub zctas_in_region: usize,
    pub housing_rows: usize,
    pub income: IncomeStatus,
    pub rows: Vec<ScoredZip>,
    pub output_path: PathBuf,
}

impl PipelineReport {
    pub fn scored_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.adjusted_opportunity_score.is_some())
            .count()
    }
}

/// Runs every stage in order and writes the scored CSV.
///
/// Boundary, housing and output failures abort the run. The income lookup
/// degrades to an empty table instead.
pub async fn run<S: IncomeSource>(
    config: &PipelineConfig,
    income_source: &S,
) -> Result<PipelineReport, AppError> {
    execute(config, Some(income_source)).await
}

/// Same as [`run`] without any income lookup. Income columns stay empty and
/// the report records [`IncomeStatus::Skipped`].
pub async fn run_without_income(config: &PipelineConfig) -> Result<PipelineReport, AppError> {
    execute::<StaticIncomeSource>(config, None).await
}

async fn execute<S: IncomeSource>(
    config: &PipelineConfig,
    income_source: Option<&S>,
) -> Result<PipelineReport, AppError> {
    config.validate()?;

    let layer =
        BoundaryLayer::from_path(&config.boundary_path, &config.zip_field)?.into_web_mercator();
    let region = BufferRegion::around(config.center_lon, config.center_lat, config.radius_meters)?;
    let in_region = filter_intersecting(&layer, &region)?;

    let housing = HousingTable::from_path(&config.housing_csv_path)?;

    let (income, income_status) = match income_source {
        Some(source) => {
            info!("fetching median household income data");
            fetch_or_empty(source).await
        }
        None => {
            info!("income lookup skipped");
            (IncomeTable::empty(), IncomeStatus::Skipped)
        }
    };

    let spatial_sample: Vec<&str> = in_region
        .iter()
        .take(SAMPLE_SIZE)
        .map(|boundary| boundary.zip.as_str())
        .collect();
    let income_sample: Vec<&str> = income
        .records()
        .iter()
        .take(SAMPLE_SIZE)
        .map(|record| record.zip.as_str())
        .collect();
    debug!(spatial = ?spatial_sample, income = ?income_sample, "sample join keys");

    let rows = score_region(&in_region, &housing, &income);
    write_scores(&config.output_csv_path, &rows)?;

    let report = PipelineReport {
        boundaries_loaded: layer.len(),
        boundaries_skipped: layer.skipped,
        zctas_in_region: in_region.len(),
        housing_rows: housing.len(),
        income: income_status,
        rows,
        output_path: config.output_csv_path.clone(),
    };

    info!(
        output = %report.output_path.display(),
        rows = report.rows.len(),
        scored = report.scored_rows(),
        "opportunity scores written"
    );
    Ok(report)
}

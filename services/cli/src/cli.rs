use crate::render::{render_housing_summary, render_score_report};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use zip_opportunity::config::{AppConfig, PipelineConfig};
use zip_opportunity::error::AppError;
use zip_opportunity::housing::HousingTable;
use zip_opportunity::income::{CensusIncomeClient, StaticIncomeSource};
use zip_opportunity::{pipeline, telemetry};

#[derive(Parser, Debug)]
#[command(
    name = "zip-opportunity",
    about = "Rank ZIP code tabulation areas near a site by single-family homes times median income",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full scoring pipeline (default command)
    Score(ScoreArgs),
    /// Load and clean the housing extract, then print row counts
    Housing(HousingArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Longitude of the search center, in degrees
    #[arg(long, allow_hyphen_values = true)]
    center_lon: Option<f64>,
    /// Latitude of the search center, in degrees
    #[arg(long, allow_hyphen_values = true)]
    center_lat: Option<f64>,
    /// Search radius around the center, in meters
    #[arg(long)]
    radius_meters: Option<f64>,
    /// ZCTA boundary file (.shp, .geojson or .json)
    #[arg(long)]
    boundary: Option<PathBuf>,
    /// Attribute holding the ZIP identifier in the boundary file
    #[arg(long)]
    zip_field: Option<String>,
    /// ACS housing-units extract (CSV)
    #[arg(long)]
    housing_csv: Option<PathBuf>,
    /// Destination for the scored CSV
    #[arg(long)]
    output: Option<PathBuf>,
    /// ACS 5-year vintage to request income for
    #[arg(long)]
    census_vintage: Option<u16>,
    /// Do not call the Census API; income and scores are left empty
    #[arg(long)]
    skip_income: bool,
    /// Number of ranked rows to print
    #[arg(long, default_value_t = 10)]
    top: usize,
}

impl ScoreArgs {
    fn default_run() -> Self {
        Self {
            top: 10,
            ..Self::default()
        }
    }

    fn apply(&mut self, config: &mut AppConfig) {
        let pipeline: &mut PipelineConfig = &mut config.pipeline;
        if let Some(lon) = self.center_lon.take() {
            pipeline.center_lon = lon;
        }
        if let Some(lat) = self.center_lat.take() {
            pipeline.center_lat = lat;
        }
        if let Some(radius) = self.radius_meters.take() {
            pipeline.radius_meters = radius;
        }
        if let Some(path) = self.boundary.take() {
            pipeline.boundary_path = path;
        }
        if let Some(field) = self.zip_field.take() {
            pipeline.zip_field = field;
        }
        if let Some(path) = self.housing_csv.take() {
            pipeline.housing_csv_path = path;
        }
        if let Some(path) = self.output.take() {
            pipeline.output_csv_path = path;
        }
        if let Some(vintage) = self.census_vintage.take() {
            config.census.vintage = vintage;
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct HousingArgs {
    /// ACS housing-units extract (CSV); defaults to the configured path
    #[arg(long)]
    housing_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Score(ScoreArgs::default_run()));

    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Score(mut args) => {
            args.apply(&mut config);
            run_score(&config, args.skip_income, args.top).await
        }
        Command::Housing(args) => {
            let path = args
                .housing_csv
                .unwrap_or(config.pipeline.housing_csv_path);
            let table = HousingTable::from_path(&path)?;
            render_housing_summary(&path, &table.summary());
            Ok(())
        }
    }
}

async fn run_score(config: &AppConfig, skip_income: bool, top: usize) -> Result<(), AppError> {
    info!(?config.environment, "starting opportunity scoring run");

    let report = if skip_income {
        pipeline::run_without_income(&config.pipeline).await?
    } else {
        match CensusIncomeClient::new(config.census.clone()) {
            Ok(client) => pipeline::run(&config.pipeline, &client).await?,
            Err(err) => {
                warn!(error = %err, "could not build Census client; continuing without income");
                pipeline::run(&config.pipeline, &StaticIncomeSource::failing(err)).await?
            }
        }
    };

    render_score_report(&report, top);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_flags_override_configuration() {
        let cli = Cli::parse_from([
            "zip-opportunity",
            "score",
            "--center-lon",
            "-80.84",
            "--center-lat",
            "35.22",
            "--radius-meters",
            "15000",
            "--output",
            "charlotte.csv",
            "--census-vintage",
            "2021",
            "--skip-income",
        ]);
        let Some(Command::Score(mut args)) = cli.command else {
            panic!("expected score command");
        };
        assert!(args.skip_income);
        assert_eq!(args.top, 10);

        let mut config = AppConfig {
            environment: zip_opportunity::config::AppEnvironment::Test,
            pipeline: PipelineConfig::default(),
            census: Default::default(),
            telemetry: zip_opportunity::config::TelemetryConfig {
                log_level: "info".to_string(),
            },
        };
        args.apply(&mut config);

        assert_eq!(config.pipeline.center_lon, -80.84);
        assert_eq!(config.pipeline.center_lat, 35.22);
        assert_eq!(config.pipeline.radius_meters, 15_000.0);
        assert_eq!(config.pipeline.output_csv_path, PathBuf::from("charlotte.csv"));
        assert_eq!(config.census.vintage, 2021);
        assert_eq!(
            config.pipeline.housing_csv_path,
            PipelineConfig::default().housing_csv_path
        );
    }

    #[test]
    fn score_is_the_default_command() {
        let cli = Cli::parse_from(["zip-opportunity"]);
        assert!(cli.command.is_none());
        assert_eq!(ScoreArgs::default_run().top, 10);
    }
}

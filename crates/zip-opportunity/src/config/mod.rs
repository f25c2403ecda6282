use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::geography::MAX_MERCATOR_LATITUDE;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub pipeline: PipelineConfig,
    pub census: CensusConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            center_lon: parse_var("OPPORTUNITY_CENTER_LON", defaults.center_lon)?,
            center_lat: parse_var("OPPORTUNITY_CENTER_LAT", defaults.center_lat)?,
            radius_meters: parse_var("OPPORTUNITY_RADIUS_METERS", defaults.radius_meters)?,
            boundary_path: path_var("OPPORTUNITY_BOUNDARY_PATH", defaults.boundary_path),
            zip_field: env::var("OPPORTUNITY_ZIP_FIELD").unwrap_or(defaults.zip_field),
            housing_csv_path: path_var("OPPORTUNITY_HOUSING_CSV", defaults.housing_csv_path),
            output_csv_path: path_var("OPPORTUNITY_OUTPUT_CSV", defaults.output_csv_path),
        };

        let census_defaults = CensusConfig::default();
        let census = CensusConfig {
            base_url: env::var("CENSUS_API_BASE_URL").unwrap_or(census_defaults.base_url),
            vintage: parse_var("CENSUS_VINTAGE", census_defaults.vintage)?,
            income_field: env::var("CENSUS_INCOME_FIELD").unwrap_or(census_defaults.income_field),
            api_key: env::var("CENSUS_API_KEY")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            timeout_secs: parse_var("CENSUS_TIMEOUT_SECS", census_defaults.timeout_secs)?,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            pipeline,
            census,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Immutable inputs for one scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub center_lon: f64,
    pub center_lat: f64,
    pub radius_meters: f64,
    pub boundary_path: PathBuf,
    /// Attribute holding the ZIP identifier in the boundary file.
    pub zip_field: String,
    pub housing_csv_path: PathBuf,
    pub output_csv_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            center_lon: -78.8260,
            center_lat: 35.8587,
            radius_meters: 30_000.0,
            boundary_path: PathBuf::from("tl_2024_us_zcta520.shp"),
            zip_field: "ZCTA5CE20".to_string(),
            housing_csv_path: PathBuf::from("ACSDT5Y2023.B25024-Data.csv"),
            output_csv_path: PathBuf::from("zips_with_income_score.csv"),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.center_lon.is_finite() || !(-180.0..=180.0).contains(&self.center_lon) {
            return Err(ConfigError::OutOfRange {
                field: "center_lon",
                value: self.center_lon,
            });
        }
        if !self.center_lat.is_finite() || self.center_lat.abs() > MAX_MERCATOR_LATITUDE {
            return Err(ConfigError::OutOfRange {
                field: "center_lat",
                value: self.center_lat,
            });
        }
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "radius_meters",
                value: self.radius_meters,
            });
        }
        Ok(())
    }
}

/// Census ACS endpoint settings for the income lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CensusConfig {
    pub base_url: String,
    pub vintage: u16,
    pub income_field: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.census.gov/data".to_string(),
            vintage: 2022,
            income_field: "B19013_001E".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl CensusConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/acs/acs5",
            self.base_url.trim_end_matches('/'),
            self.vintage
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be numeric, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}

fn path_var(var: &'static str, default: PathBuf) -> PathBuf {
    env::var_os(var).map(PathBuf::from).unwrap_or(default)
}

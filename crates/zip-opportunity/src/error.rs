use crate::config::ConfigError;
use crate::geography::{BoundaryError, BufferError, SpatialError};
use crate::housing::HousingImportError;
use crate::output::OutputError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Fatal errors for a run. Income lookup failures never reach this type.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Boundary(BoundaryError),
    Buffer(BufferError),
    Spatial(SpatialError),
    Housing(HousingImportError),
    Output(OutputError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Boundary(err) => write!(f, "boundary error: {}", err),
            AppError::Buffer(err) => write!(f, "buffer error: {}", err),
            AppError::Spatial(err) => write!(f, "spatial filter error: {}", err),
            AppError::Housing(err) => write!(f, "housing error: {}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Boundary(err) => Some(err),
            AppError::Buffer(err) => Some(err),
            AppError::Spatial(err) => Some(err),
            AppError::Housing(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<BoundaryError> for AppError {
    fn from(value: BoundaryError) -> Self {
        Self::Boundary(value)
    }
}

impl From<BufferError> for AppError {
    fn from(value: BufferError) -> Self {
        Self::Buffer(value)
    }
}

impl From<SpatialError> for AppError {
    fn from(value: SpatialError) -> Self {
        Self::Spatial(value)
    }
}

impl From<HousingImportError> for AppError {
    fn from(value: HousingImportError) -> Self {
        Self::Housing(value)
    }
}

impl From<OutputError> for AppError {
    fn from(value: OutputError) -> Self {
        Self::Output(value)
    }
}

pub mod config;
pub mod error;
pub mod geography;
pub mod housing;
pub mod income;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod telemetry;
pub mod zip_code;

pub use zip_code::ZipCode;

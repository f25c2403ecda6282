//! Median household income per ZCTA from the Census ACS API.
//!
//! The lookup is the one stage allowed to fail without stopping a run: any
//! error is logged by category and replaced with an empty table.

mod census;
mod response;

pub use census::CensusIncomeClient;
pub use response::parse_income_rows;

use crate::zip_code::ZipCode;
use std::collections::HashMap;
use std::future::Future;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncomeFetchError {
    #[error("income request failed in transport: {0}")]
    Transport(String),
    #[error("income API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("income response could not be decoded: {0}")]
    Decode(String),
}

impl IncomeFetchError {
    pub fn category(&self) -> &'static str {
        match self {
            IncomeFetchError::Transport(_) => "transport",
            IncomeFetchError::Status { .. } => "status",
            IncomeFetchError::Decode(_) => "decode",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRecord {
    pub name: String,
    pub zip: ZipCode,
    pub median_household_income: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeTable {
    records: Vec<IncomeRecord>,
}

impl IncomeTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<IncomeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[IncomeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_zip(&self) -> HashMap<&ZipCode, Vec<&IncomeRecord>> {
        let mut grouped: HashMap<&ZipCode, Vec<&IncomeRecord>> = HashMap::new();
        for record in &self.records {
            grouped.entry(&record.zip).or_default().push(record);
        }
        grouped
    }
}

/// Anything that can produce the income table for a run.
pub trait IncomeSource {
    fn fetch(&self) -> impl Future<Output = Result<IncomeTable, IncomeFetchError>> + Send;
}

/// In-memory source, used when the lookup is skipped and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIncomeSource {
    result: Option<Result<IncomeTable, IncomeFetchError>>,
}

impl StaticIncomeSource {
    pub fn table(table: IncomeTable) -> Self {
        Self {
            result: Some(Ok(table)),
        }
    }

    pub fn failing(error: IncomeFetchError) -> Self {
        Self {
            result: Some(Err(error)),
        }
    }
}

impl IncomeSource for StaticIncomeSource {
    async fn fetch(&self) -> Result<IncomeTable, IncomeFetchError> {
        self.result.clone().unwrap_or_else(|| Ok(IncomeTable::empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeStatus {
    Loaded { rows: usize },
    Unavailable { category: &'static str, reason: String },
    /// The lookup was turned off for this run and never attempted.
    Skipped,
}

/// Runs the lookup once and degrades to an empty table on failure.
pub async fn fetch_or_empty<S: IncomeSource>(source: &S) -> (IncomeTable, IncomeStatus) {
    match source.fetch().await {
        Ok(table) => {
            info!(rows = table.len(), "pulled ZIPs with income data");
            let rows = table.len();
            (table, IncomeStatus::Loaded { rows })
        }
        Err(err) => {
            warn!(
                category = err.category(),
                error = %err,
                "failed to fetch income data; continuing without it"
            );
            (
                IncomeTable::empty(),
                IncomeStatus::Unavailable {
                    category: err.category(),
                    reason: err.to_string(),
                },
            )
        }
    }
}

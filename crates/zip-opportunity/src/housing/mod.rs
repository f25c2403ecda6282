//! ACS B25024 "units in structure" extract: load, clean, derive homes.

mod parser;

pub(crate) use parser::coerce_number;

use crate::zip_code::ZipCode;
use parser::{HousingRow, ParseFailure};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum HousingImportError {
    #[error("failed to read housing extract: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid housing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("housing extract is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("failed to open housing extract {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<ParseFailure> for HousingImportError {
    fn from(failure: ParseFailure) -> Self {
        match failure {
            ParseFailure::Io(err) => Self::Io(err),
            ParseFailure::Csv(err) => Self::Csv(err),
            ParseFailure::MissingColumn(label) => Self::MissingColumn(label),
        }
    }
}

/// One cleaned housing row. Missing counts stay missing.
#[derive(Debug, Clone, PartialEq)]
pub struct HousingRecord {
    pub zip: Option<ZipCode>,
    pub total_housing_units: Option<f64>,
    pub single_family_detached: Option<f64>,
    pub single_family_attached: Option<f64>,
    pub total_single_family_homes: Option<f64>,
}

impl HousingRecord {
    pub fn new(
        zip: Option<ZipCode>,
        total_housing_units: Option<f64>,
        single_family_detached: Option<f64>,
        single_family_attached: Option<f64>,
    ) -> Self {
        let total_single_family_homes = single_family_detached
            .zip(single_family_attached)
            .map(|(detached, attached)| detached + attached);

        Self {
            zip,
            total_housing_units,
            single_family_detached,
            single_family_attached,
            total_single_family_homes,
        }
    }

    fn from_row(row: HousingRow) -> Self {
        Self::new(
            ZipCode::from_label_suffix(&row.geography),
            row.total_units,
            row.detached,
            row.attached,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct HousingTable {
    records: Vec<HousingRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HousingSummary {
    pub rows: usize,
    pub rows_with_zip: usize,
    pub rows_with_homes: usize,
}

impl HousingTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, HousingImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| HousingImportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            "loaded housing extract"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HousingImportError> {
        let records: Vec<HousingRecord> = parser::parse_rows(reader)?
            .into_iter()
            .map(HousingRecord::from_row)
            .collect();

        let without_zip = records.iter().filter(|record| record.zip.is_none()).count();
        if without_zip > 0 {
            debug!(without_zip, "housing rows without a trailing ZIP");
        }

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<HousingRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HousingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows grouped by ZIP, file order preserved within each group.
    /// Rows without a ZIP can never match a join key and are left out.
    pub fn by_zip(&self) -> HashMap<&ZipCode, Vec<&HousingRecord>> {
        let mut grouped: HashMap<&ZipCode, Vec<&HousingRecord>> = HashMap::new();
        for record in &self.records {
            if let Some(zip) = &record.zip {
                grouped.entry(zip).or_default().push(record);
            }
        }
        grouped
    }

    pub fn summary(&self) -> HousingSummary {
        HousingSummary {
            rows: self.records.len(),
            rows_with_zip: self.records.iter().filter(|r| r.zip.is_some()).count(),
            rows_with_homes: self
                .records
                .iter()
                .filter(|r| r.total_single_family_homes.is_some())
                .count(),
        }
    }
}

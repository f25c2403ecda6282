use crate::scoring::ScoredZip;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const OUTPUT_HEADER: [&str; 4] = [
    "ZIP Code",
    "Total_Single_Family_Homes",
    "Median_Household_Income",
    "Adjusted_Opportunity_Score",
];

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create output file {path}: {source}")]
    Create { path: PathBuf, source: csv::Error },
    #[error("failed to write scored rows: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush scored rows: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the header and every row, in the order given.
pub fn write_scores<P: AsRef<Path>>(path: P, rows: &[ScoredZip]) -> Result<(), OutputError> {
    let path = path.as_ref();
    let writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;

    write_rows(writer, rows)?;
    info!(path = %path.display(), rows = rows.len(), "wrote scored ZIPs");
    Ok(())
}

pub fn write_scores_to<W: Write>(sink: W, rows: &[ScoredZip]) -> Result<(), OutputError> {
    let writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    write_rows(writer, rows)
}

// The header is written by hand so an empty region still yields it.
fn write_rows<W: Write>(mut writer: csv::Writer<W>, rows: &[ScoredZip]) -> Result<(), OutputError> {
    writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

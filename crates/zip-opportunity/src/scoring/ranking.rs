use super::ScoredZip;
use crate::zip_code::ZipCode;
use std::cmp::Ordering;
use std::collections::HashSet;

type RowKey = (ZipCode, Option<u64>, Option<u64>, Option<u64>);

fn row_key(row: &ScoredZip) -> RowKey {
    (
        row.zip.clone(),
        row.total_single_family_homes.map(f64::to_bits),
        row.median_household_income.map(f64::to_bits),
        row.adjusted_opportunity_score.map(f64::to_bits),
    )
}

/// Drops rows equal on all four output columns, keeping the first.
pub fn dedupe_rows(rows: Vec<ScoredZip>) -> Vec<ScoredZip> {
    let mut seen: HashSet<RowKey> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row_key(row)))
        .collect()
}

/// Highest score first, missing scores last, ZIP ascending within ties.
pub fn sort_by_score_desc(rows: &mut [ScoredZip]) {
    rows.sort_by(|a, b| {
        compare_scores(a.adjusted_opportunity_score, b.adjusted_opportunity_score)
            .then_with(|| a.zip.cmp(&b.zip))
    });
}

fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

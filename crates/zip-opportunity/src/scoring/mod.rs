//! Joins the filtered ZCTAs with housing and income, then ranks them.

mod ranking;

pub use ranking::{dedupe_rows, sort_by_score_desc};

use crate::geography::ZctaBoundary;
use crate::housing::{HousingRecord, HousingTable};
use crate::income::{IncomeRecord, IncomeTable};
use crate::zip_code::ZipCode;
use serde::{Serialize, Serializer};

/// One output row. Every numeric field may be missing; the score is
/// present only when both factors are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredZip {
    #[serde(rename = "ZIP Code")]
    pub zip: ZipCode,
    #[serde(rename = "Total_Single_Family_Homes", serialize_with = "plain_number")]
    pub total_single_family_homes: Option<f64>,
    #[serde(rename = "Median_Household_Income", serialize_with = "plain_number")]
    pub median_household_income: Option<f64>,
    #[serde(rename = "Adjusted_Opportunity_Score", serialize_with = "plain_number")]
    pub adjusted_opportunity_score: Option<f64>,
}

impl ScoredZip {
    pub fn new(
        zip: ZipCode,
        total_single_family_homes: Option<f64>,
        median_household_income: Option<f64>,
    ) -> Self {
        let adjusted_opportunity_score = total_single_family_homes
            .zip(median_household_income)
            .map(|(homes, income)| homes * income);

        Self {
            zip,
            total_single_family_homes,
            median_household_income,
            adjusted_opportunity_score,
        }
    }
}

/// Left joins `region` with housing and then income on ZIP, scores every
/// joined row, drops duplicate rows and sorts by score (missing last).
///
/// The output ZIP always comes from the boundary layer, so ZCTAs without
/// housing or income rows still appear with missing values.
pub fn score_region(
    region: &[ZctaBoundary],
    housing: &HousingTable,
    income: &IncomeTable,
) -> Vec<ScoredZip> {
    let housing_by_zip = housing.by_zip();
    let income_by_zip = income.by_zip();

    let mut rows = Vec::with_capacity(region.len());
    for boundary in region {
        let housing_matches = left_matches(housing_by_zip.get(&boundary.zip));
        let income_matches = left_matches(income_by_zip.get(&boundary.zip));

        for &housing_record in &housing_matches {
            for &income_record in &income_matches {
                rows.push(ScoredZip::new(
                    boundary.zip.clone(),
                    housing_record.and_then(homes),
                    income_record.and_then(median_income),
                ));
            }
        }
    }

    let mut rows = dedupe_rows(rows);
    sort_by_score_desc(&mut rows);
    rows
}

/// Matches on the right side of a left join; no match keeps one empty slot.
fn left_matches<'a, T>(matches: Option<&Vec<&'a T>>) -> Vec<Option<&'a T>> {
    match matches {
        Some(found) if !found.is_empty() => found.iter().copied().map(Some).collect(),
        _ => vec![None],
    }
}

fn homes(record: &HousingRecord) -> Option<f64> {
    record.total_single_family_homes
}

fn median_income(record: &IncomeRecord) -> Option<f64> {
    record.median_household_income
}

fn plain_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(number) => serializer.collect_str(number),
        None => serializer.serialize_none(),
    }
}

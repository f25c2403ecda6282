use super::{IncomeFetchError, IncomeRecord, IncomeTable};
use crate::housing::coerce_number;
use crate::zip_code::ZipCode;
use serde_json::Value as JsonValue;
use tracing::warn;

/// Decodes the ACS array-of-arrays body. The first row is the header and is
/// dropped; the rest map positionally to (name, median income, ZIP). Rows
/// whose ZIP cannot be read are skipped with a warning.
pub fn parse_income_rows(body: &[u8]) -> Result<IncomeTable, IncomeFetchError> {
    let rows: Vec<Vec<JsonValue>> = serde_json::from_slice(body)
        .map_err(|err| IncomeFetchError::Decode(err.to_string()))?;

    let records = rows
        .into_iter()
        .enumerate()
        .skip(1)
        .filter_map(|(index, row)| record_from_row(index, row).transpose())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IncomeTable::from_records(records))
}

fn record_from_row(
    index: usize,
    row: Vec<JsonValue>,
) -> Result<Option<IncomeRecord>, IncomeFetchError> {
    let [name, income, zip] = match row.as_slice() {
        [name, income, zip, ..] => [name, income, zip],
        _ => {
            return Err(IncomeFetchError::Decode(format!(
                "row {index} has {} columns, expected 3",
                row.len()
            )))
        }
    };

    let parsed = match zip {
        JsonValue::String(text) => ZipCode::parse(text),
        JsonValue::Number(number) => number.as_f64().and_then(ZipCode::from_number),
        _ => None,
    };
    let Some(zip) = parsed else {
        warn!(row = index, value = %zip, "skipping income row without a usable ZIP");
        return Ok(None);
    };

    let median_household_income = match income {
        JsonValue::String(text) => coerce_number(text),
        JsonValue::Number(number) => number.as_f64(),
        _ => None,
    };

    Ok(Some(IncomeRecord {
        name: name.as_str().unwrap_or_default().to_string(),
        zip,
        median_household_income,
    }))
}

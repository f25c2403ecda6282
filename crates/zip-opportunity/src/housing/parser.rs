use serde::{Deserialize, Deserializer};
use std::io::{BufRead, BufReader, Read};

pub(crate) const GEOGRAPHY: &str = "Geography";
pub(crate) const TOTAL_UNITS: &str = "Estimate!!Total:";
pub(crate) const DETACHED: &str = "Estimate!!Total:!!1, detached";
pub(crate) const ATTACHED: &str = "Estimate!!Total:!!1, attached";

pub(crate) const REQUIRED_COLUMNS: [&str; 4] = [GEOGRAPHY, TOTAL_UNITS, DETACHED, ATTACHED];

#[derive(Debug, Deserialize)]
pub(crate) struct HousingRow {
    #[serde(rename = "Geography")]
    pub(crate) geography: String,
    #[serde(rename = "Estimate!!Total:", default, deserialize_with = "lenient_number")]
    pub(crate) total_units: Option<f64>,
    #[serde(
        rename = "Estimate!!Total:!!1, detached",
        default,
        deserialize_with = "lenient_number"
    )]
    pub(crate) detached: Option<f64>,
    #[serde(
        rename = "Estimate!!Total:!!1, attached",
        default,
        deserialize_with = "lenient_number"
    )]
    pub(crate) attached: Option<f64>,
}

#[derive(Debug)]
pub(crate) enum ParseFailure {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
}

/// Drops the column-code line, checks the label header, then deserializes
/// every remaining row.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<HousingRow>, ParseFailure> {
    let mut buffered = BufReader::new(reader);
    let mut code_line = String::new();
    buffered
        .read_line(&mut code_line)
        .map_err(ParseFailure::Io)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(buffered);

    let headers = csv_reader.headers().map_err(ParseFailure::Csv)?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|label| !headers.iter().any(|header| header == *label))
    {
        return Err(ParseFailure::MissingColumn(missing));
    }

    csv_reader
        .deserialize::<HousingRow>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(ParseFailure::Csv)
}

/// Any cell that is not a finite number becomes `None`.
pub(crate) fn coerce_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(coerce_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_number_maps_placeholders_to_none() {
        assert_eq!(coerce_number("1204"), Some(1204.0));
        assert_eq!(coerce_number(" 12.5 "), Some(12.5));
        assert_eq!(coerce_number("-"), None);
        assert_eq!(coerce_number("(X)"), None);
        assert_eq!(coerce_number("*****"), None);
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("NaN"), None);
        assert_eq!(coerce_number("inf"), None);
    }

    #[test]
    fn parse_rows_skips_code_line_and_reads_labels() {
        let csv = "GEO_ID,NAME,B25024_001E,B25024_002E,B25024_003E\n\
Geography,Geographic Area Name,Estimate!!Total:,\"Estimate!!Total:!!1, detached\",\"Estimate!!Total:!!1, attached\"\n\
860Z200US27606,ZCTA5 27606,9000,4000,(X)\n";
        let rows = parse_rows(csv.as_bytes()).expect("rows parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].geography, "860Z200US27606");
        assert_eq!(rows[0].total_units, Some(9000.0));
        assert_eq!(rows[0].detached, Some(4000.0));
        assert_eq!(rows[0].attached, None);
    }

    #[test]
    fn parse_rows_reports_first_missing_column() {
        let csv = "GEO_ID,NAME,B25024_001E\nGeography,Geographic Area Name,Estimate!!Total:\n";
        match parse_rows(csv.as_bytes()) {
            Err(ParseFailure::MissingColumn(label)) => assert_eq!(label, DETACHED),
            other => panic!("expected missing column, got {other:?}"),
        }
    }
}

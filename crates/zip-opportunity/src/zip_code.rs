use serde::Serialize;
use std::fmt;

/// Canonical five-digit ZIP identifier shared by every joined data source.
///
/// Boundary attributes, housing labels and API rows all pass through this
/// type before they are compared, so a numeric `2108` and a textual `"02108"`
/// refer to the same area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    pub const LEN: usize = 5;

    /// Parses a bare identifier. Shorter all-digit values are zero padded.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > Self::LEN
            || !trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        Some(Self(format!("{trimmed:0>5}")))
    }

    /// Accepts whole, non-negative numbers such as dBase numeric fields.
    pub fn from_number(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value >= 100_000.0 {
            return None;
        }

        Self::parse(&format!("{value:.0}"))
    }

    /// Extracts the trailing five digits of a composite geography label
    /// such as `ZCTA5 27606` or `860Z200US27606`.
    pub fn from_label_suffix(label: &str) -> Option<Self> {
        let trimmed = label.trim_end();
        let start = trimmed.len().checked_sub(Self::LEN)?;
        let suffix = trimmed.get(start..)?;
        if suffix.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(suffix.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_suffix_extracts_trailing_zip() {
        let zip = ZipCode::from_label_suffix("ZCTA5 27606").expect("zip present");
        assert_eq!(zip.as_str(), "27606");

        let zip = ZipCode::from_label_suffix("860Z200US27513").expect("zip present");
        assert_eq!(zip.as_str(), "27513");
    }

    #[test]
    fn label_suffix_rejects_labels_without_trailing_digits() {
        assert!(ZipCode::from_label_suffix("United States").is_none());
        assert!(ZipCode::from_label_suffix("27606 area").is_none());
        assert!(ZipCode::from_label_suffix("1234").is_none());
        assert!(ZipCode::from_label_suffix("ZCTA5 2760é").is_none());
    }

    #[test]
    fn parse_pads_short_numeric_identifiers() {
        assert_eq!(ZipCode::parse("2108").expect("padded").as_str(), "02108");
        assert_eq!(ZipCode::parse(" 27606 ").expect("trimmed").as_str(), "27606");
        assert!(ZipCode::parse("276061").is_none());
        assert!(ZipCode::parse("27a06").is_none());
        assert!(ZipCode::parse("").is_none());
    }

    #[test]
    fn from_number_requires_whole_values() {
        assert_eq!(
            ZipCode::from_number(27606.0).expect("whole").as_str(),
            "27606"
        );
        assert_eq!(ZipCode::from_number(501.0).expect("padded").as_str(), "00501");
        assert!(ZipCode::from_number(27606.5).is_none());
        assert!(ZipCode::from_number(-1.0).is_none());
        assert!(ZipCode::from_number(f64::NAN).is_none());
    }
}

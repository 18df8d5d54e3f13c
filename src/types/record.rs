//! Dated input records: branch daily sales and driver daily volumes

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A record that can be placed into a calendar bucket.
///
/// `date()` is `None` when the source date was malformed; such records
/// never match a period and therefore only ever contribute zeros.
pub trait DatedRecord {
    fn date(&self) -> Option<NaiveDate>;
    fn dimension_key(&self) -> &str;
}

/// One branch's sales for one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BranchSale {
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub branch: String,
    #[serde(default)]
    pub cash_sales: f64,
    #[serde(default)]
    pub volume_tons: f64,
}

impl BranchSale {
    pub fn new(date: NaiveDate, branch: impl Into<String>, cash_sales: f64, volume_tons: f64) -> Self {
        Self {
            date: Some(date),
            branch: branch.into(),
            cash_sales,
            volume_tons,
        }
    }
}

impl DatedRecord for BranchSale {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn dimension_key(&self) -> &str {
        &self.branch
    }
}

/// One driver's delivered volume for one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverSale {
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub driver_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub volume_tons: f64,
}

impl DriverSale {
    pub fn new(
        date: NaiveDate,
        driver_id: impl Into<String>,
        name: impl Into<String>,
        volume_tons: f64,
    ) -> Self {
        Self {
            date: Some(date),
            driver_id: driver_id.into(),
            name: name.into(),
            volume_tons,
        }
    }
}

impl DatedRecord for DriverSale {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn dimension_key(&self) -> &str {
        &self.driver_id
    }
}

/// Driver identity as first seen in the record collection
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Driver {
    pub id: String,
    pub name: String,
}

/// Which branch quantity a report sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Cash sales in pesos
    #[default]
    Cash,
    /// Volume in metric tons
    Volume,
}

impl Measure {
    /// Extract this measure from a branch record
    pub fn of(self, sale: &BranchSale) -> f64 {
        match self {
            Self::Cash => sale.cash_sales,
            Self::Volume => sale.volume_tons,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash Sales",
            Self::Volume => "Volume Sales",
        }
    }

    /// Prefix used for suggested export file names
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Cash => "Branch_Sales",
            Self::Volume => "Volume_Sales",
        }
    }
}

/// Parse a `YYYY-MM-DD` date, accepting a trailing time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Any JSON value found in a date field
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Other(IgnoredAny),
}

/// Strings are parsed; numbers, objects and other non-string values become `None`
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawDate>::deserialize(deserializer)? {
        Some(RawDate::Text(raw)) => parse_date(&raw),
        Some(RawDate::Other(_)) | None => None,
    })
}

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, instrument};

use super::columns;
pub use super::error::Result;

/// Header spellings accepted for each canonical column, compared case-insensitively.
///
/// The public directory export uses `Pincode` and `StateName`; older extracts use the canonical
/// names directly.
const COLUMN_ALIASES: [(&str, &[&str]); 11] = [
    (columns::PIN_CODE, &["PINCode", "Pincode", "Pin Code", "PostalCode"]),
    (columns::OFFICE_NAME, &["OfficeName", "Office Name"]),
    (columns::OFFICE_TYPE, &["OfficeType", "Office Type"]),
    (columns::DELIVERY, &["Delivery", "DeliveryStatus"]),
    (columns::DIVISION_NAME, &["DivisionName", "Division"]),
    (columns::REGION_NAME, &["RegionName", "Region"]),
    (columns::CIRCLE_NAME, &["CircleName", "Circle"]),
    (columns::DISTRICT, &["District", "DistrictName"]),
    (columns::STATE, &["State", "StateName"]),
    (columns::LATITUDE, &["Latitude", "Lat"]),
    (columns::LONGITUDE, &["Longitude", "Long", "Lon"]),
];

/// Which source header (if any) feeds each canonical column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    sources: Vec<(&'static str, String)>,
}

impl ColumnMapping {
    /// Match the headers of a raw file against the known aliases.
    ///
    /// The first header matching an alias wins; headers are compared trimmed and
    /// case-insensitively.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut sources = Vec::new();
        for (canonical, aliases) in COLUMN_ALIASES {
            let found = headers.iter().map(|header| header.as_ref()).find(|header| {
                let header = header.trim();
                aliases.iter().any(|alias| alias.eq_ignore_ascii_case(header))
            });
            if let Some(header) = found {
                sources.push((canonical, header.to_string()));
            }
        }
        Self { sources }
    }

    /// Source header for a canonical column.
    pub fn source_for(&self, canonical: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, source)| source.as_str())
    }

    /// Canonical columns with no matching header.
    pub fn missing(&self) -> Vec<&'static str> {
        columns::ALL
            .into_iter()
            .filter(|canonical| self.source_for(canonical).is_none())
            .collect()
    }
}

/// Lazily scan a postal directory CSV with every column read as text.
///
/// PIN codes must stay strings (leading zeros, stray whitespace), so schema inference is disabled.
#[instrument(name = "Scan postal CSV", level = "debug", skip_all)]
pub fn get_postal_csv_lf(path: impl AsRef<Path>) -> Result<LazyFrame> {
    debug!(path = %path.as_ref().display(), "Scanning postal directory");
    Ok(LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?)
}

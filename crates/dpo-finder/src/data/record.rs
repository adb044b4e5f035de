use std::fmt;

use dpo_finder_data_processing::columns;
use itertools::izip;
use polars::prelude::*;

use crate::error::{DpoFinderError, Result};

/// Kind of post office, as published in the directory.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OfficeType {
    BranchOffice,
    SubOffice,
    HeadOffice,
    GeneralPostOffice,
    /// Any other tag, kept lower-cased and trimmed
    Other(String),
    /// The feed carried no office type
    #[default]
    Unknown,
}

impl OfficeType {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "bo" | "b.o" | "b.o." => Self::BranchOffice,
            "so" | "s.o" | "s.o." | "po" => Self::SubOffice,
            "ho" | "h.o" | "h.o." => Self::HeadOffice,
            "gpo" | "g.p.o" | "g.p.o." => Self::GeneralPostOffice,
            "" => Self::Unknown,
            _ => Self::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::BranchOffice => "bo",
            Self::SubOffice => "so",
            Self::HeadOffice => "ho",
            Self::GeneralPostOffice => "gpo",
            Self::Other(tag) => tag,
            Self::Unknown => "",
        }
    }
}

impl fmt::Display for OfficeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BranchOffice => write!(f, "Branch Office"),
            Self::SubOffice => write!(f, "Sub Office"),
            Self::HeadOffice => write!(f, "Head Office"),
            Self::GeneralPostOffice => write!(f, "General Post Office"),
            Self::Other(tag) => write!(f, "{tag}"),
            Self::Unknown => write!(f, "N/A"),
        }
    }
}

/// Interpret a directory delivery flag. Only an explicit "delivery" (or a truthy value) counts.
pub fn parse_delivery_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "delivery" | "true" | "yes" | "y"
    )
}

fn parse_coordinate(raw: &str, bound: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() <= bound)
}

/// Raw string fields of one directory row, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawPostalRecord<'a> {
    pub pin_code: &'a str,
    pub office_name: &'a str,
    pub office_type: &'a str,
    pub delivery: &'a str,
    pub division_name: &'a str,
    pub region_name: &'a str,
    pub circle_name: &'a str,
    pub district: &'a str,
    pub state: &'a str,
    pub latitude: &'a str,
    pub longitude: &'a str,
}

/// One post office of the reference table.
///
/// Matching fields are lower-cased and trimmed on construction and the search blob is derived from
/// them, so the record is always internally consistent. Fields are read through accessors only.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PostalRecord {
    pin_code: String,
    office_name_display: String,
    office_name_lower: String,
    office_type: OfficeType,
    delivery: bool,
    division_name: String,
    region_name: String,
    circle_name: String,
    district: String,
    state: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    search_blob: String,
}

impl PostalRecord {
    /// Build a record from raw directory fields.
    ///
    /// Fails when the PIN code is blank.
    pub fn new(raw: &RawPostalRecord<'_>) -> Result<Self> {
        let pin_code = raw.pin_code.trim();
        if pin_code.is_empty() {
            return Err(DpoFinderError::InvalidRecord {
                row: 0,
                reason: format!("office '{}' has no PIN code", raw.office_name.trim()),
            });
        }

        let office_name_display = raw.office_name.trim().to_string();
        let office_name_lower = office_name_display.to_lowercase();
        let division_name = normalize(raw.division_name);
        let district = normalize(raw.district);
        let state = normalize(raw.state);
        let search_blob = [
            office_name_lower.as_str(),
            division_name.as_str(),
            district.as_str(),
            state.as_str(),
        ]
        .join(" ")
        .trim()
        .to_string();

        Ok(Self {
            pin_code: pin_code.to_string(),
            office_name_display,
            office_name_lower,
            office_type: OfficeType::parse(raw.office_type),
            delivery: parse_delivery_flag(raw.delivery),
            division_name,
            region_name: normalize(raw.region_name),
            circle_name: normalize(raw.circle_name),
            district,
            state,
            latitude: parse_coordinate(raw.latitude, 90.0),
            longitude: parse_coordinate(raw.longitude, 180.0),
            search_blob,
        })
    }

    /// Shorthand for the fields the resolver cares about.
    pub fn basic(
        pin_code: &str,
        office_name: &str,
        division_name: &str,
        district: &str,
        state: &str,
        office_type: &str,
        delivery: bool,
    ) -> Result<Self> {
        Self::new(&RawPostalRecord {
            pin_code,
            office_name,
            office_type,
            delivery: if delivery { "Delivery" } else { "Non-Delivery" },
            division_name,
            district,
            state,
            ..RawPostalRecord::default()
        })
    }

    /// Convert a normalized postal frame into records, in row order.
    ///
    /// The frame must carry every canonical column as strings (see
    /// [`dpo_finder_data_processing::normalize_postal_lf`]).
    pub fn from_df(df: &DataFrame) -> Result<Vec<Self>> {
        let cols = df.select(columns::ALL)?.take_columns();

        izip!(
            cols[0].str()?,
            cols[1].str()?,
            cols[2].str()?,
            cols[3].str()?,
            cols[4].str()?,
            cols[5].str()?,
        )
        .zip(izip!(
            cols[6].str()?,
            cols[7].str()?,
            cols[8].str()?,
            cols[9].str()?,
            cols[10].str()?,
        ))
        .enumerate()
        .map(
            |(
                row,
                (
                    (pin_code, office_name, office_type, delivery, division_name, region_name),
                    (circle_name, district, state, latitude, longitude),
                ),
            )| {
                Self::new(&RawPostalRecord {
                    pin_code: pin_code.unwrap_or_default(),
                    office_name: office_name.unwrap_or_default(),
                    office_type: office_type.unwrap_or_default(),
                    delivery: delivery.unwrap_or_default(),
                    division_name: division_name.unwrap_or_default(),
                    region_name: region_name.unwrap_or_default(),
                    circle_name: circle_name.unwrap_or_default(),
                    district: district.unwrap_or_default(),
                    state: state.unwrap_or_default(),
                    latitude: latitude.unwrap_or_default(),
                    longitude: longitude.unwrap_or_default(),
                })
                .map_err(|err| match err {
                    DpoFinderError::InvalidRecord { reason, .. } => {
                        DpoFinderError::InvalidRecord { row, reason }
                    }
                    other => other,
                })
            },
        )
        .collect()
    }

    pub fn pin_code(&self) -> &str {
        &self.pin_code
    }

    /// Office name in its original casing
    pub fn office_name(&self) -> &str {
        &self.office_name_display
    }

    pub fn office_name_lower(&self) -> &str {
        &self.office_name_lower
    }

    pub fn office_type(&self) -> &OfficeType {
        &self.office_type
    }

    pub fn is_delivery(&self) -> bool {
        self.delivery
    }

    pub fn division_name(&self) -> &str {
        &self.division_name
    }

    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    pub fn circle_name(&self) -> &str {
        &self.circle_name
    }

    pub fn district(&self) -> &str {
        &self.district
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Office name, division, district and state joined by single spaces.
    pub fn search_blob(&self) -> &str {
        &self.search_blob
    }

    /// Google Maps search link for the office location, when it has valid coordinates.
    pub fn maps_link(&self) -> Option<String> {
        self.coordinates().map(|(lat, lon)| {
            format!("https://www.google.com/maps/search/?api=1&query={lat},{lon}")
        })
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

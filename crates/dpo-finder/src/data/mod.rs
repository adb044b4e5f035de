//! In-memory postal reference table.
use std::path::{Path, PathBuf};

use ahash::AHashMap;
pub use dpo_finder_data_processing::PostalData;
use tracing::{info, instrument, warn};

mod record;

pub use record::{OfficeType, PostalRecord, RawPostalRecord, parse_delivery_flag};

use crate::error::Result;

/// Immutable, pre-normalized collection of post offices with a PIN code index.
///
/// Records keep their feed order; every "first record" rule in the resolver refers to this order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    records: Vec<PostalRecord>,
    pin_index: AHashMap<String, Vec<usize>>,
    source: Option<PathBuf>,
}

impl ReferenceTable {
    pub fn new(records: Vec<PostalRecord>) -> Self {
        let mut pin_index: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (idx, record) in records.iter().enumerate() {
            pin_index
                .entry(record.pin_code().to_string())
                .or_default()
                .push(idx);
        }
        Self {
            records,
            pin_index,
            source: None,
        }
    }

    /// Build the table from a normalized postal frame.
    pub fn from_postal_data(data: &PostalData) -> Result<Self> {
        if data.is_empty() {
            warn!(source = ?data.source, "Postal data has no routable rows");
        }
        let records = PostalRecord::from_df(&data.frame)?;
        let mut table = Self::new(records);
        table.source.clone_from(&data.source);
        Ok(table)
    }

    /// Read, normalize and index a postal directory CSV.
    #[instrument(name = "Load reference table", level = "info", skip_all)]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let t_load = std::time::Instant::now();
        let data = dpo_finder_data_processing::load_postal_data(path)?;
        let table = Self::from_postal_data(&data)?;
        info!(
            records = table.len(),
            pins = table.distinct_pins(),
            elapsed = ?t_load.elapsed(),
            "Reference table ready"
        );
        Ok(table)
    }

    pub fn records(&self) -> &[PostalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// File the table was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// All records sharing a PIN code, in table order.
    pub fn pin_group(&self, pin_code: &str) -> Vec<&PostalRecord> {
        self.pin_index
            .get(pin_code.trim())
            .map(|indices| indices.iter().map(|&idx| &self.records[idx]).collect())
            .unwrap_or_default()
    }

    pub fn contains_pin(&self, pin_code: &str) -> bool {
        self.pin_index.contains_key(pin_code.trim())
    }

    pub fn distinct_pins(&self) -> usize {
        self.pin_index.len()
    }

    pub fn delivery_offices(&self) -> usize {
        self.records.iter().filter(|r| r.is_delivery()).count()
    }

    /// First office whose name equals `name`, ignoring case and surrounding whitespace.
    pub fn find_office(&self, name: &str) -> Option<&PostalRecord> {
        let needle = name.trim().to_lowercase();
        self.records
            .iter()
            .find(|record| record.office_name_lower() == needle)
    }
}

impl FromIterator<PostalRecord> for ReferenceTable {
    fn from_iter<T: IntoIterator<Item = PostalRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

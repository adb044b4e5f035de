//! Reference data feed for `dpo-finder`.
//!
//! Locates the postal directory CSV, reads it with polars, maps the various header spellings onto
//! a canonical column set and drops rows that cannot be routed (no PIN code). The result is a
//! plain string `DataFrame` which the core crate turns into typed records.
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub mod processed;
pub mod raw;
pub mod test_data;

mod error;

pub use error::{DataError, Result};
pub use processed::{PostalData, load_postal_data, normalize_postal_lf, postal_data_from_lf};
pub use test_data::{TestDataConfig, create_test_data};

/// Default location of the postal directory, relative to the working directory.
pub const DATA_FILE_DEFAULT: &str = "data/postal_data.csv";
/// Environment variable overriding the postal directory location.
pub const DATA_FILE_ENV: &str = "POSTAL_DATA_FILE";

/// Canonical column names of a normalized postal frame.
pub mod columns {
    pub const PIN_CODE: &str = "PINCode";
    pub const OFFICE_NAME: &str = "OfficeName";
    pub const OFFICE_TYPE: &str = "OfficeType";
    pub const DELIVERY: &str = "Delivery";
    pub const DIVISION_NAME: &str = "DivisionName";
    pub const REGION_NAME: &str = "RegionName";
    pub const CIRCLE_NAME: &str = "CircleName";
    pub const DISTRICT: &str = "District";
    pub const STATE: &str = "State";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";

    /// Every canonical column, in output order.
    pub const ALL: [&str; 11] = [
        PIN_CODE,
        OFFICE_NAME,
        OFFICE_TYPE,
        DELIVERY,
        DIVISION_NAME,
        REGION_NAME,
        CIRCLE_NAME,
        DISTRICT,
        STATE,
        LATITUDE,
        LONGITUDE,
    ];
}

/// Ordered list of places to look for the postal directory.
///
/// An explicit path wins, then `POSTAL_DATA_FILE`, then [`DATA_FILE_DEFAULT`] under the working
/// directory, then next to the running executable. With the `system-dirs` feature the platform
/// data directory is tried last.
pub fn candidate_data_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Ok(env_path) = std::env::var(DATA_FILE_ENV)
        && !env_path.trim().is_empty()
    {
        candidates.push(PathBuf::from(env_path));
    }
    candidates.push(PathBuf::from(DATA_FILE_DEFAULT));
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(DATA_FILE_DEFAULT));
    }
    #[cfg(feature = "system-dirs")]
    if let Some(dirs) = directories::ProjectDirs::from("", "", "dpo-finder") {
        candidates.push(dirs.data_dir().join("postal_data.csv"));
    }
    candidates
}

/// Resolve the postal directory file, returning the first candidate that exists.
pub fn locate_data_file(explicit: Option<&Path>) -> Result<PathBuf> {
    let candidates = candidate_data_paths(explicit);
    for candidate in &candidates {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "Found postal data file");
            return Ok(candidate.clone());
        }
    }
    warn!(?candidates, "Postal data file not found");
    Err(DataError::DataFileNotFound(
        candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    ))
}

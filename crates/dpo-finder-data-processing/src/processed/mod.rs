use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{info, info_span, instrument, warn};

use super::{
    columns,
    error::{DataError, Result},
    raw::{self, ColumnMapping},
};

/// Columns that feed the search blob. A feed without them is still usable, so they are created
/// empty with a warning instead of failing the load.
const SEARCH_SOURCE_COLUMNS: [&str; 4] = [
    columns::OFFICE_NAME,
    columns::DIVISION_NAME,
    columns::DISTRICT,
    columns::STATE,
];

/// A normalized postal directory ready to be turned into typed records.
#[derive(Debug, Clone)]
pub struct PostalData {
    /// Canonical string columns (see [`columns::ALL`]), nulls replaced with empty strings
    pub frame: DataFrame,
    /// File the data was read from, if any
    pub source: Option<PathBuf>,
    /// Rows removed because they carried no PIN code
    pub dropped_rows: usize,
    /// Canonical columns that were absent from the feed and defaulted to empty strings
    pub defaulted_columns: Vec<&'static str>,
}

impl PostalData {
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Map a raw postal frame onto the canonical column set.
///
/// Every canonical column is present in the output and typed as string. Missing optional columns
/// become empty strings; a missing PIN column is an error. Rows are not filtered here.
#[instrument(name = "Normalize postal frame", level = "debug", skip_all)]
pub fn normalize_postal_lf(mut lf: LazyFrame) -> Result<(LazyFrame, Vec<&'static str>)> {
    let schema = lf.collect_schema()?;
    let headers = schema
        .iter_names()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    let mapping = ColumnMapping::from_headers(&headers);

    if mapping.source_for(columns::PIN_CODE).is_none() {
        return Err(DataError::MissingColumn(columns::PIN_CODE));
    }

    let defaulted = mapping.missing();
    for column in &defaulted {
        if SEARCH_SOURCE_COLUMNS.contains(column) {
            warn!(column, "Search column not found in postal data, using empty values");
        }
    }

    let exprs = columns::ALL
        .iter()
        .map(|canonical| match mapping.source_for(canonical) {
            Some(source) => col(source)
                .cast(DataType::String)
                .fill_null(lit(""))
                .alias(*canonical),
            None => lit("").alias(*canonical),
        })
        .collect::<Vec<_>>();

    Ok((lf.select(exprs), defaulted))
}

/// Keep only rows whose PIN code is non-blank. A null pattern strips all Unicode whitespace,
/// the same rule the core applies when it builds records.
fn routable_rows(lf: LazyFrame) -> LazyFrame {
    lf.filter(
        col(columns::PIN_CODE)
            .str()
            .strip_chars(lit(NULL))
            .neq(lit("")),
    )
}

/// Normalize an already loaded frame, e.g. one assembled in memory.
pub fn postal_data_from_lf(lf: LazyFrame, source: Option<PathBuf>) -> Result<PostalData> {
    let (normalized, defaulted_columns) = normalize_postal_lf(lf)?;
    let all_rows = normalized.collect()?;
    let total = all_rows.height();
    let frame = routable_rows(all_rows.lazy()).collect()?;
    let dropped_rows = total - frame.height();
    if dropped_rows > 0 {
        warn!(dropped_rows, "Dropped postal rows without a PIN code");
    }
    Ok(PostalData {
        frame,
        source,
        dropped_rows,
        defaulted_columns,
    })
}

/// Read and normalize a postal directory CSV.
#[instrument(name = "Load postal data", level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_postal_data(path: impl AsRef<Path>) -> Result<PostalData> {
    let path = path.as_ref();
    let t_load = std::time::Instant::now();
    let data = {
        let _span = info_span!("Transform Raw Data").entered();
        let lf = raw::get_postal_csv_lf(path)?;
        postal_data_from_lf(lf, Some(path.to_path_buf()))?
    };
    info!(
        rows = data.height(),
        dropped_rows = data.dropped_rows,
        elapsed = ?t_load.elapsed(),
        "Loaded postal data"
    );
    Ok(data)
}

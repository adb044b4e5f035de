//! Lookup facade for the `dpo-finder` library.
//!
//! [`DpoFinder`] owns the postal reference table together with the tokenizer and resolver, and
//! exposes single, batch and parsed lookups, quick suggestions and office details.
//!
//! # Quick Start
//!
//! ```no_run
//! use dpo_finder::DpoFinder;
//!
//! // The table is read from `POSTAL_DATA_FILE` or `data/postal_data.csv` on first use
//! let finder = DpoFinder::from_default_location();
//!
//! let outcome = finder.lookup("Indiranagar, Bangalore 560038");
//! println!("{outcome}");
//! ```
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use ahash::AHashSet;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::{
    config::LookupConfig,
    data::{PostalRecord, ReferenceTable},
    error::{DpoFinderError, Result},
    resolve::{MatchOutcome, Resolver},
    score::{Scorer, SimilarityScorer},
    tokenizer::{ParsedQuery, Tokenizer},
};

/// Where the reference table comes from when it is first needed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TableSource {
    /// An explicit CSV file
    Path(PathBuf),
    /// The usual search order of [`dpo_finder_data_processing::locate_data_file`]
    DefaultLocation,
    /// Supplied in memory; the cell is always initialized
    InMemory,
}

/// Resolves addresses to delivery post offices.
///
/// The reference table is loaded lazily on the first call that needs it and memoized; a failed
/// load is retried on the next call. All lookups share the table read-only, so a `DpoFinder` can be
/// used from many threads at once.
///
/// # Examples
///
/// ```rust
/// use dpo_finder::{DpoFinder, MatchStatus, PostalRecord};
///
/// let finder = DpoFinder::from_records(vec![
///     PostalRecord::basic("560038", "Indiranagar S.O", "Bangalore East Division",
///         "Bangalore Urban", "KARNATAKA", "SO", true)?,
/// ]);
///
/// let outcome = finder.lookup("Indiranagar 560038");
/// assert_eq!(outcome.status, MatchStatus::Success);
/// assert_eq!(outcome.dpo_name.as_deref(), Some("Indiranagar S.O"));
/// # Ok::<(), dpo_finder::error::DpoFinderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DpoFinder {
    source: TableSource,
    table: OnceCell<Arc<ReferenceTable>>,
    tokenizer: Tokenizer,
    resolver: Resolver,
    config: LookupConfig,
}

impl DpoFinder {
    fn with_source(source: TableSource, table: OnceCell<Arc<ReferenceTable>>) -> Self {
        let config = LookupConfig::default();
        Self {
            source,
            table,
            tokenizer: Tokenizer::default(),
            resolver: Resolver::new(Scorer::new(config.scoring)),
            config,
        }
    }

    /// Lookups will read the postal directory CSV at `path` on first use.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::with_source(
            TableSource::Path(path.as_ref().to_path_buf()),
            OnceCell::new(),
        )
    }

    /// Lookups will locate the postal directory on first use: `POSTAL_DATA_FILE`, then
    /// `data/postal_data.csv` in the working directory or next to the executable.
    pub fn from_default_location() -> Self {
        Self::with_source(TableSource::DefaultLocation, OnceCell::new())
    }

    /// Use an already built table.
    pub fn from_table(table: Arc<ReferenceTable>) -> Self {
        Self::with_source(TableSource::InMemory, OnceCell::with_value(table))
    }

    /// Build the table from records, keeping their order.
    pub fn from_records(records: Vec<PostalRecord>) -> Self {
        Self::from_table(Arc::new(ReferenceTable::new(records)))
    }

    /// Replace the lookup configuration. Resets any custom similarity scorer.
    pub fn with_config(mut self, config: LookupConfig) -> Self {
        self.resolver = Resolver::new(Scorer::new(config.scoring));
        self.config = config;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Replace the fuzzy similarity used by the scorer.
    pub fn with_similarity(mut self, similarity: Arc<dyn SimilarityScorer>) -> Self {
        self.resolver = Resolver::new(Scorer::new(self.config.scoring).with_similarity(similarity));
        self
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The reference table, loading it if needed.
    pub fn table(&self) -> Result<&Arc<ReferenceTable>> {
        self.table.get_or_try_init(|| {
            let path = match &self.source {
                TableSource::Path(path) => path.clone(),
                TableSource::DefaultLocation => {
                    dpo_finder_data_processing::locate_data_file(None)?
                }
                TableSource::InMemory => return Err(DpoFinderError::EmptyTable),
            };
            info!(path = %path.display(), "Loading postal reference table");
            ReferenceTable::load(&path).map(Arc::new)
        })
    }

    /// Whether the reference table has been loaded already.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Parse an address without resolving it.
    pub fn parse(&self, address: &str) -> ParsedQuery {
        self.tokenizer.tokenize(address)
    }

    /// Resolve one free-text address.
    ///
    /// Never fails; a table that cannot be loaded yields an outcome with status `error`.
    #[instrument(name = "Lookup", level = "debug", skip(self))]
    pub fn lookup(&self, address: &str) -> MatchOutcome {
        let query = self.parse(address);
        self.lookup_parsed(&query)
    }

    /// Resolve an already parsed query.
    pub fn lookup_parsed(&self, query: &ParsedQuery) -> MatchOutcome {
        match self.table() {
            Ok(table) => self.resolver.resolve(query, table),
            Err(err) => {
                warn!(error = %err, "Reference table unavailable");
                MatchOutcome::from_error(&err).with_input_pin(query.pin_code.as_deref())
            }
        }
    }

    /// Resolve many addresses in parallel. Outcomes come back in input order.
    #[instrument(name = "Lookup batch", level = "info", skip_all, fields(addresses = addresses.len()))]
    pub fn lookup_batch<S>(&self, addresses: &[S]) -> Vec<MatchOutcome>
    where
        S: AsRef<str> + Sync,
    {
        let t_batch = std::time::Instant::now();
        // Load once up front so the workers do not all wait on the first one.
        if let Err(err) = self.table() {
            warn!(error = %err, "Reference table unavailable for batch");
        }
        let outcomes = addresses
            .par_iter()
            .map(|address| self.lookup(address.as_ref()))
            .collect::<Vec<_>>();
        info!(elapsed = ?t_batch.elapsed(), "Batch lookup complete");
        outcomes
    }

    /// Summary of the loaded reference table.
    pub fn info(&self) -> Result<FinderInfo> {
        let table = self.table()?;
        Ok(FinderInfo {
            records: table.len(),
            distinct_pins: table.distinct_pins(),
            delivery_offices: table.delivery_offices(),
            source: table.source().map(Path::to_path_buf),
        })
    }

    /// Full record of the first office with this name, ignoring case.
    pub fn office_details(&self, office_name: &str) -> Result<Option<PostalRecord>> {
        Ok(self.table()?.find_office(office_name).cloned())
    }

    /// Quick, unscored suggestions for a partially typed query.
    ///
    /// Offices with the parsed PIN come first, then offices whose search blob contains any
    /// keyword, in table order and without repeated office names. Only the first `limit` are
    /// returned, together with the total for paging.
    pub fn suggest(&self, query: &str, limit: usize) -> Result<Suggestions> {
        if query.trim().chars().count() < self.config.min_suggestion_query_len {
            return Ok(Suggestions::default());
        }
        let table = self.table()?;
        let parsed = self.parse(query);

        let by_pin = parsed
            .pin_code
            .as_deref()
            .map(|pin| table.pin_group(pin))
            .unwrap_or_default();
        let by_keyword = table.records().iter().filter(|record| {
            parsed
                .locality_keywords
                .iter()
                .any(|keyword| record.search_blob().contains(keyword.as_str()))
        });

        let mut seen = AHashSet::new();
        let matches = by_pin
            .into_iter()
            .chain(by_keyword)
            .filter(|&record| seen.insert(record.office_name_lower()))
            .collect::<Vec<_>>();

        Ok(Suggestions {
            total: matches.len(),
            offices: matches.into_iter().take(limit).cloned().collect(),
        })
    }

    /// First page of quick suggestions, sized by the configuration.
    pub fn suggest_page(&self, query: &str) -> Result<Suggestions> {
        self.suggest(query, self.config.suggestion_page_size)
    }
}

/// Quick suggestions for a query.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    /// Suggested offices, at most the requested limit
    pub offices: Vec<PostalRecord>,
    /// Number of distinct offices matching the query
    pub total: usize,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// More suggestions exist beyond the returned ones.
    pub fn has_more(&self) -> bool {
        self.total > self.offices.len()
    }
}

/// Information about the reference table behind a [`DpoFinder`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderInfo {
    pub records: usize,
    pub distinct_pins: usize,
    pub delivery_offices: usize,
    pub source: Option<PathBuf>,
}

impl FinderInfo {
    /// Get a human-readable summary of the table.
    pub fn summary(&self) -> String {
        let source = self
            .source
            .as_ref()
            .map_or_else(|| "memory".to_string(), |p| p.display().to_string());
        format!(
            "{} post offices ({} delivery) across {} PIN codes, loaded from {source}",
            self.records, self.delivery_offices, self.distinct_pins
        )
    }
}

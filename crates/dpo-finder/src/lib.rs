//! dpo-finder - Delivery Post Office resolution for Indian addresses
//!
//! dpo-finder takes a free-text postal address, a partial address or a bare PIN code and suggests
//! the most plausible Delivery Post Office (DPO) together with its PIN code, using the public
//! directory of Indian post offices as reference data.
//!
//! # Quick Start
//!
//! ```rust
//! use dpo_finder::{DpoFinder, MatchStatus, PostalRecord};
//!
//! let finder = DpoFinder::from_records(vec![
//!     PostalRecord::basic("560038", "Indiranagar S.O", "Bangalore East Division",
//!         "Bangalore Urban", "KARNATAKA", "SO", true)?,
//!     PostalRecord::basic("560038", "Majestic S.O", "Bangalore East Division",
//!         "Bangalore Urban", "KARNATAKA", "SO", false)?,
//! ]);
//!
//! // PIN plus locality
//! let outcome = finder.lookup("Indiranagar, Bangalore 560038");
//! assert_eq!(outcome.status, MatchStatus::Success);
//!
//! // Bare PIN code
//! let outcome = finder.lookup("560038");
//! assert_eq!(outcome.status, MatchStatus::SuccessPinOnlyDpo);
//! assert_eq!(outcome.dpo_name.as_deref(), Some("Indiranagar S.O"));
//! # Ok::<(), dpo_finder::error::DpoFinderError>(())
//! ```
//!
//! # How it works
//!
//! - **Tokenizer**: extracts the first 6-digit PIN code and a set of locality keywords, dropping
//!   postal stop-words such as "road", "nagar" or "opp"
//! - **Scorer**: weighs each keyword by the first field it matches (office name, division,
//!   district, state), falling back to fuzzy matching
//! - **Resolver**: narrows to the PIN group when possible, otherwise scores the whole table and
//!   prefers delivery offices
//!
//! # Data
//!
//! The reference table is the postal directory CSV (`Pincode`, `OfficeName`, `OfficeType`,
//! `Delivery`, `DivisionName`, `District`, `StateName`, ...). It is looked up in
//! `POSTAL_DATA_FILE`, then `data/postal_data.csv`; see [`data_processing::locate_data_file`].
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
mod data;
pub mod error;
mod resolve;
mod score;
mod tokenizer;

pub use crate::core::{DpoFinder, FinderInfo, Suggestions};

pub use config::{
    DEFAULT_MIN_SUGGESTION_QUERY_LEN, DEFAULT_SUGGESTION_PAGE_SIZE, LookupConfig,
    LookupConfigBuilder,
};
pub use data::{OfficeType, PostalRecord, RawPostalRecord, ReferenceTable, parse_delivery_flag};
pub use dpo_finder_data_processing as data_processing;
pub use resolve::{MatchOutcome, MatchStatus, Resolver};
pub use score::{
    FieldWeights, MatchField, PartialRatio, ScoredMatch, Scorer, ScoringConfig, SimilarityScorer,
    partial_ratio,
};
pub use tokenizer::{DEFAULT_MIN_KEYWORD_LEN, DEFAULT_STOP_WORDS, ParsedQuery, Tokenizer, tokenize};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for dpo-finder.
///
/// Installs a `tracing` fmt subscriber filtered at `level`; `RUST_LOG` takes precedence when set.
/// Only the first call has an effect.
///
/// # Examples
///
/// ```rust
/// use dpo_finder::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), dpo_finder::error::DpoFinderError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::DpoFinderError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("polars=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|err| anyhow::anyhow!(err))?;
        Ok(())
    })
}

use crate::{
    error::DpoFinderError,
    score::{FieldWeights, ScoringConfig},
};

/// Number of quick suggestions shown per page.
pub const DEFAULT_SUGGESTION_PAGE_SIZE: usize = 5;
/// Quick suggestions are only computed for queries at least this long.
pub const DEFAULT_MIN_SUGGESTION_QUERY_LEN: usize = 2;

/// Configuration of a [`crate::DpoFinder`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    pub scoring: ScoringConfig,
    pub suggestion_page_size: usize,
    pub min_suggestion_query_len: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            suggestion_page_size: DEFAULT_SUGGESTION_PAGE_SIZE,
            min_suggestion_query_len: DEFAULT_MIN_SUGGESTION_QUERY_LEN,
        }
    }
}

impl LookupConfig {
    pub fn builder() -> LookupConfigBuilder {
        LookupConfigBuilder::new()
    }
}

/// Builder for lookup configurations with ready-made presets
#[derive(Debug, Clone, Default)]
pub struct LookupConfigBuilder {
    config: LookupConfig,
}

impl LookupConfigBuilder {
    /// Create a new builder with the standard weights and thresholds
    pub fn new() -> Self {
        Self {
            config: LookupConfig::default(),
        }
    }

    /// Substring matches only, no fuzzy fallback
    pub fn exact_only() -> Self {
        let mut builder = Self::new();
        builder.config.scoring.fuzzy_enabled = false;
        builder
    }

    /// Accept looser fuzzy matches, for noisy or transliterated input
    pub fn lenient() -> Self {
        let mut builder = Self::new();
        builder.config.scoring.fuzzy_threshold = 70.0;
        builder.config.scoring.fuzzy_penalty = 0.7;
        builder
    }

    /// Enable or disable the fuzzy checks
    pub fn fuzzy(mut self, enabled: bool) -> Self {
        self.config.scoring.fuzzy_enabled = enabled;
        self
    }

    /// Minimum fuzzy similarity, clamped to 0-100
    pub fn fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.config.scoring.fuzzy_threshold = if threshold.is_nan() {
            ScoringConfig::default().fuzzy_threshold
        } else {
            threshold.clamp(0.0, 100.0)
        };
        self
    }

    /// Multiplier applied to fuzzy matches, clamped to 0-1
    pub fn fuzzy_penalty(mut self, penalty: f64) -> Self {
        self.config.scoring.fuzzy_penalty = if penalty.is_nan() {
            ScoringConfig::default().fuzzy_penalty
        } else {
            penalty.clamp(0.0, 1.0)
        };
        self
    }

    /// Bonus added per matched keyword once two or more keywords match
    pub fn multi_keyword_bonus(mut self, bonus: f64) -> Self {
        self.config.scoring.multi_keyword_bonus = bonus.max(0.0);
        self
    }

    /// Set custom weights for office name, division, district, state and the search blob
    pub fn custom_field_weights(
        mut self,
        office_name: f64,
        division_name: f64,
        district: f64,
        state: f64,
        other_details: f64,
    ) -> Result<Self, DpoFinderError> {
        let weights = [office_name, division_name, district, state, other_details];
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(DpoFinderError::ConfigError(format!(
                "Field weights must be finite and non-negative, got {bad}"
            )));
        }

        self.config.scoring.field_weights = FieldWeights {
            office_name,
            division_name,
            district,
            state,
        };
        self.config.scoring.other_details_weight = other_details;
        Ok(self)
    }

    /// Number of quick suggestions per page (at least 1)
    pub fn suggestion_page_size(mut self, size: usize) -> Self {
        self.config.suggestion_page_size = size.max(1);
        self
    }

    /// Minimum query length for quick suggestions
    pub fn min_suggestion_query_len(mut self, len: usize) -> Self {
        self.config.min_suggestion_query_len = len;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> LookupConfig {
        self.config
    }
}

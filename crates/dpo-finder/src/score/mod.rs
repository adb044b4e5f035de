//! Keyword scoring of a single postal record.
//!
//! Each keyword is checked against the record fields in a fixed priority order and contributes
//! the weight of the first field it matches. Substring matches on the named fields come first,
//! then fuzzy matches on office name, division and district, then a plain substring check on the
//! search blob. Matching two or more keywords earns a bonus proportional to the match count.
use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::trace;

use crate::data::PostalRecord;

mod similarity;

pub use similarity::{PartialRatio, SimilarityScorer, partial_ratio};

/// Record field a keyword was attributed to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    #[cfg_attr(feature = "serde", serde(rename = "OfficeName"))]
    OfficeName,
    #[cfg_attr(feature = "serde", serde(rename = "DivisionName"))]
    DivisionName,
    #[cfg_attr(feature = "serde", serde(rename = "District"))]
    District,
    #[cfg_attr(feature = "serde", serde(rename = "State"))]
    State,
    #[cfg_attr(feature = "serde", serde(rename = "OfficeName (Fuzzy)"))]
    OfficeNameFuzzy,
    #[cfg_attr(feature = "serde", serde(rename = "DivisionName (Fuzzy)"))]
    DivisionNameFuzzy,
    #[cfg_attr(feature = "serde", serde(rename = "District (Fuzzy)"))]
    DistrictFuzzy,
    #[cfg_attr(feature = "serde", serde(rename = "Other Details"))]
    OtherDetails,
}

impl MatchField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OfficeName => "OfficeName",
            Self::DivisionName => "DivisionName",
            Self::District => "District",
            Self::State => "State",
            Self::OfficeNameFuzzy => "OfficeName (Fuzzy)",
            Self::DivisionNameFuzzy => "DivisionName (Fuzzy)",
            Self::DistrictFuzzy => "District (Fuzzy)",
            Self::OtherDetails => "Other Details",
        }
    }

    pub const fn is_fuzzy(self) -> bool {
        matches!(
            self,
            Self::OfficeNameFuzzy | Self::DivisionNameFuzzy | Self::DistrictFuzzy
        )
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weights of a substring match in each named field.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub office_name: f64,
    pub division_name: f64,
    pub district: f64,
    pub state: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            office_name: 1.0,
            division_name: 0.7,
            district: 0.5,
            state: 0.2,
        }
    }
}

/// Scoring parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub field_weights: FieldWeights,
    /// Run the fuzzy checks at all
    pub fuzzy_enabled: bool,
    /// Minimum similarity (0-100) for a fuzzy match
    pub fuzzy_threshold: f64,
    /// Multiplier applied to the field weight of a fuzzy match
    pub fuzzy_penalty: f64,
    /// Weight of a match found only in the search blob
    pub other_details_weight: f64,
    /// Added once per matched keyword when at least two keywords matched
    pub multi_keyword_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            field_weights: FieldWeights::default(),
            fuzzy_enabled: true,
            fuzzy_threshold: 80.0,
            fuzzy_penalty: 0.8,
            other_details_weight: 0.1,
            multi_keyword_bonus: 0.2,
        }
    }
}

/// Score of one record with the field each keyword was attributed to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredMatch {
    pub score: f64,
    pub matched: BTreeMap<String, MatchField>,
}

impl ScoredMatch {
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// `'keyword' (Field)` pairs joined by commas, in keyword order.
    pub fn describe(&self) -> String {
        describe_matches(&self.matched)
    }
}

pub(crate) fn describe_matches(matched: &BTreeMap<String, MatchField>) -> String {
    matched
        .iter()
        .map(|(keyword, field)| format!("'{keyword}' ({field})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Scores records against a keyword set.
#[derive(Debug, Clone)]
pub struct Scorer {
    config: ScoringConfig,
    similarity: Arc<dyn SimilarityScorer>,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            similarity: Arc::new(PartialRatio),
        }
    }

    /// Replace the fuzzy similarity implementation.
    pub fn with_similarity(mut self, similarity: Arc<dyn SimilarityScorer>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a record. Keywords are expected lower-cased, as produced by the tokenizer.
    pub fn score<'k, I>(&self, record: &PostalRecord, keywords: I) -> ScoredMatch
    where
        I: IntoIterator<Item = &'k String>,
    {
        let mut result = ScoredMatch::default();
        for keyword in keywords {
            if result.matched.contains_key(keyword) {
                continue;
            }
            if let Some((field, weight)) = self.match_keyword(record, keyword) {
                result.score += weight;
                result.matched.insert(keyword.clone(), field);
            }
        }

        if result.matched.len() > 1 {
            result.score += self.config.multi_keyword_bonus * result.matched.len() as f64;
        }
        trace!(
            office = record.office_name(),
            score = result.score,
            "Scored record"
        );
        result
    }

    fn match_keyword(&self, record: &PostalRecord, keyword: &str) -> Option<(MatchField, f64)> {
        let weights = &self.config.field_weights;
        let exact = [
            (record.office_name_lower(), MatchField::OfficeName, weights.office_name),
            (record.division_name(), MatchField::DivisionName, weights.division_name),
            (record.district(), MatchField::District, weights.district),
            (record.state(), MatchField::State, weights.state),
        ];
        if let Some((_, field, weight)) = exact
            .into_iter()
            .find(|(text, _, _)| text.contains(keyword))
        {
            return Some((field, weight));
        }

        if self.config.fuzzy_enabled {
            let fuzzy = [
                (record.office_name_lower(), MatchField::OfficeNameFuzzy, weights.office_name),
                (record.division_name(), MatchField::DivisionNameFuzzy, weights.division_name),
                (record.district(), MatchField::DistrictFuzzy, weights.district),
            ];
            if let Some((_, field, weight)) = fuzzy.into_iter().find(|(text, _, _)| {
                self.similarity.similarity(keyword, text) >= self.config.fuzzy_threshold
            }) {
                return Some((field, weight * self.config.fuzzy_penalty));
            }
        }

        record
            .search_blob()
            .contains(keyword)
            .then_some((MatchField::OtherDetails, self.config.other_details_weight))
    }
}

use std::{collections::BTreeMap, fmt};

use crate::{error::DpoFinderError, score::MatchField};

/// Result category of a lookup.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    /// PIN group matched and keywords picked a delivery office
    #[cfg_attr(feature = "serde", serde(rename = "success"))]
    Success,
    /// PIN group has delivery offices and no keywords were given
    #[cfg_attr(feature = "serde", serde(rename = "success_pin_only_dpo"))]
    SuccessPinOnlyDpo,
    #[cfg_attr(feature = "serde", serde(rename = "success_locality (DPO)"))]
    SuccessLocalityDpo,
    #[cfg_attr(feature = "serde", serde(rename = "success_locality (Non-DPO)"))]
    SuccessLocalityNonDpo,
    /// PIN group has delivery offices but the keywords matched none of them
    #[cfg_attr(feature = "serde", serde(rename = "partial_match_pin"))]
    PartialMatchPin,
    /// PIN group exists but no office in it is flagged for delivery
    #[cfg_attr(feature = "serde", serde(rename = "partial_match_pin_no_dpo_flag"))]
    PartialMatchPinNoDpoFlag,
    #[cfg_attr(feature = "serde", serde(rename = "not_found"))]
    NotFound,
    #[cfg_attr(feature = "serde", serde(rename = "error"))]
    Error,
}

impl MatchStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SuccessPinOnlyDpo => "success_pin_only_dpo",
            Self::SuccessLocalityDpo => "success_locality (DPO)",
            Self::SuccessLocalityNonDpo => "success_locality (Non-DPO)",
            Self::PartialMatchPin => "partial_match_pin",
            Self::PartialMatchPinNoDpoFlag => "partial_match_pin_no_dpo_flag",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(
            self,
            Self::Success
                | Self::SuccessPinOnlyDpo
                | Self::SuccessLocalityDpo
                | Self::SuccessLocalityNonDpo
        )
    }

    pub const fn is_partial(self) -> bool {
        matches!(self, Self::PartialMatchPin | Self::PartialMatchPinNoDpoFlag)
    }

    /// Whether the outcome names an office.
    pub const fn has_suggestion(self) -> bool {
        self.is_success() || self.is_partial()
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to one lookup.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub status: MatchStatus,
    /// PIN code parsed from the input, if any
    pub input_pin: Option<String>,
    /// PIN code of the suggested office
    pub pin: Option<String>,
    /// Suggested office, display-cased
    pub dpo_name: Option<String>,
    /// Keyword score rounded to two decimals, only when keyword scoring picked the office
    pub score: Option<f64>,
    pub message: String,
    /// Field each matched keyword was attributed to, only when keyword scoring picked the office
    pub matched_keyword_details: Option<BTreeMap<String, MatchField>>,
}

impl MatchOutcome {
    pub(crate) fn new(status: MatchStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            input_pin: None,
            pin: None,
            dpo_name: None,
            score: None,
            message: message.into(),
            matched_keyword_details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(MatchStatus::NotFound, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(MatchStatus::Error, message)
    }

    /// Turn a failure (for instance a reference table that could not be loaded) into an outcome.
    pub fn from_error(err: &DpoFinderError) -> Self {
        Self::error(err.to_string())
    }

    pub(crate) fn with_input_pin(mut self, input_pin: Option<&str>) -> Self {
        self.input_pin = input_pin.map(str::to_string);
        self
    }

    pub(crate) fn with_office(mut self, pin: &str, dpo_name: &str) -> Self {
        self.pin = Some(pin.to_string());
        self.dpo_name = Some(dpo_name.to_string());
        self
    }

    pub(crate) fn with_score(mut self, score: f64, matched: BTreeMap<String, MatchField>) -> Self {
        self.score = Some(round2(score));
        self.matched_keyword_details = Some(matched);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

const NA: &str = "N/A";

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pin = self.pin.as_deref().unwrap_or(NA);
        let dpo = self.dpo_name.as_deref().unwrap_or(NA);
        match self.status {
            status if status.is_success() => {
                writeln!(f, "  Status:  SUCCESS")?;
                writeln!(f, "  PIN Code: {pin}")?;
                writeln!(f, "  Delivery Post Office (DPO): {dpo}")?;
            }
            MatchStatus::PartialMatchPin => {
                writeln!(f, "  Status: PARTIAL MATCH (PIN based)")?;
                writeln!(
                    f,
                    "  Input PIN: {}",
                    self.input_pin.as_deref().unwrap_or(NA)
                )?;
                writeln!(f, "  Suggested PIN Code: {pin}")?;
                writeln!(f, "  Suggested Delivery Post Office (DPO): {dpo}")?;
            }
            MatchStatus::NotFound => writeln!(f, "  Status:  NOT FOUND")?,
            status => {
                writeln!(f, "  Status:  {}", status.as_str().to_uppercase())?;
                if self.dpo_name.is_some() {
                    writeln!(f, "  Suggested PIN Code: {pin}")?;
                    writeln!(f, "  Suggested Post Office: {dpo}")?;
                }
            }
        }
        if let Some(score) = self.score {
            writeln!(f, "  Score: {score:.2}")?;
        }
        write!(f, "  Message: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(MatchStatus::SuccessLocalityDpo.as_str(), "success_locality (DPO)");
        assert_eq!(
            MatchStatus::SuccessLocalityNonDpo.to_string(),
            "success_locality (Non-DPO)"
        );
        assert_eq!(
            MatchStatus::PartialMatchPinNoDpoFlag.as_str(),
            "partial_match_pin_no_dpo_flag"
        );
        assert!(MatchStatus::SuccessPinOnlyDpo.is_success());
        assert!(!MatchStatus::PartialMatchPin.is_success());
        assert!(MatchStatus::PartialMatchPinNoDpoFlag.has_suggestion());
        assert!(!MatchStatus::NotFound.has_suggestion());
    }

    #[test]
    fn test_score_is_rounded() {
        let outcome = MatchOutcome::new(MatchStatus::Success, "ok")
            .with_office("560038", "Indiranagar S.O")
            .with_score(2.299_999_999, BTreeMap::new());
        assert_eq!(outcome.score, Some(2.3));
        assert_eq!(round2(1.234), 1.23);
    }

    #[test]
    fn test_from_error() {
        let outcome = MatchOutcome::from_error(&DpoFinderError::EmptyTable);
        assert_eq!(outcome.status, MatchStatus::Error);
        assert_eq!(outcome.message, "Postal data is not loaded or empty.");
        assert!(outcome.pin.is_none());
    }

    #[test]
    fn test_display_success() {
        let outcome = MatchOutcome::new(MatchStatus::SuccessPinOnlyDpo, "Found DPO.")
            .with_office("560038", "Indiranagar S.O");
        let rendered = outcome.to_string();
        assert!(rendered.contains("Status:  SUCCESS"));
        assert!(rendered.contains("PIN Code: 560038"));
        assert!(rendered.contains("Delivery Post Office (DPO): Indiranagar S.O"));
        assert!(rendered.ends_with("Message: Found DPO."));
        assert!(!rendered.contains("Score"));
    }

    #[test]
    fn test_display_partial_shows_input_pin() {
        let outcome = MatchOutcome::new(MatchStatus::PartialMatchPin, "Suggested first DPO.")
            .with_input_pin(Some("560038"))
            .with_office("560038", "Indiranagar S.O");
        let rendered = outcome.to_string();
        assert!(rendered.contains("PARTIAL MATCH (PIN based)"));
        assert!(rendered.contains("Input PIN: 560038"));
        assert!(rendered.contains("Suggested Delivery Post Office (DPO): Indiranagar S.O"));
    }

    #[test]
    fn test_display_other_statuses() {
        let rendered = MatchOutcome::not_found("Nothing.").to_string();
        assert!(rendered.contains("Status:  NOT FOUND"));

        let rendered = MatchOutcome::error("Broken.").to_string();
        assert!(rendered.contains("Status:  ERROR"));
        assert!(rendered.contains("Message: Broken."));
    }
}

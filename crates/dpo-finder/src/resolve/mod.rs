//! Decision procedure from a parsed address to a single suggested office.
//!
//! A usable PIN code narrows the search to its group of offices; otherwise every record in the
//! table is scored against the locality keywords. Inside a PIN group delivery offices are ranked
//! by score alone, while the table-wide search ranks delivery offices ahead of non-delivery ones
//! before looking at the score. Ties always go to the record that comes first in the table.
use rayon::prelude::*;
use tracing::{debug, instrument};

mod outcome;

pub use outcome::{MatchOutcome, MatchStatus};

use crate::{
    data::{PostalRecord, ReferenceTable},
    error::DpoFinderError,
    score::{ScoredMatch, Scorer},
    tokenizer::ParsedQuery,
};

/// Resolves parsed queries against a reference table.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    scorer: Scorer,
}

impl Resolver {
    pub fn new(scorer: Scorer) -> Self {
        Self { scorer }
    }

    /// Pick the most plausible delivery office for a query. Never fails: problems with the table
    /// are reported as an outcome with status `error`.
    #[instrument(name = "Resolve query", level = "debug", skip_all, fields(pin = ?query.pin_code, keywords = query.locality_keywords.len()))]
    pub fn resolve(&self, query: &ParsedQuery, table: &ReferenceTable) -> MatchOutcome {
        if table.is_empty() {
            return MatchOutcome::from_error(&DpoFinderError::EmptyTable);
        }

        let input_pin = query.pin_code.as_deref();
        let outcome = match input_pin {
            Some(pin) => self.resolve_pin(pin, query, table),
            None => None,
        };
        outcome
            .unwrap_or_else(|| self.resolve_locality(query, table))
            .with_input_pin(input_pin)
    }

    /// Resolution inside a PIN group. `None` when no record carries the PIN.
    fn resolve_pin(
        &self,
        pin: &str,
        query: &ParsedQuery,
        table: &ReferenceTable,
    ) -> Option<MatchOutcome> {
        let group = table.pin_group(pin);
        let Some(first_office) = group.first() else {
            debug!(pin, "PIN not found, falling back to locality search");
            return None;
        };

        let delivery = group
            .iter()
            .copied()
            .filter(|record| record.is_delivery())
            .collect::<Vec<_>>();
        let Some(first_delivery) = delivery.first() else {
            debug!(pin, offices = group.len(), "PIN group has no delivery office");
            return Some(
                MatchOutcome::new(
                    MatchStatus::PartialMatchPinNoDpoFlag,
                    format!(
                        "PIN {pin} is valid, but no office explicitly marked as 'Delivery'. Suggested first office in PIN."
                    ),
                )
                .with_office(first_office.pin_code(), first_office.office_name()),
            );
        };

        if !query.has_keywords() {
            return Some(
                MatchOutcome::new(
                    MatchStatus::SuccessPinOnlyDpo,
                    format!("Found DPO for PIN {pin}. Locality not specified."),
                )
                .with_office(first_delivery.pin_code(), first_delivery.office_name()),
            );
        }

        let best = delivery
            .iter()
            .map(|record| (*record, self.scorer.score(record, &query.locality_keywords)))
            .fold(None, |best: Option<(&PostalRecord, ScoredMatch)>, candidate| {
                match best {
                    Some(current) if candidate.1.score <= current.1.score => Some(current),
                    _ => Some(candidate),
                }
            });

        match best {
            Some((record, scored)) if scored.score > 0.0 => {
                debug!(office = record.office_name(), score = scored.score, "PIN group match");
                Some(
                    MatchOutcome::new(
                        MatchStatus::Success,
                        format!(
                            "Match found for PIN {pin}. Keywords matched: {}.",
                            scored.describe()
                        ),
                    )
                    .with_office(record.pin_code(), record.office_name())
                    .with_score(scored.score, scored.matched),
                )
            }
            _ => Some(
                MatchOutcome::new(
                    MatchStatus::PartialMatchPin,
                    format!(
                        "PIN {pin} has DPOs, but locality keywords didn't strongly match. Suggested first DPO."
                    ),
                )
                .with_office(first_delivery.pin_code(), first_delivery.office_name()),
            ),
        }
    }

    /// Score every record of the table and keep the best one.
    fn resolve_locality(&self, query: &ParsedQuery, table: &ReferenceTable) -> MatchOutcome {
        if !query.has_keywords() {
            return MatchOutcome::not_found(
                "Insufficient information: No PIN or locality keywords provided.",
            );
        }

        let candidates = table
            .records()
            .par_iter()
            .map(|record| (record, self.scorer.score(record, &query.locality_keywords)))
            .filter(|(_, scored)| scored.score > 0.0)
            .collect::<Vec<_>>();
        debug!(candidates = candidates.len(), "Scored reference table");

        // Equivalent to a stable sort on (delivery desc, score desc) followed by taking the head.
        let mut best: Option<(&PostalRecord, ScoredMatch)> = None;
        for candidate in candidates {
            let replace = match &best {
                None => true,
                Some((record, scored)) => {
                    (candidate.0.is_delivery(), candidate.1.score)
                        > (record.is_delivery(), scored.score)
                }
            };
            if replace {
                best = Some(candidate);
            }
        }

        let Some((record, scored)) = best else {
            return MatchOutcome::not_found("Could not determine DPO/PIN based on locality keywords.");
        };
        let status = if record.is_delivery() {
            MatchStatus::SuccessLocalityDpo
        } else {
            MatchStatus::SuccessLocalityNonDpo
        };
        MatchOutcome::new(
            status,
            format!("Match found by locality. Keywords matched: {}.", scored.describe()),
        )
        .with_office(record.pin_code(), record.office_name())
        .with_score(scored.score, scored.matched)
    }
}

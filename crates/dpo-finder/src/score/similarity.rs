use std::fmt;

use rapidfuzz::fuzz;

/// Fuzzy string similarity on a 0 to 100 scale.
///
/// Implementations must be symmetric in spirit: the scorer passes the keyword first and the
/// record field second, but either may be the longer string.
pub trait SimilarityScorer: fmt::Debug + Send + Sync {
    fn similarity(&self, keyword: &str, field: &str) -> f64;
}

/// Best alignment of the shorter string inside the longer one.
///
/// Every window of the longer string with the length of the shorter one is compared with the
/// indel ratio, as are the partial windows hanging over either end. An exact substring scores 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

impl SimilarityScorer for PartialRatio {
    fn similarity(&self, keyword: &str, field: &str) -> f64 {
        partial_ratio(keyword, field)
    }
}

pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }

    let n = short.len();
    let ratio = |window: &[char]| fuzz::ratio(short.iter().copied(), window.iter().copied());

    let mut best: f64 = 0.0;
    // Windows overhanging the start and the end of the longer string
    for len in 1..n {
        best = best.max(ratio(&long[..len])).max(ratio(&long[long.len() - len..]));
    }
    for window in long.windows(n) {
        best = best.max(ratio(window));
        if best >= 1.0 {
            break;
        }
    }

    (best * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_scores_full_marks() {
        assert_eq!(partial_ratio("indiranagar", "indiranagar s.o"), 100.0);
        assert_eq!(partial_ratio("delhi", "new delhi central division"), 100.0);
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let forward = partial_ratio("indranagar", "indiranagar s.o");
        let backward = partial_ratio("indiranagar s.o", "indranagar");
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_typos_stay_above_threshold() {
        assert!(partial_ratio("indranagar", "indiranagar s.o") >= 80.0);
        assert!(partial_ratio("conaught", "connaught place h.o") >= 80.0);
        assert!(partial_ratio("banglore", "bangalore urban") >= 80.0);
    }

    #[test]
    fn test_unrelated_strings_score_low() {
        assert!(partial_ratio("random", "indiranagar s.o") < 80.0);
        assert!(partial_ratio("zzzz", "mumbai gpo") < 30.0);
    }

    #[test]
    fn test_empty_strings_score_zero() {
        assert_eq!(partial_ratio("", "mumbai"), 0.0);
        assert_eq!(partial_ratio("mumbai", ""), 0.0);
        assert_eq!(partial_ratio("", ""), 0.0);
    }

    #[test]
    fn test_trait_object() {
        let scorer: Box<dyn SimilarityScorer> = Box::new(PartialRatio);
        assert_eq!(scorer.similarity("gpo", "mumbai gpo"), 100.0);
    }
}

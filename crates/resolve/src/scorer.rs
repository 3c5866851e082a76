//! Fuzzy similarity scoring.
//!
//! The matcher only depends on the [`Scorer`] trait, so thresholds and
//! control flow can be exercised with a stub scorer in tests.

/// Similarity metric producing integer scores in `[0, 100]`.
pub trait Scorer: Sync {
    /// Comparison key for one string. Computed once per pool entry.
    fn prepare(&self, s: &str) -> String;

    /// Score two keys produced by [`Scorer::prepare`].
    fn score_prepared(&self, a: &str, b: &str) -> u8;

    /// Cheap bound with `score_prepared(a, b) <= upper_bound(a, b)`.
    /// Lets the matcher skip candidates that cannot reach the cutoff.
    fn upper_bound(&self, _a: &str, _b: &str) -> u8 {
        100
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        self.score_prepared(&self.prepare(a), &self.prepare(b))
    }
}

/// Token-order-insensitive similarity.
///
/// Both strings are reduced to lowercase ASCII word tokens, the tokens are
/// sorted and re-joined, and the joined forms are compared with
/// `rapidfuzz`'s insertion/deletion ratio, scaled to 100 and rounded
/// half-to-even. `"Smith John"` vs `"John Smith"` scores 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl Scorer for TokenSortRatio {
    fn prepare(&self, s: &str) -> String {
        let processed: String = s
            .chars()
            .filter(char::is_ascii)
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    ' '
                }
            })
            .collect();

        let mut tokens: Vec<&str> = processed.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    }

    fn score_prepared(&self, a: &str, b: &str) -> u8 {
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        if a == b {
            return 100;
        }
        percent(rapidfuzz::fuzz::ratio(a.chars(), b.chars()))
    }

    fn upper_bound(&self, a: &str, b: &str) -> u8 {
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        // An indel ratio cannot exceed the one where the shorter key is a
        // subsequence of the longer.
        let (la, lb) = (a.chars().count(), b.chars().count());
        percent(2.0 * la.min(lb) as f64 / (la + lb) as f64)
    }
}

/// Scale a `[0, 1]` similarity to an integer percentage, rounding half to
/// even. The value is snapped to 1e-9 first so that a tie which float
/// division lands just beside `.5` still rounds as a tie.
fn percent(fraction: f64) -> u8 {
    let pct = (fraction * 100.0 * 1e9).round() / 1e9;
    pct.round_ties_even().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(a: &str, b: &str) -> u8 {
        TokenSortRatio.score(a, b)
    }

    #[test]
    fn token_order_is_ignored() {
        assert_eq!(ratio("Smith John", "John Smith"), 100);
        assert_eq!(ratio("Smith, John", "John Smith"), 100);
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        assert_eq!(ratio("JOHN O'BRIEN", "john o brien"), 100);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(ratio("", "John"), 0);
        assert_eq!(ratio("...", "John"), 0);
    }

    #[test]
    fn dissimilar_names_score_low() {
        assert!(ratio("Zzyx Qorp", "John Smith") < 80);
    }

    #[test]
    fn one_letter_typo() {
        // "jon smith" vs "john smith": 18 / 19
        assert_eq!(ratio("Jon Smith", "John Smith"), 95);
        assert_eq!(ratio("Jonathon Reyes", "Jonathan Reyes"), 93);
    }

    #[test]
    fn subset_name_scores_partial() {
        // "li wei" vs "wei": 6 / 9
        assert_eq!(ratio("Li Wei", "Wei"), 67);
    }

    #[test]
    fn rounds_half_to_even() {
        // "ab" vs "ax": 2 / 4
        assert_eq!(TokenSortRatio.score_prepared("ab", "ax"), 50);
        assert_eq!(percent(0.825), 82);
        assert_eq!(percent(0.675), 68);
        assert_eq!(percent(66.0 / 80.0), 82);
        assert_eq!(percent(1.0), 100);
        assert_eq!(percent(0.0), 0);
    }

    #[test]
    fn upper_bound_dominates_score() {
        let pairs = [("ann lee", "anne leigh"), ("bob", "robert stone"), ("x", "x"), ("jon smith", "john smith")];
        for (a, b) in pairs {
            assert!(TokenSortRatio.upper_bound(a, b) >= TokenSortRatio.score_prepared(a, b));
        }
    }
}

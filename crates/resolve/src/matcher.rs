use crate::config::{MatchPolicy, MatchingConfig};
use crate::model::MatchResult;
use crate::pool::ReferencePool;
use crate::scorer::{Scorer, TokenSortRatio};
use crate::variations::VariationSet;

/// Finds the best reference name for one identity's variation set.
///
/// A variation present verbatim in the pool wins outright with score 100;
/// membership is checked for every variation before any fuzzy scoring, so an
/// exact hit is never shadowed by an earlier near-miss. Otherwise variations
/// are scored in set order against every pool entry and candidates below
/// `score_cutoff` are discarded. A later variation
/// replaces the running best only when it scores strictly higher, so ties go
/// to the first variation (and, within a variation, the first pool entry)
/// that reached the score.
#[derive(Debug, Clone)]
pub struct IdentityMatcher<S = TokenSortRatio> {
    scorer: S,
    score_cutoff: u8,
    early_exit_score: u8,
    policy: MatchPolicy,
}

impl Default for IdentityMatcher<TokenSortRatio> {
    fn default() -> Self {
        Self::with_scorer(TokenSortRatio)
    }
}

impl IdentityMatcher<TokenSortRatio> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Scorer> IdentityMatcher<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self::from_config(scorer, &MatchingConfig::default())
    }

    pub fn from_config(scorer: S, config: &MatchingConfig) -> Self {
        Self {
            scorer,
            score_cutoff: config.score_cutoff,
            early_exit_score: config.early_exit_score,
            policy: config.policy,
        }
    }

    pub fn score_cutoff(mut self, cutoff: u8) -> Self {
        self.score_cutoff = cutoff;
        self
    }

    pub fn early_exit_score(mut self, score: u8) -> Self {
        self.early_exit_score = score;
        self
    }

    pub fn policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Precompute scorer keys for every pool entry. Do this once per run and
    /// reuse it for every record.
    pub fn prepare<'p>(&self, pool: &'p ReferencePool) -> PreparedPool<'p> {
        PreparedPool {
            pool,
            entries: pool.iter().map(|name| (name, self.scorer.prepare(name))).collect(),
        }
    }

    /// One-off convenience; prefer [`Self::prepare`] + [`Self::match_prepared`]
    /// when matching many identities against the same pool.
    pub fn match_variations(&self, variations: &VariationSet, pool: &ReferencePool) -> MatchResult {
        self.match_prepared(variations, &self.prepare(pool))
    }

    pub fn match_prepared(&self, variations: &VariationSet, prepared: &PreparedPool<'_>) -> MatchResult {
        let candidates = variations.iter().filter(|v| !v.is_empty());
        if let Some(hit) = candidates.clone().find(|v| prepared.pool.contains(v)) {
            return MatchResult::exact(hit.as_str());
        }

        let mut best = MatchResult::none();
        for variation in candidates {
            let key = self.scorer.prepare(variation);
            let Some((name, score)) = self.best_candidate(&key, prepared) else {
                continue;
            };
            if score <= best.score {
                continue;
            }

            best = MatchResult { matched: name.to_string(), score };
            if score == 100
                || (self.policy == MatchPolicy::FirstToThreshold && score >= self.early_exit_score)
            {
                break;
            }
        }

        best
    }

    /// Highest-scoring pool entry at or above the cutoff; first entry wins ties.
    fn best_candidate<'p>(&self, key: &str, prepared: &PreparedPool<'p>) -> Option<(&'p str, u8)> {
        let mut found: Option<(&'p str, u8)> = None;

        for (name, candidate) in &prepared.entries {
            let floor = match found {
                Some((_, s)) => s.saturating_add(1),
                None => self.score_cutoff,
            };
            if self.scorer.upper_bound(key, candidate) < floor {
                continue;
            }

            let score = self.scorer.score_prepared(key, candidate);
            if score >= floor {
                found = Some((*name, score));
                if score == 100 {
                    break;
                }
            }
        }

        found
    }
}

/// A reference pool with scorer keys computed up front.
#[derive(Debug)]
pub struct PreparedPool<'p> {
    pool: &'p ReferencePool,
    entries: Vec<(&'p str, String)>,
}

impl PreparedPool<'_> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

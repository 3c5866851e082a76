use std::collections::HashMap;

use serde::Serialize;

use crate::config::MatchPolicy;
use crate::summary::ResolveSummary;
use crate::variations::VariationSet;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single instructor row from the ratings dataset.
#[derive(Debug, Clone, Default)]
pub struct RawNameRecord {
    pub record_id: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub raw_fields: HashMap<String, String>,
}

impl RawNameRecord {
    pub fn new(record_id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }
}

/// Pre-loaded source records plus the reference dataset's free-text
/// instructor fields.
pub struct ResolveInput {
    pub records: Vec<RawNameRecord>,
    pub reference_fields: Vec<Option<String>>,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Best reference name found for one identity.
///
/// `("", 0)` is the "no match" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub matched: String,
    pub score: u8,
}

impl MatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn exact(name: impl Into<String>) -> Self {
        Self { matched: name.into(), score: 100 }
    }

    pub fn is_match(&self) -> bool {
        !self.matched.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// A variation was present verbatim in the reference pool.
    Exact,
    /// Best candidate came from fuzzy scoring at or above the cutoff.
    Fuzzy,
    /// No candidate survived the cutoff, or the record had no name.
    None,
}

impl MatchKind {
    /// Classifies a result. Fuzzy hits can legitimately score 100 (token
    /// reorderings), so the matched string is checked against the variations.
    pub fn classify(result: &MatchResult, variations: &VariationSet) -> Self {
        if !result.is_match() {
            Self::None
        } else if result.score == 100 && variations.contains(&result.matched) {
            Self::Exact
        } else {
            Self::Fuzzy
        }
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Fuzzy => write!(f, "fuzzy"),
            Self::None => write!(f, "none"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRecord {
    pub record_id: String,
    pub first_name: String,
    pub last_name: String,
    pub cleaned_first_name: String,
    pub cleaned_last_name: String,
    /// Canonical full name; empty when either name part is missing.
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_canonical: Option<String>,
    pub variations: Vec<String>,
    #[serde(rename = "match")]
    pub best: MatchResult,
    pub kind: MatchKind,
    #[serde(skip)]
    pub raw_fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveResult {
    pub meta: ResolveMeta,
    pub summary: ResolveSummary,
    pub records: Vec<ResolvedRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub reference_pool_size: usize,
    pub policy: MatchPolicy,
    pub score_cutoff: u8,
    pub early_exit_score: u8,
}

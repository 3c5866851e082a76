use serde::Serialize;

use crate::model::{MatchKind, ResolvedRecord};

/// Scores at or above this count as high confidence.
pub const HIGH_CONFIDENCE: u8 = 90;
/// Scores at or above this (and below [`HIGH_CONFIDENCE`]) count as medium.
pub const MEDIUM_CONFIDENCE: u8 = 80;

/// Per-run match statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveSummary {
    pub total: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub unmatched: usize,
    /// Records without both a first and a last name.
    pub no_name: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
}

impl ResolveSummary {
    pub fn matched(&self) -> usize {
        self.exact + self.fuzzy
    }
}

pub fn compute_summary(records: &[ResolvedRecord]) -> ResolveSummary {
    let mut summary = ResolveSummary {
        total: records.len(),
        ..ResolveSummary::default()
    };

    for record in records {
        match record.kind {
            MatchKind::Exact => summary.exact += 1,
            MatchKind::Fuzzy => summary.fuzzy += 1,
            MatchKind::None => summary.unmatched += 1,
        }
        if record.full_name.is_empty() {
            summary.no_name += 1;
        }

        let score = record.best.score;
        if score >= HIGH_CONFIDENCE {
            summary.high_confidence += 1;
        } else if score >= MEDIUM_CONFIDENCE {
            summary.medium_confidence += 1;
        } else {
            summary.low_confidence += 1;
        }
    }

    summary
}

use rayon::prelude::*;

use crate::config::ResolveConfig;
use crate::departments::DepartmentAliases;
use crate::error::ResolveError;
use crate::matcher::{IdentityMatcher, PreparedPool};
use crate::model::{MatchKind, RawNameRecord, ResolveInput, ResolveMeta, ResolveResult, ResolvedRecord};
use crate::normalize::normalize;
use crate::pool::ReferencePool;
use crate::scorer::{Scorer, TokenSortRatio};
use crate::summary::compute_summary;
use crate::variations::generate;

const PROGRESS_EVERY: usize = 1000;

/// Run resolution per config. Builds the reference pool once, resolves every
/// source record and returns results (input order) + summary.
pub fn run(config: &ResolveConfig, input: &ResolveInput) -> Result<ResolveResult, ResolveError> {
    let departments = config.department_aliases()?;

    let pool = ReferencePool::build_with_separator(
        input.reference_fields.iter().map(|f| f.as_deref()),
        &config.reference.separator,
    );
    log::info!(
        "found {} unique instructor names in {} reference rows",
        pool.len(),
        input.reference_fields.len()
    );

    let matcher = IdentityMatcher::from_config(TokenSortRatio, &config.matching);
    let resolver = Resolver::new(matcher, pool)
        .with_departments(departments)
        .parallel(config.matching.parallel);

    let records = resolver.resolve(&input.records);
    let summary = compute_summary(&records);
    log::info!(
        "resolved {} records: {} exact, {} fuzzy, {} unmatched",
        summary.total,
        summary.exact,
        summary.fuzzy,
        summary.unmatched
    );

    Ok(ResolveResult {
        meta: ResolveMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            reference_pool_size: resolver.pool().len(),
            policy: config.matching.policy,
            score_cutoff: config.matching.score_cutoff,
            early_exit_score: config.matching.early_exit_score,
        },
        summary,
        records,
    })
}

/// Canonical full name from already-cleaned parts. Both parts are required;
/// a record missing either has no derivable name.
pub fn canonical_full_name(first: &str, last: &str) -> String {
    if first.is_empty() || last.is_empty() {
        return String::new();
    }
    normalize(&format!("{first} {last}"))
}

/// Resolves source records against a frozen reference pool.
pub struct Resolver<S = TokenSortRatio> {
    matcher: IdentityMatcher<S>,
    pool: ReferencePool,
    departments: DepartmentAliases,
    parallel: bool,
}

impl<S: Scorer> Resolver<S> {
    pub fn new(matcher: IdentityMatcher<S>, pool: ReferencePool) -> Self {
        Self {
            matcher,
            pool,
            departments: DepartmentAliases::default(),
            parallel: false,
        }
    }

    pub fn with_departments(mut self, departments: DepartmentAliases) -> Self {
        self.departments = departments;
        self
    }

    /// Resolve records on the rayon pool. Output order is unchanged.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn pool(&self) -> &ReferencePool {
        &self.pool
    }

    /// One result per record, in input order. Records without a derivable
    /// name still produce a `("", 0)` result.
    pub fn resolve(&self, records: &[RawNameRecord]) -> Vec<ResolvedRecord> {
        let prepared = self.matcher.prepare(&self.pool);

        if self.parallel {
            log::debug!("resolving {} records in parallel", records.len());
            return records
                .par_iter()
                .map(|record| self.resolve_prepared(record, &prepared))
                .collect();
        }

        let total = records.len();
        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                if i > 0 && i % PROGRESS_EVERY == 0 {
                    log::debug!("matched {i}/{total} records");
                }
                self.resolve_prepared(record, &prepared)
            })
            .collect()
    }

    pub fn resolve_record(&self, record: &RawNameRecord) -> ResolvedRecord {
        self.resolve_prepared(record, &self.matcher.prepare(&self.pool))
    }

    fn resolve_prepared(&self, record: &RawNameRecord, prepared: &PreparedPool<'_>) -> ResolvedRecord {
        let cleaned_first_name = normalize(&record.first_name);
        let cleaned_last_name = normalize(&record.last_name);
        let full_name = canonical_full_name(&cleaned_first_name, &cleaned_last_name);

        let variations = generate(&full_name);
        let best = self.matcher.match_prepared(&variations, prepared);
        let kind = MatchKind::classify(&best, &variations);
        log::trace!("{} {:?} -> {:?} ({})", record.record_id, full_name, best.matched, best.score);

        let department_canonical = record
            .department
            .as_deref()
            .and_then(|d| self.departments.canonicalize(d))
            .map(str::to_string);

        ResolvedRecord {
            record_id: record.record_id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            cleaned_first_name,
            cleaned_last_name,
            full_name,
            department: record.department.clone(),
            department_canonical,
            variations: variations.into_iter().collect(),
            best,
            kind,
            raw_fields: record.raw_fields.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::MatchResult;

    fn resolver(pool: &[&str]) -> Resolver {
        Resolver::new(IdentityMatcher::new(), pool.iter().copied().collect())
    }

    #[test]
    fn nickname_record_matches_exactly() {
        let r = resolver(&["Debra Smith", "John Doe"]);
        let out = r.resolve_record(&RawNameRecord::new("1", "Debra (Deb)", "Smith"));
        assert_eq!(out.full_name, "Debra Smith");
        assert!(out.variations.contains(&"Debra Smith".to_string()));
        assert!(out.variations.contains(&"Smith, Debra".to_string()));
        assert_eq!(out.best, MatchResult::exact("Debra Smith"));
        assert_eq!(out.kind, MatchKind::Exact);
    }

    #[test]
    fn title_and_suffix_punctuation() {
        let r = resolver(&[]);
        let out = r.resolve_record(&RawNameRecord::new("2", "Dr. John", "O'Brien Jr."));
        assert_eq!(out.cleaned_first_name, "John");
        assert_eq!(out.cleaned_last_name, "O'Brien Jr");
        assert_eq!(out.full_name, "John O'Brien Jr");
        assert_eq!(out.best, MatchResult::none());
        assert_eq!(out.kind, MatchKind::None);
    }

    #[test]
    fn empty_names_yield_sentinel() {
        let r = resolver(&["Ann Lee"]);
        let out = r.resolve_record(&RawNameRecord::new("3", "", ""));
        assert_eq!(out.full_name, "");
        assert!(out.variations.is_empty());
        assert_eq!(out.best, MatchResult::none());
    }

    #[test]
    fn one_missing_part_has_no_name() {
        assert_eq!(canonical_full_name("Ann", ""), "");
        assert_eq!(canonical_full_name("", "Lee"), "");
        assert_eq!(canonical_full_name("Ann", "Lee"), "Ann Lee");
    }

    #[test]
    fn fuzzy_match_is_classified() {
        let r = resolver(&["Jonathan Smith"]);
        let out = r.resolve_record(&RawNameRecord::new("4", "Jonathon", "Smith"));
        assert_eq!(out.best.matched, "Jonathan Smith");
        assert!(out.best.score >= 80 && out.best.score < 100);
        assert_eq!(out.kind, MatchKind::Fuzzy);
    }

    #[test]
    fn departments_are_canonicalized() {
        let table = BTreeMap::from([("Computer Science".to_string(), vec!["COMP SCI".to_string()])]);
        let r = resolver(&[]).with_departments(DepartmentAliases::from_table(&table).unwrap());
        let mut record = RawNameRecord::new("5", "Ann", "Lee");
        record.department = Some("Comp Sci".into());
        let out = r.resolve_record(&record);
        assert_eq!(out.department_canonical.as_deref(), Some("Computer Science"));

        record.department = Some("Underwater Basketry".into());
        assert_eq!(r.resolve_record(&record).department_canonical, None);
    }

    #[test]
    fn resolve_keeps_input_order_and_count() {
        let records = vec![
            RawNameRecord::new("a", "Ann", "Lee"),
            RawNameRecord::new("b", "", ""),
            RawNameRecord::new("c", "Bob", "Stone"),
        ];
        let out = resolver(&["Bob Stone", "Ann Lee"]).resolve(&records);
        let ids: Vec<&str> = out.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let pool = ["Ann Lee", "Anne Leigh", "Bob Stone", "Robert Stone", "Carla Diaz"];
        let records: Vec<RawNameRecord> = (0..200)
            .map(|i| {
                let (f, l) = match i % 5 {
                    0 => ("Ann", "Lee"),
                    1 => ("Anne", "Lee"),
                    2 => ("Rob", "Stone"),
                    3 => ("Karla", "Dias"),
                    _ => ("", "Nobody"),
                };
                RawNameRecord::new(i.to_string(), f, l)
            })
            .collect();

        let seq = resolver(&pool).resolve(&records);
        let par = resolver(&pool).parallel(true).resolve(&records);
        assert_eq!(seq.len(), par.len());
        for (s, p) in seq.iter().zip(&par) {
            assert_eq!(s.record_id, p.record_id);
            assert_eq!(s.best, p.best);
        }
    }
}

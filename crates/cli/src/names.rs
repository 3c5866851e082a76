//! `profmatch normalize` / `profmatch match`: ad-hoc name inspection.

use std::path::PathBuf;

use serde::Serialize;

use profmatch_resolve::config::{MatchPolicy, ReferenceConfig};
use profmatch_resolve::load::load_reference_fields;
use profmatch_resolve::pool::DEFAULT_SEPARATOR;
use profmatch_resolve::{generate, normalize, IdentityMatcher, MatchKind, MatchResult, ReferencePool};

use profmatch_cli::util;

use crate::exit_codes::EXIT_RESOLVE_RUNTIME;
use crate::CliError;

#[derive(Serialize)]
struct NormalizedName {
    input: String,
    canonical: String,
    variations: Vec<String>,
}

pub fn cmd_normalize(names: Vec<String>, json: bool) -> Result<(), CliError> {
    let rows: Vec<NormalizedName> = names
        .into_iter()
        .map(|input| {
            let canonical = normalize(&input);
            let variations = generate(&canonical).into_iter().collect();
            NormalizedName { input, canonical, variations }
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&rows)
            .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    for row in &rows {
        println!("{:?} -> {:?}", row.input, row.canonical);
        for v in &row.variations {
            println!("  {v}");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct MatchReport {
    input: String,
    canonical: String,
    pool_size: usize,
    #[serde(rename = "match")]
    best: MatchResult,
    kind: MatchKind,
}

pub struct MatchArgs {
    pub name: String,
    pub pool: PathBuf,
    pub column: String,
    pub separator: Option<String>,
    pub cutoff: Option<u8>,
    pub exhaustive: bool,
    pub json: bool,
}

pub fn cmd_match(args: MatchArgs) -> Result<(), CliError> {
    let data = util::read_file_as_utf8(&args.pool)
        .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", args.pool.display())))?;

    let reference = ReferenceConfig {
        file: args.pool.display().to_string(),
        column: args.column,
        separator: args.separator.unwrap_or_else(|| DEFAULT_SEPARATOR.into()),
    };
    if reference.separator.is_empty() {
        return Err(CliError::usage("--separator must not be empty"));
    }
    let fields = load_reference_fields(&data, &reference).map_err(|e| CliError {
        code: EXIT_RESOLVE_RUNTIME,
        message: e.to_string(),
        hint: Some("pick the instructors column with --column".into()),
    })?;
    let pool = ReferencePool::build_with_separator(fields.iter().map(|f| f.as_deref()), &reference.separator);

    let mut matcher = IdentityMatcher::new();
    if let Some(cutoff) = args.cutoff {
        if cutoff > 100 {
            return Err(CliError::usage(format!("--cutoff must be at most 100, got {cutoff}")));
        }
        // Keep the early-exit threshold at or above the cutoff
        matcher = matcher.score_cutoff(cutoff).early_exit_score(cutoff.max(95));
    }
    if args.exhaustive {
        matcher = matcher.policy(MatchPolicy::Exhaustive);
    }

    let canonical = normalize(&args.name);
    let variations = generate(&canonical);
    let best = matcher.match_variations(&variations, &pool);
    let kind = MatchKind::classify(&best, &variations);

    let report = MatchReport {
        input: args.name,
        canonical,
        pool_size: pool.len(),
        best,
        kind,
    };

    if args.json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    if report.best.is_match() {
        println!("{} ({}, {})", report.best.matched, report.best.score, report.kind);
    } else {
        println!("no match for {:?} among {} names", report.canonical, report.pool_size);
    }
    Ok(())
}

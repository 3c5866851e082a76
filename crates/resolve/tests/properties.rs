// Property tests for normalization, variation generation and matching.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use profmatch_resolve::{generate, normalize, IdentityMatcher, ReferencePool};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Name-ish strings: letters, titles, parens, punctuation, odd whitespace.
fn arb_raw_name() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        4 => "[A-Za-z']{1,8}",
        1 => Just("Dr.".to_string()),
        1 => Just("prof".to_string()),
        1 => Just("Mrs".to_string()),
        1 => "\\([A-Za-z ]{0,6}\\)",
        1 => "[(),. ]{1,3}",
        1 => "[ \t\n]{1,3}",
    ];
    prop::collection::vec(piece, 0..6).prop_map(|parts| parts.join(" "))
}

fn arb_canonical() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Z][a-z]{1,7}", 1..5).prop_map(|parts| parts.join(" "))
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn normalize_is_idempotent(raw in arb_raw_name()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_never_emits_control_chars(raw in arb_raw_name()) {
        let out = normalize(&raw);
        prop_assert!(!out.chars().any(|c| c.is_control()));
        prop_assert_eq!(out.trim(), out.as_str());
        prop_assert!(!out.contains("  "));
    }

    #[test]
    fn variations_contain_canonical(name in arb_canonical()) {
        let v = generate(&name);
        prop_assert!(v.contains(&name));
        prop_assert_eq!(v, generate(&name));
    }

    #[test]
    fn exact_membership_scores_100(name in arb_canonical(), others in prop::collection::vec(arb_canonical(), 0..8)) {
        let pool: ReferencePool = others.iter().cloned().chain(std::iter::once(name.clone())).collect();
        let result = IdentityMatcher::new().match_variations(&generate(&name), &pool);
        prop_assert_eq!(result.score, 100);
        prop_assert!(generate(&name).contains(&result.matched));
    }

    #[test]
    fn matches_never_fall_below_cutoff(name in arb_canonical(), pool_names in prop::collection::vec(arb_canonical(), 0..8)) {
        let pool: ReferencePool = pool_names.into_iter().collect();
        let result = IdentityMatcher::new().match_variations(&generate(&name), &pool);
        if result.is_match() {
            prop_assert!(result.score >= 80);
        } else {
            prop_assert_eq!(result.score, 0);
        }
    }
}

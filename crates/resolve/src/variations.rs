//! Alternate renderings of a canonical name.

use std::collections::BTreeSet;

/// Unique alternate renderings of one identity.
///
/// Ordered so that iteration (and therefore early-exit matching) is
/// reproducible across runs.
pub type VariationSet = BTreeSet<String>;

/// Generate the variation set for an already-canonical name.
///
/// - `"Ann Lee"` → `{"Ann Lee", "Lee, Ann"}`
/// - `"Ann Marie Lee"` → adds `"Ann Marie Lee"` and `"Ann M. Lee"`
///
/// Empty input yields an empty set.
pub fn generate(canonical: &str) -> VariationSet {
    let mut variations = VariationSet::new();
    if canonical.is_empty() {
        return variations;
    }
    variations.insert(canonical.to_string());

    let parts: Vec<&str> = canonical.split_whitespace().collect();
    if parts.len() < 2 {
        return variations;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    variations.insert(format!("{first} {last}"));
    variations.insert(format!("{last}, {first}"));

    if parts.len() > 2 {
        let middles = &parts[1..parts.len() - 1];
        variations.insert(format!("{first} {} {last}", middles.join(" ")));

        let initials: Vec<String> = middles
            .iter()
            .filter_map(|m| m.chars().next())
            .map(|c| format!("{c}."))
            .collect();
        variations.insert(format!("{first} {} {last}", initials.join(" ")));
    }

    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> VariationSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_name_has_no_variations() {
        assert!(generate("").is_empty());
    }

    #[test]
    fn single_token_is_only_itself() {
        assert_eq!(generate("Cher"), set(&["Cher"]));
    }

    #[test]
    fn two_tokens() {
        assert_eq!(generate("Debra Smith"), set(&["Debra Smith", "Smith, Debra"]));
    }

    #[test]
    fn middle_names_and_initials() {
        assert_eq!(
            generate("John Ronald Reuel Tolkien"),
            set(&[
                "John Ronald Reuel Tolkien",
                "John Tolkien",
                "Tolkien, John",
                "John R. R. Tolkien",
            ])
        );
    }

    #[test]
    fn suffix_is_treated_as_last_token() {
        let v = generate("John O'Brien Jr");
        assert!(v.contains("John Jr"));
        assert!(v.contains("Jr, John"));
        assert!(v.contains("John O. Jr"));
    }

    #[test]
    fn always_contains_canonical_and_is_deterministic() {
        for name in ["A", "A B", "A B C", "Mary Ann de la Cruz"] {
            let v = generate(name);
            assert!(v.contains(name));
            assert_eq!(v, generate(name));
        }
    }
}

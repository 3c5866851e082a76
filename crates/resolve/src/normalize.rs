//! Name normalization.
//!
//! Turns a raw name string into its canonical form:
//!
//! 1. control characters become spaces, whitespace runs collapse, ends trim
//! 2. parenthetical segments (`"Debra (Deb) Smith"`) are removed
//! 3. leading titles (`Dr`, `Professor`, `Prof`, `Mr`, `Ms`, `Mrs`, optional
//!    period, followed by whitespace) are stripped, repeatedly
//! 4. trailing periods and commas are stripped
//! 5. whitespace is collapsed again
//!
//! The result is idempotent: `normalize(&normalize(x)) == normalize(x)`.
//! Internal punctuation (`O'Brien`, `Smith-Jones`) is preserved.

use std::sync::OnceLock;

use regex::Regex;

fn parenthetical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^)]+\)\s*").expect("parenthetical pattern"))
}

fn title_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:dr\.?|professor|prof\.?|mr\.?|ms\.?|mrs\.?)\s+").expect("title pattern")
    })
}

/// Normalize a raw name. Empty input yields an empty string; never fails.
pub fn normalize(raw: &str) -> String {
    let name = collapse_whitespace(raw);
    if name.is_empty() {
        return name;
    }

    let name = parenthetical().replace_all(&name, " ");
    let name = collapse_whitespace(&name);
    let name = strip_titles(&name);
    let name = name.trim_end_matches(|c: char| c == '.' || c == ',' || c.is_whitespace());

    collapse_whitespace(name)
}

/// Single-space separated, trimmed. Control characters count as whitespace
/// so canonical names never carry raw newlines or tabs into exports.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for token in s
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|t| !t.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

// "Dr. Prof. Ann" would otherwise need two passes to settle.
fn strip_titles(name: &str) -> &str {
    let mut rest = name;
    while let Some(m) = title_prefix().find(rest) {
        rest = &rest[m.end()..];
    }
    rest
}

//! Department alias lookup.
//!
//! Institutions spell departments many ways (`"COMP SCI"`, `"CS"`,
//! `"Computer Sciences"`). The table is injected from configuration; the
//! engine carries no built-in aliases.

use std::collections::{BTreeMap, HashMap};

use crate::error::ResolveError;
use crate::normalize::collapse_whitespace;

#[derive(Debug, Clone, Default)]
pub struct DepartmentAliases {
    // folded alias or canonical name → canonical name
    lookup: HashMap<String, String>,
}

impl DepartmentAliases {
    /// Build from `canonical → aliases`. Every canonical name is also an
    /// alias of itself. Matching is case- and whitespace-insensitive.
    pub fn from_table(table: &BTreeMap<String, Vec<String>>) -> Result<Self, ResolveError> {
        let mut aliases = Self::default();
        for (canonical, names) in table {
            aliases.insert(canonical, canonical)?;
            for alias in names {
                aliases.insert(alias, canonical)?;
            }
        }
        Ok(aliases)
    }

    fn insert(&mut self, alias: &str, canonical: &str) -> Result<(), ResolveError> {
        let key = fold(alias);
        if key.is_empty() {
            return Ok(());
        }
        match self.lookup.get(&key) {
            Some(existing) if existing != canonical => Err(ResolveError::AliasConflict {
                alias: alias.to_string(),
                first: existing.clone(),
                second: canonical.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.lookup.insert(key, canonical.to_string());
                Ok(())
            }
        }
    }

    /// Canonical department for a raw value, if known.
    pub fn canonicalize(&self, department: &str) -> Option<&str> {
        self.lookup.get(&fold(department)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

fn fold(s: &str) -> String {
    collapse_whitespace(s).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn resolves_aliases_and_canonical_names() {
        let aliases = DepartmentAliases::from_table(&table(&[
            ("Computer Science", &["CS", "COMP SCI", "Computer Sciences"]),
            ("Mathematics", &["Math", "MATH", "Statistics", "STAT"]),
        ]))
        .unwrap();

        assert_eq!(aliases.canonicalize("comp  sci"), Some("Computer Science"));
        assert_eq!(aliases.canonicalize("Computer Science"), Some("Computer Science"));
        assert_eq!(aliases.canonicalize(" stat "), Some("Mathematics"));
        assert_eq!(aliases.canonicalize("Zoology"), None);
    }

    #[test]
    fn empty_table_knows_nothing() {
        let aliases = DepartmentAliases::default();
        assert!(aliases.is_empty());
        assert_eq!(aliases.canonicalize("CS"), None);
    }

    #[test]
    fn conflicting_alias_is_rejected() {
        let err = DepartmentAliases::from_table(&table(&[
            ("Mathematics", &["STAT"]),
            ("Statistics", &["Stat"]),
        ]))
        .unwrap_err();
        match err {
            ResolveError::AliasConflict { first, second, .. } => {
                assert_eq!(first, "Mathematics");
                assert_eq!(second, "Statistics");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_aliases_are_ignored() {
        let aliases = DepartmentAliases::from_table(&table(&[("Music", &["", "  "])])).unwrap();
        assert_eq!(aliases.len(), 1);
    }
}

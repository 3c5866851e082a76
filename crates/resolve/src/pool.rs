use std::collections::BTreeSet;

use crate::normalize::normalize;

/// Default separator between names in a free-text instructors field.
pub const DEFAULT_SEPARATOR: &str = ",";

/// Unique canonical names extracted from the reference dataset.
///
/// Built once per run and read-only while matching. Backed by a `BTreeSet`
/// so enumeration order (and fuzzy tie-breaking) is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencePool {
    names: BTreeSet<String>,
}

impl ReferencePool {
    /// Build from free-text instructor fields split on `,`.
    pub fn build<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        Self::build_with_separator(fields, DEFAULT_SEPARATOR)
    }

    /// Build from free-text fields split on `separator`. Missing fields are
    /// skipped; pieces that normalize to nothing are dropped.
    pub fn build_with_separator<'a, I>(fields: I, separator: &str) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut pool = Self::default();
        for field in fields.into_iter().flatten() {
            pool.extend_from_field(field, separator);
        }
        log::debug!("reference pool: {} unique names", pool.len());
        pool
    }

    fn extend_from_field(&mut self, field: &str, separator: &str) {
        for piece in field.split(separator) {
            let name = normalize(piece);
            if !name.is_empty() {
                self.names.insert(name);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ReferencePool {
    /// Collects names as given, without normalization.
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).filter(|n: &String| !n.is_empty()).collect(),
        }
    }
}

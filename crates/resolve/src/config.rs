use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::departments::DepartmentAliases;
use crate::error::ResolveError;
use crate::pool::DEFAULT_SEPARATOR;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveConfig {
    pub name: String,
    pub source: SourceConfig,
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Canonical department name → known aliases.
    #[serde(default)]
    pub departments: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// The ratings dataset: one row per instructor, split first/last names.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    pub columns: SourceColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceColumns {
    pub record_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub department: Option<String>,
}

/// The course catalog: one free-text instructors field per row.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceConfig {
    pub file: String,
    pub column: String,
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.into()
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Fuzzy candidates scoring below this are discarded.
    #[serde(default = "default_score_cutoff")]
    pub score_cutoff: u8,
    /// Under `first_to_threshold`, stop scanning variations once the best
    /// score reaches this value.
    #[serde(default = "default_early_exit_score")]
    pub early_exit_score: u8,
    #[serde(default)]
    pub policy: MatchPolicy,
    /// Resolve records on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            score_cutoff: default_score_cutoff(),
            early_exit_score: default_early_exit_score(),
            policy: MatchPolicy::default(),
            parallel: false,
        }
    }
}

fn default_score_cutoff() -> u8 {
    80
}

fn default_early_exit_score() -> u8 {
    95
}

/// How far the matcher scans a variation set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Stop at the first variation that pushes the best score to the
    /// early-exit threshold. Later variations that would tie or beat it
    /// below 100 are never seen.
    #[default]
    FirstToThreshold,
    /// Score every variation; only an exact hit stops early.
    Exhaustive,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstToThreshold => write!(f, "first_to_threshold"),
            Self::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub sql: Option<SqlOutputConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqlOutputConfig {
    pub file: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Extra passthrough columns copied from the source CSV.
    #[serde(default)]
    pub columns: Vec<SqlColumn>,
}

fn default_table() -> String {
    "instructors".into()
}

fn default_batch_size() -> usize {
    500
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqlColumn {
    /// Source CSV header.
    pub source: String,
    /// Column name in the generated table.
    pub name: String,
    #[serde(default)]
    pub kind: SqlColumnKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlColumnKind {
    #[default]
    Text,
    Int,
    Float,
}

/// Columns every SQL dump carries, in order.
pub const SQL_BASE_COLUMNS: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "full_name",
    "department",
    "best_match",
    "match_score",
];

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ResolveConfig {
    pub fn from_toml(input: &str) -> Result<Self, ResolveError> {
        let config: ResolveConfig =
            toml::from_str(input).map_err(|e| ResolveError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ResolveError> {
        let m = &self.matching;
        if m.early_exit_score > 100 {
            return Err(ResolveError::ConfigValidation(format!(
                "early_exit_score must be at most 100, got {}",
                m.early_exit_score
            )));
        }
        if m.score_cutoff > m.early_exit_score {
            return Err(ResolveError::ConfigValidation(format!(
                "score_cutoff ({}) must not exceed early_exit_score ({})",
                m.score_cutoff, m.early_exit_score
            )));
        }

        if self.reference.separator.is_empty() {
            return Err(ResolveError::ConfigValidation(
                "reference.separator must not be empty".into(),
            ));
        }

        if let Some(ref sql) = self.output.sql {
            sql.validate()?;
        }

        self.department_aliases()?;
        Ok(())
    }

    /// Build the alias lookup from the `[departments]` table.
    pub fn department_aliases(&self) -> Result<DepartmentAliases, ResolveError> {
        DepartmentAliases::from_table(&self.departments)
    }
}

impl SqlOutputConfig {
    fn validate(&self) -> Result<(), ResolveError> {
        if self.batch_size == 0 {
            return Err(ResolveError::ConfigValidation("output.sql.batch_size must be > 0".into()));
        }
        if !is_sql_identifier(&self.table) {
            return Err(ResolveError::ConfigValidation(format!(
                "output.sql.table '{}' is not a valid identifier",
                self.table
            )));
        }

        let mut seen: HashSet<&str> = SQL_BASE_COLUMNS.into_iter().collect();
        for col in &self.columns {
            if !is_sql_identifier(&col.name) {
                return Err(ResolveError::ConfigValidation(format!(
                    "output.sql column '{}' is not a valid identifier",
                    col.name
                )));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(ResolveError::ConfigValidation(format!(
                    "output.sql column '{}' is defined twice",
                    col.name
                )));
            }
        }
        Ok(())
    }
}

fn is_sql_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name = "RMP to catalog"

[source]
file = "teachers.csv"

[source.columns]
record_id  = "ID"
first_name = "FirstName"
last_name  = "LastName"

[reference]
file = "sections.csv"
column = "instructors"
"#;

    #[test]
    fn parse_minimal_uses_defaults() {
        let config = ResolveConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.name, "RMP to catalog");
        assert_eq!(config.matching.score_cutoff, 80);
        assert_eq!(config.matching.early_exit_score, 95);
        assert_eq!(config.matching.policy, MatchPolicy::FirstToThreshold);
        assert!(!config.matching.parallel);
        assert_eq!(config.reference.separator, ",");
        assert!(config.source.columns.department.is_none());
        assert!(config.departments.is_empty());
        assert!(config.output.sql.is_none());
    }

    #[test]
    fn parse_full() {
        let input = format!(
            r#"{MINIMAL}
[matching]
score_cutoff = 85
early_exit_score = 98
policy = "exhaustive"
parallel = true

[departments]
"Computer Science" = ["CS", "COMP SCI"]
Mathematics = ["Math"]

[output]
csv = "out.csv"

[output.sql]
file = "dump.sql"
table = "rmp_cleaned"
batch_size = 100

[[output.sql.columns]]
source = "AvgRating"
name = "avg_rating"
kind = "float"

[[output.sql.columns]]
source = "LegacyID"
name = "legacy_id"
"#
        );
        let config = ResolveConfig::from_toml(&input).unwrap();
        assert_eq!(config.matching.score_cutoff, 85);
        assert_eq!(config.matching.policy, MatchPolicy::Exhaustive);
        assert!(config.matching.parallel);
        assert_eq!(config.departments["Computer Science"], vec!["CS", "COMP SCI"]);
        assert_eq!(config.output.csv.as_deref(), Some("out.csv"));

        let sql = config.output.sql.unwrap();
        assert_eq!(sql.table, "rmp_cleaned");
        assert_eq!(sql.batch_size, 100);
        assert_eq!(sql.columns[0].kind, SqlColumnKind::Float);
        assert_eq!(sql.columns[1].kind, SqlColumnKind::Text);
    }

    #[test]
    fn reject_cutoff_above_early_exit() {
        let input = format!("{MINIMAL}\n[matching]\nscore_cutoff = 96\n");
        let err = ResolveConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("score_cutoff (96)"));
    }

    #[test]
    fn reject_early_exit_above_100() {
        let input = format!("{MINIMAL}\n[matching]\nearly_exit_score = 101\n");
        let err = ResolveConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("at most 100"));
    }

    #[test]
    fn reject_unknown_policy() {
        let input = format!("{MINIMAL}\n[matching]\npolicy = \"greedy\"\n");
        assert!(matches!(
            ResolveConfig::from_toml(&input),
            Err(ResolveError::ConfigParse(_))
        ));
    }

    #[test]
    fn reject_empty_separator() {
        let input = MINIMAL.replace("column = \"instructors\"", "column = \"instructors\"\nseparator = \"\"");
        let err = ResolveConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("separator"));
    }

    #[test]
    fn reject_bad_sql_identifiers() {
        let input = format!("{MINIMAL}\n[output.sql]\nfile = \"d.sql\"\ntable = \"drop table;\"\n");
        let err = ResolveConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("not a valid identifier"));

        let input = format!(
            "{MINIMAL}\n[output.sql]\nfile = \"d.sql\"\n[[output.sql.columns]]\nsource = \"X\"\nname = \"full_name\"\n"
        );
        let err = ResolveConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn reject_zero_batch_size() {
        let input = format!("{MINIMAL}\n[output.sql]\nfile = \"d.sql\"\nbatch_size = 0\n");
        let err = ResolveConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn reject_alias_conflict() {
        let input = format!("{MINIMAL}\n[departments]\nMathematics = [\"STAT\"]\nStatistics = [\"stat\"]\n");
        assert!(matches!(
            ResolveConfig::from_toml(&input),
            Err(ResolveError::AliasConflict { .. })
        ));
    }

    #[test]
    fn identifiers() {
        assert!(is_sql_identifier("avg_rating"));
        assert!(is_sql_identifier("_x1"));
        assert!(!is_sql_identifier("1x"));
        assert!(!is_sql_identifier(""));
        assert!(!is_sql_identifier("a-b"));
    }
}

use thiserror::Error;

/// Errors raised at the edges of the engine (config and CSV input).
///
/// Matching itself never fails: an unmatched record is the `("", 0)`
/// sentinel, not an error.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (bad threshold, bad identifier, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// The same alias is claimed by two canonical departments.
    #[error("department alias '{alias}' maps to both '{first}' and '{second}'")]
    AliasConflict {
        alias: String,
        first: String,
        second: String,
    },
    /// Missing required column in input data.
    #[error("{dataset}: missing column '{column}'")]
    MissingColumn { dataset: String, column: String },
    /// Malformed CSV record.
    #[error("{dataset}: {message}")]
    Csv { dataset: String, message: String },
}

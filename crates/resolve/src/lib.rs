//! `profmatch-resolve`: instructor name-identity resolution engine.
//!
//! Pure engine crate: receives pre-loaded records, returns one resolved
//! identity per record. No CLI or filesystem dependencies.

pub mod config;
pub mod departments;
pub mod error;
pub mod load;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod pool;
pub mod scorer;
pub mod summary;
pub mod variations;

pub use config::ResolveConfig;
pub use departments::DepartmentAliases;
pub use error::ResolveError;
pub use matcher::IdentityMatcher;
pub use model::{MatchKind, MatchResult, RawNameRecord, ResolveInput, ResolveResult, ResolvedRecord};
pub use normalize::normalize;
pub use pipeline::{run, Resolver};
pub use pool::ReferencePool;
pub use scorer::{Scorer, TokenSortRatio};
pub use variations::{generate, VariationSet};

//! Library half of the `profmatch` binary: file decoding and the export
//! writers, kept out of `main.rs` so integration tests can reach them.

pub mod export;
pub mod util;

//! CLI Exit Code Registry
//!
//! Single source of truth for `profmatch` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 2    | Usage error (bad arguments, out-of-range flags)  |
//! | 60   | Invalid resolve config                           |
//! | 61   | Runtime error (unreadable input, CSV, write)     |
//! | 62   | Unmatched records present (`run --strict` only)  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments or flag values out of range.
pub const EXIT_USAGE: u8 = 2;

/// Config failed to parse or validate.
pub const EXIT_RESOLVE_INVALID_CONFIG: u8 = 60;

/// Resolution could not complete: unreadable data, missing columns,
/// unwritable output.
pub const EXIT_RESOLVE_RUNTIME: u8 = 61;

/// `--strict` was given and at least one record has no match.
pub const EXIT_RESOLVE_UNMATCHED: u8 = 62;

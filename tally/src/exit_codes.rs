//! Stable exit codes for the tally binary.

/// Session ended through "Save and Exit" (even if the save itself failed).
pub const OK: i32 = 0;
/// Startup failed, e.g. an invalid `tally.toml`.
pub const INVALID: i32 = 1;
/// Input closed before "Save and Exit"; in-memory changes were discarded.
pub const ABANDONED: i32 = 2;

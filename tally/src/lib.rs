//! Interactive election tally kept in a flat file.
//!
//! A session loads the candidate registry from disk, runs a numbered menu for
//! adding candidates and casting votes, and writes the registry back on
//! "Save and Exit". The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (registry rules, record codecs).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config and data files).
//!
//! [`menu`] ties the two together behind any `BufRead`/`Write` console.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod menu;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

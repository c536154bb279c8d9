//! I/O helpers for the tally binary.

pub mod config;
pub mod store;

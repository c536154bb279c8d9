//! Deterministic, pure logic for the voting registry.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod candidate;
pub mod record;
pub mod registry;

//! Test-only helpers for building candidates and registries.

use crate::core::candidate::Candidate;
use crate::core::registry::{DEFAULT_CAPACITY, Registry};

/// Create a candidate with an explicit vote count.
pub fn candidate(id: i64, name: &str, votes: u64) -> Candidate {
    Candidate {
        id,
        name: name.to_string(),
        votes,
    }
}

/// Registry with the default capacity holding `candidates` in order.
pub fn registry_with(candidates: Vec<Candidate>) -> Registry {
    let (registry, dropped) = Registry::from_records(candidates, DEFAULT_CAPACITY);
    assert_eq!(dropped, 0, "test registry exceeds default capacity");
    registry
}

/// Join menu answers into newline-terminated console input.
pub fn script(lines: &[&str]) -> String {
    let mut input = String::new();
    for line in lines {
        input.push_str(line);
        input.push('\n');
    }
    input
}

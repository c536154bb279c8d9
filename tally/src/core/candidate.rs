//! Candidate type and name normalization.

use serde::{Deserialize, Serialize};

/// Longest candidate name kept, in characters. Longer input is truncated.
pub const MAX_NAME_CHARS: usize = 49;

/// A single election candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Caller-supplied identifier, unique within a registry built through `add`.
    pub id: i64,
    pub name: String,
    pub votes: u64,
}

impl Candidate {
    /// New candidate with a normalized name and zero votes.
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: normalize_name(name),
            votes: 0,
        }
    }
}

/// Strip one trailing line terminator and cap the name at [`MAX_NAME_CHARS`].
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(raw);
    trimmed.chars().take(MAX_NAME_CHARS).collect()
}

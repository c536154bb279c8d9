//! In-memory candidate registry.
//!
//! The registry keeps candidates in insertion order, which is also the order
//! used for display and for saving. Every mutation is a single step with no
//! intermediate state.

use thiserror::Error;
use tracing::{debug, warn};

use super::candidate::Candidate;

/// Default upper bound on the number of candidates.
pub const DEFAULT_CAPACITY: usize = 100;

/// Rejections raised by [`Registry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry is full ({capacity} candidates)")]
    Full { capacity: usize },
    #[error("candidate id {id} already exists")]
    DuplicateId { id: i64 },
}

/// Outcome of [`Registry::cast_vote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was counted for the named candidate.
    Counted { name: String, votes: u64 },
    /// No candidate has the requested id; nothing changed.
    UnknownCandidate,
    /// The candidate's counter is at `u64::MAX`; nothing changed.
    Saturated { name: String },
}

/// Ordered, capacity-bounded collection of candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    candidates: Vec<Candidate>,
    capacity: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Registry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            candidates: Vec::new(),
            capacity,
        }
    }

    /// Rebuild a registry from stored records, keeping file order.
    ///
    /// Ids are not checked for uniqueness. Records past `capacity` are
    /// dropped; the number dropped is returned alongside the registry.
    pub fn from_records(
        records: impl IntoIterator<Item = Candidate>,
        capacity: usize,
    ) -> (Self, usize) {
        let mut candidates = Vec::new();
        let mut dropped = 0;
        for record in records {
            if candidates.len() < capacity {
                candidates.push(record);
            } else {
                dropped += 1;
            }
        }
        (
            Self {
                candidates,
                capacity,
            },
            dropped,
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.candidates.len() >= self.capacity
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.candidates.iter().any(|candidate| candidate.id == id)
    }

    /// Append a new candidate with zero votes.
    ///
    /// Capacity is checked before uniqueness; a rejected add leaves the
    /// registry untouched.
    pub fn add(&mut self, id: i64, name: &str) -> Result<&Candidate, RegistryError> {
        if self.is_full() {
            return Err(RegistryError::Full {
                capacity: self.capacity,
            });
        }
        if self.contains_id(id) {
            return Err(RegistryError::DuplicateId { id });
        }
        let candidate = Candidate::new(id, name);
        debug!(id, name = %candidate.name, "candidate added");
        let index = self.candidates.len();
        self.candidates.push(candidate);
        Ok(&self.candidates[index])
    }

    /// All candidates in registry order, or `None` when there are none.
    pub fn list(&self) -> Option<&[Candidate]> {
        if self.candidates.is_empty() {
            return None;
        }
        Some(&self.candidates)
    }

    /// Count one vote for the first candidate whose id matches.
    ///
    /// `voter_id` is recorded in diagnostics only. Repeat votes from the same
    /// voter are counted.
    pub fn cast_vote(&mut self, voter_id: &str, candidate_id: i64) -> VoteOutcome {
        match self
            .candidates
            .iter_mut()
            .find(|candidate| candidate.id == candidate_id)
        {
            Some(candidate) => match candidate.votes.checked_add(1) {
                Some(votes) => {
                    candidate.votes = votes;
                    debug!(voter_id, candidate_id, votes, "vote counted");
                    VoteOutcome::Counted {
                        name: candidate.name.clone(),
                        votes,
                    }
                }
                None => {
                    warn!(voter_id, candidate_id, "vote counter saturated");
                    VoteOutcome::Saturated {
                        name: candidate.name.clone(),
                    }
                }
            },
            None => {
                debug!(voter_id, candidate_id, "vote for unknown candidate");
                VoteOutcome::UnknownCandidate
            }
        }
    }

    /// `(name, votes)` pairs in registry order, or `None` when empty.
    pub fn results(&self) -> Option<Vec<(&str, u64)>> {
        if self.candidates.is_empty() {
            return None;
        }
        Some(
            self.candidates
                .iter()
                .map(|candidate| (candidate.name.as_str(), candidate.votes))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{candidate, registry_with};

    #[test]
    fn add_appends_in_insertion_order() {
        let mut registry = Registry::default();
        registry.add(2, "Bob").expect("add bob");
        registry.add(1, "Alice").expect("add alice");

        let ids: Vec<i64> = registry.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn add_rejects_duplicate_id_without_mutation() {
        let mut registry = registry_with(vec![candidate(1, "Alice", 3)]);
        let before = registry.clone();

        let err = registry.add(1, "Impostor").unwrap_err();

        assert_eq!(err, RegistryError::DuplicateId { id: 1 });
        assert_eq!(registry, before);
    }

    #[test]
    fn add_rejects_past_capacity() {
        let mut registry = Registry::with_capacity(DEFAULT_CAPACITY);
        for id in 0..DEFAULT_CAPACITY as i64 {
            registry.add(id, "candidate").expect("add within capacity");
        }

        let err = registry.add(1_000, "overflow").unwrap_err();

        assert_eq!(
            err,
            RegistryError::Full {
                capacity: DEFAULT_CAPACITY
            }
        );
        assert_eq!(registry.len(), DEFAULT_CAPACITY);
        assert!(!registry.contains_id(1_000));
    }

    #[test]
    fn full_registry_reports_full_before_duplicate() {
        let mut registry = Registry::with_capacity(1);
        registry.add(1, "Alice").expect("add");
        let err = registry.add(1, "Alice").unwrap_err();
        assert_eq!(err, RegistryError::Full { capacity: 1 });
    }

    #[test]
    fn add_normalizes_name() {
        let mut registry = Registry::default();
        let added = registry.add(1, &format!("{}\n", "x".repeat(80))).expect("add");
        assert_eq!(added.name.len(), 49);
        assert_eq!(added.votes, 0);
    }

    #[test]
    fn cast_vote_increments_only_the_target() {
        let mut registry = registry_with(vec![
            candidate(1, "Alice", 0),
            candidate(2, "Bob", 4),
            candidate(3, "Carol", 1),
        ]);

        let outcome = registry.cast_vote("voter-9", 2);

        assert_eq!(
            outcome,
            VoteOutcome::Counted {
                name: "Bob".to_string(),
                votes: 5,
            }
        );
        let votes: Vec<u64> = registry.iter().map(|c| c.votes).collect();
        assert_eq!(votes, vec![0, 5, 1]);
    }

    #[test]
    fn cast_vote_for_unknown_id_changes_nothing() {
        let mut registry = registry_with(vec![candidate(1, "Alice", 2)]);
        let before = registry.clone();

        assert_eq!(registry.cast_vote("v", 99), VoteOutcome::UnknownCandidate);
        assert_eq!(registry, before);
    }

    #[test]
    fn saturated_counter_refuses_vote_without_wrapping() {
        let mut registry = registry_with(vec![candidate(1, "Alice", u64::MAX)]);
        let before = registry.clone();

        let outcome = registry.cast_vote("v", 1);

        assert_eq!(
            outcome,
            VoteOutcome::Saturated {
                name: "Alice".to_string()
            }
        );
        assert_eq!(registry, before);
    }

    #[test]
    fn same_voter_may_vote_repeatedly() {
        let mut registry = registry_with(vec![candidate(1, "Alice", 0)]);
        registry.cast_vote("same", 1);
        registry.cast_vote("same", 1);
        assert_eq!(registry.iter().next().map(|c| c.votes), Some(2));
    }

    #[test]
    fn cast_vote_hits_first_match_when_ids_repeat() {
        // Loaded files may carry duplicate ids.
        let mut registry = registry_with(vec![candidate(1, "First", 0), candidate(1, "Second", 0)]);
        registry.cast_vote("v", 1);
        let votes: Vec<u64> = registry.iter().map(|c| c.votes).collect();
        assert_eq!(votes, vec![1, 0]);
    }

    #[test]
    fn tally_example_produces_expected_results() {
        let mut registry = Registry::default();
        registry.add(1, "Alice").expect("add alice");
        registry.add(2, "Bob").expect("add bob");
        registry.cast_vote("a", 1);
        registry.cast_vote("b", 1);
        registry.cast_vote("c", 2);

        let results = registry.results().expect("results");
        assert_eq!(results, vec![("Alice", 2), ("Bob", 1)]);
    }

    #[test]
    fn empty_registry_signals_no_candidates_and_no_results() {
        let registry = Registry::default();
        assert!(registry.list().is_none());
        assert!(registry.results().is_none());
    }

    #[test]
    fn from_records_keeps_order_duplicates_and_bound() {
        let records = vec![
            candidate(5, "E", 1),
            candidate(5, "E again", 0),
            candidate(6, "F", 2),
        ];
        let (registry, dropped) = Registry::from_records(records, 2);

        let names: Vec<&str> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["E", "E again"]);
        assert_eq!(dropped, 1);
        assert!(registry.is_full());
    }
}

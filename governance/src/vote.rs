//! Consensus progress for a candidate awaiting admission.

use flightsurety_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct voters backing a candidate. Created on the first vote and
/// discarded once the candidate is registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub candidate: Address,
    voters: BTreeSet<Address>,
}

impl VoteRecord {
    pub fn new(candidate: Address) -> Self {
        Self {
            candidate,
            voters: BTreeSet::new(),
        }
    }

    /// Add a vote. Returns `false` if `voter` already voted.
    pub fn record(&mut self, voter: Address) -> bool {
        self.voters.insert(voter)
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.voters.contains(voter)
    }

    pub fn vote_count(&self) -> usize {
        self.voters.len()
    }
}

//! Core governance engine — registration workflow, consensus votes, funding.

use crate::error::GovernanceError;
use crate::vote::VoteRecord;
use flightsurety_registry::Registry;
use flightsurety_types::{Address, AirlineStatus, GovernanceParams, Wei};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which path a successful `register_airline` call took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The candidate is now a member of the registry.
    Registered,
    /// The vote was recorded; the candidate still needs more support.
    VoteRecorded { votes: usize, threshold: usize },
}

/// Business rules for admitting and activating airlines.
///
/// Holds only the pending vote records; all airline state lives in the
/// [`Registry`], which is passed into every operation. Each operation checks
/// everything it needs before its first mutation, so a failed call leaves
/// both the engine and the registry untouched.
pub struct GovernanceEngine {
    identity: Address,
    params: GovernanceParams,
    votes: HashMap<Address, VoteRecord>,
}

impl GovernanceEngine {
    /// `identity` is the caller address the registry must authorize.
    pub fn new(identity: Address, params: GovernanceParams) -> Self {
        Self {
            identity,
            params,
            votes: HashMap::new(),
        }
    }

    pub fn identity(&self) -> &Address {
        &self.identity
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// Register `candidate` directly, or vote for it once the quota is used up.
    ///
    /// `caller` must be an active airline. A candidate that is already a
    /// member is rejected, as is a second vote from the same caller.
    pub fn register_airline(
        &mut self,
        registry: &mut Registry,
        caller: &Address,
        candidate: Address,
    ) -> Result<RegistrationOutcome, GovernanceError> {
        Self::require_operational(registry)?;
        Self::require_active(registry, caller)?;
        if registry.is_airline(&candidate) {
            return Err(GovernanceError::AlreadyRegistered(candidate));
        }

        let registered = registry.airlines_length();
        if self.params.admits_directly(registered) {
            registry.register_airline(&self.identity, candidate)?;
            tracing::info!(airline = %candidate, by = %caller, "airline admitted directly");
            return Ok(RegistrationOutcome::Registered);
        }

        let record = self.votes.get(&candidate);
        if record.is_some_and(|r| r.has_voted(caller)) {
            return Err(GovernanceError::DuplicateVote {
                voter: *caller,
                candidate,
            });
        }
        let votes = record.map_or(0, VoteRecord::vote_count) + 1;
        let threshold = GovernanceParams::consensus_threshold(registered);

        if votes >= threshold {
            registry.register_airline(&self.identity, candidate)?;
            self.votes.remove(&candidate);
            tracing::info!(airline = %candidate, votes, threshold, "airline admitted by consensus");
            return Ok(RegistrationOutcome::Registered);
        }

        self.votes
            .entry(candidate)
            .or_insert_with(|| VoteRecord::new(candidate))
            .record(*caller);
        tracing::debug!(airline = %candidate, voter = %caller, votes, threshold, "vote recorded");
        Ok(RegistrationOutcome::VoteRecorded { votes, threshold })
    }

    /// Fund the caller's own airline. Returns whether it is active afterwards.
    ///
    /// Each call must carry at least the minimum ante.
    pub fn fund(
        &mut self,
        registry: &mut Registry,
        caller: &Address,
        amount: Wei,
    ) -> Result<bool, GovernanceError> {
        Self::require_operational(registry)?;
        let is_member = registry
            .airline(caller)
            .is_some_and(|a| a.status().is_member());
        if !is_member {
            return Err(GovernanceError::NotRegistered(*caller));
        }
        if amount < self.params.minimum_funding_ante {
            return Err(GovernanceError::InsufficientFunds {
                sent: amount,
                required: self.params.minimum_funding_ante,
            });
        }
        Ok(registry.fund_airline(&self.identity, caller, amount)?)
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn vote_count(&self, candidate: &Address) -> usize {
        self.votes.get(candidate).map_or(0, VoteRecord::vote_count)
    }

    pub fn has_voted(&self, candidate: &Address, voter: &Address) -> bool {
        self.votes
            .get(candidate)
            .is_some_and(|r| r.has_voted(voter))
    }

    /// Candidates with at least one vote, sorted by address.
    pub fn pending_candidates(&self) -> Vec<Address> {
        let mut pending: Vec<Address> = self.votes.keys().copied().collect();
        pending.sort();
        pending
    }

    /// Lifecycle position of `address`, combining registry and vote state.
    pub fn status(&self, registry: &Registry, address: &Address) -> AirlineStatus {
        match registry.airline(address) {
            Some(airline) => airline.status(),
            None if self.votes.contains_key(address) => AirlineStatus::Voting,
            None => AirlineStatus::Unknown,
        }
    }

    // ── Gates ───────────────────────────────────────────────────────────

    fn require_operational(registry: &Registry) -> Result<(), GovernanceError> {
        if !registry.is_operational() {
            return Err(GovernanceError::SystemPaused);
        }
        Ok(())
    }

    fn require_active(registry: &Registry, caller: &Address) -> Result<(), GovernanceError> {
        let can_vote = registry
            .airline(caller)
            .is_some_and(|a| a.status().can_vote());
        if !can_vote {
            return Err(GovernanceError::NotActiveVoter(*caller));
        }
        Ok(())
    }
}

/// Serializable engine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub identity: Address,
    pub params: GovernanceParams,
    /// Pending vote records, sorted by candidate.
    pub pending: Vec<VoteRecord>,
}

impl GovernanceEngine {
    pub fn snapshot(&self) -> EngineSnapshot {
        let pending = self
            .pending_candidates()
            .iter()
            .filter_map(|c| self.votes.get(c).cloned())
            .collect();
        EngineSnapshot {
            identity: self.identity,
            params: self.params.clone(),
            pending,
        }
    }

    pub fn from_snapshot(snapshot: EngineSnapshot) -> Self {
        Self {
            identity: snapshot.identity,
            params: snapshot.params,
            votes: snapshot
                .pending
                .into_iter()
                .map(|r| (r.candidate, r))
                .collect(),
        }
    }
}

//! A deployed governance core: registry and engine behind one lock.
//!
//! Every call takes the lock for its full duration, so vote tallying,
//! threshold comparison and the registry commit happen as one step and
//! concurrent callers observe calls in a single serial order.

use crate::engine::{EngineSnapshot, GovernanceEngine, RegistrationOutcome};
use crate::error::GovernanceError;
use flightsurety_registry::{Registry, RegistrySnapshot};
use flightsurety_types::{Address, Airline, AirlineStatus, GovernanceParams, Wei};
use flightsurety_utils::spans;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

struct DeploymentState {
    registry: Registry,
    engine: GovernanceEngine,
}

/// The externally visible governance core.
pub struct Deployment {
    state: Mutex<DeploymentState>,
}

/// Whole-deployment state, as persisted between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSnapshot {
    pub registry: RegistrySnapshot,
    pub engine: EngineSnapshot,
}

impl Deployment {
    /// Deploy the registry with `genesis` as its first airline and authorize
    /// the engine, identified by `governance_identity`, to mutate it.
    pub fn deploy(
        owner: Address,
        governance_identity: Address,
        genesis: Address,
        params: GovernanceParams,
    ) -> Result<Self, GovernanceError> {
        let mut registry = Registry::new(owner, genesis, params.minimum_funding_ante);
        registry.authorize_caller(&owner, governance_identity)?;
        let engine = GovernanceEngine::new(governance_identity, params);
        Ok(Self::from_parts(registry, engine))
    }

    fn from_parts(registry: Registry, engine: GovernanceEngine) -> Self {
        Self {
            state: Mutex::new(DeploymentState { registry, engine }),
        }
    }

    // Calls validate before mutating, so state behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, DeploymentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Operational / access control ────────────────────────────────────

    pub fn is_operational(&self) -> bool {
        self.lock().registry.is_operational()
    }

    pub fn set_operating_status(
        &self,
        caller: &Address,
        operational: bool,
    ) -> Result<(), GovernanceError> {
        let _span = spans::admin_span("set_operating_status", caller).entered();
        let result = self
            .lock()
            .registry
            .set_operational_status(caller, operational)
            .map_err(GovernanceError::from);
        log_rejection(&result);
        result
    }

    pub fn authorize_caller(
        &self,
        caller: &Address,
        contract: Address,
    ) -> Result<(), GovernanceError> {
        let _span = spans::admin_span("authorize_caller", caller).entered();
        let result = self
            .lock()
            .registry
            .authorize_caller(caller, contract)
            .map_err(GovernanceError::from);
        log_rejection(&result);
        result
    }

    pub fn deauthorize_caller(
        &self,
        caller: &Address,
        contract: &Address,
    ) -> Result<(), GovernanceError> {
        let _span = spans::admin_span("deauthorize_caller", caller).entered();
        let result = self
            .lock()
            .registry
            .deauthorize_caller(caller, contract)
            .map_err(GovernanceError::from);
        log_rejection(&result);
        result
    }

    pub fn is_caller_authorized(&self, contract: &Address) -> bool {
        self.lock().registry.is_caller_authorized(contract)
    }

    // ── Business entry points ───────────────────────────────────────────

    /// Register or vote for `candidate` on behalf of the airline `caller`.
    pub fn register_airline(
        &self,
        caller: &Address,
        candidate: Address,
    ) -> Result<RegistrationOutcome, GovernanceError> {
        let _span = spans::register_span(caller, &candidate).entered();
        let mut guard = self.lock();
        let DeploymentState { registry, engine } = &mut *guard;
        let result = engine.register_airline(registry, caller, candidate);
        log_rejection(&result);
        result
    }

    /// Fund the caller's own airline with the attached `amount`.
    pub fn fund(&self, caller: &Address, amount: Wei) -> Result<bool, GovernanceError> {
        let _span = spans::fund_span(caller, amount).entered();
        let mut guard = self.lock();
        let DeploymentState { registry, engine } = &mut *guard;
        let result = engine.fund(registry, caller, amount);
        log_rejection(&result);
        result
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn is_airline(&self, airline: &Address) -> bool {
        self.lock().registry.is_airline(airline)
    }

    pub fn is_airline_active(&self, airline: &Address) -> bool {
        self.lock().registry.is_airline_active(airline)
    }

    pub fn airlines_length(&self) -> usize {
        self.lock().registry.airlines_length()
    }

    pub fn airline(&self, airline: &Address) -> Option<Airline> {
        self.lock().registry.airline(airline).cloned()
    }

    pub fn airlines(&self) -> Vec<Airline> {
        self.lock().registry.airlines().cloned().collect()
    }

    pub fn vote_count(&self, candidate: &Address) -> usize {
        self.lock().engine.vote_count(candidate)
    }

    pub fn has_voted(&self, candidate: &Address, voter: &Address) -> bool {
        self.lock().engine.has_voted(candidate, voter)
    }

    pub fn pending_candidates(&self) -> Vec<Address> {
        self.lock().engine.pending_candidates()
    }

    pub fn status(&self, address: &Address) -> AirlineStatus {
        let guard = self.lock();
        guard.engine.status(&guard.registry, address)
    }

    pub fn params(&self) -> GovernanceParams {
        self.lock().engine.params().clone()
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> DeploymentSnapshot {
        let guard = self.lock();
        DeploymentSnapshot {
            registry: guard.registry.snapshot(),
            engine: guard.engine.snapshot(),
        }
    }

    /// Restore a deployment, checking that registry and engine agree.
    pub fn from_snapshot(snapshot: DeploymentSnapshot) -> Result<Self, GovernanceError> {
        let registry = Registry::from_snapshot(snapshot.registry)?;
        if snapshot.engine.params.minimum_funding_ante != registry.minimum_funding_ante() {
            return Err(GovernanceError::Snapshot(
                "engine and registry disagree on the minimum ante".to_string(),
            ));
        }
        if let Some(record) = snapshot
            .engine
            .pending
            .iter()
            .find(|r| registry.is_airline(&r.candidate))
        {
            return Err(GovernanceError::Snapshot(format!(
                "pending vote for registered airline {}",
                record.candidate
            )));
        }
        let engine = GovernanceEngine::from_snapshot(snapshot.engine);
        Ok(Self::from_parts(registry, engine))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(&self.snapshot())
            .map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, GovernanceError> {
        let snapshot: DeploymentSnapshot =
            bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }
}

fn log_rejection<T>(result: &Result<T, GovernanceError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "call rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const OWNER: u64 = 1;
    const APP: u64 = 2;
    const GENESIS: u64 = 10;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn deploy() -> Deployment {
        Deployment::deploy(addr(OWNER), addr(APP), addr(GENESIS), GovernanceParams::default())
            .unwrap()
    }

    #[test]
    fn test_deploy_authorizes_engine() {
        let deployment = deploy();
        assert!(deployment.is_caller_authorized(&addr(APP)));
        assert!(deployment.is_operational());
        assert_eq!(deployment.airlines_length(), 1);
        assert_eq!(deployment.status(&addr(GENESIS)), AirlineStatus::Registered);
    }

    #[test]
    fn test_bytes_roundtrip_preserves_votes() {
        let deployment = deploy();
        let ante = deployment.params().minimum_funding_ante;
        deployment.fund(&addr(GENESIS), ante).unwrap();
        for i in 11..14 {
            deployment.register_airline(&addr(GENESIS), addr(i)).unwrap();
        }
        deployment.register_airline(&addr(GENESIS), addr(50)).unwrap();

        let restored = Deployment::from_bytes(&deployment.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.snapshot(), deployment.snapshot());
        assert_eq!(restored.vote_count(&addr(50)), 1);
        assert_eq!(restored.status(&addr(50)), AirlineStatus::Voting);
        assert_eq!(
            restored.register_airline(&addr(GENESIS), addr(50)),
            Err(GovernanceError::DuplicateVote {
                voter: addr(GENESIS),
                candidate: addr(50)
            })
        );
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            Deployment::from_bytes(&[1, 2, 3]),
            Err(GovernanceError::Snapshot(_))
        ));
    }

    #[test]
    fn test_snapshot_rejects_vote_for_member() {
        let deployment = deploy();
        let mut snapshot = deployment.snapshot();
        let mut record = crate::vote::VoteRecord::new(addr(GENESIS));
        record.record(addr(11));
        snapshot.engine.pending.push(record);
        assert!(matches!(
            Deployment::from_snapshot(snapshot),
            Err(GovernanceError::Snapshot(_))
        ));
    }

    #[test]
    fn test_concurrent_votes_admit_exactly_once() {
        let deployment = Arc::new(deploy());
        let ante = deployment.params().minimum_funding_ante;
        deployment.fund(&addr(GENESIS), ante).unwrap();
        for i in 11..14 {
            deployment.register_airline(&addr(GENESIS), addr(i)).unwrap();
            deployment.fund(&addr(i), ante).unwrap();
        }
        let candidate = addr(50);

        type Outcome = Result<RegistrationOutcome, GovernanceError>;
        let outcomes: Vec<Outcome> = std::thread::scope(|s| {
            let handles: Vec<_> = [GENESIS, 11, 12, 13]
                .into_iter()
                .map(|voter| {
                    let deployment = Arc::clone(&deployment);
                    s.spawn(move || deployment.register_airline(&addr(voter), candidate))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let admitted = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(RegistrationOutcome::Registered)))
            .count();
        let recorded = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(RegistrationOutcome::VoteRecorded { .. })))
            .count();
        let late = outcomes
            .iter()
            .filter(|o| matches!(o, Err(GovernanceError::AlreadyRegistered(_))))
            .count();
        assert_eq!(admitted, 1);
        assert_eq!(recorded, 1);
        assert_eq!(late, 2);
        assert_eq!(deployment.airlines_length(), 5);
        assert!(deployment.pending_candidates().is_empty());
    }
}

//! The registry state object and its gated primitives.

use crate::error::RegistryError;
use flightsurety_types::{Address, Airline, Wei};
use std::collections::{HashMap, HashSet};

/// Sole source of truth for airline and operational state.
///
/// Mutators take the authenticated caller explicitly. Owner-only operations
/// compare it with the deploying account; airline mutators require it to be
/// in the authorized-caller list and the registry to be operational.
#[derive(Debug, Clone)]
pub struct Registry {
    owner: Address,
    operational: bool,
    authorized_callers: HashSet<Address>,
    airlines: HashMap<Address, Airline>,
    /// Registration order, for listing. Length always equals the registered count.
    order: Vec<Address>,
    minimum_funding_ante: Wei,
}

impl Registry {
    /// Deploy a registry owned by `owner` with `genesis` as its first airline.
    ///
    /// The genesis airline is registered exactly once, here, and starts inactive.
    pub fn new(owner: Address, genesis: Address, minimum_funding_ante: Wei) -> Self {
        let mut airlines = HashMap::new();
        airlines.insert(genesis, Airline::registered(genesis));
        tracing::info!(owner = %owner, genesis = %genesis, "registry deployed");
        Self {
            owner,
            operational: true,
            authorized_callers: HashSet::new(),
            airlines,
            order: vec![genesis],
            minimum_funding_ante,
        }
    }

    // ── Operational / access control ────────────────────────────────────

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Toggle the kill-switch. Owner-only; setting the current value again succeeds.
    pub fn set_operational_status(
        &mut self,
        caller: &Address,
        operational: bool,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        if self.operational != operational {
            tracing::info!(operational, "operational status changed");
        }
        self.operational = operational;
        Ok(())
    }

    /// Add `contract` to the callers allowed to mutate airline state. Owner-only,
    /// and refused while paused.
    pub fn authorize_caller(
        &mut self,
        caller: &Address,
        contract: Address,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        self.require_operational()?;
        if self.authorized_callers.insert(contract) {
            tracing::info!(contract = %contract, "caller authorized");
        }
        Ok(())
    }

    /// Remove `contract` from the authorized callers. Owner-only, refused while
    /// paused; removing an unknown caller is a no-op.
    pub fn deauthorize_caller(
        &mut self,
        caller: &Address,
        contract: &Address,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        self.require_operational()?;
        if self.authorized_callers.remove(contract) {
            tracing::info!(contract = %contract, "caller deauthorized");
        }
        Ok(())
    }

    pub fn is_caller_authorized(&self, contract: &Address) -> bool {
        self.authorized_callers.contains(contract)
    }

    pub(crate) fn authorized_callers_iter(&self) -> impl Iterator<Item = &Address> + '_ {
        self.authorized_callers.iter()
    }

    // ── Airline mutators ────────────────────────────────────────────────

    /// Mark `airline` as registered, creating the entry if absent.
    ///
    /// Registering an already-registered airline leaves the registry unchanged.
    pub fn register_airline(
        &mut self,
        caller: &Address,
        airline: Address,
    ) -> Result<(), RegistryError> {
        self.require_mutator(caller)?;
        if self.is_airline(&airline) {
            return Ok(());
        }
        self.airlines.insert(airline, Airline::registered(airline));
        self.order.push(airline);
        tracing::info!(airline = %airline, count = self.order.len(), "airline registered");
        Ok(())
    }

    /// Add `amount` to the airline's contributed funds, activating it once the
    /// cumulative total reaches the minimum ante.
    ///
    /// Returns whether the airline is active after the call.
    pub fn fund_airline(
        &mut self,
        caller: &Address,
        airline: &Address,
        amount: Wei,
    ) -> Result<bool, RegistryError> {
        self.require_mutator(caller)?;
        let ante = self.minimum_funding_ante;
        let entry = self
            .airlines
            .get_mut(airline)
            .ok_or(RegistryError::AirlineNotRegistered(*airline))?;
        let total = entry
            .funds_contributed
            .checked_add(amount)
            .ok_or(RegistryError::FundsOverflow {
                airline: *airline,
                current: entry.funds_contributed,
                amount,
            })?;
        entry.funds_contributed = total;
        if !entry.active && total >= ante {
            entry.active = true;
            tracing::info!(airline = %airline, funds = %total, "airline activated");
        } else {
            tracing::debug!(airline = %airline, funds = %total, "airline funded");
        }
        Ok(entry.active)
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn is_airline(&self, airline: &Address) -> bool {
        self.airlines.get(airline).is_some_and(|a| a.registered)
    }

    pub fn is_airline_active(&self, airline: &Address) -> bool {
        self.airlines.get(airline).is_some_and(|a| a.active)
    }

    /// Number of registered airlines.
    pub fn airlines_length(&self) -> usize {
        self.order.len()
    }

    pub fn active_airlines_count(&self) -> usize {
        self.airlines.values().filter(|a| a.active).count()
    }

    pub fn airline(&self, airline: &Address) -> Option<&Airline> {
        self.airlines.get(airline)
    }

    pub fn funds_contributed(&self, airline: &Address) -> Wei {
        self.airlines
            .get(airline)
            .map(|a| a.funds_contributed)
            .unwrap_or(Wei::ZERO)
    }

    /// Registered airlines in registration order.
    pub fn airlines(&self) -> impl Iterator<Item = &Airline> + '_ {
        self.order.iter().filter_map(|a| self.airlines.get(a))
    }

    pub fn minimum_funding_ante(&self) -> Wei {
        self.minimum_funding_ante
    }

    // ── Gates ───────────────────────────────────────────────────────────

    fn require_owner(&self, caller: &Address) -> Result<(), RegistryError> {
        if *caller != self.owner {
            return Err(RegistryError::Unauthorized(*caller));
        }
        Ok(())
    }

    fn require_operational(&self) -> Result<(), RegistryError> {
        if !self.operational {
            return Err(RegistryError::SystemPaused);
        }
        Ok(())
    }

    fn require_mutator(&self, caller: &Address) -> Result<(), RegistryError> {
        self.require_operational()?;
        if !self.authorized_callers.contains(caller) {
            return Err(RegistryError::NotAuthorized(*caller));
        }
        Ok(())
    }

    pub(crate) fn from_parts(
        owner: Address,
        operational: bool,
        authorized_callers: HashSet<Address>,
        airlines: Vec<Airline>,
        minimum_funding_ante: Wei,
    ) -> Self {
        let order = airlines.iter().map(|a| a.address).collect();
        let airlines = airlines.into_iter().map(|a| (a.address, a)).collect();
        Self {
            owner,
            operational,
            authorized_callers,
            airlines,
            order,
            minimum_funding_ante,
        }
    }
}

//! Serializable image of the registry, for persisting state between runs.

use crate::error::RegistryError;
use crate::registry::Registry;
use flightsurety_types::{Address, Airline, Wei};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Registry state as plain data. Airlines are kept in registration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub owner: Address,
    pub operational: bool,
    pub authorized_callers: Vec<Address>,
    pub airlines: Vec<Airline>,
    pub minimum_funding_ante: Wei,
}

impl Registry {
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut authorized_callers: Vec<Address> = self
            .authorized_callers_iter()
            .copied()
            .collect();
        authorized_callers.sort();
        RegistrySnapshot {
            owner: *self.owner(),
            operational: self.is_operational(),
            authorized_callers,
            airlines: self.airlines().cloned().collect(),
            minimum_funding_ante: self.minimum_funding_ante(),
        }
    }

    /// Rebuild a registry, rejecting images that break the registry invariants.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self, RegistryError> {
        if snapshot.airlines.is_empty() {
            return Err(RegistryError::InvalidSnapshot(
                "no genesis airline".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for airline in &snapshot.airlines {
            if !seen.insert(airline.address) {
                return Err(RegistryError::InvalidSnapshot(format!(
                    "airline {} listed twice",
                    airline.address
                )));
            }
            if !airline.registered {
                return Err(RegistryError::InvalidSnapshot(format!(
                    "airline {} listed but not registered",
                    airline.address
                )));
            }
            if airline.active && airline.funds_contributed < snapshot.minimum_funding_ante {
                return Err(RegistryError::InvalidSnapshot(format!(
                    "airline {} active below the minimum ante",
                    airline.address
                )));
            }
        }
        Ok(Self::from_parts(
            snapshot.owner,
            snapshot.operational,
            snapshot.authorized_callers.into_iter().collect(),
            snapshot.airlines,
            snapshot.minimum_funding_ante,
        ))
    }
}

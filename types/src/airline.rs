//! The airline record and its lifecycle state.

use crate::address::Address;
use crate::amount::Wei;
use serde::{Deserialize, Serialize};

/// Where an address sits in the admission lifecycle.
///
/// `Unknown → Voting → Registered → Active`. Only `Registered` and `Active`
/// are stored in the registry; `Voting` is derived from the governance
/// engine's pending vote records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirlineStatus {
    /// Never registered and no vote open.
    Unknown,
    /// At least one vote recorded, threshold not yet reached.
    Voting,
    /// Member of the registry, not yet funded.
    Registered,
    /// Registered and funded at or above the minimum ante.
    Active,
}

impl AirlineStatus {
    /// Whether this airline may register or vote for others.
    pub fn can_vote(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_member(&self) -> bool {
        matches!(self, Self::Registered | Self::Active)
    }
}

/// A participant entry in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub address: Address,
    /// Present in the registry set. Never reverts once true.
    pub registered: bool,
    /// Has contributed at least the minimum ante. Never reverts once true.
    pub active: bool,
    /// Cumulative value sent toward activation.
    pub funds_contributed: Wei,
}

impl Airline {
    /// A freshly registered, unfunded airline.
    pub fn registered(address: Address) -> Self {
        Self {
            address,
            registered: true,
            active: false,
            funds_contributed: Wei::ZERO,
        }
    }

    pub fn status(&self) -> AirlineStatus {
        match (self.registered, self.active) {
            (true, true) => AirlineStatus::Active,
            (true, false) => AirlineStatus::Registered,
            _ => AirlineStatus::Unknown,
        }
    }
}

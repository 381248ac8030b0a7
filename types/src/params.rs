//! Deployment-time governance parameters.
//!
//! Loaded once when the core is deployed and never changed afterwards.

use crate::amount::Wei;
use serde::{Deserialize, Serialize};

/// Constants fixed at deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Funding an airline must contribute, in a single call, to become active.
    /// Default: 10 ether.
    pub minimum_funding_ante: Wei,

    /// Number of airlines admitted without a vote, counting the genesis airline.
    /// Default: 4.
    pub auto_approved_airline_count: u32,
}

impl GovernanceParams {
    pub const DEFAULT_ANTE_ETHER: u128 = 10;
    pub const DEFAULT_AUTO_APPROVED: u32 = 4;

    pub fn new(minimum_funding_ante: Wei, auto_approved_airline_count: u32) -> Self {
        Self {
            minimum_funding_ante,
            auto_approved_airline_count,
        }
    }

    /// Whether a registry holding `registered` airlines still admits directly.
    pub fn admits_directly(&self, registered: usize) -> bool {
        registered < self.auto_approved_airline_count as usize
    }

    /// Distinct votes needed to admit a candidate: `ceil(registered / 2)`.
    ///
    /// Always evaluated against the live registry size.
    pub fn consensus_threshold(registered: usize) -> usize {
        registered.div_ceil(2)
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            minimum_funding_ante: Wei::from_ether(Self::DEFAULT_ANTE_ETHER),
            auto_approved_airline_count: Self::DEFAULT_AUTO_APPROVED,
        }
    }
}

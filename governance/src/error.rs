use flightsurety_registry::RegistryError;
use flightsurety_types::{Address, Wei};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("system is paused")]
    SystemPaused,

    #[error("airline {0} is not active and cannot register or vote")]
    NotActiveVoter(Address),

    #[error("{0} is not a registered airline")]
    NotRegistered(Address),

    #[error("airline {voter} has already voted for {candidate}")]
    DuplicateVote { voter: Address, candidate: Address },

    #[error("airline {0} is already registered")]
    AlreadyRegistered(Address),

    #[error("insufficient funds: sent {sent}, need at least {required}")]
    InsufficientFunds { sent: Wei, required: Wei },

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl GovernanceError {
    /// Whether this is a repeated vote or a vote for an airline already admitted.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateVote { .. } | Self::AlreadyRegistered(_))
    }
}

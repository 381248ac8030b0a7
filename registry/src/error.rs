use flightsurety_types::{Address, Wei};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry is paused")]
    SystemPaused,

    #[error("{0} is not the contract owner")]
    Unauthorized(Address),

    #[error("caller {0} is not authorized to mutate the registry")]
    NotAuthorized(Address),

    #[error("airline {0} is not registered")]
    AirlineNotRegistered(Address),

    #[error("funding overflow for {airline}: {current} + {amount}")]
    FundsOverflow {
        airline: Address,
        current: Wei,
        amount: Wei,
    },

    #[error("invalid registry snapshot: {0}")]
    InvalidSnapshot(String),
}

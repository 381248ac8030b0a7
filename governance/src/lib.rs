//! Airline admission governance.
//!
//! Lifecycle per candidate: Unknown → Voting → Registered → Active.
//! - The first `auto_approved_airline_count` airlines (genesis included) are
//!   admitted directly by any active airline.
//! - After that, a candidate needs votes from `ceil(registered / 2)` distinct
//!   active airlines, counted against the live registry size.
//! - A registered airline becomes active by funding at least the minimum ante.
//!
//! The engine is the only caller the registry trusts; [`Deployment`] wires the
//! two together behind a single lock.

pub mod deployment;
pub mod engine;
pub mod error;
pub mod vote;

pub use deployment::{Deployment, DeploymentSnapshot};
pub use engine::{EngineSnapshot, GovernanceEngine, RegistrationOutcome};
pub use error::GovernanceError;
pub use vote::VoteRecord;

//! Airline registry — the data authority of the governance core.
//!
//! Owns the airline set, funding/activation flags, the operational kill-switch
//! and the list of callers allowed to mutate state. Every mutator re-checks the
//! operational flag and the caller's authorization on each call, independently
//! of whatever the governance engine already checked.
//!
//! The registry has no knowledge of voting or admission rules.

pub mod error;
pub mod registry;
pub mod snapshot;

pub use error::RegistryError;
pub use registry::Registry;
pub use snapshot::RegistrySnapshot;

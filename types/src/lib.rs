//! Fundamental types for the FlightSurety governance core.
//!
//! This crate defines the types shared by every other crate in the workspace:
//! caller/airline addresses, funding amounts, the airline record, and the
//! deployment-time governance parameters.

pub mod address;
pub mod airline;
pub mod amount;
pub mod error;
pub mod params;

pub use address::Address;
pub use airline::{Airline, AirlineStatus};
pub use amount::{Wei, WEI_PER_ETHER};
pub use error::TypesError;
pub use params::GovernanceParams;

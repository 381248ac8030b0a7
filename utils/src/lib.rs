//! Shared utilities for the FlightSurety governance core.

pub mod logging;
pub mod spans;

pub use logging::{init_logging, LogFormat};

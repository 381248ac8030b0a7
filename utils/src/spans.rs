//! Pre-built [`tracing::Span`] constructors for governance calls.
//!
//! Consistent span names and fields make it easy to correlate the registry's
//! and the engine's log lines for a single call.

use flightsurety_types::{Address, Wei};
use tracing::{info_span, Span};

/// Span covering a registration or vote by `caller` for `candidate`.
pub fn register_span(caller: &Address, candidate: &Address) -> Span {
    info_span!("register_airline", caller = %caller, candidate = %candidate)
}

/// Span covering a funding call.
pub fn fund_span(caller: &Address, amount: Wei) -> Span {
    info_span!("fund", caller = %caller, amount = %amount)
}

/// Span covering an owner-only administrative call.
pub fn admin_span(action: &'static str, caller: &Address) -> Span {
    info_span!("admin", action = action, caller = %caller)
}

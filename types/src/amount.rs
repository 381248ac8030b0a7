//! Funding amounts.
//!
//! Amounts are fixed-point integers (u128) in the smallest unit, wei, to avoid
//! floating-point errors. One ether is 10^18 wei.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of wei in one ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// A value transfer attached to a call, in wei.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Wei(u128);

impl Wei {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole ether, saturating at `u128::MAX` wei.
    pub fn from_ether(ether: u128) -> Self {
        Self(ether.saturating_mul(WEI_PER_ETHER))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

/// Accepts `"10 ether"`, `"10ether"`, `"5 wei"`, `"5wei"`, or a bare wei integer.
impl FromStr for Wei {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let (digits, multiplier) = if let Some(n) = lowered.strip_suffix("ether") {
            (n.trim(), WEI_PER_ETHER)
        } else if let Some(n) = lowered.strip_suffix("wei") {
            (n.trim(), 1)
        } else {
            (lowered.as_str(), 1)
        };
        let value: u128 = digits
            .parse()
            .map_err(|_| TypesError::InvalidAmount(s.to_string()))?;
        value
            .checked_mul(multiplier)
            .map(Self)
            .ok_or_else(|| TypesError::InvalidAmount(format!("{s}: overflows u128 wei")))
    }
}

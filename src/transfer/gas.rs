//! Gas fee estimates for the confirmation step

use std::time::{Duration, Instant};

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;

/// Shown while no fresh estimate is available
pub const GAS_PLACEHOLDER: &str = "Estimating...";

/// Fraction digits kept when showing a fee in ether
const FEE_FRACTION_DIGITS: usize = 8;

/// A gas estimate for a transfer, stamped with when it was fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasEstimate {
    /// Gas units the transfer is expected to consume
    pub gas_units: u64,
    /// Gas price in wei at fetch time
    pub gas_price_wei: u128,
    pub fetched_at: Instant,
}

impl GasEstimate {
    pub fn new(gas_units: u64, gas_price_wei: u128) -> Self {
        Self::fetched_at(gas_units, gas_price_wei, Instant::now())
    }

    pub fn fetched_at(gas_units: u64, gas_price_wei: u128, fetched_at: Instant) -> Self {
        Self {
            gas_units,
            gas_price_wei,
            fetched_at,
        }
    }

    /// Total fee in wei
    pub fn fee_wei(&self) -> U256 {
        U256::from(self.gas_units) * U256::from(self.gas_price_wei)
    }

    pub fn is_stale(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) > ttl
    }

    /// Fee formatted in ether, e.g. `0.00042 ETH`
    pub fn display_fee(&self) -> String {
        format_fee_ether(self.fee_wei())
    }
}

/// Format a wei amount as ether with trailing zeros removed
pub fn format_fee_ether(fee_wei: U256) -> String {
    let Ok(ether) = format_units(fee_wei, "ether") else {
        return GAS_PLACEHOLDER.to_string();
    };

    let (integer, fraction) = ether.split_once('.').unwrap_or((ether.as_str(), ""));
    let fraction = &fraction[..fraction.len().min(FEE_FRACTION_DIGITS)];
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{} ETH", integer)
    } else {
        format!("{}.{} ETH", integer, fraction)
    }
}

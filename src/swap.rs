//! Swap-order preparation
//!
//! Converts a selected quote into the atomic-unit order an external
//! submitter consumes. Actual signing and on-chain submission live behind
//! the [`SwapSubmitter`] seam and are not this crate's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::quote::{QuoteRequest, RouteQuote};
use crate::units;
use crate::Result;

/// A prepared swap, ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOrder {
    /// Address of the user funding the swap
    pub user_address: String,
    /// Mint of the token being sold
    pub input_mint: String,
    /// Mint of the token being bought
    pub output_mint: String,
    /// Input amount in atomic units
    pub amount_in: u64,
    /// Minimum acceptable output in atomic units, after slippage
    pub minimum_out: u64,
}

/// Build a swap order from the best quote.
///
/// Minimum output is the quoted output reduced by the slippage tolerance,
/// converted to atomic units with the output token's precision.
pub fn build_swap_order(
    user_address: &str,
    request: &QuoteRequest,
    best: &RouteQuote,
    slippage_bps: u16,
) -> SwapOrder {
    let retained_bps = 10_000u16.saturating_sub(slippage_bps);
    let min_out_ui = best.out_amount * f64::from(retained_bps) / 10_000.0;

    SwapOrder {
        user_address: user_address.to_string(),
        input_mint: request.input.mint.clone(),
        output_mint: request.output.mint.clone(),
        amount_in: units::to_atomic(request.amount_ui, request.input.decimals),
        minimum_out: units::to_atomic(min_out_ui, request.output.decimals),
    }
}

/// Submits prepared swap orders to the chain.
///
/// Implementations return a transaction identifier on success. Failures
/// are reported to the user; this crate never retries a submission.
#[async_trait]
pub trait SwapSubmitter {
    async fn submit(&self, order: &SwapOrder) -> Result<String>;
}

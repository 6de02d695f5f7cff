//! Solswap: a swap-quote aggregator for Solana DEX routes
//!
//! This library fans out quote requests to the Jupiter price API for a
//! fixed set of DEX routes, normalizes the replies into a common record,
//! and selects the route with the greatest output amount. A debouncing
//! watcher turns rapidly-changing user input into at most one aggregation
//! cycle per quiet period and guarantees stale cycles never overwrite
//! fresher results.

pub mod config;
pub mod quote;
pub mod swap;
pub mod units;
pub mod watcher;

use thiserror::Error;

/// Re-export main components
pub use config::{RouteDescriptor, SwapConfig, TokenDescriptor, TokenRegistry};
pub use quote::{best_quote, JupiterClient, QuoteEngine, QuoteRequest, QuoteSource, RouteQuote};
pub use swap::{build_swap_order, SwapOrder, SwapSubmitter};
pub use watcher::{QuoteBoard, QuoteWatcher};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for solswap operations
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("unknown token symbol: {0}")]
    UnknownToken(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("swap submission failed: {0}")]
    SubmissionFailed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Result type for solswap operations
pub type Result<T> = std::result::Result<T, SwapError>;

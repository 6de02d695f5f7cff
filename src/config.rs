//! Static configuration: supported tokens, DEX routes, and swap settings
//!
//! All tables here are built once at process start and passed explicitly
//! to the components that consume them, so each component stays testable
//! with a substituted table.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// Mainnet mint addresses for the supported tokens
const SOL_MINT: &str = "So11111111111111111111111111111111111111112";
const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";

/// Jupiter v6 quote endpoint
const DEFAULT_QUOTE_URL: &str = "https://quote-api.jup.ag/v6/quote";

/// Decimal precision assumed for mints not present in the registry
const DEFAULT_DECIMALS: u8 = 9;

/// A supported token and its on-chain identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// Ticker symbol (e.g. "SOL")
    pub symbol: String,
    /// Human-readable display name
    pub name: String,
    /// Mint address on mainnet
    pub mint: String,
    /// Number of decimal places in the atomic representation
    pub decimals: u8,
}

/// The single source of truth for supported tokens and their decimals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRegistry {
    tokens: Vec<TokenDescriptor>,
}

impl TokenRegistry {
    /// Build a registry from an explicit token list
    pub fn new(tokens: Vec<TokenDescriptor>) -> Self {
        Self { tokens }
    }

    /// The default mainnet deployment: SOL plus two stablecoins
    pub fn mainnet() -> Self {
        Self::new(vec![
            TokenDescriptor {
                symbol: "SOL".to_string(),
                name: "Solana".to_string(),
                mint: SOL_MINT.to_string(),
                decimals: 9,
            },
            TokenDescriptor {
                symbol: "USDC".to_string(),
                name: "USD Coin".to_string(),
                mint: USDC_MINT.to_string(),
                decimals: 6,
            },
            TokenDescriptor {
                symbol: "USDT".to_string(),
                name: "Tether".to_string(),
                mint: USDT_MINT.to_string(),
                decimals: 6,
            },
        ])
    }

    /// Look up a token by ticker symbol (case-insensitive)
    pub fn find(&self, symbol: &str) -> Option<&TokenDescriptor> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Decimal precision for a mint address, falling back to 9
    pub fn decimals_for(&self, mint: &str) -> u8 {
        self.tokens
            .iter()
            .find(|t| t.mint == mint)
            .map(|t| t.decimals)
            .unwrap_or(DEFAULT_DECIMALS)
    }

    /// All registered tokens, in registration order
    pub fn tokens(&self) -> &[TokenDescriptor] {
        &self.tokens
    }
}

/// A named liquidity route and the Jupiter DEX labels behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Display name shown to the user
    pub name: String,
    /// Underlying aggregator labels, joined as the `dexes` filter
    pub dex_labels: Vec<String>,
    /// Display accent associated with this route
    pub accent: String,
}

impl RouteDescriptor {
    fn new(name: &str, dex_labels: &[&str], accent: &str) -> Self {
        Self {
            name: name.to_string(),
            dex_labels: dex_labels.iter().map(|s| s.to_string()).collect(),
            accent: accent.to_string(),
        }
    }
}

/// The fixed route table for this deployment.
///
/// Iteration order here is the order quotes are returned in, regardless of
/// which route's response arrives first.
pub fn default_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("Raydium", &["Raydium", "Raydium CLMM"], "cyan"),
        // Whirlpool is Orca V3
        RouteDescriptor::new("Orca", &["Orca V2", "Whirlpool"], "yellow"),
        // OpenBook V2 stands in for the retired Serum orderbook
        RouteDescriptor::new("Serum", &["OpenBook V2"], "green"),
    ]
}

/// Settings for quote aggregation and swap preparation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Quote endpoint base URL
    pub quote_url: String,
    /// Slippage tolerance (in basis points)
    pub slippage_bps: u16,
    /// Quiet period before an input change triggers an aggregation cycle
    pub debounce: Duration,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            slippage_bps: 50, // 0.5%
            debounce: Duration::from_millis(500),
        }
    }
}

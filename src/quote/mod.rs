//! Quote aggregation across DEX routes
//!
//! Fans out one fetch per configured route, collects whatever succeeded,
//! and reduces the survivors to the single best quote by output amount.

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{RouteDescriptor, TokenDescriptor};

mod jupiter;

pub use jupiter::JupiterClient;

/// A normalized quote from one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuote {
    /// Route display name
    pub route: String,
    /// Effective exchange rate (output units per input unit)
    pub rate: f64,
    /// Output amount in human-readable units
    pub out_amount: f64,
    /// Display accent for this route
    pub accent: String,
}

/// One aggregation request: a trade pair and a human-readable amount
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    /// Token being sold
    pub input: TokenDescriptor,
    /// Token being bought
    pub output: TokenDescriptor,
    /// Input amount in human-readable units
    pub amount_ui: f64,
}

/// A source of per-route quotes.
///
/// Implementations return `None` for any failure (network error, no route
/// found, malformed response); errors never propagate past this boundary.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn route_quote(&self, route: &RouteDescriptor, request: &QuoteRequest)
        -> Option<RouteQuote>;
}

/// Fan-out driver over a fixed route table
pub struct QuoteEngine<S> {
    source: S,
    routes: Vec<RouteDescriptor>,
}

impl<S: QuoteSource> QuoteEngine<S> {
    /// Create an engine over the given source and route table
    pub fn new(source: S, routes: Vec<RouteDescriptor>) -> Self {
        Self { source, routes }
    }

    /// Fetch quotes for every configured route concurrently.
    ///
    /// All fetches run at once, so total latency is bounded by the slowest
    /// route rather than the sum. A route that fails is simply absent from
    /// the result; if every route fails the result is empty. The returned
    /// order is the route-table order, not response-arrival order.
    pub async fn fetch_all_quotes(&self, request: &QuoteRequest) -> Vec<RouteQuote> {
        let fetches = self
            .routes
            .iter()
            .map(|route| self.source.route_quote(route, request));

        let quotes: Vec<RouteQuote> = join_all(fetches).await.into_iter().flatten().collect();

        debug!(
            pair = %format!("{}/{}", request.input.symbol, request.output.symbol),
            amount = request.amount_ui,
            quotes = quotes.len(),
            routes = self.routes.len(),
            "aggregation cycle complete"
        );

        quotes
    }

    /// The route table this engine fans out over
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }
}

/// Select the quote with the greatest output amount.
///
/// Comparison is strictly greater-than, left to right, so when several
/// quotes tie on output amount the earliest one wins. An empty slice
/// yields `None`.
pub fn best_quote(quotes: &[RouteQuote]) -> Option<&RouteQuote> {
    quotes.iter().fold(None, |best, quote| match best {
        Some(current) if quote.out_amount > current.out_amount => Some(quote),
        Some(current) => Some(current),
        None => Some(quote),
    })
}

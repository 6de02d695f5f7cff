//! Jupiter quote API client
//!
//! Issues one GET per route against the v6 quote endpoint, filtered to the
//! route's DEX labels, and normalizes the reply into a [`RouteQuote`].
//! Every failure mode is absorbed here and surfaces as an absent quote.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{RouteDescriptor, SwapConfig};
use crate::quote::{QuoteRequest, QuoteSource, RouteQuote};
use crate::units;
use crate::Result;

/// Client for the Jupiter v6 quote endpoint
pub struct JupiterClient {
    http: reqwest::Client,
    quote_url: String,
    slippage_bps: u16,
}

/// Successful quote response. Only `outAmount` matters to aggregation;
/// its absence means no route was found, not a transport error.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "outAmount")]
    out_amount: Option<AtomicAmount>,
}

/// The API returns atomic amounts as decimal strings, but some deployments
/// emit plain numbers; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AtomicAmount {
    Text(String),
    Number(u64),
}

impl AtomicAmount {
    fn value(&self) -> Option<u64> {
        match self {
            AtomicAmount::Text(s) => s.parse().ok(),
            AtomicAmount::Number(n) => Some(*n),
        }
    }
}

impl JupiterClient {
    pub fn new(config: &SwapConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            quote_url: config.quote_url.clone(),
            slippage_bps: config.slippage_bps,
        }
    }

    /// One outbound quote request for a single route.
    ///
    /// `Ok(None)` means the endpoint answered but had no quote for this
    /// route (non-2xx status or missing `outAmount`); `Err` is a transport
    /// or decode failure. Both are flattened to `None` by the trait impl.
    async fn request_quote(
        &self,
        route: &RouteDescriptor,
        request: &QuoteRequest,
    ) -> Result<Option<RouteQuote>> {
        if request.amount_ui <= 0.0 {
            return Ok(None);
        }

        let amount_atomic = units::to_atomic(request.amount_ui, request.input.decimals);
        let amount = amount_atomic.to_string();
        let dexes = route.dex_labels.join(",");
        let slippage = self.slippage_bps.to_string();

        let query = [
            ("inputMint", request.input.mint.as_str()),
            ("outputMint", request.output.mint.as_str()),
            ("amount", amount.as_str()),
            ("dexes", dexes.as_str()),
            ("slippageBps", slippage.as_str()),
        ];

        let response = self.http.get(&self.quote_url).query(&query).send().await?;

        if !response.status().is_success() {
            debug!(route = %route.name, status = %response.status(), "quote request rejected");
            return Ok(None);
        }

        let body: QuoteResponse = response.json().await?;
        let out_atomic = match body.out_amount.as_ref().and_then(AtomicAmount::value) {
            Some(amount) => amount,
            None => {
                debug!(route = %route.name, "no route found");
                return Ok(None);
            }
        };

        let out_ui = units::to_human(out_atomic, request.output.decimals);
        if out_ui <= 0.0 {
            return Ok(None);
        }

        Ok(Some(RouteQuote {
            route: route.name.clone(),
            rate: out_ui / request.amount_ui,
            out_amount: out_ui,
            accent: route.accent.clone(),
        }))
    }
}

#[async_trait]
impl QuoteSource for JupiterClient {
    async fn route_quote(
        &self,
        route: &RouteDescriptor,
        request: &QuoteRequest,
    ) -> Option<RouteQuote> {
        match self.request_quote(route, request).await {
            Ok(quote) => quote,
            Err(err) => {
                warn!(route = %route.name, error = %err, "quote fetch failed");
                None
            }
        }
    }
}

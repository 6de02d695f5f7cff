//! Debounced quote watching
//!
//! Turns a rapidly-changing (pair, amount) input stream into at most one
//! aggregation cycle per quiet period, and guarantees a superseded cycle
//! never overwrites the board published by a newer one.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::config::TokenDescriptor;
use crate::quote::{best_quote, QuoteEngine, QuoteRequest, QuoteSource, RouteQuote};

/// What the display layer renders: the quotes from the latest completed
/// cycle and the best route among them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteBoard {
    /// Quotes in fixed route order
    pub quotes: Vec<RouteQuote>,
    /// Best quote by output amount, if any route succeeded
    pub best: Option<RouteQuote>,
}

/// Debounces input changes into aggregation cycles.
///
/// Each submit bumps a generation counter. A scheduled cycle re-checks the
/// counter after its quiet period (a superseded cycle never fetches) and
/// again before publishing (a cycle whose fetches resolved late never
/// overwrites a newer board). The counter lock is held across every board
/// write, so the staleness check and the publish are a single atomic step:
/// a submit that bumps the generation can never interleave between them.
/// In-flight HTTP requests are not aborted at the transport level; only
/// their results are discarded.
pub struct QuoteWatcher<S> {
    engine: Arc<QuoteEngine<S>>,
    board: Arc<watch::Sender<QuoteBoard>>,
    latest: Arc<Mutex<u64>>,
    debounce: Duration,
}

impl<S: QuoteSource + 'static> QuoteWatcher<S> {
    /// Create a watcher and the receiver the display layer listens on.
    pub fn new(engine: QuoteEngine<S>, debounce: Duration) -> (Self, watch::Receiver<QuoteBoard>) {
        let (tx, rx) = watch::channel(QuoteBoard::default());
        let watcher = Self {
            engine: Arc::new(engine),
            board: Arc::new(tx),
            latest: Arc::new(Mutex::new(0)),
            debounce,
        };
        (watcher, rx)
    }

    /// Handle one input change.
    ///
    /// An amount that is empty or not a finite non-negative number clears
    /// the board immediately and schedules nothing. Otherwise a cycle is
    /// scheduled after the quiet period; any previously scheduled cycle is
    /// superseded.
    pub fn submit(&self, input: &TokenDescriptor, output: &TokenDescriptor, raw_amount: &str) {
        let amount_ui = parse_amount(raw_amount);

        let generation = {
            let mut latest = self.latest.lock().unwrap();
            *latest += 1;
            if amount_ui.is_none() {
                // Cleared under the lock: a stale cycle observing the old
                // generation can never republish over this
                self.board.send_replace(QuoteBoard::default());
            }
            *latest
        };

        let amount_ui = match amount_ui {
            Some(amount) => amount,
            None => {
                debug!(generation, "invalid amount, cleared board");
                return;
            }
        };

        let request = QuoteRequest {
            input: input.clone(),
            output: output.clone(),
            amount_ui,
        };

        let engine = Arc::clone(&self.engine);
        let board = Arc::clone(&self.board);
        let latest = Arc::clone(&self.latest);
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if *latest.lock().unwrap() != generation {
                // Superseded during the quiet period: never fetch
                return;
            }

            let quotes = engine.fetch_all_quotes(&request).await;
            let best = best_quote(&quotes).cloned();

            let guard = latest.lock().unwrap();
            if *guard != generation {
                debug!(generation, "discarding stale aggregation cycle");
                return;
            }
            board.send_replace(QuoteBoard { quotes, best });
        });
    }
}

/// Parse a user-entered amount, rejecting anything that is not a finite
/// non-negative number.
fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5"), Some(1.5));
        assert_eq!(parse_amount(" 42 "), Some(42.0));
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }
}

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use solswap::{
    config::{default_routes, RouteDescriptor, TokenDescriptor, TokenRegistry},
    QuoteEngine, QuoteRequest, QuoteSource, QuoteWatcher, RouteQuote,
};

const DEBOUNCE: Duration = Duration::from_millis(500);

/// A quote source with fixed per-route rates. Requests for `slow_amount`
/// stall for `delay` before answering, to simulate a laggy cycle.
struct RateSource {
    slow_amount: Option<f64>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl RateSource {
    fn instant() -> (Self, Arc<AtomicUsize>) {
        Self::with_slow_amount(None, Duration::ZERO)
    }

    fn with_slow_amount(slow_amount: Option<f64>, delay: Duration) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            slow_amount,
            delay,
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }

    fn rate_for(route: &str) -> f64 {
        match route {
            "Raydium" => 1.0,
            "Orca" => 2.0,
            _ => 1.5,
        }
    }
}

#[async_trait]
impl QuoteSource for RateSource {
    async fn route_quote(
        &self,
        route: &RouteDescriptor,
        request: &QuoteRequest,
    ) -> Option<RouteQuote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.slow_amount == Some(request.amount_ui) {
            tokio::time::sleep(self.delay).await;
        }
        let out_amount = Self::rate_for(&route.name) * request.amount_ui;
        Some(RouteQuote {
            route: route.name.clone(),
            rate: Self::rate_for(&route.name),
            out_amount,
            accent: route.accent.clone(),
        })
    }
}

fn pair() -> (TokenDescriptor, TokenDescriptor) {
    let registry = TokenRegistry::mainnet();
    (
        registry.find("SOL").unwrap().clone(),
        registry.find("USDC").unwrap().clone(),
    )
}

fn make_watcher(
    source: RateSource,
) -> (QuoteWatcher<RateSource>, tokio::sync::watch::Receiver<solswap::QuoteBoard>) {
    QuoteWatcher::new(QuoteEngine::new(source, default_routes()), DEBOUNCE)
}

#[tokio::test(start_paused = true)]
async fn cycle_fires_only_after_quiet_period() {
    let (source, _) = RateSource::instant();
    let (watcher, mut boards) = make_watcher(source);
    let (sol, usdc) = pair();

    watcher.submit(&sol, &usdc, "1");

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!boards.has_changed().unwrap(), "cycle fired early");

    tokio::time::timeout(Duration::from_secs(1), boards.changed())
        .await
        .expect("cycle never fired")
        .unwrap();

    let board = boards.borrow_and_update().clone();
    assert_eq!(board.quotes.len(), 3);
    assert_eq!(board.best.as_ref().unwrap().route, "Orca");
    assert_eq!(board.best.as_ref().unwrap().out_amount, 2.0);
}

#[tokio::test(start_paused = true)]
async fn rapid_inputs_allow_exactly_one_cycle() {
    let (source, calls) = RateSource::instant();
    let (watcher, mut boards) = make_watcher(source);
    let (sol, usdc) = pair();

    watcher.submit(&sol, &usdc, "1");
    tokio::time::sleep(Duration::from_millis(100)).await;
    watcher.submit(&sol, &usdc, "2");

    tokio::time::timeout(Duration::from_secs(2), boards.changed())
        .await
        .expect("cycle never fired")
        .unwrap();

    // Only the second cycle fetched: one call per route
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let board = boards.borrow_and_update().clone();
    assert_eq!(board.best.as_ref().unwrap().out_amount, 4.0);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!boards.has_changed().unwrap(), "superseded cycle published");
}

#[tokio::test(start_paused = true)]
async fn stale_cycle_never_overwrites_newer_board() {
    // The first cycle's fetches stall long enough that they resolve after
    // the second cycle has already published
    let (source, calls) = RateSource::with_slow_amount(Some(1.0), Duration::from_millis(1000));
    let (watcher, mut boards) = make_watcher(source);
    let (sol, usdc) = pair();

    watcher.submit(&sol, &usdc, "1");
    // Past the quiet period: cycle 1 is already fetching when superseded
    tokio::time::sleep(Duration::from_millis(700)).await;
    watcher.submit(&sol, &usdc, "2");

    tokio::time::timeout(Duration::from_secs(5), boards.changed())
        .await
        .expect("cycle never fired")
        .unwrap();
    let board = boards.borrow_and_update().clone();
    assert_eq!(board.best.as_ref().unwrap().out_amount, 4.0);

    // Let cycle 1's slow fetches resolve; their result must be discarded
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!boards.has_changed().unwrap(), "stale cycle published");
    assert_eq!(boards.borrow().best.as_ref().unwrap().out_amount, 4.0);

    // Both cycles did fetch: the network effect still happens, only the
    // stale write is suppressed
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[tokio::test(start_paused = true)]
async fn stale_cycle_cannot_repopulate_cleared_board() {
    // A cycle is mid-fetch when the amount is cleared; when its fetches
    // resolve, the cleared board must stay cleared
    let (source, calls) = RateSource::with_slow_amount(Some(1.0), Duration::from_millis(1000));
    let (watcher, mut boards) = make_watcher(source);
    let (sol, usdc) = pair();

    watcher.submit(&sol, &usdc, "1");
    // Past the quiet period: cycle 1's fetches are in flight
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    watcher.submit(&sol, &usdc, "");
    assert!(boards.has_changed().unwrap());
    assert!(boards.borrow_and_update().quotes.is_empty());

    // Cycle 1 resolves at t=1500; no new cycle was scheduled, so any
    // publish from it would stand uncorrected
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!boards.has_changed().unwrap(), "stale cycle republished over a cleared board");
    let board = boards.borrow().clone();
    assert!(board.quotes.is_empty());
    assert_eq!(board.best, None);
}

#[tokio::test(start_paused = true)]
async fn invalid_amount_clears_immediately_without_fetching() {
    let (source, calls) = RateSource::instant();
    let (watcher, mut boards) = make_watcher(source);
    let (sol, usdc) = pair();

    watcher.submit(&sol, &usdc, "abc");
    assert!(boards.has_changed().unwrap());
    let board = boards.borrow_and_update().clone();
    assert!(board.quotes.is_empty());
    assert_eq!(board.best, None);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0, "invalid input reached the network");
}

#[tokio::test(start_paused = true)]
async fn clearing_amount_resets_board_and_cancels_pending_cycle() {
    let (source, calls) = RateSource::instant();
    let (watcher, mut boards) = make_watcher(source);
    let (sol, usdc) = pair();

    watcher.submit(&sol, &usdc, "1");
    tokio::time::timeout(Duration::from_secs(1), boards.changed())
        .await
        .expect("cycle never fired")
        .unwrap();
    assert_eq!(boards.borrow_and_update().quotes.len(), 3);

    // A new amount followed by an immediate clear: the pending cycle is
    // superseded and the board empties right away
    watcher.submit(&sol, &usdc, "5");
    watcher.submit(&sol, &usdc, "");
    assert!(boards.has_changed().unwrap());
    let board = boards.borrow_and_update().clone();
    assert!(board.quotes.is_empty());
    assert_eq!(board.best, None);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!boards.has_changed().unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 3, "superseded cycle fetched");
}

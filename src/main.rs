use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use solswap::{
    best_quote, build_swap_order,
    config::{default_routes, SwapConfig, TokenRegistry},
    JupiterClient, QuoteEngine, QuoteRequest, QuoteWatcher, SwapError,
};

// Placeholder funding address until a wallet is connected
const USER_ADDRESS: &str = "11111111111111111111111111111111";

fn usage() -> ! {
    eprintln!("usage: solswap [--watch] <INPUT> <OUTPUT> [AMOUNT]");
    eprintln!("       solswap SOL USDC 1.5");
    eprintln!("       solswap --watch SOL USDC   (amounts read from stdin)");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("solswap=info")),
        )
        .init();
    info!(version = solswap::VERSION, "starting solswap");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (watch_mode, rest) = match args.split_first() {
        Some((flag, rest)) if flag == "--watch" => (true, rest),
        _ => (false, &args[..]),
    };

    let (input_symbol, output_symbol) = match rest {
        [input, output, ..] => (input.clone(), output.clone()),
        _ => usage(),
    };

    let registry = TokenRegistry::mainnet();
    let config = SwapConfig::default();

    let input = registry
        .find(&input_symbol)
        .ok_or_else(|| SwapError::UnknownToken(input_symbol.clone()))?
        .clone();
    let output = registry
        .find(&output_symbol)
        .ok_or_else(|| SwapError::UnknownToken(output_symbol.clone()))?
        .clone();

    let engine = QuoteEngine::new(JupiterClient::new(&config), default_routes());

    if watch_mode {
        return watch_amounts(engine, &config, input, output).await;
    }

    let amount_ui: f64 = match rest.get(2) {
        Some(raw) => raw
            .parse()
            .map_err(|_| SwapError::InvalidAmount(raw.clone()))?,
        None => usage(),
    };

    let request = QuoteRequest {
        input,
        output,
        amount_ui,
    };

    info!(
        pair = %format!("{}/{}", request.input.symbol, request.output.symbol),
        amount = amount_ui,
        "fetching quotes"
    );
    let quotes = engine.fetch_all_quotes(&request).await;

    for quote in &quotes {
        info!(
            route = %quote.route,
            rate = quote.rate,
            out_amount = quote.out_amount,
            "quote"
        );
    }

    match best_quote(&quotes) {
        Some(best) => {
            info!(
                route = %best.route,
                out_amount = best.out_amount,
                "best route: 1 {} ~ {:.4} {}",
                request.input.symbol,
                best.rate,
                request.output.symbol
            );

            let order = build_swap_order(USER_ADDRESS, &request, best, config.slippage_bps);
            info!(
                amount_in = order.amount_in,
                minimum_out = order.minimum_out,
                "prepared swap order"
            );
        }
        None => warn!("no quote available for this pair"),
    }

    Ok(())
}

/// Interactive mode: each stdin line is an amount; quotes are debounced
/// and printed as boards arrive.
async fn watch_amounts(
    engine: QuoteEngine<JupiterClient>,
    config: &SwapConfig,
    input: solswap::TokenDescriptor,
    output: solswap::TokenDescriptor,
) -> Result<()> {
    let (watcher, mut boards) = QuoteWatcher::new(engine, config.debounce);

    let output_symbol = output.symbol.clone();
    tokio::spawn(async move {
        while boards.changed().await.is_ok() {
            let board = boards.borrow_and_update().clone();
            match &board.best {
                Some(best) => info!(
                    routes = board.quotes.len(),
                    best = %best.route,
                    "best output: {:.4} {}",
                    best.out_amount,
                    output_symbol
                ),
                None => info!("no quotes"),
            }
        }
    });

    info!("enter amounts, one per line (ctrl-d to exit)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        watcher.submit(&input, &output, &line);
    }

    Ok(())
}

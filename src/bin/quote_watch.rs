//! Quote Watch - headless quoting from stdin
//!
//! Each line read from stdin replaces the sell amount, exactly as if it had
//! been typed into the form. Resolved quotes are logged.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use swap_quote::{
    init_tracing_with_level, PairConfig, PriceSource, QuoteForm, QuoteStatus, ShutdownManager,
    ZeroExClient,
};
use swap_quote_form::bin_common::load_config;

const SETTLE_MARGIN: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    // Load config first (before logging is initialized)
    let config = load_config()?;

    init_tracing_with_level(&config.log_level);
    config.log();

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let client = Arc::new(ZeroExClient::from_config(&config.api, config.api_key.clone())?);
    let mut form = QuoteForm::new(client, config.pair.clone(), config.debounce());
    let mut status = form.subscribe_status();

    print_banner(&config.pair.sell_symbol, &config.pair.buy_symbol);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    while shutdown.is_running() {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        let amount = line.trim();
                        if !form.set_sell_amount(amount) {
                            warn!("Ignoring invalid amount {:?}", amount);
                        }
                    }
                    None => {
                        stdin_open = false;
                        // Let the last amount settle before deciding to exit
                        tokio::time::sleep(config.debounce() + SETTLE_MARGIN).await;
                        let current = *status.borrow_and_update();
                        if !current.is_loading() {
                            report(&mut form, current, &config.pair);
                            break;
                        }
                    }
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *status.borrow_and_update();
                report(&mut form, current, &config.pair);

                // Input is exhausted and the last amount has been answered
                if !stdin_open && !current.is_loading() {
                    break;
                }
            }
            _ = shutdown.wait() => break,
        }
    }

    print_shutdown("Quote watch");
    Ok(())
}

fn report<S: PriceSource>(form: &mut QuoteForm<S>, status: QuoteStatus, pair: &PairConfig) {
    match status {
        QuoteStatus::Resolved => {
            if form.sync() {
                info!(
                    "{} {} = {} {}",
                    form.sell_amount(),
                    pair.sell_symbol,
                    form.buy_amount(),
                    pair.buy_symbol
                );
            }
        }
        QuoteStatus::Failed => warn!("Quote failed for {}", form.sell_amount()),
        QuoteStatus::Validating | QuoteStatus::Idle => {}
    }
}

fn print_banner(sell: &str, buy: &str) {
    info!("");
    info!("========================================");
    info!("Starting Quote Watch ({} -> {})", sell, buy);
    info!("One sell amount per line, Ctrl+C to stop");
    info!("========================================");
    info!("");
}

fn print_shutdown(name: &str) {
    info!("");
    info!("========================================");
    info!("{} stopped gracefully", name);
    info!("========================================");
}

mod cli;
mod config;
mod data;
mod error;
mod store;
mod ui;

use clap::Parser;
use cli::{removal_message, AddRequest, Args};
use color_eyre::eyre::{eyre, WrapErr};
use config::{config_path, load_config};
use data::{fetch_klines, FetchWindow};
use reqwest::Client;
use store::{RemoveOutcome, ResistanceStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, Chart};

/// Used when `RUST_LOG` is unset; confirmations go to stdout regardless.
const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config(&config_path());
    let store_path = args.store.clone().unwrap_or(config.store_path.clone());
    let mut store = ResistanceStore::load(store_path);
    info!(path = %store.path().display(), symbols = store.symbols().count(), "resistance store ready");
    let symbol = args.symbol.as_str();

    if let Some(values) = &args.add_resistance {
        let request = AddRequest::parse(values)?;
        let line = store
            .add(symbol, request.price, request.start, request.end)
            .wrap_err("could not add resistance line")?;
        println!(
            "Added resistance line for {} at {} ({})",
            symbol,
            line.price,
            line.span_label()
        );
    }

    if let Some(price) = args.remove_resistance {
        let outcome = store
            .remove(symbol, price)
            .wrap_err("could not remove resistance line")?;
        let message = removal_message(symbol, price, outcome);
        match outcome {
            RemoveOutcome::SymbolNotFound => eprintln!("{}", message),
            RemoveOutcome::Removed(_) => println!("{}", message),
        }
    }

    if args.view {
        let window = FetchWindow::last_days(args.days)
            .ok_or_else(|| eyre!("a lookback of {} days is out of range", args.days))?;
        info!(symbol, granularity = %args.granularity, days = args.days, "loading chart");

        let client = Client::new();
        let candles = fetch_klines(&client, &config.api_base_url, symbol, args.granularity, &window)
            .await
            .wrap_err_with(|| format!("failed to fetch klines for {}", symbol))?;
        if candles.is_empty() {
            warn!(symbol, "exchange returned no candles for the window");
        }

        let mut chart = Chart::new(symbol.to_string(), args.granularity);
        chart.update_candles(candles);
        chart.set_levels(store.levels(symbol));

        App::new(chart, store.query(symbol).to_vec())
            .run()
            .wrap_err("terminal error")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn default_log_filter_is_warn() {
        let filter = EnvFilter::new(DEFAULT_LOG_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}

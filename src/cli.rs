use crate::data::{Granularity, MAX_LOOKBACK_DAYS};
use crate::error::StoreError;
use crate::store::{parse_day, RemoveOutcome};
use chrono::NaiveDateTime;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Chart futures klines and keep per-symbol resistance lines.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .multiple(true)
        .args(["add_resistance", "remove_resistance", "view"])
))]
pub struct Args {
    /// Symbol of the contract (e.g. XBTUSDTM, ETHUSDTM)
    #[arg(short, long)]
    pub symbol: String,

    /// Bar size in minutes: 1, 5, 15, 30, 60, 120, 240, 480, 720, 1440 or 10080
    #[arg(short, long)]
    pub granularity: Granularity,

    /// Days of history to fetch (at most 36500)
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_LOOKBACK_DAYS))
    )]
    pub days: u32,

    /// Resistance store file (overrides the config file)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Add a resistance line; dates are YYYY-MM-DD
    #[arg(long, num_args = 3, value_names = ["PRICE", "START", "END"], allow_hyphen_values = true)]
    pub add_resistance: Option<Vec<String>>,

    /// Remove every resistance line at exactly this price
    #[arg(long, value_name = "PRICE", allow_hyphen_values = true)]
    pub remove_resistance: Option<f64>,

    /// Fetch candles and open the chart
    #[arg(long)]
    pub view: bool,
}

/// The three raw `--add-resistance` values, parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct AddRequest {
    pub price: f64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl AddRequest {
    pub fn parse(values: &[String]) -> Result<Self, StoreError> {
        let [price, start, end] = values else {
            return Err(StoreError::InvalidInput(format!(
                "expected PRICE START END, got {} values",
                values.len()
            )));
        };

        let price = price
            .trim()
            .parse::<f64>()
            .map_err(|_| StoreError::InvalidInput(format!("price `{price}` is not a number")))?;
        let day = |raw: &str| {
            parse_day(raw).map_err(|e| StoreError::InvalidInput(format!("date `{raw}` is not YYYY-MM-DD: {e}")))
        };

        Ok(Self {
            price,
            start: day(start.as_str())?,
            end: day(end.as_str())?,
        })
    }
}

/// User-facing line for a `--remove-resistance` result. The not-found case is
/// written to stderr by the caller.
pub fn removal_message(symbol: &str, price: f64, outcome: RemoveOutcome) -> String {
    match outcome {
        RemoveOutcome::SymbolNotFound => {
            format!("No resistance lines stored for {}; nothing to remove", symbol)
        }
        RemoveOutcome::Removed(0) => {
            format!("No resistance line at {} for {}; nothing removed", price, symbol)
        }
        RemoveOutcome::Removed(count) => {
            format!("Removed {} resistance line(s) at {} for {}", count, price, symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{error::ErrorKind, CommandFactory};

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("kline-chart").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn an_operation_is_required() {
        let err = parse(&["-s", "XBTUSDTM", "-g", "60"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn operations_can_be_combined() {
        let args = parse(&[
            "-s", "XBTUSDTM", "-g", "15", "-d", "3",
            "--add-resistance", "98000", "2024-01-01", "2024-01-10",
            "--remove-resistance", "97000.5",
            "--view",
        ])
        .unwrap();

        assert_eq!(args.granularity, Granularity::FifteenMinutes);
        assert_eq!(args.days, 3);
        assert_eq!(args.add_resistance.as_deref().map(<[String]>::len), Some(3));
        assert_eq!(args.remove_resistance, Some(97000.5));
        assert!(args.view);
    }

    #[test]
    fn unsupported_granularity_and_zero_days_are_rejected() {
        assert!(parse(&["-s", "X", "-g", "7", "--view"]).is_err());
        assert!(parse(&["-s", "X", "-g", "5", "-d", "0", "--view"]).is_err());
        assert_eq!(parse(&["-s", "X", "-g", "5", "--view"]).unwrap().days, 1);
    }

    #[test]
    fn lookback_days_are_capped() {
        let err = parse(&["-s", "X", "-g", "60", "-d", "200000000", "--view"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(parse(&["-s", "X", "-g", "60", "-d", "36501", "--view"]).is_err());
        assert_eq!(parse(&["-s", "X", "-g", "60", "-d", "36500", "--view"]).unwrap().days, 36500);
    }

    #[test]
    fn add_request_parses_price_and_days() {
        let values = ["98000".to_string(), "2024-01-01".to_string(), "2024-01-10".to_string()];
        let request = AddRequest::parse(&values).unwrap();
        assert_eq!(request.price, 98000.0);
        assert_eq!(request.start, parse_day("2024-01-01").unwrap());
        assert_eq!(request.end, parse_day("2024-01-10").unwrap());
    }

    #[test]
    fn add_request_rejects_bad_values() {
        let bad_price = ["abc".to_string(), "2024-01-01".to_string(), "2024-01-10".to_string()];
        assert!(matches!(AddRequest::parse(&bad_price), Err(StoreError::InvalidInput(_))));

        let bad_date = ["1".to_string(), "2024-13-01".to_string(), "2024-01-10".to_string()];
        assert!(matches!(AddRequest::parse(&bad_date), Err(StoreError::InvalidInput(_))));

        assert!(AddRequest::parse(&["1".to_string()]).is_err());
    }

    #[test]
    fn removal_messages_distinguish_outcomes() {
        assert_eq!(
            removal_message("DOGE-USDT", 0.1, RemoveOutcome::SymbolNotFound),
            "No resistance lines stored for DOGE-USDT; nothing to remove"
        );
        assert_eq!(
            removal_message("X", 100.5, RemoveOutcome::Removed(0)),
            "No resistance line at 100.5 for X; nothing removed"
        );
        assert_eq!(
            removal_message("X", 100.0, RemoveOutcome::Removed(2)),
            "Removed 2 resistance line(s) at 100 for X"
        );
    }
}

use reqwest::StatusCode;
use thiserror::Error;

/// Failures while pulling candles from the exchange.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("exchange returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("malformed kline response: {0}")]
    Decode(String),
}

/// Failures while mutating or writing the resistance store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid resistance input: {0}")]
    InvalidInput(String),
    #[error("failed to write resistance store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize resistance store: {0}")]
    Serialize(#[from] serde_json::Error),
}

use crate::data::{FetchWindow, Granularity};
use crate::error::FetchError;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

pub const DEFAULT_API_BASE: &str = "https://api-futures.kucoin.com";

/// Exchange-level success code carried in every response body.
const SUCCESS_CODE: &str = "200000";

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

pub async fn fetch_klines(
    client: &Client,
    base_url: &str,
    symbol: &str,
    granularity: Granularity,
    window: &FetchWindow,
) -> Result<Vec<Candle>, FetchError> {
    let url = format!("{}/api/v1/kline/query", base_url.trim_end_matches('/'));
    debug!(%url, symbol, %granularity, from = window.from_ms(), to = window.to_ms(), "requesting klines");

    let res = client
        .get(&url)
        .query(&[
            ("symbol", symbol.to_string()),
            ("granularity", granularity.minutes().to_string()),
            ("from", window.from_ms().to_string()),
            ("to", window.to_ms().to_string()),
        ])
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(FetchError::Api {
            status,
            body: error_payload(&body),
        });
    }

    let json: Value =
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(format!("body is not JSON: {e}")))?;
    let candles = parse_klines(&json)?;

    info!(symbol, %granularity, bars = candles.len(), "klines fetched");
    Ok(candles)
}

/// Turns a `{"code": "200000", "data": [[time, o, h, l, c, v], ...]}` body into
/// candles ordered by time.
pub fn parse_klines(json: &Value) -> Result<Vec<Candle>, FetchError> {
    let code_ok = match json.get("code") {
        Some(Value::String(code)) => code == SUCCESS_CODE,
        Some(Value::Number(code)) => code.to_string() == SUCCESS_CODE,
        Some(_) => false,
        None => true,
    };
    if !code_ok {
        return Err(FetchError::Api {
            status: StatusCode::OK,
            body: json.to_string(),
        });
    }

    let rows = json
        .get("data")
        .and_then(|v| v.as_array())
        .ok_or_else(|| FetchError::Decode("missing `data` array".to_string()))?;

    let mut candles = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| parse_row(row).ok_or_else(|| FetchError::Decode(format!("bad kline row {idx}: {row}"))))
        .collect::<Result<Vec<_>, _>>()?;

    candles.sort_by_key(|c| c.time);
    Ok(candles)
}

fn parse_row(row: &Value) -> Option<Candle> {
    let arr = row.as_array()?;
    if arr.len() < 6 {
        return None;
    }

    let millis = arr[0]
        .as_i64()
        .or_else(|| arr[0].as_f64().map(|ms| ms as i64))
        .or_else(|| arr[0].as_str()?.parse().ok())?;

    Some(Candle {
        time: DateTime::from_timestamp_millis(millis)?,
        open: number_cell(&arr[1])?,
        high: number_cell(&arr[2])?,
        low: number_cell(&arr[3])?,
        close: number_cell(&arr[4])?,
        volume: number_cell(&arr[5])?,
    })
}

fn number_cell(value: &Value) -> Option<f64> {
    value.as_f64().or_else(|| value.as_str()?.parse().ok())
}

/// Server payload as shown to the user: compact JSON when it parses, the raw
/// text otherwise.
fn error_payload(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .map(|v| v.to_string())
        .unwrap_or_else(|_| body.trim().to_string())
}

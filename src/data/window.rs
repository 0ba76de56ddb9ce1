use chrono::{DateTime, Duration, Utc};

/// Longest lookback `--days` accepts.
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

/// Closed UTC time range a kline request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// The `days` days leading up to `end`, or `None` if that reaches past the
    /// representable range.
    pub fn lookback(days: u32, end: DateTime<Utc>) -> Option<Self> {
        let span = Duration::try_days(i64::from(days))?;
        Some(Self {
            start: end.checked_sub_signed(span)?,
            end,
        })
    }

    pub fn last_days(days: u32) -> Option<Self> {
        Self::lookback(days, Utc::now())
    }

    pub fn from_ms(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn to_ms(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

use std::fmt;
use std::str::FromStr;

/// Bar durations accepted by the futures kline endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    FourHours,
    EightHours,
    TwelveHours,
    OneDay,
    OneWeek,
}

impl Granularity {
    pub fn all() -> Vec<Granularity> {
        vec![
            Granularity::OneMinute,
            Granularity::FiveMinutes,
            Granularity::FifteenMinutes,
            Granularity::ThirtyMinutes,
            Granularity::OneHour,
            Granularity::TwoHours,
            Granularity::FourHours,
            Granularity::EightHours,
            Granularity::TwelveHours,
            Granularity::OneDay,
            Granularity::OneWeek,
        ]
    }

    pub fn minutes(&self) -> u32 {
        match self {
            Granularity::OneMinute => 1,
            Granularity::FiveMinutes => 5,
            Granularity::FifteenMinutes => 15,
            Granularity::ThirtyMinutes => 30,
            Granularity::OneHour => 60,
            Granularity::TwoHours => 120,
            Granularity::FourHours => 240,
            Granularity::EightHours => 480,
            Granularity::TwelveHours => 720,
            Granularity::OneDay => 1440,
            Granularity::OneWeek => 10080,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::OneMinute => "1m",
            Granularity::FiveMinutes => "5m",
            Granularity::FifteenMinutes => "15m",
            Granularity::ThirtyMinutes => "30m",
            Granularity::OneHour => "1h",
            Granularity::TwoHours => "2h",
            Granularity::FourHours => "4h",
            Granularity::EightHours => "8h",
            Granularity::TwelveHours => "12h",
            Granularity::OneDay => "1d",
            Granularity::OneWeek => "1w",
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::all().into_iter().find(|g| g.minutes() == minutes)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minutes: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("`{s}` is not a whole number of minutes"))?;
        Self::from_minutes(minutes).ok_or_else(|| {
            let allowed = Self::all()
                .iter()
                .map(|g| g.minutes().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{minutes} is not a supported granularity (expected one of {allowed})")
        })
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A horizontal price annotation with the date span it was drawn for.
///
/// The span is kept for reference only; overlays are drawn across the whole
/// visible chart regardless of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceLine {
    pub price: f64,
    #[serde(with = "iso_datetime")]
    pub start_date: NaiveDateTime,
    #[serde(with = "iso_datetime")]
    pub end_date: NaiveDateTime,
}

impl ResistanceLine {
    pub fn new(price: f64, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            price,
            start_date,
            end_date,
        }
    }

    pub fn span_label(&self) -> String {
        format!(
            "{} to {}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}

/// Parses a `YYYY-MM-DD` command-line date as midnight of that day.
pub fn parse_day(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

/// Written as `2024-01-01T00:00:00`; read back from that form, with
/// fractional seconds, or as a bare date.
mod iso_datetime {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised date `{raw}`")))
    }

    fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .map(|d| d.and_time(chrono::NaiveTime::MIN))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDateTime {
        parse_day(s).unwrap()
    }

    #[test]
    fn serializes_dates_as_iso_datetimes() {
        let line = ResistanceLine::new(98000.0, day("2024-01-01"), day("2024-01-10"));
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(
            json,
            r#"{"price":98000.0,"start_date":"2024-01-01T00:00:00","end_date":"2024-01-10T00:00:00"}"#
        );
    }

    #[test]
    fn reads_fractional_seconds_and_bare_dates() {
        let json = r#"{"price":1.5,"start_date":"2024-03-04T05:06:07.250","end_date":"2024-03-09"}"#;
        let line: ResistanceLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.start_date.format("%H:%M:%S").to_string(), "05:06:07");
        assert_eq!(line.end_date, day("2024-03-09"));
    }

    #[test]
    fn rejects_garbage_dates() {
        let json = r#"{"price":1.5,"start_date":"yesterday","end_date":"2024-03-09"}"#;
        assert!(serde_json::from_str::<ResistanceLine>(json).is_err());
    }

    #[test]
    fn parse_day_requires_year_month_day() {
        assert!(parse_day("2024-02-30").is_err());
        assert!(parse_day("01/02/2024").is_err());
        assert_eq!(day(" 2024-02-01 ").format("%Y-%m-%d").to_string(), "2024-02-01");
    }

    #[test]
    fn span_label_uses_days() {
        let line = ResistanceLine::new(1.0, day("2024-01-01"), day("2024-01-10"));
        assert_eq!(line.span_label(), "2024-01-01 to 2024-01-10");
    }
}

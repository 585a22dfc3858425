//! OHLC bar representation and timestamp normalization.
//!
//! Bars arrive from a data provider with a textual `time` field that can be
//! encoded several ways. [`RawBar`] keeps that text as-is; [`Bar`] holds the
//! timestamp normalized to milliseconds since the Unix epoch (UTC).

use crate::domain::error::RebaseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

const MILLIS_PER_SECOND: i64 = 1_000;

/// A bar as supplied by a historical-data provider, before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBar {
    #[serde(alias = "date")]
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl RawBar {
    pub fn new(time: impl Into<String>, open: f64, high: f64, low: f64, close: f64) -> Self {
        RawBar {
            time: time.into(),
            open,
            high,
            low,
            close,
            volume: None,
        }
    }
}

/// One OHLC sample with its timestamp in milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    /// Timestamp in whole seconds, the unit used for signals and charts.
    pub fn time_secs(&self) -> i64 {
        self.time.div_euclid(MILLIS_PER_SECOND)
    }
}

impl TryFrom<&RawBar> for Bar {
    type Error = RebaseError;

    fn try_from(raw: &RawBar) -> Result<Self, Self::Error> {
        let time = parse_timestamp(&raw.time)?;

        for (field, value) in [
            ("open", raw.open),
            ("high", raw.high),
            ("low", raw.low),
            ("close", raw.close),
        ] {
            if !value.is_finite() {
                return Err(RebaseError::Data {
                    reason: format!(
                        "bar at {}: {} is not finite ({})",
                        raw.time, field, value
                    ),
                });
            }
        }
        // every close is a divisor in the simulation
        if raw.close <= 0.0 {
            return Err(RebaseError::Data {
                reason: format!(
                    "bar at {}: close must be positive, got {}",
                    raw.time, raw.close
                ),
            });
        }

        Ok(Bar {
            time,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume,
        })
    }
}

/// Normalize a textual bar time to milliseconds since the epoch.
///
/// Accepted encodings, tried in order:
/// - `YYYY-MM-DD`
/// - 8-digit `YYYYMMDD`
/// - an all-digit Unix-seconds numeral
/// - RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS`, `YYYY/MM/DD`, and the
///   broker-style `YYYYMMDD  HH:MM:SS`
///
/// Date-only values resolve to midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<i64, RebaseError> {
    let s = value.trim();
    let invalid = || RebaseError::InvalidTimestamp {
        value: value.to_string(),
    };

    if s.is_empty() {
        return Err(invalid());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(midnight_millis(date));
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        if s.len() == 8 {
            return NaiveDate::parse_from_str(s, "%Y%m%d")
                .map(midnight_millis)
                .map_err(|_| invalid());
        }
        return s
            .parse::<i64>()
            .ok()
            .and_then(|secs| secs.checked_mul(MILLIS_PER_SECOND))
            .ok_or_else(invalid);
    }

    parse_general(s).ok_or_else(invalid)
}

fn parse_general(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }

    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y%m%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&collapsed, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(&collapsed, "%Y/%m/%d")
        .ok()
        .map(midnight_millis)
}

fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

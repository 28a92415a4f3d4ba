//! Timestamped values flowing through indicators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange time zone a sample was recorded in.
///
/// Timestamps are always stored in UTC; the zone is carried along so that
/// consumers can render or bucket values in exchange-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeZone {
    #[default]
    Utc,
    NewYork,
    Chicago,
    London,
    Frankfurt,
    Tokyo,
    HongKong,
    Sydney,
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeZone::Utc => "UTC",
            TimeZone::NewYork => "America/New_York",
            TimeZone::Chicago => "America/Chicago",
            TimeZone::London => "Europe/London",
            TimeZone::Frankfurt => "Europe/Berlin",
            TimeZone::Tokyo => "Asia/Tokyo",
            TimeZone::HongKong => "Asia/Hong_Kong",
            TimeZone::Sydney => "Australia/Sydney",
        };
        write!(f, "{}", s)
    }
}

/// Anything an indicator can consume: a point in time with a price.
pub trait DataPoint {
    /// When the observation happened.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Time zone of the observation.
    fn time_zone(&self) -> TimeZone;

    /// Price used by single-value consumers.
    fn price(&self) -> f64;
}

/// A single indicator input or output value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDataPoint {
    pub occurred_at: DateTime<Utc>,
    pub time_zone: TimeZone,
    pub price: f64,
}

impl IndicatorDataPoint {
    /// Create a new data point.
    pub fn new(occurred_at: DateTime<Utc>, time_zone: TimeZone, price: f64) -> Self {
        Self {
            occurred_at,
            time_zone,
            price,
        }
    }

    /// The value held by an indicator that has not seen any input.
    pub fn initial() -> Self {
        Self::new(DateTime::<Utc>::MIN_UTC, TimeZone::Utc, 0.0)
    }

    /// Same timestamp and zone, different price.
    #[inline]
    pub fn with_price(&self, price: f64) -> Self {
        Self::new(self.occurred_at, self.time_zone, price)
    }
}

impl Default for IndicatorDataPoint {
    fn default() -> Self {
        Self::initial()
    }
}

impl DataPoint for IndicatorDataPoint {
    #[inline]
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    #[inline]
    fn time_zone(&self) -> TimeZone {
        self.time_zone
    }

    #[inline]
    fn price(&self) -> f64 {
        self.price
    }
}

impl fmt::Display for IndicatorDataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.occurred_at, self.time_zone, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_point() {
        let point = IndicatorDataPoint::initial();
        assert_eq!(point.occurred_at, DateTime::<Utc>::MIN_UTC);
        assert_eq!(point.time_zone, TimeZone::Utc);
        assert_eq!(point.price, 0.0);
        assert_eq!(point, IndicatorDataPoint::default());
    }

    #[test]
    fn test_with_price_keeps_time() {
        let at = DateTime::from_timestamp(60, 0).unwrap();
        let point = IndicatorDataPoint::new(at, TimeZone::NewYork, 10.0);
        let moved = point.with_price(12.5);

        assert_eq!(moved.occurred_at, at);
        assert_eq!(moved.time_zone, TimeZone::NewYork);
        assert_eq!(moved.price, 12.5);
    }

    #[test]
    fn test_time_zone_serde() {
        let json = serde_json::to_string(&TimeZone::HongKong).unwrap();
        assert_eq!(json, "\"hong_kong\"");
        let parsed: TimeZone = serde_json::from_str("\"new_york\"").unwrap();
        assert_eq!(parsed, TimeZone::NewYork);
    }
}

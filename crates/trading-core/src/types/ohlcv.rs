//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DataPoint, IndicatorDataPoint, TimeZone};

/// OHLCV bar aggregated over one interval.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Time the bar closed
    pub occurred_at: DateTime<Utc>,
    /// Exchange time zone
    #[serde(default)]
    pub time_zone: TimeZone,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    /// Create a new UTC bar.
    pub fn new(
        occurred_at: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            occurred_at,
            time_zone: TimeZone::Utc,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Set the exchange time zone.
    pub fn in_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the median price (HL average).
    #[inline]
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Calculate the bar's body size (absolute difference between open and close).
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Distance from the top of the body to the high.
    #[inline]
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.close.max(self.open)
    }

    /// Distance from the bottom of the body to the low.
    #[inline]
    pub fn lower_shadow(&self) -> f64 {
        self.close.min(self.open) - self.low
    }

    /// Check if the bar is bullish (close >= open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Check if the bar is bearish (close < open).
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Project one field of the bar into an indicator input.
    #[inline]
    pub fn point(&self, price: f64) -> IndicatorDataPoint {
        IndicatorDataPoint::new(self.occurred_at, self.time_zone, price)
    }
}

impl Default for Bar {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::MIN_UTC, 0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

impl DataPoint for Bar {
    #[inline]
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    #[inline]
    fn time_zone(&self) -> TimeZone {
        self.time_zone
    }

    /// Bars are consumed by single-value indicators through their close.
    #[inline]
    fn price(&self) -> f64 {
        self.close
    }
}

impl From<&Bar> for IndicatorDataPoint {
    fn from(bar: &Bar) -> Self {
        bar.point(bar.close)
    }
}

impl From<Bar> for IndicatorDataPoint {
    fn from(bar: Bar) -> Self {
        bar.point(bar.close)
    }
}

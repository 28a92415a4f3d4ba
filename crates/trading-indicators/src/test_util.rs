//! Helpers shared by the unit tests.

use chrono::{DateTime, Utc};
use trading_core::{Bar, Indicator, IndicatorDataPoint, TimeZone};

/// Asserts that two `f64` values agree within an absolute tolerance
/// (`1e-9` unless given).
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e): (f64, f64) = ($actual, $expected);
        assert!(
            (a - e).abs() < 1e-9,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (a, e, tol): (f64, f64, f64) = ($actual, $expected, $tolerance);
        assert!(
            (a - e).abs() < tol,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Timestamp `n` minutes after the epoch.
pub fn ts(n: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(n * 60, 0).unwrap()
}

pub fn point(n: i64, price: f64) -> IndicatorDataPoint {
    IndicatorDataPoint::new(ts(n), TimeZone::Utc, price)
}

pub fn ohlcv(n: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
    Bar::new(ts(n), open, high, low, close, volume)
}

pub fn ohlc(n: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
    ohlcv(n, open, high, low, close, 0.0)
}

/// Feed `prices` at minutes 1, 2, ... and collect the value after each update.
pub fn feed<I>(indicator: &mut I, prices: &[f64]) -> Vec<f64>
where
    I: Indicator<Input = IndicatorDataPoint>,
{
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| indicator.update(&point(i as i64 + 1, price)).unwrap().price)
        .collect()
}

/// Feed `bars` in order and collect the value after each update.
pub fn feed_bars<I>(indicator: &mut I, bars: &[Bar]) -> Vec<f64>
where
    I: Indicator<Input = Bar>,
{
    bars.iter()
        .map(|bar| indicator.update(bar).unwrap().price)
        .collect()
}

/// Bars at minutes 1, 2, ... built from `(open, high, low, close)` tuples.
pub fn bars(rows: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    rows.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| ohlc(i as i64 + 1, o, h, l, c))
        .collect()
}

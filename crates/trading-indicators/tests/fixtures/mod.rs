#![allow(dead_code)]

use chrono::DateTime;
use serde::{de::DeserializeOwned, Deserialize};
use trading_core::{Bar, IndicatorDataPoint};

/// OHLCV bar parsed from the hourly CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RefBar {
    pub fn to_bar(&self) -> Bar {
        let occurred_at = DateTime::from_timestamp(self.open_time, 0)
            .unwrap_or_else(|| panic!("invalid open_time {}", self.open_time));
        Bar::new(occurred_at, self.open, self.high, self.low, self.close, self.volume)
    }

    pub fn close_point(&self) -> IndicatorDataPoint {
        IndicatorDataPoint::from(&self.to_bar())
    }
}

/// Reference value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub open_time: i64,
    pub expected: f64,
}

/// Reference BB value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefBbValue {
    pub open_time: i64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

const OHLCV_PATH: &str = "tests/fixtures/data/btcusdt-1h.csv";

/// Load the reference OHLCV bars.
pub fn load_reference_bars() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load single-value reference data (SMA, EMA, RSI, ATR).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load BB reference data (upper, middle, lower).
pub fn load_bb_ref(path: &str) -> Vec<RefBbValue> {
    load_records(path, "invalid BB reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Drive `step` over every reference bar and check the value it reports
/// whenever the bar's timestamp has a reference row.
///
/// `step` returns `None` while the indicator is not ready; a reference row
/// for such a bar fails the test.
pub fn check_against_reference<F>(name: &str, reference: &[RefValue], tolerance: f64, mut step: F)
where
    F: FnMut(&RefBar) -> Option<f64>,
{
    let bars = load_reference_bars();
    let mut ref_idx = 0;

    for bar in &bars {
        let value = step(bar);

        if ref_idx < reference.len() && bar.open_time == reference[ref_idx].open_time {
            let value =
                value.unwrap_or_else(|| panic!("{name} not ready at t={}", bar.open_time));
            assert_near(
                value,
                reference[ref_idx].expected,
                tolerance,
                &format!("{name} at bar {ref_idx} (t={})", bar.open_time),
            );
            ref_idx += 1;
        } else {
            assert!(value.is_none(), "{name} ready before its first reference value");
        }
    }

    assert_eq!(
        ref_idx,
        reference.len(),
        "not all reference values checked: {ref_idx}/{}",
        reference.len()
    );
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}

mod fixtures;

use fixtures::{check_against_reference, load_ref_values};
use trading_core::Indicator;
use trading_indicators::Ema;

const TOLERANCE: f64 = 1e-6;

#[test]
fn ema20_close_matches_reference() {
    let reference = load_ref_values("tests/fixtures/data/ema-20-close.csv");
    let mut ema = Ema::new(20).unwrap();

    check_against_reference("EMA(20)", &reference, TOLERANCE, |bar| {
        let value = ema.update(&bar.close_point()).unwrap();
        ema.is_ready().then_some(value.price)
    });
}

#[test]
fn ema20_duplicate_bars_do_not_move_the_average() {
    let reference = load_ref_values("tests/fixtures/data/ema-20-close.csv");
    let mut ema = Ema::new(20).unwrap();

    // Every bar is delivered twice; the second delivery must be ignored.
    check_against_reference("EMA(20) with duplicates", &reference, TOLERANCE, |bar| {
        ema.update(&bar.close_point()).unwrap();
        let mut repeated = bar.close_point();
        repeated.price += 1000.0;
        let value = ema.update(&repeated).unwrap();
        ema.is_ready().then_some(value.price)
    });
}

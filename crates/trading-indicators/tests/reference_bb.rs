mod fixtures;

use fixtures::{assert_near, load_bb_ref, load_reference_bars};
use trading_core::Indicator;
use trading_indicators::{BollingerBands, MovingAverageType};

const TOLERANCE: f64 = 1e-6;

#[test]
fn bb20_close_matches_reference() {
    let reference = load_bb_ref("tests/fixtures/data/bb-20-2-close.csv");
    let bars = load_reference_bars();
    let mut bb = BollingerBands::with_params(20, 2.0, MovingAverageType::Simple).unwrap();

    let mut ref_idx = 0;
    for bar in &bars {
        bb.update(&bar.close_point()).unwrap();

        if ref_idx < reference.len() && bar.open_time == reference[ref_idx].open_time {
            assert!(bb.is_ready(), "BB not ready at t={}", bar.open_time);

            let expected = &reference[ref_idx];
            let output = bb.output();
            let ctx = format!("BB at bar {ref_idx} (t={})", bar.open_time);
            assert_near(output.upper, expected.upper, TOLERANCE, &format!("{ctx} upper"));
            assert_near(output.middle, expected.middle, TOLERANCE, &format!("{ctx} middle"));
            assert_near(output.lower, expected.lower, TOLERANCE, &format!("{ctx} lower"));
            assert_eq!(bb.current().price, output.middle);

            ref_idx += 1;
        } else {
            assert!(!bb.is_ready(), "BB ready before its first reference value");
        }
    }

    assert_eq!(ref_idx, reference.len());
}

#[test]
fn bb20_bands_bracket_the_middle() {
    let mut bb = BollingerBands::with_params(20, 2.0, MovingAverageType::Simple).unwrap();

    for bar in load_reference_bars() {
        bb.update(&bar.close_point()).unwrap();
        if bb.is_ready() {
            let output = bb.output();
            assert!(output.lower <= output.middle && output.middle <= output.upper);
            assert!(output.bandwidth >= 0.0);
        }
    }
}

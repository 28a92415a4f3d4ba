//! Indicator graphs wired through shared handles and a bar feed.

mod fixtures;

use fixtures::{assert_near, load_reference_bars};
use trading_core::{shared, Bar, DataFeed, Indicator, IndicatorDataPoint, IndicatorError};
use trading_indicators::{
    of, Atr, BollingerBands, Ema, Identity, IndicatorExtensions, MovingAverageType, Rsi, Sma,
    StdDev,
};

const TOLERANCE: f64 = 1e-9;

fn bars() -> Vec<Bar> {
    load_reference_bars().iter().map(|b| b.to_bar()).collect()
}

#[test]
fn test_feed_drives_price_and_bar_indicators() {
    let close = shared(Identity::new("close"));
    let atr = shared(Atr::new(14).unwrap());

    let mut feed = DataFeed::new("BTCUSDT-1h");
    feed.register(&close, |bar: &Bar| IndicatorDataPoint::from(bar));
    feed.register(&atr, |bar: &Bar| *bar);
    assert_eq!(feed.len(), 2);

    let mut standalone = Atr::new(14).unwrap();
    for bar in bars() {
        feed.publish(&bar).unwrap();
        standalone.update(&bar).unwrap();

        assert_eq!(close.borrow().current().price, bar.close);
        assert_eq!(atr.borrow().current(), standalone.current());
    }
}

#[test]
fn test_chained_pipeline_matches_manual_composition() {
    let close = shared(Identity::new("close"));
    let ema = close.ema(10).unwrap();
    let spread = close.minus(&ema).unwrap();
    let smoothed_spread = spread.sma(5).unwrap();

    let mut manual_ema = Ema::new(10).unwrap();
    let mut manual_sma = Sma::new(5).unwrap();

    for bar in bars() {
        let point = IndicatorDataPoint::from(&bar);
        close.borrow_mut().update(&point).unwrap();

        let ema_value = manual_ema.update(&point).unwrap();
        if manual_ema.is_ready() {
            let diff = point.with_price(bar.close - ema_value.price);
            manual_sma.update(&diff).unwrap();

            assert_near(
                spread.borrow().current().price,
                diff.price,
                TOLERANCE,
                "close - EMA(10)",
            );
        } else {
            assert!(!spread.borrow().is_ready());
        }

        assert_eq!(smoothed_spread.borrow().is_ready(), manual_sma.is_ready());
        if manual_sma.is_ready() {
            assert_near(
                smoothed_spread.borrow().current().price,
                manual_sma.current().price,
                TOLERANCE,
                "SMA(5) of spread",
            );
        }
    }

    assert_eq!(smoothed_spread.borrow().name(), "SMA(5)_Of_close-EMA(10)_Of_close");
}

#[test]
fn test_hand_built_bands_match_bollinger() {
    let close = shared(Identity::new("close"));
    let middle = close.sma(20).unwrap();
    let std = of(StdDev::new(20).unwrap(), &close).unwrap();
    let deviation = std.times_value(2.0).unwrap();
    let upper = middle.plus(&deviation).unwrap();
    let lower = middle.minus(&deviation).unwrap();

    let mut bb = BollingerBands::with_params(20, 2.0, MovingAverageType::Simple).unwrap();

    for bar in bars() {
        let point = IndicatorDataPoint::from(&bar);
        close.borrow_mut().update(&point).unwrap();
        bb.update(&point).unwrap();

        assert_eq!(upper.borrow().is_ready(), bb.is_ready());
        if bb.is_ready() {
            let output = bb.output();
            assert_near(upper.borrow().current().price, output.upper, TOLERANCE, "upper");
            assert_near(lower.borrow().current().price, output.lower, TOLERANCE, "lower");
            assert_eq!(upper.borrow().current().occurred_at, bar.occurred_at);
        }
    }
}

#[test]
fn test_indicator_of_indicator() {
    let close = shared(Identity::new("close"));
    let rsi = of(Rsi::new(14).unwrap(), &close).unwrap();
    let rsi_ema = rsi.ema(9).unwrap();

    let mut manual_rsi = Rsi::new(14).unwrap();
    let mut manual_ema = Ema::new(9).unwrap();

    for bar in bars() {
        let point = IndicatorDataPoint::from(&bar);
        close.borrow_mut().update(&point).unwrap();

        let value = manual_rsi.update(&point).unwrap();
        if manual_rsi.is_ready() {
            manual_ema.update(&value).unwrap();
        }
    }

    assert!(rsi_ema.borrow().is_ready());
    assert_near(
        rsi_ema.borrow().current().price,
        manual_ema.current().price,
        TOLERANCE,
        "EMA(9) of RSI(14)",
    );
    // Only ready RSI values reach the EMA.
    assert_eq!(rsi_ema.borrow().samples(), manual_ema.samples());
}

#[test]
fn test_volume_weighted_close() {
    let bars = bars();
    let window = &bars[bars.len() - 20..];
    let (weighted, total) = window
        .iter()
        .fold((0.0, 0.0), |(vw, w), b| (vw + b.close * b.volume, w + b.volume));

    for volume_first in [true, false] {
        let close = shared(Identity::new("close"));
        let volume = shared(Identity::new("volume"));
        let vwap = close.weighted_by(&volume, 20).unwrap();

        let mut feed = DataFeed::new("BTCUSDT-1h");
        if volume_first {
            feed.register(&volume, |bar: &Bar| bar.point(bar.volume));
            feed.register(&close, |bar: &Bar| IndicatorDataPoint::from(bar));
        } else {
            feed.register(&close, |bar: &Bar| IndicatorDataPoint::from(bar));
            feed.register(&volume, |bar: &Bar| bar.point(bar.volume));
        }

        for bar in &bars {
            feed.publish(bar).unwrap();
        }

        assert!(vwap.borrow().is_ready());
        assert_eq!(vwap.borrow().samples(), bars.len());
        assert_near(vwap.borrow().current().price, weighted / total, 1e-6, "VWAP(20)");
    }
}

#[test]
fn test_out_of_order_bar_surfaces_through_feed() {
    let close = shared(Identity::new("close"));
    let mut feed = DataFeed::new("BTCUSDT-1h");
    feed.register(&close, |bar: &Bar| IndicatorDataPoint::from(bar));

    let bars = bars();
    feed.publish(&bars[1]).unwrap();

    let err = feed.publish(&bars[0]).unwrap_err();
    assert!(matches!(err, IndicatorError::OutOfOrder { .. }));
    assert_eq!(close.borrow().current().price, bars[1].close);
}

#[test]
fn test_dropped_downstream_is_ignored() {
    let close = shared(Identity::new("close"));
    let sma = close.sma(3).unwrap();
    drop(sma);

    for bar in bars().iter().take(5) {
        close.borrow_mut().update(&IndicatorDataPoint::from(bar)).unwrap();
    }
    assert_eq!(close.borrow().samples(), 5);
}

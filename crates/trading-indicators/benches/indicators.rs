//! Benchmarks for streaming indicator updates.

use chrono::{DateTime, Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trading_core::{shared, Bar, Indicator, IndicatorDataPoint, TimeZone};
use trading_indicators::candlestick::Engulfing;
use trading_indicators::{
    of, Adx, Atr, BollingerBands, Candlestick, Ema, Identity, IndicatorExtensions, Macd, Rsi, Sma,
    StdDev,
};

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

fn generate_points(size: usize) -> Vec<IndicatorDataPoint> {
    (0..size)
        .map(|i| {
            let price = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            IndicatorDataPoint::new(start() + Duration::minutes(i as i64), TimeZone::Utc, price)
        })
        .collect()
}

fn generate_bars(size: usize) -> Vec<Bar> {
    generate_points(size)
        .into_iter()
        .map(|p| {
            let swing = 0.5 + (p.price * 0.37).cos().abs();
            Bar::new(
                p.occurred_at,
                p.price - 0.2,
                p.price + swing,
                p.price - swing,
                p.price,
                1_000.0,
            )
        })
        .collect()
}

/// Feed every input, resetting first so each iteration starts cold.
fn run<I: Indicator>(indicator: &mut I, inputs: &[I::Input]) -> f64 {
    indicator.reset();
    for input in inputs {
        let _ = indicator.update(black_box(input));
    }
    indicator.current().price
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_average");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_points(*size);

        group.bench_with_input(BenchmarkId::new("sma", size), &data, |b, data| {
            let mut sma = Sma::new(20).unwrap();
            b.iter(|| run(&mut sma, data))
        });

        group.bench_with_input(BenchmarkId::new("ema", size), &data, |b, data| {
            let mut ema = Ema::new(20).unwrap();
            b.iter(|| run(&mut ema, data))
        });
    }

    group.finish();
}

fn benchmark_oscillators(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillator");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_points(*size);

        group.bench_with_input(BenchmarkId::new("rsi", size), &data, |b, data| {
            let mut rsi = Rsi::new(14).unwrap();
            b.iter(|| run(&mut rsi, data))
        });

        group.bench_with_input(BenchmarkId::new("macd", size), &data, |b, data| {
            let mut macd = Macd::new(12, 26, 9).unwrap();
            b.iter(|| run(&mut macd, data))
        });
    }

    group.finish();
}

fn benchmark_bands(c: &mut Criterion) {
    let mut group = c.benchmark_group("bands");

    for size in [1000, 10000].iter() {
        let data = generate_points(*size);

        group.bench_with_input(BenchmarkId::new("bollinger", size), &data, |b, data| {
            let mut bb = BollingerBands::new().unwrap();
            b.iter(|| run(&mut bb, data))
        });

        // Same bands wired by hand through shared handles.
        group.bench_with_input(BenchmarkId::new("composed", size), &data, |b, data| {
            let close = shared(Identity::new("close"));
            let middle = close.sma(20).unwrap();
            let std = of(StdDev::new(20).unwrap(), &close).unwrap();
            let upper = middle.plus(&std.times_value(2.0).unwrap()).unwrap();

            b.iter(|| {
                upper.borrow_mut().reset();
                close.borrow_mut().reset();
                for point in data {
                    let _ = close.borrow_mut().update(black_box(point));
                }
                upper.borrow().current().price
            })
        });
    }

    group.finish();
}

fn benchmark_bar_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("bar");

    for size in [1000, 10000].iter() {
        let data = generate_bars(*size);

        group.bench_with_input(BenchmarkId::new("atr", size), &data, |b, data| {
            let mut atr = Atr::new(14).unwrap();
            b.iter(|| run(&mut atr, data))
        });

        group.bench_with_input(BenchmarkId::new("adx", size), &data, |b, data| {
            let mut adx = Adx::new(14).unwrap();
            b.iter(|| run(&mut adx, data))
        });

        group.bench_with_input(BenchmarkId::new("engulfing", size), &data, |b, data| {
            let mut engulfing = Candlestick::new(Engulfing).unwrap();
            b.iter(|| run(&mut engulfing, data))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_moving_averages,
    benchmark_oscillators,
    benchmark_bands,
    benchmark_bar_indicators
);
criterion_main!(benches);

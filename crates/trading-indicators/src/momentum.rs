//! Momentum indicators.

use serde::{Deserialize, Serialize};

use trading_core::{
    require_period, Bar, BoxedIndicator, Indicator, IndicatorBase, IndicatorDataPoint,
    IndicatorError, IndicatorResult,
};

use crate::moving_average::{MovingAverageType, Sma};
use crate::primitives::Identity;
use crate::statistics::{Maximum, MeanAbsoluteDeviation, Minimum};

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug)]
pub struct Rsi {
    base: IndicatorBase,
    average_gain: BoxedIndicator,
    average_loss: BoxedIndicator,
    previous: Option<f64>,
}

impl Rsi {
    /// Create a new RSI indicator using Wilder's smoothing.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Self::with_ma_type(period, MovingAverageType::Wilders)
    }

    pub fn with_ma_type(period: usize, ma_type: MovingAverageType) -> IndicatorResult<Self> {
        let period = require_period("RSI", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("RSI({period})")),
            average_gain: ma_type.as_indicator(period)?,
            average_loss: ma_type.as_indicator(period)?,
            previous: None,
        })
    }

    pub fn average_gain(&self) -> f64 {
        self.average_gain.current().price
    }

    pub fn average_loss(&self) -> f64 {
        self.average_loss.current().price
    }
}

impl Indicator for Rsi {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.average_gain.is_ready() && self.average_loss.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.average_gain.warm_up_period() + 1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        // The first price only anchors the first change.
        let Some(previous) = self.previous.replace(input.price) else {
            return Ok(0.0);
        };

        let change = input.price - previous;
        let gain = self.average_gain.update(&input.with_price(change.max(0.0)))?.price;
        let loss = self.average_loss.update(&input.with_price((-change).max(0.0)))?.price;

        if loss == 0.0 {
            return Ok(100.0);
        }
        Ok(100.0 - 100.0 / (1.0 + gain / loss))
    }

    fn reset_state(&mut self) {
        self.average_gain.reset();
        self.average_loss.reset();
        self.previous = None;
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast MA - slow MA)
    pub macd: f64,
    /// Signal line (MA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two moving averages to identify trend direction and momentum. The
/// indicator's value is the MACD line; the signal line starts once both
/// averages are ready.
#[derive(Debug)]
pub struct Macd {
    base: IndicatorBase,
    fast: BoxedIndicator,
    slow: BoxedIndicator,
    signal: BoxedIndicator,
    histogram: Identity,
}

impl Macd {
    /// Create a MACD over exponential averages, commonly (12, 26, 9).
    pub fn new(fast: usize, slow: usize, signal: usize) -> IndicatorResult<Self> {
        Self::with_ma_type(fast, slow, signal, MovingAverageType::Exponential)
    }

    pub fn with_ma_type(
        fast: usize,
        slow: usize,
        signal: usize,
        ma_type: MovingAverageType,
    ) -> IndicatorResult<Self> {
        require_period("MACD", fast)?;
        require_period("MACD", slow)?;
        require_period("MACD", signal)?;
        if fast >= slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD fast period ({fast}) must be less than slow period ({slow})"
            )));
        }

        Ok(Self {
            base: IndicatorBase::new(format!("MACD({fast},{slow},{signal})")),
            fast: ma_type.as_indicator(fast)?,
            slow: ma_type.as_indicator(slow)?,
            signal: ma_type.as_indicator(signal)?,
            histogram: Identity::new("Histogram"),
        })
    }

    pub fn fast(&self) -> &BoxedIndicator {
        &self.fast
    }

    pub fn slow(&self) -> &BoxedIndicator {
        &self.slow
    }

    pub fn signal(&self) -> &BoxedIndicator {
        &self.signal
    }

    pub fn histogram(&self) -> &Identity {
        &self.histogram
    }

    pub fn output(&self) -> MacdOutput {
        MacdOutput {
            macd: self.current().price,
            signal: self.signal.current().price,
            histogram: self.histogram.current().price,
        }
    }
}

impl Indicator for Macd {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.signal.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        let lines = self.fast.warm_up_period().max(self.slow.warm_up_period());
        lines + self.signal.warm_up_period() - 1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        let fast = self.fast.update(input)?.price;
        let slow = self.slow.update(input)?.price;
        let macd = fast - slow;

        if self.fast.is_ready() && self.slow.is_ready() {
            let signal = self.signal.update(&input.with_price(macd))?.price;
            self.histogram.update(&input.with_price(macd - signal))?;
        }

        Ok(macd)
    }

    fn reset_state(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
        self.histogram.reset();
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (smoothed stochastic)
    pub k: f64,
    /// %D (signal)
    pub d: f64,
}

/// Stochastic oscillator.
///
/// Compares the close to the high-low range over `period` bars. The raw
/// value is smoothed into %K and %K again into %D; the indicator's value
/// is %K.
#[derive(Debug)]
pub struct Stochastic {
    base: IndicatorBase,
    maximum: Maximum,
    minimum: Minimum,
    fast_k: Identity,
    stoch_k: Sma,
    stoch_d: Sma,
}

impl Stochastic {
    /// Create with custom periods, commonly (14, 3, 3).
    pub fn new(period: usize, k_period: usize, d_period: usize) -> IndicatorResult<Self> {
        let period = require_period("Stochastic", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("STO({period},{k_period},{d_period})")),
            maximum: Maximum::new(period)?,
            minimum: Minimum::new(period)?,
            fast_k: Identity::new("FastStoch"),
            stoch_k: Sma::new(k_period)?,
            stoch_d: Sma::new(d_period)?,
        })
    }

    /// Raw %K before smoothing.
    pub fn fast_stoch(&self) -> &Identity {
        &self.fast_k
    }

    pub fn stoch_k(&self) -> &Sma {
        &self.stoch_k
    }

    pub fn stoch_d(&self) -> &Sma {
        &self.stoch_d
    }

    pub fn output(&self) -> StochasticOutput {
        StochasticOutput {
            k: self.stoch_k.current().price,
            d: self.stoch_d.current().price,
        }
    }
}

impl Indicator for Stochastic {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.stoch_d.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.maximum.warm_up_period() + self.stoch_k.period() + self.stoch_d.period() - 2
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let highest = self.maximum.update(&input.point(input.high))?.price;
        let lowest = self.minimum.update(&input.point(input.low))?.price;

        if !(self.maximum.is_ready() && self.minimum.is_ready()) {
            return Ok(0.0);
        }

        let range = highest - lowest;
        let fast = if range == 0.0 {
            50.0
        } else {
            100.0 * (input.close - lowest) / range
        };
        let point = input.point(fast);
        self.fast_k.update(&point)?;

        let k = self.stoch_k.update(&point)?.price;
        if self.stoch_k.is_ready() {
            self.stoch_d.update(&input.point(k))?;
        }

        Ok(k)
    }

    fn reset_state(&mut self) {
        self.maximum.reset();
        self.minimum.reset();
        self.fast_k.reset();
        self.stoch_k.reset();
        self.stoch_d.reset();
    }
}

/// Williams %R: where the close sits in the recent high-low range,
/// from 0 (at the high) to -100 (at the low).
#[derive(Debug)]
pub struct WilliamsR {
    base: IndicatorBase,
    maximum: Maximum,
    minimum: Minimum,
}

impl WilliamsR {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("WilliamsR", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("WILR({period})")),
            maximum: Maximum::new(period)?,
            minimum: Minimum::new(period)?,
        })
    }
}

impl Indicator for WilliamsR {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.maximum.is_ready() && self.minimum.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.maximum.warm_up_period()
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let highest = self.maximum.update(&input.point(input.high))?.price;
        let lowest = self.minimum.update(&input.point(input.low))?.price;

        let range = highest - lowest;
        if range == 0.0 {
            return Ok(0.0);
        }
        Ok(-100.0 * (highest - input.close) / range)
    }

    fn reset_state(&mut self) {
        self.maximum.reset();
        self.minimum.reset();
    }
}

/// Commodity Channel Index.
///
/// Distance of the typical price from its moving average, in units of
/// mean absolute deviation scaled by Lambert's 0.015 constant.
#[derive(Debug)]
pub struct Cci {
    base: IndicatorBase,
    deviation: MeanAbsoluteDeviation,
}

impl Cci {
    const K: f64 = 0.015;

    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("CCI", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("CCI({period})")),
            deviation: MeanAbsoluteDeviation::new(period)?,
        })
    }
}

impl Indicator for Cci {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.deviation.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.deviation.warm_up_period()
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let typical = input.typical_price();
        let deviation = self.deviation.update(&input.point(typical))?.price;
        if deviation == 0.0 {
            return Ok(0.0);
        }

        let mean = self.deviation.mean().current().price;
        Ok((typical - mean) / (Self::K * deviation))
    }

    fn reset_state(&mut self) {
        self.deviation.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, bars, feed, feed_bars, point};

    #[test]
    fn test_rsi_basic() {
        let mut rsi = Rsi::new(14).unwrap();
        // Generate test data with alternating up/down moves
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let values = feed(&mut rsi, &data);
        assert!(rsi.is_ready());

        // All RSI values should be between 0 and 100
        for value in &values[15..] {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let mut rsi = Rsi::new(5).unwrap();
        let values = feed(&mut rsi, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        // All gains = RSI should be 100
        assert_approx!(values[6], 100.0);
    }

    #[test]
    fn test_rsi_all_losses() {
        let mut rsi = Rsi::new(5).unwrap();
        let values = feed(&mut rsi, &[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);

        // All losses = RSI should be 0
        assert_approx!(values[6], 0.0);
    }

    #[test]
    fn test_rsi_readiness() {
        let mut rsi = Rsi::new(3).unwrap();
        assert_eq!(rsi.warm_up_period(), 4);

        feed(&mut rsi, &[1.0, 2.0, 1.0]);
        assert!(!rsi.is_ready());

        rsi.update(&point(4, 2.0)).unwrap();
        assert!(rsi.is_ready());
    }

    #[test]
    fn test_rsi_wilders_recurrence() {
        let mut rsi = Rsi::new(2).unwrap();
        let values = feed(&mut rsi, &[10.0, 12.0, 11.0]);

        // Gains 2, 0 -> 2, 1; losses 0, 1 -> 0, 0.5
        assert_approx!(rsi.average_gain(), 1.0);
        assert_approx!(rsi.average_loss(), 0.5);
        assert_approx!(values[2], 100.0 - 100.0 / 3.0);
    }

    #[test]
    fn test_macd_basic() {
        let mut macd = Macd::new(12, 26, 9).unwrap();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        feed(&mut macd, &data);

        assert!(macd.is_ready());
        // In an uptrend, MACD should be positive
        assert!(macd.output().macd > 0.0);
    }

    #[test]
    fn test_macd_signal_and_histogram() {
        let mut macd = Macd::with_ma_type(2, 3, 2, MovingAverageType::Simple).unwrap();
        assert_eq!(macd.warm_up_period(), 4);

        feed(&mut macd, &[1.0, 2.0, 3.0]);
        assert!(!macd.is_ready());
        assert_eq!(macd.signal().samples(), 1);

        macd.update(&point(4, 4.0)).unwrap();
        assert!(macd.is_ready());

        let output = macd.output();
        assert_approx!(output.macd, 0.5);
        assert_approx!(output.signal, 0.5);
        assert_approx!(output.histogram, 0.0);
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        assert!(Macd::new(26, 12, 9).is_err());
        assert!(Macd::new(12, 12, 9).is_err());
    }

    #[test]
    fn test_stochastic_basic() {
        let mut stoch = Stochastic::new(14, 3, 3).unwrap();
        let input: Vec<_> = (0..30)
            .map(|i| {
                let base = i as f64;
                (100.0 + base, 105.0 + base, 95.0 + base, 100.0 + base)
            })
            .collect();

        feed_bars(&mut stoch, &bars(&input));
        assert!(stoch.is_ready());

        // All values should be between 0 and 100
        let output = stoch.output();
        assert!(output.k >= 0.0 && output.k <= 100.0);
        assert!(output.d >= 0.0 && output.d <= 100.0);
    }

    #[test]
    fn test_stochastic_at_high() {
        let mut stoch = Stochastic::new(5, 1, 3).unwrap();
        // Close at highs
        let input: Vec<_> = (0..8)
            .map(|i| {
                let base = i as f64;
                (7.5 + base, 10.0 + base, 5.0 + base, 10.0 + base)
            })
            .collect();

        feed_bars(&mut stoch, &bars(&input));
        assert_eq!(stoch.warm_up_period(), 7);
        assert!(stoch.is_ready());

        // Close at high = %K should be 100
        assert_approx!(stoch.output().k, 100.0);
        assert_approx!(stoch.output().d, 100.0);
    }

    #[test]
    fn test_stochastic_flat_range() {
        let mut stoch = Stochastic::new(2, 1, 1).unwrap();
        feed_bars(&mut stoch, &bars(&[(5.0, 5.0, 5.0, 5.0); 2]));

        assert_approx!(stoch.fast_stoch().current().price, 50.0);
    }

    #[test]
    fn test_williams_r() {
        let mut wr = WilliamsR::new(3).unwrap();
        let values = feed_bars(
            &mut wr,
            &bars(&[(9.0, 10.0, 8.0, 9.0), (10.0, 11.0, 9.0, 10.0), (11.0, 12.0, 10.0, 11.0)]),
        );

        assert!(wr.is_ready());
        assert_approx!(values[2], -25.0);
    }

    #[test]
    fn test_williams_r_flat_range() {
        let mut wr = WilliamsR::new(2).unwrap();
        let values = feed_bars(&mut wr, &bars(&[(1.0, 1.0, 1.0, 1.0); 2]));
        assert_approx!(values[1], 0.0);
    }

    #[test]
    fn test_cci() {
        let mut cci = Cci::new(3).unwrap();
        let values = feed_bars(
            &mut cci,
            &bars(&[(1.0, 1.0, 1.0, 1.0), (2.0, 2.0, 2.0, 2.0), (3.0, 3.0, 3.0, 3.0)]),
        );

        // Mean 2, mean absolute deviation 2/3
        assert!(cci.is_ready());
        assert_approx!(values[2], 100.0);
    }

    #[test]
    fn test_cci_flat_prices() {
        let mut cci = Cci::new(2).unwrap();
        let values = feed_bars(&mut cci, &bars(&[(4.0, 4.0, 4.0, 4.0); 3]));
        assert_approx!(values[2], 0.0);
    }
}

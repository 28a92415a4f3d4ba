//! Exponential moving average and its Wilder smoothing variant.

use trading_core::{
    require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorError, IndicatorResult,
};

/// Exponential Moving Average (EMA).
///
/// Gives more weight to recent prices using an exponential decay. Seeds with
/// the first price and reports ready once `period` values have been seen.
#[derive(Debug)]
pub struct Ema {
    base: IndicatorBase,
    period: usize,
    k: f64,
}

impl Ema {
    /// Create a new EMA with the standard factor `2 / (period + 1)`.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("EMA", period)?;
        Self::build(format!("EMA({period})"), period, 2.0 / (period as f64 + 1.0))
    }

    /// Wilder's smoothing, `k = 1 / period`.
    pub fn wilders(period: usize) -> IndicatorResult<Self> {
        let period = require_period("Wilders", period)?;
        Self::build(format!("WILDERS({period})"), period, 1.0 / period as f64)
    }

    /// Create an EMA with a custom smoothing factor in `(0, 1]`.
    pub fn with_smoothing_factor(period: usize, k: f64) -> IndicatorResult<Self> {
        let period = require_period("EMA", period)?;
        Self::build(format!("EMA({period},{k})"), period, k)
    }

    fn build(name: String, period: usize, k: f64) -> IndicatorResult<Self> {
        if !(k > 0.0 && k <= 1.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "EMA smoothing factor must be in (0, 1], got {k}"
            )));
        }
        Ok(Self {
            base: IndicatorBase::new(name),
            period,
            k,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn smoothing_factor(&self) -> f64 {
        self.k
    }
}

impl Indicator for Ema {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.samples() >= self.period
    }

    fn warm_up_period(&self) -> usize {
        self.period
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        if self.samples() == 1 {
            return Ok(input.price);
        }
        let previous = self.current().price;
        Ok(input.price * self.k + previous * (1.0 - self.k))
    }
}

//! Linear weighted moving average.

use trading_core::{
    require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult, RollingWindow,
};

/// Weighted Moving Average (WMA).
///
/// Gives linearly decreasing weights to older prices: the newest of `n`
/// retained values weighs `n`, the oldest weighs 1.
#[derive(Debug)]
pub struct Wma {
    base: IndicatorBase,
    window: RollingWindow<f64>,
}

impl Wma {
    /// Create a new WMA with the specified period.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("WMA", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("LWMA({period})")),
            window: RollingWindow::new(period)?,
        })
    }

    pub fn period(&self) -> usize {
        self.window.size()
    }
}

impl Indicator for Wma {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.window.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.window.size()
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        self.window.add(input.price);

        let count = self.window.count();
        // Sum of weights: 1 + 2 + ... + n = n(n+1)/2
        let weights_sum = (count * (count + 1)) as f64 / 2.0;
        let weighted_sum: f64 = self
            .window
            .iter()
            .enumerate()
            .map(|(i, &price)| price * (count - i) as f64)
            .sum();

        Ok(weighted_sum / weights_sum)
    }

    fn reset_state(&mut self) {
        self.window.reset();
    }
}

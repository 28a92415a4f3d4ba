//! Simple moving average.

use trading_core::{
    require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult, RollingWindow,
};

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values. Before the window
/// fills, the mean is taken over the values seen so far.
#[derive(Debug)]
pub struct Sma {
    base: IndicatorBase,
    window: RollingWindow<f64>,
    sum: f64,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("SMA", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("SMA({period})")),
            window: RollingWindow::new(period)?,
            sum: 0.0,
        })
    }

    pub fn period(&self) -> usize {
        self.window.size()
    }

    /// Sum of the values currently in the window.
    pub fn rolling_sum(&self) -> f64 {
        self.sum
    }
}

impl Indicator for Sma {
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
        self.sum += input.price;
        if let Some(&removed) = self.window.add(input.price) {
            self.sum -= removed;
        }
        Ok(self.sum / self.window.count() as f64)
    }

    fn reset_state(&mut self) {
        self.window.reset();
        self.sum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, feed};

    #[test]
    fn test_sma_basic() {
        let mut sma = Sma::new(3).unwrap();
        let values = feed(&mut sma, &[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_approx!(values[2], 2.0);
        assert_approx!(values[3], 3.0);
        assert_approx!(values[4], 4.0);
    }

    #[test]
    fn test_sma_mean_of_four() {
        let mut sma = Sma::new(4).unwrap();
        feed(&mut sma, &[1.0, 10.0, 100.0, 1000.0]);

        assert!(sma.is_ready());
        assert_approx!(sma.current().price, 277.75);
    }

    #[test]
    fn test_sma_partial_window() {
        let mut sma = Sma::new(4).unwrap();
        let values = feed(&mut sma, &[2.0, 4.0]);

        assert_approx!(values[0], 2.0);
        assert_approx!(values[1], 3.0);
        assert!(!sma.is_ready());
    }

    #[test]
    fn test_sma_rejects_zero_period() {
        assert!(Sma::new(0).is_err());
    }
}

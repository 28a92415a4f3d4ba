//! Least squares moving average.

use trading_core::{
    require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult, RollingWindow,
};

/// Least Squares Moving Average (LSMA), also known as the linear
/// regression line: fits `y = intercept + slope * x` over the window
/// (`x = 0` oldest) and reports the fitted value at the newest point.
#[derive(Debug)]
pub struct Lsma {
    base: IndicatorBase,
    window: RollingWindow<f64>,
    slope: f64,
    intercept: f64,
}

impl Lsma {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("LSMA", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("LSMA({period})")),
            window: RollingWindow::new(period)?,
            slope: 0.0,
            intercept: 0.0,
        })
    }

    /// Slope of the last fitted line.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Intercept of the last fitted line, at the oldest point of the window.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Indicator for Lsma {
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

        let n = self.window.count() as f64;
        let sum_x = n * (n - 1.0) / 2.0;
        let sum_xx = (n - 1.0) * n * (2.0 * n - 1.0) / 6.0;
        let (sum_y, sum_xy) = self
            .window
            .iter()
            .rev()
            .enumerate()
            .fold((0.0, 0.0), |(sy, sxy), (x, &y)| (sy + y, sxy + x as f64 * y));

        let denominator = n * sum_xx - sum_x * sum_x;
        self.slope = if denominator == 0.0 {
            0.0
        } else {
            (n * sum_xy - sum_x * sum_y) / denominator
        };
        self.intercept = (sum_y - self.slope * sum_x) / n;

        Ok(self.intercept + self.slope * (n - 1.0))
    }

    fn reset_state(&mut self) {
        self.window.reset();
        self.slope = 0.0;
        self.intercept = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, feed};

    #[test]
    fn test_lsma_fit() {
        let mut lsma = Lsma::new(3).unwrap();
        let values = feed(&mut lsma, &[1.0, 3.0, 2.0]);

        assert_approx!(lsma.slope(), 0.5);
        assert_approx!(lsma.intercept(), 1.5);
        assert_approx!(values[2], 2.5);
    }

    #[test]
    fn test_lsma_single_point() {
        let mut lsma = Lsma::new(3).unwrap();
        let values = feed(&mut lsma, &[7.0]);

        assert_approx!(values[0], 7.0);
        assert_eq!(lsma.slope(), 0.0);
    }

    #[test]
    fn test_lsma_line_is_exact() {
        let mut lsma = Lsma::new(5).unwrap();
        let values = feed(&mut lsma, &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);

        assert_approx!(values[5], 12.0);
        assert_approx!(lsma.slope(), 2.0);
    }
}

//! Arnaud Legoux moving average.

use trading_core::{
    require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorError, IndicatorResult,
    RollingWindow,
};

/// Arnaud Legoux Moving Average (ALMA).
///
/// Gaussian-weighted window whose peak sits at `offset` along the window
/// (0 = oldest, 1 = newest) with width `period / sigma`. Reports the raw
/// price until the window fills.
#[derive(Debug)]
pub struct Alma {
    base: IndicatorBase,
    window: RollingWindow<f64>,
    /// Normalized weights, oldest value first.
    weights: Vec<f64>,
}

impl Alma {
    /// ALMA with sigma 6 and offset 0.85.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Self::with_params(period, 6.0, 0.85)
    }

    pub fn with_params(period: usize, sigma: f64, offset: f64) -> IndicatorResult<Self> {
        let period = require_period("ALMA", period)?;
        if sigma <= 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "ALMA sigma must be positive, got {sigma}"
            )));
        }
        if !(0.0..=1.0).contains(&offset) {
            return Err(IndicatorError::InvalidParameter(format!(
                "ALMA offset must be within [0, 1], got {offset}"
            )));
        }

        let m = (offset * (period - 1) as f64).floor();
        let s = period as f64 / sigma;
        let raw: Vec<f64> = (0..period)
            .map(|i| (-(i as f64 - m).powi(2) / (2.0 * s * s)).exp())
            .collect();
        let total: f64 = raw.iter().sum();

        Ok(Self {
            base: IndicatorBase::new(format!("ALMA({period},{sigma},{offset})")),
            window: RollingWindow::new(period)?,
            weights: raw.into_iter().map(|w| w / total).collect(),
        })
    }
}

impl Indicator for Alma {
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
        if !self.window.is_ready() {
            return Ok(input.price);
        }

        // Window iterates newest first, weights run oldest first.
        Ok(self
            .window
            .iter()
            .rev()
            .zip(&self.weights)
            .map(|(price, weight)| price * weight)
            .sum())
    }

    fn reset_state(&mut self) {
        self.window.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, feed};

    #[test]
    fn test_alma_gaussian_weights() {
        let mut alma = Alma::new(3).unwrap();
        let values = feed(&mut alma, &[1.0, 2.0, 6.0]);

        // Peak at the middle value, side weights exp(-2)
        let side = (-2.0f64).exp();
        assert_approx!(values[2], (side * 1.0 + 2.0 + side * 6.0) / (1.0 + 2.0 * side));
    }

    #[test]
    fn test_alma_raw_price_until_ready() {
        let mut alma = Alma::new(4).unwrap();
        let values = feed(&mut alma, &[5.0, 7.0, 9.0]);
        assert_eq!(values, vec![5.0, 7.0, 9.0]);
        assert!(!alma.is_ready());
    }

    #[test]
    fn test_alma_validates_params() {
        assert!(Alma::with_params(9, 0.0, 0.85).is_err());
        assert!(Alma::with_params(9, 6.0, 1.5).is_err());
    }
}

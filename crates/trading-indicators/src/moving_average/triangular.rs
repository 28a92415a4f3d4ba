//! Triangular moving average.

use trading_core::{require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult};

use super::Sma;

/// Triangular Moving Average (TRIMA): an SMA of an SMA, weighting the middle
/// of the window most heavily.
///
/// The two stage lengths add up to `period + 1`, so the outer average is
/// full exactly after `period` inputs.
#[derive(Debug)]
pub struct Trima {
    base: IndicatorBase,
    period: usize,
    sma1: Sma,
    sma2: Sma,
}

impl Trima {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("TRIMA", period)?;
        let (p1, p2) = if period % 2 == 0 {
            (period / 2 + 1, period / 2)
        } else {
            ((period + 1) / 2, (period + 1) / 2)
        };
        Ok(Self {
            base: IndicatorBase::new(format!("TRIMA({period})")),
            period,
            sma1: Sma::new(p1)?,
            sma2: Sma::new(p2)?,
        })
    }
}

impl Indicator for Trima {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.sma2.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.period
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        let inner = self.sma1.update(input)?;
        if !self.sma1.is_ready() {
            return Ok(inner.price);
        }
        Ok(self.sma2.update(&inner)?.price)
    }

    fn reset_state(&mut self) {
        self.sma1.reset();
        self.sma2.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, feed};

    #[test]
    fn test_trima_odd_period() {
        let mut trima = Trima::new(5).unwrap();
        let values = feed(&mut trima, &[1.0, 2.0, 3.0, 4.0, 5.0]);

        // Weights 1,2,3,2,1 over 1..=5
        assert_approx!(values[4], 3.0);
        assert!(trima.is_ready());
    }

    #[test]
    fn test_trima_even_period() {
        let mut trima = Trima::new(4).unwrap();
        let values = feed(&mut trima, &[1.0, 2.0, 3.0, 10.0]);

        // SMA(3) of 1,2,3 = 2 and of 2,3,10 = 5, SMA(2) of those = 3.5
        assert!(trima.is_ready());
        assert_approx!(values[3], 3.5);
    }
}

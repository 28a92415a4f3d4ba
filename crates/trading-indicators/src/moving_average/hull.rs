//! Hull moving average.

use trading_core::{Indicator, IndicatorBase, IndicatorDataPoint, IndicatorError, IndicatorResult};

use super::Wma;

/// Hull Moving Average (HMA): `WMA(2 * WMA(p/2) - WMA(p), round(sqrt(p)))`.
#[derive(Debug)]
pub struct Hma {
    base: IndicatorBase,
    period: usize,
    fast: Wma,
    slow: Wma,
    hull: Wma,
}

impl Hma {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        if period < 2 {
            return Err(IndicatorError::InvalidParameter(format!(
                "HMA period must be at least 2, got {period}"
            )));
        }
        let smoothing = ((period as f64).sqrt().round() as usize).max(1);

        Ok(Self {
            base: IndicatorBase::new(format!("HMA({period})")),
            period,
            fast: Wma::new(period / 2)?,
            slow: Wma::new(period)?,
            hull: Wma::new(smoothing)?,
        })
    }
}

impl Indicator for Hma {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.hull.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.period + self.hull.period() - 1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        let fast = self.fast.update(input)?.price;
        let slow = self.slow.update(input)?.price;
        let raw = 2.0 * fast - slow;

        if !self.slow.is_ready() {
            return Ok(raw);
        }
        Ok(self.hull.update(&input.with_price(raw))?.price)
    }

    fn reset_state(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.hull.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, feed};

    #[test]
    fn test_hull_warm_up() {
        let mut hma = Hma::new(4).unwrap();
        assert_eq!(hma.warm_up_period(), 5);

        let values = feed(&mut hma, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(hma.is_ready());
        // A straight line is tracked without lag.
        assert_approx!(values[4], 5.0);
    }

    #[test]
    fn test_hull_rejects_short_period() {
        assert!(Hma::new(1).is_err());
    }
}

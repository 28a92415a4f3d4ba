//! Double exponential moving average.

use trading_core::{Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult};

use super::Ema;

/// Double Exponential Moving Average (DEMA).
///
/// `EMA * (1 + v) - EMA(EMA) * v`, which for the default volume factor
/// `v = 1` is the familiar `2 * EMA - EMA(EMA)`. Reports the inner EMA until
/// it is ready to feed the second stage.
#[derive(Debug)]
pub struct Dema {
    base: IndicatorBase,
    period: usize,
    volume_factor: f64,
    ema1: Ema,
    ema2: Ema,
}

impl Dema {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let mut dema = Self::with_volume_factor(period, 1.0)?;
        dema.base.rename(format!("DEMA({period})"));
        Ok(dema)
    }

    /// Generalized DEMA as used by the T3 moving average.
    pub fn with_volume_factor(period: usize, volume_factor: f64) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!("DEMA({period},{volume_factor})")),
            period,
            volume_factor,
            ema1: Ema::new(period)?,
            ema2: Ema::new(period)?,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Dema {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.ema2.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        2 * self.period - 1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        let e1 = self.ema1.update(input)?;
        if !self.ema1.is_ready() {
            return Ok(e1.price);
        }

        let e2 = self.ema2.update(&e1)?;
        let v = self.volume_factor;
        Ok(e1.price * (1.0 + v) - e2.price * v)
    }

    fn reset_state(&mut self) {
        self.ema1.reset();
        self.ema2.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, feed};

    #[test]
    fn test_dema_values() {
        let mut dema = Dema::new(2).unwrap();
        let values = feed(&mut dema, &[1.0, 2.0, 3.0]);

        assert_approx!(values[0], 1.0);
        assert_approx!(values[1], 5.0 / 3.0);
        assert_approx!(values[2], 77.0 / 27.0);
    }

    #[test]
    fn test_dema_warm_up() {
        let mut dema = Dema::new(3).unwrap();
        assert_eq!(dema.warm_up_period(), 5);

        feed(&mut dema, &[1.0; 4]);
        assert!(!dema.is_ready());
        dema.update(&crate::test_util::point(5, 1.0)).unwrap();
        assert!(dema.is_ready());
    }

    #[test]
    fn test_dema_flat_input() {
        let mut dema = Dema::with_volume_factor(4, 0.7).unwrap();
        let values = feed(&mut dema, &[42.0; 10]);
        assert!(values.iter().all(|&v| (v - 42.0).abs() < 1e-9));
    }
}

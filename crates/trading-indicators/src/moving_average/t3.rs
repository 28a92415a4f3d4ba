//! Tillson T3 moving average.

use trading_core::{require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult};

use super::Dema;

/// Tillson T3: three generalized DEMAs chained, each fed once the previous
/// one is ready.
#[derive(Debug)]
pub struct T3 {
    base: IndicatorBase,
    period: usize,
    gd1: Dema,
    gd2: Dema,
    gd3: Dema,
}

impl T3 {
    /// T3 with the customary volume factor of 0.7.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Self::with_volume_factor(period, 0.7)
    }

    pub fn with_volume_factor(period: usize, volume_factor: f64) -> IndicatorResult<Self> {
        let period = require_period("T3", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("T3({period},{volume_factor})")),
            period,
            gd1: Dema::with_volume_factor(period, volume_factor)?,
            gd2: Dema::with_volume_factor(period, volume_factor)?,
            gd3: Dema::with_volume_factor(period, volume_factor)?,
        })
    }
}

impl Indicator for T3 {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.gd3.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        6 * self.period - 5
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        let first = self.gd1.update(input)?;
        if !self.gd1.is_ready() {
            return Ok(first.price);
        }

        let second = self.gd2.update(&first)?;
        if !self.gd2.is_ready() {
            return Ok(second.price);
        }

        Ok(self.gd3.update(&second)?.price)
    }

    fn reset_state(&mut self) {
        self.gd1.reset();
        self.gd2.reset();
        self.gd3.reset();
    }
}

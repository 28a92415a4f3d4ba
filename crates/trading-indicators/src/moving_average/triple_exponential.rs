//! Triple exponential moving average.

use trading_core::{require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult};

use super::Ema;

/// Triple Exponential Moving Average (TEMA): `3*E1 - 3*E2 + E3` where each
/// stage smooths the previous one once it is ready.
#[derive(Debug)]
pub struct Tema {
    base: IndicatorBase,
    period: usize,
    ema1: Ema,
    ema2: Ema,
    ema3: Ema,
}

impl Tema {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("TEMA", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("TEMA({period})")),
            period,
            ema1: Ema::new(period)?,
            ema2: Ema::new(period)?,
            ema3: Ema::new(period)?,
        })
    }
}

impl Indicator for Tema {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.ema3.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        3 * self.period - 2
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        let e1 = self.ema1.update(input)?;
        if !self.ema1.is_ready() {
            return Ok(e1.price);
        }

        let e2 = self.ema2.update(&e1)?;
        if !self.ema2.is_ready() {
            return Ok(e2.price);
        }

        let e3 = self.ema3.update(&e2)?;
        Ok(3.0 * e1.price - 3.0 * e2.price + e3.price)
    }

    fn reset_state(&mut self) {
        self.ema1.reset();
        self.ema2.reset();
        self.ema3.reset();
    }
}

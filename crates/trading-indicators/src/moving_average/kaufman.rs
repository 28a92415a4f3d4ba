//! Kaufman adaptive moving average.

use trading_core::{
    require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorError, IndicatorResult,
    RollingWindow,
};

/// Kaufman Adaptive Moving Average (KAMA).
///
/// Smoothing adapts to the efficiency ratio: net price change over the
/// window divided by the sum of absolute bar-to-bar changes. Trending
/// markets move the average at close to the fast rate, choppy markets at
/// close to the slow rate. Reports the raw price until the window fills.
#[derive(Debug)]
pub struct Kama {
    base: IndicatorBase,
    period: usize,
    fast_sc: f64,
    slow_sc: f64,
    prices: RollingWindow<f64>,
    changes: RollingWindow<f64>,
    volatility: f64,
}

impl Kama {
    /// KAMA with the customary fast = 2 and slow = 30 smoothing periods.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Self::with_periods(period, 2, 30)
    }

    pub fn with_periods(period: usize, fast: usize, slow: usize) -> IndicatorResult<Self> {
        let period = require_period("KAMA", period)?;
        require_period("KAMA fast", fast)?;
        if fast >= slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "KAMA fast period ({fast}) must be shorter than slow period ({slow})"
            )));
        }

        Ok(Self {
            base: IndicatorBase::new(format!("KAMA({period},{fast},{slow})")),
            period,
            fast_sc: 2.0 / (fast as f64 + 1.0),
            slow_sc: 2.0 / (slow as f64 + 1.0),
            prices: RollingWindow::new(period + 1)?,
            changes: RollingWindow::new(period)?,
            volatility: 0.0,
        })
    }

    fn efficiency_ratio(&self, price: f64) -> f64 {
        let change = self.prices.oldest().map_or(0.0, |&past| (price - past).abs());
        if self.volatility <= change || self.volatility < f64::EPSILON {
            1.0
        } else {
            change / self.volatility
        }
    }
}

impl Indicator for Kama {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.prices.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.period + 1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        let price = input.price;

        if let Some(&previous) = self.prices.newest() {
            let change = (price - previous).abs();
            self.volatility += change;
            if let Some(&removed) = self.changes.add(change) {
                self.volatility -= removed;
            }
        }
        self.prices.add(price);

        if !self.prices.is_ready() {
            return Ok(price);
        }

        let er = self.efficiency_ratio(price);
        let sc = (er * (self.fast_sc - self.slow_sc) + self.slow_sc).powi(2);

        // The first full window seeds from the prior price.
        let previous = if self.prices.samples() == self.period + 1 {
            self.prices[1]
        } else {
            self.current().price
        };

        Ok(previous + sc * (price - previous))
    }

    fn reset_state(&mut self) {
        self.prices.reset();
        self.changes.reset();
        self.volatility = 0.0;
    }
}

//! Building blocks: pass-through, constant, lag and momentum indicators.

use trading_core::{
    require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult, RollingWindow,
};

/// Passes each input through unchanged.
///
/// Used as the value holder behind derived outputs such as band width or a
/// MACD histogram.
#[derive(Debug)]
pub struct Identity {
    base: IndicatorBase,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: IndicatorBase::new(name),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new("Identity")
    }
}

impl Indicator for Identity {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.samples() > 0
    }

    fn warm_up_period(&self) -> usize {
        1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(input.price)
    }
}

/// Always reports the value it was built with.
///
/// The value is configuration, so it survives [`Indicator::reset`].
#[derive(Debug)]
pub struct Constant {
    base: IndicatorBase,
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        let mut constant = Self {
            base: IndicatorBase::new(format!("Constant({value})")),
            value,
        };
        constant.restore_value();
        constant
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    fn restore_value(&mut self) {
        let current = self.base.current().with_price(self.value);
        self.base.set_current(current);
    }
}

impl Indicator for Constant {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn warm_up_period(&self) -> usize {
        0
    }

    fn compute_next_value(&mut self, _input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(self.value)
    }

    fn reset_state(&mut self) {
        self.restore_value();
    }
}

/// Outputs the input seen `period` updates ago, or 0 until that far back exists.
#[derive(Debug)]
pub struct Delay {
    base: IndicatorBase,
    period: usize,
    window: RollingWindow<f64>,
}

impl Delay {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("Delay", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("DELAY({period})")),
            period,
            window: RollingWindow::new(period + 1)?,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Delay {
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
        self.period + 1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        self.window.add(input.price);
        if !self.window.is_ready() {
            return Ok(0.0);
        }
        Ok(self.window.oldest().copied().unwrap_or_default())
    }

    fn reset_state(&mut self) {
        self.window.reset();
    }
}

/// Shared window for the momentum family: the newest price and the one
/// `period` updates before it.
#[derive(Debug)]
struct Lookback {
    period: usize,
    window: RollingWindow<f64>,
}

impl Lookback {
    fn new(indicator: &str, period: usize) -> IndicatorResult<Self> {
        let period = require_period(indicator, period)?;
        Ok(Self {
            period,
            window: RollingWindow::new(period + 1)?,
        })
    }

    /// Push a price, returning `(price, price period updates ago)` once known.
    fn push(&mut self, price: f64) -> Option<(f64, f64)> {
        self.window.add(price);
        if !self.window.is_ready() {
            return None;
        }
        self.window.oldest().map(|&past| (price, past))
    }
}

/// Difference between the current price and the price `period` updates ago.
#[derive(Debug)]
pub struct Momentum {
    base: IndicatorBase,
    lookback: Lookback,
}

impl Momentum {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!("MOM({period})")),
            lookback: Lookback::new("Momentum", period)?,
        })
    }
}

impl Indicator for Momentum {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.lookback.window.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.lookback.period + 1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(self
            .lookback
            .push(input.price)
            .map_or(0.0, |(price, past)| price - past))
    }

    fn reset_state(&mut self) {
        self.lookback.window.reset();
    }
}

/// Fractional change over `period` updates: `(price - past) / past`.
///
/// Reports 0 while the past price is unknown or zero.
#[derive(Debug)]
pub struct RateOfChange {
    base: IndicatorBase,
    lookback: Lookback,
}

impl RateOfChange {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!("ROC({period})")),
            lookback: Lookback::new("RateOfChange", period)?,
        })
    }

    fn next_ratio(&mut self, price: f64) -> f64 {
        match self.lookback.push(price) {
            Some((price, past)) if past != 0.0 => (price - past) / past,
            _ => 0.0,
        }
    }
}

impl Indicator for RateOfChange {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.lookback.window.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.lookback.period + 1
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(self.next_ratio(input.price))
    }

    fn reset_state(&mut self) {
        self.lookback.window.reset();
    }
}

/// [`RateOfChange`] expressed in percent.
#[derive(Debug)]
pub struct RateOfChangePercent {
    base: IndicatorBase,
    roc: RateOfChange,
}

impl RateOfChangePercent {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!("ROCP({period})")),
            roc: RateOfChange::new(period)?,
        })
    }
}

impl Indicator for RateOfChangePercent {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.roc.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.roc.warm_up_period()
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(self.roc.next_ratio(input.price) * 100.0)
    }

    fn reset_state(&mut self) {
        self.roc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, feed, point};

    #[test]
    fn test_identity_passes_through() {
        let mut identity = Identity::default();
        assert!(!identity.is_ready());

        assert_eq!(feed(&mut identity, &[3.0, -1.5]), vec![3.0, -1.5]);
        assert!(identity.is_ready());
    }

    #[test]
    fn test_constant_survives_reset() {
        let mut constant = Constant::new(2.5);
        assert!(constant.is_ready());
        assert_eq!(constant.current().price, 2.5);

        feed(&mut constant, &[10.0, 20.0]);
        assert_eq!(constant.current().price, 2.5);

        constant.reset();
        assert_eq!(constant.samples(), 0);
        assert_eq!(constant.current().price, 2.5);
    }

    #[test]
    fn test_delay_lags_by_period() {
        let mut delay = Delay::new(2).unwrap();
        let values = feed(&mut delay, &[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(values, vec![0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(delay.warm_up_period(), 3);
        assert!(delay.is_ready());
    }

    #[test]
    fn test_delay_rejects_zero_period() {
        assert!(Delay::new(0).is_err());
    }

    #[test]
    fn test_momentum() {
        let mut momentum = Momentum::new(2).unwrap();
        let values = feed(&mut momentum, &[5.0, 7.0, 10.0, 8.0]);

        assert_eq!(values, vec![0.0, 0.0, 5.0, 1.0]);
        assert!(momentum.is_ready());
    }

    #[test]
    fn test_rate_of_change() {
        let mut roc = RateOfChange::new(1).unwrap();
        let values = feed(&mut roc, &[10.0, 12.0, 9.0]);

        assert_approx!(values[1], 0.2);
        assert_approx!(values[2], -0.25);
    }

    #[test]
    fn test_rate_of_change_zero_base() {
        let mut roc = RateOfChange::new(1).unwrap();
        let values = feed(&mut roc, &[0.0, 5.0]);
        assert_eq!(values[1], 0.0);
    }

    #[test]
    fn test_rate_of_change_percent() {
        let mut rocp = RateOfChangePercent::new(1).unwrap();
        rocp.update(&point(1, 50.0)).unwrap();
        let value = rocp.update(&point(2, 55.0)).unwrap().price;

        assert_approx!(value, 10.0);
        rocp.reset();
        assert!(!rocp.is_ready());
    }
}

//! Linear regression channel.

use trading_core::{
    require_period, shared, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorError,
    IndicatorResult, Shared,
};

use crate::composite::{price_of, reset_shared, side_ready, update_shared};
use crate::extensions::IndicatorExtensions;
use crate::moving_average::Lsma;
use crate::statistics::StdDev;
use crate::volatility::Band;

/// Least-squares regression line with bands at `k` standard deviations.
///
/// The indicator's value is the regression line.
#[derive(Debug)]
pub struct RegressionChannel {
    base: IndicatorBase,
    period: usize,
    line: Shared<Lsma>,
    std_dev: Shared<StdDev>,
    upper: Shared<Band<Lsma, StdDev>>,
    lower: Shared<Band<Lsma, StdDev>>,
}

impl RegressionChannel {
    pub fn new(period: usize, k: f64) -> IndicatorResult<Self> {
        let period = require_period("RegressionChannel", period)?;
        if k <= 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "RegressionChannel multiplier must be positive, got {k}"
            )));
        }

        let line = shared(Lsma::new(period)?);
        let std_dev = shared(StdDev::new(period)?);
        let deviation = std_dev.times_value(k)?;
        let upper = line.plus(&deviation)?;
        let lower = line.minus(&deviation)?;

        Ok(Self {
            base: IndicatorBase::new(format!("LRC({period},{k})")),
            period,
            line,
            std_dev,
            upper,
            lower,
        })
    }

    pub fn line(&self) -> &Shared<Lsma> {
        &self.line
    }

    pub fn std_dev(&self) -> &Shared<StdDev> {
        &self.std_dev
    }

    pub fn upper(&self) -> &Shared<Band<Lsma, StdDev>> {
        &self.upper
    }

    pub fn lower(&self) -> &Shared<Band<Lsma, StdDev>> {
        &self.lower
    }

    /// Upper and lower band values.
    pub fn bands(&self) -> (f64, f64) {
        (price_of(&self.upper), price_of(&self.lower))
    }

    /// Slope of the current regression line.
    pub fn slope(&self) -> f64 {
        self.line.try_borrow().map(|l| l.slope()).unwrap_or_default()
    }
}

impl Indicator for RegressionChannel {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        side_ready(&self.line, false)
            && side_ready(&self.upper, false)
            && side_ready(&self.lower, false)
    }

    fn warm_up_period(&self) -> usize {
        self.period
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        update_shared(&self.std_dev, input)?;
        Ok(update_shared(&self.line, input)?.price)
    }

    fn reset_state(&mut self) {
        reset_shared(&self.line);
        reset_shared(&self.std_dev);
        reset_shared(&self.upper);
        reset_shared(&self.lower);
    }
}

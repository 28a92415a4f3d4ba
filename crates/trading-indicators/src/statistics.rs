//! Rolling statistics: sum, extrema, variance and dispersion.
//!
//! All dispersion measures use population normalization (divide by the
//! number of values in the window, not one less).

use trading_core::{
    require_period, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorResult, RollingWindow,
};

use crate::moving_average::Sma;

/// Sum of the last `period` inputs.
#[derive(Debug)]
pub struct Sum {
    base: IndicatorBase,
    window: RollingWindow<f64>,
    sum: f64,
}

impl Sum {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("Sum", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("SUM({period})")),
            window: RollingWindow::new(period)?,
            sum: 0.0,
        })
    }
}

impl Indicator for Sum {
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
        self.sum += input.price;
        if let Some(&removed) = self.window.add(input.price) {
            self.sum -= removed;
        }
        Ok(self.sum)
    }

    fn reset_state(&mut self) {
        self.window.reset();
        self.sum = 0.0;
    }
}

/// Rolling extreme with lazy rescan on eviction.
///
/// The tracked extreme is replaced whenever a new value matches or beats
/// it. Otherwise it ages by one update, and once it is old enough to have
/// left the window the remaining values are scanned for a new one.
#[derive(Debug)]
struct RollingExtreme {
    window: RollingWindow<f64>,
    extreme: f64,
    periods_since: usize,
    /// `true` when the first argument should replace the second.
    beats: fn(f64, f64) -> bool,
}

impl RollingExtreme {
    fn new(indicator: &str, period: usize, beats: fn(f64, f64) -> bool) -> IndicatorResult<Self> {
        let period = require_period(indicator, period)?;
        Ok(Self {
            window: RollingWindow::new(period)?,
            extreme: 0.0,
            periods_since: 0,
            beats,
        })
    }

    fn push(&mut self, value: f64) -> f64 {
        self.window.add(value);

        if self.window.samples() == 1 || value == self.extreme || (self.beats)(value, self.extreme)
        {
            self.extreme = value;
            self.periods_since = 0;
        } else if self.periods_since + 1 >= self.window.size() {
            self.rescan();
        } else {
            self.periods_since += 1;
        }

        self.extreme
    }

    fn rescan(&mut self) {
        let mut best = (0, self.window[0]);
        for (i, &value) in self.window.iter().enumerate().skip(1) {
            if (self.beats)(value, best.1) {
                best = (i, value);
            }
        }
        self.periods_since = best.0;
        self.extreme = best.1;
    }

    fn reset(&mut self) {
        self.window.reset();
        self.extreme = 0.0;
        self.periods_since = 0;
    }
}

/// Highest of the last `period` inputs.
#[derive(Debug)]
pub struct Maximum {
    base: IndicatorBase,
    extreme: RollingExtreme,
}

impl Maximum {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!("MAX({period})")),
            extreme: RollingExtreme::new("Maximum", period, |a, b| a > b)?,
        })
    }

    /// Updates since the current maximum was observed.
    pub fn periods_since_maximum(&self) -> usize {
        self.extreme.periods_since
    }
}

impl Indicator for Maximum {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.extreme.window.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.extreme.window.size()
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(self.extreme.push(input.price))
    }

    fn reset_state(&mut self) {
        self.extreme.reset();
    }
}

/// Lowest of the last `period` inputs.
#[derive(Debug)]
pub struct Minimum {
    base: IndicatorBase,
    extreme: RollingExtreme,
}

impl Minimum {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!("MIN({period})")),
            extreme: RollingExtreme::new("Minimum", period, |a, b| a < b)?,
        })
    }

    /// Updates since the current minimum was observed.
    pub fn periods_since_minimum(&self) -> usize {
        self.extreme.periods_since
    }
}

impl Indicator for Minimum {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.extreme.window.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.extreme.window.size()
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(self.extreme.push(input.price))
    }

    fn reset_state(&mut self) {
        self.extreme.reset();
    }
}

/// Population variance of the last `period` inputs.
#[derive(Debug)]
pub struct Variance {
    base: IndicatorBase,
    window: RollingWindow<f64>,
}

impl Variance {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("Variance", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("VAR({period})")),
            window: RollingWindow::new(period)?,
        })
    }
}

impl Indicator for Variance {
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
        let mean = self.window.iter().sum::<f64>() / n;
        let squares: f64 = self.window.iter().map(|x| (x - mean).powi(2)).sum();
        Ok(squares / n)
    }

    fn reset_state(&mut self) {
        self.window.reset();
    }
}

/// Population standard deviation of the last `period` inputs.
#[derive(Debug)]
pub struct StdDev {
    base: IndicatorBase,
    variance: Variance,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!("STD({period})")),
            variance: Variance::new(period)?,
        })
    }

    /// The variance this deviation is the root of.
    pub fn variance(&self) -> &Variance {
        &self.variance
    }
}

impl Indicator for StdDev {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.variance.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.variance.warm_up_period()
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(self.variance.update(input)?.price.sqrt())
    }

    fn reset_state(&mut self) {
        self.variance.reset();
    }
}

/// Mean absolute deviation of the last `period` inputs around their mean.
#[derive(Debug)]
pub struct MeanAbsoluteDeviation {
    base: IndicatorBase,
    window: RollingWindow<f64>,
    mean: Sma,
}

impl MeanAbsoluteDeviation {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("MeanAbsoluteDeviation", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("MAD({period})")),
            window: RollingWindow::new(period)?,
            mean: Sma::new(period)?,
        })
    }

    /// Mean of the window the deviation is measured against.
    pub fn mean(&self) -> &Sma {
        &self.mean
    }
}

impl Indicator for MeanAbsoluteDeviation {
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
        let mean = self.mean.update(input)?.price;
        let total: f64 = self.window.iter().map(|v| (v - mean).abs()).sum();
        Ok(total / self.window.count() as f64)
    }

    fn reset_state(&mut self) {
        self.window.reset();
        self.mean.reset();
    }
}

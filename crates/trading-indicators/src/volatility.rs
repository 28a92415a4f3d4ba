//! Volatility indicators: true range, ATR and price bands.

use serde::{Deserialize, Serialize};

use trading_core::{
    require_period, shared, Bar, BoxedIndicator, Indicator, IndicatorBase, IndicatorDataPoint,
    IndicatorError, IndicatorResult, Shared,
};

use crate::composite::{price_of, reset_shared, side_ready, update_shared, CompositeIndicator};
use crate::extensions::IndicatorExtensions;
use crate::moving_average::MovingAverageType;
use crate::primitives::{Constant, Identity};
use crate::statistics::{Maximum, Minimum, StdDev};

/// `middle ± k * dispersion`, as wired by the band indicators.
pub type Band<M, D> = CompositeIndicator<M, CompositeIndicator<D, Constant>>;

fn require_multiplier(indicator: &str, k: f64) -> IndicatorResult<f64> {
    if k <= 0.0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{indicator} multiplier must be positive, got {k}"
        )));
    }
    Ok(k)
}

/// Greatest of the bar's range and the gaps to the previous close.
#[derive(Debug)]
pub struct TrueRange {
    base: IndicatorBase,
    previous_close: Option<f64>,
}

impl TrueRange {
    pub fn new() -> Self {
        Self {
            base: IndicatorBase::new("TR"),
            previous_close: None,
        }
    }
}

impl Default for TrueRange {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for TrueRange {
    type Input = Bar;

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

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let tr = input.true_range(self.previous_close);
        self.previous_close = Some(input.close);
        Ok(tr)
    }

    fn reset_state(&mut self) {
        self.previous_close = None;
    }
}

/// Average True Range (ATR).
///
/// Measures market volatility by decomposing the entire range
/// of an asset price for that period. Smoothed with Wilder's average
/// unless another moving average is chosen.
#[derive(Debug)]
pub struct Atr {
    base: IndicatorBase,
    true_range: TrueRange,
    smoother: BoxedIndicator,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Self::with_ma_type(period, MovingAverageType::Wilders)
    }

    pub fn with_ma_type(period: usize, ma_type: MovingAverageType) -> IndicatorResult<Self> {
        let period = require_period("ATR", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("ATR({period})")),
            true_range: TrueRange::new(),
            smoother: ma_type.as_indicator(period)?,
        })
    }

    pub fn true_range(&self) -> &TrueRange {
        &self.true_range
    }
}

impl Indicator for Atr {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.smoother.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.smoother.warm_up_period()
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let tr = self.true_range.update(input)?;
        Ok(self.smoother.update(&tr)?.price)
    }

    fn reset_state(&mut self) {
        self.true_range.reset();
        self.smoother.reset();
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (moving average)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
    /// Bandwidth ((upper - lower) / middle)
    pub bandwidth: f64,
    /// %B ((price - lower) / (upper - lower))
    pub percent_b: f64,
}

impl BollingerOutput {
    fn from_bands(upper: f64, middle: f64, lower: f64, price: f64) -> Self {
        let bandwidth = if middle == 0.0 {
            0.0
        } else {
            (upper - lower) / middle
        };
        let percent_b = if upper == lower {
            0.5
        } else {
            (price - lower) / (upper - lower)
        };
        Self {
            upper,
            middle,
            lower,
            bandwidth,
            percent_b,
        }
    }

    /// Check if price is above upper band.
    pub fn is_overbought(&self, price: f64) -> bool {
        price > self.upper
    }

    /// Check if price is below lower band.
    pub fn is_oversold(&self, price: f64) -> bool {
        price < self.lower
    }
}

/// Bollinger Bands.
///
/// Consists of a middle band (moving average) with upper and lower bands
/// at a specified number of standard deviations. The indicator's own value
/// is the middle band.
#[derive(Debug)]
pub struct BollingerBands {
    base: IndicatorBase,
    warm_up: usize,
    middle: Shared<BoxedIndicator>,
    std_dev: Shared<StdDev>,
    upper: Shared<Band<BoxedIndicator, StdDev>>,
    lower: Shared<Band<BoxedIndicator, StdDev>>,
    band_width: Identity,
    percent_b: Identity,
}

impl BollingerBands {
    /// Create Bollinger Bands with the customary parameters (20, 2.0, SMA).
    pub fn new() -> IndicatorResult<Self> {
        Self::with_params(20, 2.0, MovingAverageType::Simple)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, k: f64, ma_type: MovingAverageType) -> IndicatorResult<Self> {
        let period = require_period("BollingerBands", period)?;
        let k = require_multiplier("BollingerBands", k)?;

        let middle = shared(ma_type.as_indicator(period)?);
        let std_dev = shared(StdDev::new(period)?);
        let deviation = std_dev.times_value(k)?;
        let upper = middle.plus(&deviation)?;
        let lower = middle.minus(&deviation)?;
        let warm_up = period.max(middle.borrow().warm_up_period());

        Ok(Self {
            base: IndicatorBase::new(format!("BB({period},{k})")),
            warm_up,
            middle,
            std_dev,
            upper,
            lower,
            band_width: Identity::new("BandWidth"),
            percent_b: Identity::new("%B"),
        })
    }

    pub fn middle(&self) -> &Shared<BoxedIndicator> {
        &self.middle
    }

    pub fn std_dev(&self) -> &Shared<StdDev> {
        &self.std_dev
    }

    pub fn upper(&self) -> &Shared<Band<BoxedIndicator, StdDev>> {
        &self.upper
    }

    pub fn lower(&self) -> &Shared<Band<BoxedIndicator, StdDev>> {
        &self.lower
    }

    /// `(upper - lower) / middle`, 0 when the middle band is 0.
    pub fn band_width(&self) -> &Identity {
        &self.band_width
    }

    /// `(price - lower) / (upper - lower)`, 0.5 when the bands coincide.
    pub fn percent_b(&self) -> &Identity {
        &self.percent_b
    }

    /// Snapshot of all band values.
    pub fn output(&self) -> BollingerOutput {
        BollingerOutput {
            upper: price_of(&self.upper),
            middle: price_of(&self.middle),
            lower: price_of(&self.lower),
            bandwidth: self.band_width.current().price,
            percent_b: self.percent_b.current().price,
        }
    }
}

impl Indicator for BollingerBands {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        side_ready(&self.middle, false)
            && side_ready(&self.upper, false)
            && side_ready(&self.lower, false)
    }

    fn warm_up_period(&self) -> usize {
        self.warm_up
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        update_shared(&self.std_dev, input)?;
        let middle = update_shared(&self.middle, input)?.price;

        if side_ready(&self.upper, false) && side_ready(&self.lower, false) {
            let output = BollingerOutput::from_bands(
                price_of(&self.upper),
                middle,
                price_of(&self.lower),
                input.price,
            );
            self.band_width.update(&input.with_price(output.bandwidth))?;
            self.percent_b.update(&input.with_price(output.percent_b))?;
        }

        Ok(middle)
    }

    fn reset_state(&mut self) {
        reset_shared(&self.middle);
        reset_shared(&self.std_dev);
        reset_shared(&self.upper);
        reset_shared(&self.lower);
        self.band_width.reset();
        self.percent_b.reset();
    }
}

/// Keltner Channels: a moving average of the close with bands at a
/// multiple of the ATR.
#[derive(Debug)]
pub struct KeltnerChannels {
    base: IndicatorBase,
    warm_up: usize,
    middle: Shared<BoxedIndicator>,
    atr: Shared<Atr>,
    upper: Shared<Band<BoxedIndicator, Atr>>,
    lower: Shared<Band<BoxedIndicator, Atr>>,
}

impl KeltnerChannels {
    /// Keltner Channels with the customary parameters (20, 2.0, EMA).
    pub fn new() -> IndicatorResult<Self> {
        Self::with_params(20, 2.0, MovingAverageType::Exponential)
    }

    pub fn with_params(period: usize, k: f64, ma_type: MovingAverageType) -> IndicatorResult<Self> {
        let period = require_period("KeltnerChannels", period)?;
        let k = require_multiplier("KeltnerChannels", k)?;

        let middle = shared(ma_type.as_indicator(period)?);
        let atr = shared(Atr::with_ma_type(period, ma_type)?);
        let offset = atr.times_value(k)?;
        let upper = middle.plus(&offset)?;
        let lower = middle.minus(&offset)?;
        let warm_up = middle.borrow().warm_up_period().max(atr.borrow().warm_up_period());

        Ok(Self {
            base: IndicatorBase::new(format!("KC({period},{k})")),
            warm_up,
            middle,
            atr,
            upper,
            lower,
        })
    }

    pub fn middle(&self) -> &Shared<BoxedIndicator> {
        &self.middle
    }

    pub fn atr(&self) -> &Shared<Atr> {
        &self.atr
    }

    pub fn upper(&self) -> &Shared<Band<BoxedIndicator, Atr>> {
        &self.upper
    }

    pub fn lower(&self) -> &Shared<Band<BoxedIndicator, Atr>> {
        &self.lower
    }

    /// Snapshot of the channel relative to `price`.
    pub fn output(&self, price: f64) -> BollingerOutput {
        BollingerOutput::from_bands(
            price_of(&self.upper),
            price_of(&self.middle),
            price_of(&self.lower),
            price,
        )
    }
}

impl Indicator for KeltnerChannels {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        side_ready(&self.middle, false)
            && side_ready(&self.upper, false)
            && side_ready(&self.lower, false)
    }

    fn warm_up_period(&self) -> usize {
        self.warm_up
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        update_shared(&self.atr, input)?;
        Ok(update_shared(&self.middle, &IndicatorDataPoint::from(input))?.price)
    }

    fn reset_state(&mut self) {
        reset_shared(&self.middle);
        reset_shared(&self.atr);
        reset_shared(&self.upper);
        reset_shared(&self.lower);
    }
}

/// Donchian Channel: highest high and lowest low, reported as their midpoint.
#[derive(Debug)]
pub struct DonchianChannel {
    base: IndicatorBase,
    upper: Maximum,
    lower: Minimum,
}

impl DonchianChannel {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Self::with_periods(period, period)
    }

    pub fn with_periods(upper_period: usize, lower_period: usize) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!("DCH({upper_period},{lower_period})")),
            upper: Maximum::new(upper_period)?,
            lower: Minimum::new(lower_period)?,
        })
    }

    pub fn upper(&self) -> &Maximum {
        &self.upper
    }

    pub fn lower(&self) -> &Minimum {
        &self.lower
    }
}

impl Indicator for DonchianChannel {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.upper.is_ready() && self.lower.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.upper.warm_up_period().max(self.lower.warm_up_period())
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let upper = self.upper.update(&input.point(input.high))?.price;
        let lower = self.lower.update(&input.point(input.low))?.price;
        Ok((upper + lower) / 2.0)
    }

    fn reset_state(&mut self) {
        self.upper.reset();
        self.lower.reset();
    }
}

//! Trend indicators: directional movement, parabolic SAR and Ichimoku.

use trading_core::{
    require_period, Bar, Indicator, IndicatorBase, IndicatorError, IndicatorResult, RollingWindow,
};

use crate::primitives::{Delay, Identity};
use crate::statistics::{Maximum, Minimum};

/// Average Directional Index (ADX).
///
/// Wilder's trend strength measure. True range and directional movement
/// are kept as Wilder running sums; the first ADX is the mean of the first
/// `period` DX values, so the indicator is ready after `2 * period` bars.
#[derive(Debug)]
pub struct Adx {
    base: IndicatorBase,
    period: usize,
    previous: Option<Bar>,
    true_range: f64,
    plus_dm: f64,
    minus_dm: f64,
    plus_di: f64,
    minus_di: f64,
    dx_sum: f64,
    adx: f64,
}

impl Adx {
    /// Create a new ADX, commonly over 14 bars.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("ADX", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("ADX({period})")),
            period,
            previous: None,
            true_range: 0.0,
            plus_dm: 0.0,
            minus_dm: 0.0,
            plus_di: 0.0,
            minus_di: 0.0,
            dx_sum: 0.0,
            adx: 0.0,
        })
    }

    /// +DI of the latest bar.
    pub fn positive_directional_index(&self) -> f64 {
        self.plus_di
    }

    /// -DI of the latest bar.
    pub fn negative_directional_index(&self) -> f64 {
        self.minus_di
    }

    fn directional_movement(previous: &Bar, bar: &Bar) -> (f64, f64) {
        let up = bar.high - previous.high;
        let down = previous.low - bar.low;
        let plus = if up > down && up > 0.0 { up } else { 0.0 };
        let minus = if down > up && down > 0.0 { down } else { 0.0 };
        (plus, minus)
    }
}

impl Indicator for Adx {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.samples() >= 2 * self.period
    }

    fn warm_up_period(&self) -> usize {
        2 * self.period
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let Some(previous) = self.previous.replace(*input) else {
            return Ok(0.0);
        };

        let period = self.period as f64;
        let tr = input.true_range(Some(previous.close));
        let (plus, minus) = Self::directional_movement(&previous, input);

        let samples = self.samples();
        if samples <= self.period {
            self.true_range += tr;
            self.plus_dm += plus;
            self.minus_dm += minus;
            return Ok(0.0);
        }

        self.true_range += tr - self.true_range / period;
        self.plus_dm += plus - self.plus_dm / period;
        self.minus_dm += minus - self.minus_dm / period;

        (self.plus_di, self.minus_di) = if self.true_range == 0.0 {
            (0.0, 0.0)
        } else {
            (
                100.0 * self.plus_dm / self.true_range,
                100.0 * self.minus_dm / self.true_range,
            )
        };

        let di_sum = self.plus_di + self.minus_di;
        let dx = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (self.plus_di - self.minus_di).abs() / di_sum
        };

        let dx_count = samples - self.period;
        if dx_count < self.period {
            self.dx_sum += dx;
            return Ok(0.0);
        }
        if dx_count == self.period {
            self.dx_sum += dx;
            self.adx = self.dx_sum / period;
        } else {
            self.adx = (self.adx * (period - 1.0) + dx) / period;
        }

        Ok(self.adx)
    }

    fn reset_state(&mut self) {
        self.previous = None;
        self.true_range = 0.0;
        self.plus_dm = 0.0;
        self.minus_dm = 0.0;
        self.plus_di = 0.0;
        self.minus_di = 0.0;
        self.dx_sum = 0.0;
        self.adx = 0.0;
    }
}

/// Average Directional Movement Rating: mean of the current ADX and the
/// ADX `period - 1` bars earlier.
#[derive(Debug)]
pub struct Adxr {
    base: IndicatorBase,
    adx: Adx,
    history: RollingWindow<f64>,
}

impl Adxr {
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("ADXR", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("ADXR({period})")),
            adx: Adx::new(period)?,
            history: RollingWindow::new(period)?,
        })
    }

    pub fn adx(&self) -> &Adx {
        &self.adx
    }
}

impl Indicator for Adxr {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.history.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.adx.warm_up_period() + self.history.size() - 1
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let adx = self.adx.update(input)?.price;
        if !self.adx.is_ready() {
            return Ok(0.0);
        }

        self.history.add(adx);
        if !self.history.is_ready() {
            return Ok(0.0);
        }
        let earlier = self.history.oldest().copied().unwrap_or(adx);
        Ok((adx + earlier) / 2.0)
    }

    fn reset_state(&mut self) {
        self.adx.reset();
        self.history.reset();
    }
}

/// Parabolic Stop And Reverse.
///
/// The direction is taken from the directional movement of the second
/// bar; after that the stop trails the extreme point with an acceleration
/// factor that grows by `af_increment` on each new extreme, up to `af_max`.
#[derive(Debug)]
pub struct ParabolicSar {
    base: IndicatorBase,
    af_start: f64,
    af_increment: f64,
    af_max: f64,
    af: f64,
    is_long: bool,
    sar: f64,
    extreme: f64,
    previous: Option<Bar>,
}

impl ParabolicSar {
    /// Create with the customary factors (0.02, 0.02, 0.2).
    pub fn new() -> IndicatorResult<Self> {
        Self::with_factors(0.02, 0.02, 0.2)
    }

    pub fn with_factors(af_start: f64, af_increment: f64, af_max: f64) -> IndicatorResult<Self> {
        if !(af_start > 0.0 && af_increment > 0.0 && af_start <= af_max) {
            return Err(IndicatorError::InvalidParameter(format!(
                "PSAR factors must satisfy 0 < start <= max and increment > 0, \
                 got ({af_start}, {af_increment}, {af_max})"
            )));
        }
        Ok(Self {
            base: IndicatorBase::new(format!("PSAR({af_start},{af_increment},{af_max})")),
            af_start,
            af_increment,
            af_max,
            af: af_start,
            is_long: true,
            sar: 0.0,
            extreme: 0.0,
            previous: None,
        })
    }

    /// `true` while the stop sits below price.
    pub fn is_long(&self) -> bool {
        self.is_long
    }

    fn start(&mut self, previous: &Bar, bar: &Bar) {
        let plus_dm = bar.high - previous.high;
        let minus_dm = previous.low - bar.low;
        self.is_long = !(minus_dm > 0.0 && minus_dm > plus_dm);
        self.af = self.af_start;
        if self.is_long {
            self.extreme = bar.high;
            self.sar = previous.low;
        } else {
            self.extreme = bar.low;
            self.sar = previous.high;
        }
    }

    fn long_step(&mut self, previous: &Bar, bar: &Bar) -> f64 {
        if bar.low <= self.sar {
            self.is_long = false;
            let output = self.extreme.max(previous.high).max(bar.high);
            self.af = self.af_start;
            self.extreme = bar.low;
            self.sar = (output + self.af * (self.extreme - output))
                .max(previous.high)
                .max(bar.high);
            return output;
        }

        let output = self.sar;
        if bar.high > self.extreme {
            self.extreme = bar.high;
            self.af = (self.af + self.af_increment).min(self.af_max);
        }
        self.sar = (self.sar + self.af * (self.extreme - self.sar))
            .min(previous.low)
            .min(bar.low);
        output
    }

    fn short_step(&mut self, previous: &Bar, bar: &Bar) -> f64 {
        if bar.high >= self.sar {
            self.is_long = true;
            let output = self.extreme.min(previous.low).min(bar.low);
            self.af = self.af_start;
            self.extreme = bar.high;
            self.sar = (output + self.af * (self.extreme - output))
                .min(previous.low)
                .min(bar.low);
            return output;
        }

        let output = self.sar;
        if bar.low < self.extreme {
            self.extreme = bar.low;
            self.af = (self.af + self.af_increment).min(self.af_max);
        }
        self.sar = (self.sar + self.af * (self.extreme - self.sar))
            .max(previous.high)
            .max(bar.high);
        output
    }
}

impl Indicator for ParabolicSar {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.samples() >= 2
    }

    fn warm_up_period(&self) -> usize {
        2
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let Some(previous) = self.previous.replace(*input) else {
            return Ok(input.close);
        };

        if self.samples() == 2 {
            self.start(&previous, input);
        }

        Ok(if self.is_long {
            self.long_step(&previous, input)
        } else {
            self.short_step(&previous, input)
        })
    }

    fn reset_state(&mut self) {
        self.af = self.af_start;
        self.is_long = true;
        self.sar = 0.0;
        self.extreme = 0.0;
        self.previous = None;
    }
}

/// Midpoint of the highest high and lowest low over one period.
#[derive(Debug)]
struct MidRange {
    maximum: Maximum,
    minimum: Minimum,
}

impl MidRange {
    fn new(period: usize) -> IndicatorResult<Self> {
        Ok(Self {
            maximum: Maximum::new(period)?,
            minimum: Minimum::new(period)?,
        })
    }

    /// Push a bar, returning the midpoint once the window is full.
    fn push(&mut self, bar: &Bar) -> IndicatorResult<Option<f64>> {
        let high = self.maximum.update(&bar.point(bar.high))?.price;
        let low = self.minimum.update(&bar.point(bar.low))?.price;
        let ready = self.maximum.is_ready() && self.minimum.is_ready();
        Ok(ready.then(|| (high + low) / 2.0))
    }

    fn period(&self) -> usize {
        self.maximum.warm_up_period()
    }

    fn reset(&mut self) {
        self.maximum.reset();
        self.minimum.reset();
    }
}

/// Ichimoku Kinko Hyo.
///
/// Tenkan-sen and Kijun-sen are mid-ranges over short and medium windows.
/// Senkou Span A is their mean and Senkou Span B a long mid-range, both
/// shifted by their delays; Chikou Span is the close shifted by its own.
/// The indicator's value is the Tenkan-sen.
#[derive(Debug)]
pub struct Ichimoku {
    base: IndicatorBase,
    tenkan_range: MidRange,
    kijun_range: MidRange,
    senkou_b_range: MidRange,
    tenkan: Identity,
    kijun: Identity,
    senkou_a: Delay,
    senkou_b: Delay,
    chikou: Delay,
}

impl Ichimoku {
    /// Ichimoku with the customary periods (9, 26, 26, 52, 26, 26).
    pub fn standard() -> IndicatorResult<Self> {
        Self::new(9, 26, 26, 52, 26, 26)
    }

    pub fn new(
        tenkan_period: usize,
        kijun_period: usize,
        senkou_a_delay: usize,
        senkou_b_period: usize,
        senkou_b_delay: usize,
        chikou_delay: usize,
    ) -> IndicatorResult<Self> {
        Ok(Self {
            base: IndicatorBase::new(format!(
                "ICHIMOKU({tenkan_period},{kijun_period},{senkou_a_delay},\
                 {senkou_b_period},{senkou_b_delay},{chikou_delay})"
            )),
            tenkan_range: MidRange::new(tenkan_period)?,
            kijun_range: MidRange::new(kijun_period)?,
            senkou_b_range: MidRange::new(senkou_b_period)?,
            tenkan: Identity::new("Tenkan"),
            kijun: Identity::new("Kijun"),
            senkou_a: Delay::new(senkou_a_delay)?.with_name("SenkouA"),
            senkou_b: Delay::new(senkou_b_delay)?.with_name("SenkouB"),
            chikou: Delay::new(chikou_delay)?.with_name("Chikou"),
        })
    }

    pub fn tenkan(&self) -> &Identity {
        &self.tenkan
    }

    pub fn kijun(&self) -> &Identity {
        &self.kijun
    }

    pub fn senkou_a(&self) -> &Delay {
        &self.senkou_a
    }

    pub fn senkou_b(&self) -> &Delay {
        &self.senkou_b
    }

    pub fn chikou(&self) -> &Delay {
        &self.chikou
    }
}

impl Indicator for Ichimoku {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.tenkan.is_ready()
            && self.kijun.is_ready()
            && self.senkou_a.is_ready()
            && self.senkou_b.is_ready()
            && self.chikou.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        let lines = self.tenkan_range.period().max(self.kijun_range.period());
        (lines + self.senkou_a.period())
            .max(self.senkou_b_range.period() + self.senkou_b.period())
            .max(self.chikou.warm_up_period())
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        if let Some(mid) = self.tenkan_range.push(input)? {
            self.tenkan.update(&input.point(mid))?;
        }
        if let Some(mid) = self.kijun_range.push(input)? {
            self.kijun.update(&input.point(mid))?;
        }
        if self.tenkan.is_ready() && self.kijun.is_ready() {
            let span_a = (self.tenkan.current().price + self.kijun.current().price) / 2.0;
            self.senkou_a.update(&input.point(span_a))?;
        }
        if let Some(mid) = self.senkou_b_range.push(input)? {
            self.senkou_b.update(&input.point(mid))?;
        }
        self.chikou.update(&input.point(input.close))?;

        Ok(if self.tenkan.is_ready() {
            self.tenkan.current().price
        } else {
            0.0
        })
    }

    fn reset_state(&mut self) {
        self.tenkan_range.reset();
        self.kijun_range.reset();
        self.senkou_b_range.reset();
        self.tenkan.reset();
        self.kijun.reset();
        self.senkou_a.reset();
        self.senkou_b.reset();
        self.chikou.reset();
    }
}

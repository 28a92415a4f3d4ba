//! Fractal adaptive moving average.

use trading_core::{
    require_period, Bar, Indicator, IndicatorBase, IndicatorError, IndicatorResult, RollingWindow,
};

/// Fractal Adaptive Moving Average (FRAMA).
///
/// Estimates the fractal dimension `D` of the last `period` bars from the
/// high-low ranges of each half and of the whole window, then smooths the
/// close with `alpha = exp(w * (D - 1))`, `w = ln(2 / (slow + 1))`, clamped
/// to `[0.01, 1]`. Reports the close until the window fills.
#[derive(Debug)]
pub struct Frama {
    base: IndicatorBase,
    period: usize,
    w: f64,
    highs: RollingWindow<f64>,
    lows: RollingWindow<f64>,
}

impl Frama {
    /// FRAMA with the customary slow period of 198.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        Self::with_slow_period(period, 198)
    }

    pub fn with_slow_period(period: usize, slow: usize) -> IndicatorResult<Self> {
        let period = require_period("FRAMA", period)?;
        if period % 2 != 0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "FRAMA period must be even, got {period}"
            )));
        }
        let slow = require_period("FRAMA slow", slow)?;

        Ok(Self {
            base: IndicatorBase::new(format!("FRAMA({period},{slow})")),
            period,
            w: (2.0 / (slow as f64 + 1.0)).ln(),
            highs: RollingWindow::new(period)?,
            lows: RollingWindow::new(period)?,
        })
    }

    /// Average range per bar over window indices `[from, to)`.
    fn density(&self, from: usize, to: usize) -> f64 {
        let high = self.highs.iter().skip(from).take(to - from).fold(f64::MIN, |a, &b| a.max(b));
        let low = self.lows.iter().skip(from).take(to - from).fold(f64::MAX, |a, &b| a.min(b));
        (high - low) / (to - from) as f64
    }
}

impl Indicator for Frama {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.highs.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.period
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        self.highs.add(input.high);
        self.lows.add(input.low);
        if !self.highs.is_ready() {
            return Ok(input.close);
        }

        let half = self.period / 2;
        let n1 = self.density(0, half);
        let n2 = self.density(half, self.period);
        let n3 = self.density(0, self.period);

        let dimension = if n1 > 0.0 && n2 > 0.0 && n3 > 0.0 {
            ((n1 + n2).ln() - n3.ln()) / std::f64::consts::LN_2
        } else {
            0.0
        };
        let alpha = (self.w * (dimension - 1.0)).exp().clamp(0.01, 1.0);

        let previous = self.current().price;
        Ok(alpha * input.close + (1.0 - alpha) * previous)
    }

    fn reset_state(&mut self) {
        self.highs.reset();
        self.lows.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, bars, feed_bars};

    #[test]
    fn test_frama_trend_follows_close() {
        let mut frama = Frama::new(4).unwrap();
        // Steady trend: dimension 1, alpha 1
        let input = bars(&[
            (1.0, 2.0, 1.0, 1.5),
            (2.0, 3.0, 2.0, 2.5),
            (3.0, 4.0, 3.0, 3.5),
            (4.0, 5.0, 4.0, 4.5),
        ]);
        let values = feed_bars(&mut frama, &input);

        assert!(frama.is_ready());
        assert_approx!(values[3], 4.5);
    }

    #[test]
    fn test_frama_range_smooths_slowly() {
        let mut frama = Frama::new(4).unwrap();
        // Overlapping ranges: dimension 2, alpha 2 / 199
        let input = bars(&[
            (10.0, 11.0, 9.0, 10.0),
            (10.0, 11.0, 9.0, 10.0),
            (10.0, 11.0, 9.0, 10.0),
            (10.0, 11.0, 9.0, 12.0),
        ]);
        let values = feed_bars(&mut frama, &input);

        assert_approx!(values[3], 10.0 + 2.0 / 199.0 * 2.0);
    }

    #[test]
    fn test_frama_requires_even_period() {
        assert!(Frama::new(5).is_err());
    }
}

//! Volume-weighted indicators.

use trading_core::{require_period, Bar, Indicator, IndicatorBase, IndicatorResult};

use crate::statistics::Sum;

/// On Balance Volume: running total of volume signed by the direction of
/// the close.
#[derive(Debug)]
pub struct Obv {
    base: IndicatorBase,
    previous_close: Option<f64>,
}

impl Obv {
    pub fn new() -> Self {
        Self {
            base: IndicatorBase::new("OBV"),
            previous_close: None,
        }
    }
}

impl Default for Obv {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Obv {
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
        let Some(previous) = self.previous_close.replace(input.close) else {
            return Ok(input.volume);
        };

        let obv = self.current().price;
        Ok(if input.close > previous {
            obv + input.volume
        } else if input.close < previous {
            obv - input.volume
        } else {
            obv
        })
    }

    fn reset_state(&mut self) {
        self.previous_close = None;
    }
}

/// Money Flow Index: a volume-weighted RSI over the typical price.
#[derive(Debug)]
pub struct Mfi {
    base: IndicatorBase,
    positive_flow: Sum,
    negative_flow: Sum,
    previous_typical: Option<f64>,
}

impl Mfi {
    /// Create a new MFI, commonly over 14 bars.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        let period = require_period("MFI", period)?;
        Ok(Self {
            base: IndicatorBase::new(format!("MFI({period})")),
            positive_flow: Sum::new(period)?,
            negative_flow: Sum::new(period)?,
            previous_typical: None,
        })
    }
}

impl Indicator for Mfi {
    type Input = Bar;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.positive_flow.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.positive_flow.warm_up_period() + 1
    }

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        let typical = input.typical_price();
        let Some(previous) = self.previous_typical.replace(typical) else {
            return Ok(0.0);
        };

        let flow = typical * input.volume;
        let (positive, negative) = if typical > previous {
            (flow, 0.0)
        } else if typical < previous {
            (0.0, flow)
        } else {
            (0.0, 0.0)
        };

        let positive = self.positive_flow.update(&input.point(positive))?.price;
        let negative = self.negative_flow.update(&input.point(negative))?.price;

        let total = positive + negative;
        if total == 0.0 {
            return Ok(100.0);
        }
        Ok(100.0 * positive / total)
    }

    fn reset_state(&mut self) {
        self.positive_flow.reset();
        self.negative_flow.reset();
        self.previous_typical = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, feed_bars, ohlcv};

    #[test]
    fn test_obv() {
        let mut obv = Obv::new();
        let input = [
            ohlcv(1, 10.0, 10.0, 10.0, 10.0, 100.0),
            ohlcv(2, 11.0, 11.0, 11.0, 11.0, 200.0),
            ohlcv(3, 10.5, 10.5, 10.5, 10.5, 150.0),
            ohlcv(4, 10.5, 10.5, 10.5, 10.5, 50.0),
        ];

        assert_eq!(feed_bars(&mut obv, &input), vec![100.0, 300.0, 150.0, 150.0]);
        assert!(obv.is_ready());
    }

    #[test]
    fn test_mfi() {
        let mut mfi = Mfi::new(2).unwrap();
        assert_eq!(mfi.warm_up_period(), 3);

        let input: Vec<_> = [10.0, 11.0, 10.0, 12.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| ohlcv(i as i64 + 1, c, c, c, c, 1.0))
            .collect();
        let values = feed_bars(&mut mfi, &input);

        assert!(mfi.is_ready());
        assert_approx!(values[2], 1100.0 / 21.0);
        assert_approx!(values[3], 1200.0 / 22.0);
    }

    #[test]
    fn test_mfi_flat_prices() {
        let mut mfi = Mfi::new(2).unwrap();
        let input: Vec<_> = (1..=3).map(|n| ohlcv(n, 5.0, 5.0, 5.0, 5.0, 10.0)).collect();
        let values = feed_bars(&mut mfi, &input);
        assert_approx!(values[2], 100.0);
    }
}

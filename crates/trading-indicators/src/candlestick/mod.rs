//! Candlestick pattern detectors.
//!
//! A [`Candlestick`] keeps the last bars in a window and asks its
//! [`Pattern`] rule whether the newest candles form the pattern. Rules
//! judge "long", "short" or "near" against trailing averages of the
//! candles before the one being judged, configured per [`CandleSettingType`]
//! with the TA-Lib defaults. Output is `1` for a bullish match, `-1` for a
//! bearish one and `0` otherwise.

mod single;
mod three_bar;
mod two_bar;

pub use single::{Doji, Hammer, HangingMan, InvertedHammer, Marubozu, ShootingStar};
pub use three_bar::{EveningStar, MorningStar, ThreeBlackCrows, ThreeWhiteSoldiers};
pub use two_bar::{DarkCloudCover, Engulfing, Harami, Piercing};

use serde::{Deserialize, Serialize};
use trading_core::{Bar, Indicator, IndicatorBase, IndicatorResult, RollingWindow};

/// Which part of a candle a setting measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeType {
    /// `|close - open|`
    RealBody,
    /// `high - low`
    HighLow,
    /// Upper plus lower shadow; averages are halved.
    Shadows,
}

impl RangeType {
    pub fn measure(self, bar: &Bar) -> f64 {
        match self {
            RangeType::RealBody => bar.body(),
            RangeType::HighLow => bar.range(),
            RangeType::Shadows => bar.upper_shadow() + bar.lower_shadow(),
        }
    }
}

/// Named thresholds used by the pattern rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleSettingType {
    BodyLong,
    BodyVeryLong,
    BodyShort,
    BodyDoji,
    ShadowLong,
    ShadowVeryLong,
    ShadowShort,
    ShadowVeryShort,
    Near,
    Far,
    Equal,
}

impl CandleSettingType {
    const ALL: [CandleSettingType; 11] = [
        CandleSettingType::BodyLong,
        CandleSettingType::BodyVeryLong,
        CandleSettingType::BodyShort,
        CandleSettingType::BodyDoji,
        CandleSettingType::ShadowLong,
        CandleSettingType::ShadowVeryLong,
        CandleSettingType::ShadowShort,
        CandleSettingType::ShadowVeryShort,
        CandleSettingType::Near,
        CandleSettingType::Far,
        CandleSettingType::Equal,
    ];

    /// TA-Lib default for this setting.
    pub fn default_setting(self) -> CandleSetting {
        use CandleSettingType::*;
        use RangeType::*;

        let (range_type, avg_period, factor) = match self {
            BodyLong => (RealBody, 10, 1.0),
            BodyVeryLong => (RealBody, 10, 3.0),
            BodyShort => (RealBody, 10, 1.0),
            BodyDoji => (HighLow, 10, 0.1),
            ShadowLong => (RealBody, 0, 1.0),
            ShadowVeryLong => (RealBody, 0, 2.0),
            ShadowShort => (Shadows, 10, 1.0),
            ShadowVeryShort => (HighLow, 10, 0.1),
            Near => (HighLow, 5, 0.2),
            Far => (HighLow, 5, 0.6),
            Equal => (HighLow, 5, 0.05),
        };
        CandleSetting {
            range_type,
            avg_period,
            factor,
        }
    }
}

/// Threshold definition: `factor` times the average `range_type` over the
/// `avg_period` preceding candles, or over the judged candle itself when
/// `avg_period` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleSetting {
    pub range_type: RangeType,
    pub avg_period: usize,
    pub factor: f64,
}

/// Full table of candle settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSettings {
    settings: [CandleSetting; 11],
}

impl CandleSettings {
    pub fn get(&self, kind: CandleSettingType) -> CandleSetting {
        self.settings[kind as usize]
    }

    pub fn set(&mut self, kind: CandleSettingType, setting: CandleSetting) {
        self.settings[kind as usize] = setting;
    }

    /// Longest averaging period among `kinds`.
    fn longest(&self, kinds: &[CandleSettingType]) -> usize {
        kinds
            .iter()
            .map(|&kind| self.get(kind).avg_period)
            .max()
            .unwrap_or(0)
    }
}

impl Default for CandleSettings {
    fn default() -> Self {
        Self {
            settings: CandleSettingType::ALL.map(CandleSettingType::default_setting),
        }
    }
}

/// Read-only view of the newest candles handed to a [`Pattern`].
///
/// Candles are addressed by age: `0` is the newest bar.
pub struct Candles<'a> {
    window: &'a RollingWindow<Bar>,
    settings: &'a CandleSettings,
}

impl<'a> Candles<'a> {
    pub fn new(window: &'a RollingWindow<Bar>, settings: &'a CandleSettings) -> Self {
        Self { window, settings }
    }

    pub fn candle(&self, age: usize) -> Bar {
        self.window.get(age).copied().unwrap_or_default()
    }

    /// Threshold of `kind` for the candle at `age`.
    pub fn average(&self, kind: CandleSettingType, age: usize) -> f64 {
        let setting = self.settings.get(kind);
        let mean = if setting.avg_period == 0 {
            setting.range_type.measure(&self.candle(age))
        } else {
            let total: f64 = self
                .window
                .iter()
                .skip(age + 1)
                .take(setting.avg_period)
                .map(|bar| setting.range_type.measure(bar))
                .sum();
            total / setting.avg_period as f64
        };

        let divisor = if setting.range_type == RangeType::Shadows {
            2.0
        } else {
            1.0
        };
        setting.factor * mean / divisor
    }
}

/// Gap between the real bodies of a candle and the earlier one.
pub(crate) fn body_gap_up(later: &Bar, earlier: &Bar) -> bool {
    later.open.min(later.close) > earlier.open.max(earlier.close)
}

pub(crate) fn body_gap_down(later: &Bar, earlier: &Bar) -> bool {
    later.open.max(later.close) < earlier.open.min(earlier.close)
}

/// Bullish (+1) or bearish (-1) direction of a candle.
pub(crate) fn color(bar: &Bar) -> f64 {
    if bar.is_bullish() {
        1.0
    } else {
        -1.0
    }
}

/// A candlestick pattern rule.
pub trait Pattern {
    const NAME: &'static str;

    /// Number of candles making up the pattern.
    const LENGTH: usize;

    /// Settings the rule reads through [`Candles::average`].
    const SETTINGS: &'static [CandleSettingType];

    /// `1` bullish, `-1` bearish, `0` no match.
    fn detect(&self, candles: &Candles<'_>) -> f64;
}

/// Streams bars through a [`Pattern`].
#[derive(Debug)]
pub struct Candlestick<P> {
    base: IndicatorBase,
    pattern: P,
    settings: CandleSettings,
    window: RollingWindow<Bar>,
}

impl<P: Pattern> Candlestick<P> {
    pub fn new(pattern: P) -> IndicatorResult<Self> {
        Self::with_settings(pattern, CandleSettings::default())
    }

    pub fn with_settings(pattern: P, settings: CandleSettings) -> IndicatorResult<Self> {
        let size = P::LENGTH + settings.longest(P::SETTINGS);
        Ok(Self {
            base: IndicatorBase::new(P::NAME),
            pattern,
            settings,
            window: RollingWindow::new(size)?,
        })
    }

    pub fn pattern(&self) -> &P {
        &self.pattern
    }

    pub fn settings(&self) -> &CandleSettings {
        &self.settings
    }
}

impl<P: Pattern> Indicator for Candlestick<P> {
    type Input = Bar;

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

    fn compute_next_value(&mut self, input: &Bar) -> IndicatorResult<f64> {
        self.window.add(*input);
        if !self.window.is_ready() {
            return Ok(0.0);
        }
        Ok(self.pattern.detect(&Candles::new(&self.window, &self.settings)))
    }

    fn reset_state(&mut self) {
        self.window.reset();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, ohlc};

    #[test]
    fn test_default_settings() {
        let settings = CandleSettings::default();
        let doji = settings.get(CandleSettingType::BodyDoji);

        assert_eq!(doji.range_type, RangeType::HighLow);
        assert_eq!(doji.avg_period, 10);
        assert_approx!(doji.factor, 0.1);
        assert_eq!(settings.get(CandleSettingType::Near).avg_period, 5);
    }

    #[test]
    fn test_average_uses_preceding_candles() {
        let mut window = RollingWindow::new(3).unwrap();
        window.add(ohlc(1, 10.0, 12.0, 10.0, 11.0));
        window.add(ohlc(2, 10.0, 14.0, 10.0, 12.0));
        window.add(ohlc(3, 10.0, 10.5, 10.0, 10.5));

        let mut settings = CandleSettings::default();
        settings.set(
            CandleSettingType::BodyLong,
            CandleSetting {
                range_type: RangeType::RealBody,
                avg_period: 2,
                factor: 1.0,
            },
        );
        let candles = Candles::new(&window, &settings);

        // Bodies of the two candles before the newest: 2 and 1
        assert_approx!(candles.average(CandleSettingType::BodyLong, 0), 1.5);
        // Zero period measures the candle itself
        assert_approx!(candles.average(CandleSettingType::ShadowLong, 0), 0.5);
    }

    #[test]
    fn test_shadows_average_is_halved() {
        let mut window = RollingWindow::new(2).unwrap();
        window.add(ohlc(1, 10.0, 12.0, 9.0, 11.0));
        window.add(ohlc(2, 10.0, 10.0, 10.0, 10.0));

        let mut settings = CandleSettings::default();
        settings.set(
            CandleSettingType::ShadowShort,
            CandleSetting {
                range_type: RangeType::Shadows,
                avg_period: 1,
                factor: 1.0,
            },
        );
        let candles = Candles::new(&window, &settings);

        // Shadows 1 + 1 over one candle, halved
        assert_approx!(candles.average(CandleSettingType::ShadowShort, 0), 1.0);
    }

    #[test]
    fn test_warm_up_covers_averages() {
        let doji = Candlestick::new(Doji).unwrap();
        assert_eq!(doji.warm_up_period(), 11);
        assert_eq!(doji.name(), "Doji");

        let engulfing = Candlestick::new(Engulfing).unwrap();
        assert_eq!(engulfing.warm_up_period(), 2);
    }

    #[test]
    fn test_reset_clears_window() {
        let mut doji = Candlestick::new(Doji).unwrap();
        for n in 1..=11 {
            doji.update(&ohlc(n, 10.0, 11.0, 9.0, 10.0)).unwrap();
        }
        assert!(doji.is_ready());

        doji.reset();
        assert!(!doji.is_ready());
        assert_eq!(doji.samples(), 0);
    }
}

//! Patterns judged mostly on the shape of the newest candle.

use super::{body_gap_down, body_gap_up, color, CandleSettingType, Candles, Pattern};
use CandleSettingType::{BodyDoji, BodyLong, BodyShort, Near, ShadowLong, ShadowVeryShort};

/// Open and close (nearly) equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Doji;

impl Pattern for Doji {
    const NAME: &'static str = "Doji";
    const LENGTH: usize = 1;
    const SETTINGS: &'static [CandleSettingType] = &[BodyDoji];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let candle = candles.candle(0);
        if candle.body() <= candles.average(BodyDoji, 0) {
            1.0
        } else {
            0.0
        }
    }
}

/// Long body with (almost) no shadows, signed by the candle's color.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marubozu;

impl Pattern for Marubozu {
    const NAME: &'static str = "Marubozu";
    const LENGTH: usize = 1;
    const SETTINGS: &'static [CandleSettingType] = &[BodyLong, ShadowVeryShort];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let candle = candles.candle(0);
        let very_short = candles.average(ShadowVeryShort, 0);

        if candle.body() > candles.average(BodyLong, 0)
            && candle.upper_shadow() < very_short
            && candle.lower_shadow() < very_short
        {
            color(&candle)
        } else {
            0.0
        }
    }
}

/// Small body at the top of a long lower shadow.
fn is_umbrella(candles: &Candles<'_>) -> bool {
    let candle = candles.candle(0);
    candle.body() < candles.average(BodyShort, 0)
        && candle.lower_shadow() > candles.average(ShadowLong, 0)
        && candle.upper_shadow() < candles.average(ShadowVeryShort, 0)
}

/// Small body at the bottom of a long upper shadow.
fn is_inverted_umbrella(candles: &Candles<'_>) -> bool {
    let candle = candles.candle(0);
    candle.body() < candles.average(BodyShort, 0)
        && candle.upper_shadow() > candles.average(ShadowLong, 0)
        && candle.lower_shadow() < candles.average(ShadowVeryShort, 0)
}

/// Umbrella whose body sits at or near the previous candle's low.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hammer;

impl Pattern for Hammer {
    const NAME: &'static str = "Hammer";
    const LENGTH: usize = 2;
    const SETTINGS: &'static [CandleSettingType] = &[BodyShort, ShadowLong, ShadowVeryShort, Near];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let candle = candles.candle(0);
        let previous = candles.candle(1);

        if is_umbrella(candles)
            && candle.open.min(candle.close) <= previous.low + candles.average(Near, 1)
        {
            1.0
        } else {
            0.0
        }
    }
}

/// Umbrella whose body sits at or near the previous candle's high.
#[derive(Debug, Clone, Copy, Default)]
pub struct HangingMan;

impl Pattern for HangingMan {
    const NAME: &'static str = "HangingMan";
    const LENGTH: usize = 2;
    const SETTINGS: &'static [CandleSettingType] = &[BodyShort, ShadowLong, ShadowVeryShort, Near];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let candle = candles.candle(0);
        let previous = candles.candle(1);

        if is_umbrella(candles)
            && candle.open.min(candle.close) >= previous.high - candles.average(Near, 1)
        {
            -1.0
        } else {
            0.0
        }
    }
}

/// Inverted umbrella gapping down from the previous body.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvertedHammer;

impl Pattern for InvertedHammer {
    const NAME: &'static str = "InvertedHammer";
    const LENGTH: usize = 2;
    const SETTINGS: &'static [CandleSettingType] = &[BodyShort, ShadowLong, ShadowVeryShort];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        if is_inverted_umbrella(candles) && body_gap_down(&candles.candle(0), &candles.candle(1))
        {
            1.0
        } else {
            0.0
        }
    }
}

/// Inverted umbrella gapping up from the previous body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShootingStar;

impl Pattern for ShootingStar {
    const NAME: &'static str = "ShootingStar";
    const LENGTH: usize = 2;
    const SETTINGS: &'static [CandleSettingType] = &[BodyShort, ShadowLong, ShadowVeryShort];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        if is_inverted_umbrella(candles) && body_gap_up(&candles.candle(0), &candles.candle(1)) {
            -1.0
        } else {
            0.0
        }
    }
}

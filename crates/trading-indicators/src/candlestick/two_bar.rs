//! Two-candle reversal patterns.

use super::{color, CandleSettingType, Candles, Pattern};
use CandleSettingType::{BodyLong, BodyShort};

/// Body of the newest candle engulfs the opposite-colored body before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engulfing;

impl Pattern for Engulfing {
    const NAME: &'static str = "Engulfing";
    const LENGTH: usize = 2;
    const SETTINGS: &'static [CandleSettingType] = &[];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let candle = candles.candle(0);
        let previous = candles.candle(1);

        let bullish = candle.is_bullish()
            && previous.is_bearish()
            && candle.close >= previous.open
            && candle.open <= previous.close
            && (candle.close > previous.open || candle.open < previous.close);
        let bearish = candle.is_bearish()
            && previous.is_bullish()
            && candle.open >= previous.close
            && candle.close <= previous.open
            && (candle.open > previous.close || candle.close < previous.open);

        if bullish {
            1.0
        } else if bearish {
            -1.0
        } else {
            0.0
        }
    }
}

/// Short body contained in the long body before it; the direction is
/// opposite to the long candle's color.
#[derive(Debug, Clone, Copy, Default)]
pub struct Harami;

impl Pattern for Harami {
    const NAME: &'static str = "Harami";
    const LENGTH: usize = 2;
    const SETTINGS: &'static [CandleSettingType] = &[BodyLong, BodyShort];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let candle = candles.candle(0);
        let previous = candles.candle(1);

        let contained = candle.open.max(candle.close) < previous.open.max(previous.close)
            && candle.open.min(candle.close) > previous.open.min(previous.close);

        if previous.body() > candles.average(BodyLong, 1)
            && candle.body() <= candles.average(BodyShort, 0)
            && contained
        {
            -color(&previous)
        } else {
            0.0
        }
    }
}

/// Black candle opening above a long white candle's high and closing
/// deep into its body.
#[derive(Debug, Clone, Copy)]
pub struct DarkCloudCover {
    /// Fraction of the white body the close must penetrate.
    pub penetration: f64,
}

impl Default for DarkCloudCover {
    fn default() -> Self {
        Self { penetration: 0.5 }
    }
}

impl Pattern for DarkCloudCover {
    const NAME: &'static str = "DarkCloudCover";
    const LENGTH: usize = 2;
    const SETTINGS: &'static [CandleSettingType] = &[BodyLong];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let candle = candles.candle(0);
        let previous = candles.candle(1);

        if previous.is_bullish()
            && previous.body() > candles.average(BodyLong, 1)
            && candle.is_bearish()
            && candle.open > previous.high
            && candle.close > previous.open
            && candle.close < previous.close - previous.body() * self.penetration
        {
            -1.0
        } else {
            0.0
        }
    }
}

/// Long white candle opening below a long black candle's low and closing
/// above the middle of its body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Piercing;

impl Pattern for Piercing {
    const NAME: &'static str = "Piercing";
    const LENGTH: usize = 2;
    const SETTINGS: &'static [CandleSettingType] = &[BodyLong];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let candle = candles.candle(0);
        let previous = candles.candle(1);

        if previous.is_bearish()
            && previous.body() > candles.average(BodyLong, 1)
            && candle.is_bullish()
            && candle.body() > candles.average(BodyLong, 0)
            && candle.open < previous.low
            && candle.close < previous.open
            && candle.close > previous.close + previous.body() * 0.5
        {
            1.0
        } else {
            0.0
        }
    }
}

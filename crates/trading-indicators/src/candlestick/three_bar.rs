//! Three-candle patterns: stars, soldiers and crows.

use super::{body_gap_down, body_gap_up, CandleSettingType, Candles, Pattern};
use CandleSettingType::{BodyLong, BodyShort, Far, Near, ShadowVeryShort};

/// Long black candle, a short body gapping below it, then a white candle
/// closing well into the first body.
#[derive(Debug, Clone, Copy)]
pub struct MorningStar {
    pub penetration: f64,
}

impl Default for MorningStar {
    fn default() -> Self {
        Self { penetration: 0.3 }
    }
}

impl Pattern for MorningStar {
    const NAME: &'static str = "MorningStar";
    const LENGTH: usize = 3;
    const SETTINGS: &'static [CandleSettingType] = &[BodyLong, BodyShort];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let first = candles.candle(2);
        let star = candles.candle(1);
        let last = candles.candle(0);

        if first.is_bearish()
            && first.body() > candles.average(BodyLong, 2)
            && star.body() <= candles.average(BodyShort, 1)
            && body_gap_down(&star, &first)
            && last.is_bullish()
            && last.body() > candles.average(BodyShort, 0)
            && last.close > first.close + first.body() * self.penetration
        {
            1.0
        } else {
            0.0
        }
    }
}

/// Long white candle, a short body gapping above it, then a black candle
/// closing well into the first body.
#[derive(Debug, Clone, Copy)]
pub struct EveningStar {
    pub penetration: f64,
}

impl Default for EveningStar {
    fn default() -> Self {
        Self { penetration: 0.3 }
    }
}

impl Pattern for EveningStar {
    const NAME: &'static str = "EveningStar";
    const LENGTH: usize = 3;
    const SETTINGS: &'static [CandleSettingType] = &[BodyLong, BodyShort];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let first = candles.candle(2);
        let star = candles.candle(1);
        let last = candles.candle(0);

        if first.is_bullish()
            && first.body() > candles.average(BodyLong, 2)
            && star.body() <= candles.average(BodyShort, 1)
            && body_gap_up(&star, &first)
            && last.is_bearish()
            && last.body() > candles.average(BodyShort, 0)
            && last.close < first.close - first.body() * self.penetration
        {
            -1.0
        } else {
            0.0
        }
    }
}

/// Three rising white candles, each opening within or near the previous
/// body and closing near its high.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeWhiteSoldiers;

impl Pattern for ThreeWhiteSoldiers {
    const NAME: &'static str = "ThreeWhiteSoldiers";
    const LENGTH: usize = 3;
    const SETTINGS: &'static [CandleSettingType] = &[ShadowVeryShort, Near, Far, BodyShort];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let first = candles.candle(2);
        let second = candles.candle(1);
        let third = candles.candle(0);

        let all_white = first.is_bullish() && second.is_bullish() && third.is_bullish();
        let rising = second.close > first.close && third.close > second.close;
        if !(all_white && rising) {
            return 0.0;
        }

        let short_upper = [(&first, 2), (&second, 1), (&third, 0)]
            .iter()
            .all(|&(candle, age)| candle.upper_shadow() < candles.average(ShadowVeryShort, age));

        let opens_in_body = second.open > first.open
            && second.open <= first.close + candles.average(Near, 2)
            && third.open > second.open
            && third.open <= second.close + candles.average(Near, 1);

        let not_shrinking = second.body() > first.body() - candles.average(Far, 2)
            && third.body() > second.body() - candles.average(Far, 1);

        if short_upper
            && opens_in_body
            && not_shrinking
            && third.body() > candles.average(BodyShort, 0)
        {
            1.0
        } else {
            0.0
        }
    }
}

/// A white candle followed by three falling black candles, each opening
/// within the previous body and closing near its low.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeBlackCrows;

impl Pattern for ThreeBlackCrows {
    const NAME: &'static str = "ThreeBlackCrows";
    const LENGTH: usize = 4;
    const SETTINGS: &'static [CandleSettingType] = &[ShadowVeryShort];

    fn detect(&self, candles: &Candles<'_>) -> f64 {
        let prior = candles.candle(3);
        let first = candles.candle(2);
        let second = candles.candle(1);
        let third = candles.candle(0);

        let all_black = first.is_bearish() && second.is_bearish() && third.is_bearish();
        let falling = second.close < first.close && third.close < second.close;
        if !(prior.is_bullish() && all_black && falling) {
            return 0.0;
        }

        let short_lower = [(&first, 2), (&second, 1), (&third, 0)]
            .iter()
            .all(|&(candle, age)| candle.lower_shadow() < candles.average(ShadowVeryShort, age));

        let opens_in_body = second.open < first.open
            && second.open > first.close
            && third.open < second.open
            && third.open > second.close;

        if short_lower && opens_in_body && first.close < prior.high {
            -1.0
        } else {
            0.0
        }
    }
}

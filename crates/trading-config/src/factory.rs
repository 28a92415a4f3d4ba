//! Turns settings into live indicators.

use std::collections::HashSet;
use tracing::debug;

use trading_core::{
    Bar, BoxedBarIndicator, BoxedIndicator, Indicator, IndicatorDataPoint, IndicatorResult,
};
use trading_indicators::candlestick::{
    DarkCloudCover, Doji, Engulfing, EveningStar, Hammer, HangingMan, Harami, InvertedHammer,
    Marubozu, MorningStar, Piercing, ShootingStar, ThreeBlackCrows, ThreeWhiteSoldiers,
};
use trading_indicators::{
    Adx, Adxr, Atr, BollingerBands, Candlestick, Cci, Delay, DonchianChannel, Ema, Frama,
    Ichimoku, KeltnerChannels, Macd, Maximum, Mfi, Minimum, Momentum, Obv, ParabolicSar,
    RateOfChange, RateOfChangePercent, RegressionChannel, Rsi, Sma, StdDev, Stochastic,
    TrueRange, WilliamsR,
};

use crate::error::SettingsError;
use crate::settings::{
    AppConfig, BarIndicatorSettings, BarIndicatorSpec, PatternKind, PriceIndicatorSettings,
    PriceIndicatorSpec,
};

impl PriceIndicatorSpec {
    /// Construct the described indicator.
    pub fn build(&self) -> IndicatorResult<BoxedIndicator> {
        Ok(match *self {
            Self::Sma { period } => Box::new(Sma::new(period)?),
            Self::Ema { period } => Box::new(Ema::new(period)?),
            Self::MovingAverage { ma_type, period } => ma_type.as_indicator(period)?,
            Self::Momentum { period } => Box::new(Momentum::new(period)?),
            Self::RateOfChange { period } => Box::new(RateOfChange::new(period)?),
            Self::RateOfChangePercent { period } => Box::new(RateOfChangePercent::new(period)?),
            Self::Delay { period } => Box::new(Delay::new(period)?),
            Self::Maximum { period } => Box::new(Maximum::new(period)?),
            Self::Minimum { period } => Box::new(Minimum::new(period)?),
            Self::StdDev { period } => Box::new(StdDev::new(period)?),
            Self::Rsi { period, ma_type } => Box::new(Rsi::with_ma_type(period, ma_type)?),
            Self::Macd {
                fast,
                slow,
                signal,
                ma_type,
            } => Box::new(Macd::with_ma_type(fast, slow, signal, ma_type)?),
            Self::BollingerBands { period, k, ma_type } => {
                Box::new(BollingerBands::with_params(period, k, ma_type)?)
            }
            Self::RegressionChannel { period, k } => Box::new(RegressionChannel::new(period, k)?),
        })
    }
}

impl PatternKind {
    fn build(self) -> IndicatorResult<BoxedBarIndicator> {
        Ok(match self {
            Self::Doji => Box::new(Candlestick::new(Doji)?),
            Self::Marubozu => Box::new(Candlestick::new(Marubozu)?),
            Self::Hammer => Box::new(Candlestick::new(Hammer)?),
            Self::HangingMan => Box::new(Candlestick::new(HangingMan)?),
            Self::InvertedHammer => Box::new(Candlestick::new(InvertedHammer)?),
            Self::ShootingStar => Box::new(Candlestick::new(ShootingStar)?),
            Self::Engulfing => Box::new(Candlestick::new(Engulfing)?),
            Self::Harami => Box::new(Candlestick::new(Harami)?),
            Self::DarkCloudCover => Box::new(Candlestick::new(DarkCloudCover::default())?),
            Self::Piercing => Box::new(Candlestick::new(Piercing)?),
            Self::MorningStar => Box::new(Candlestick::new(MorningStar::default())?),
            Self::EveningStar => Box::new(Candlestick::new(EveningStar::default())?),
            Self::ThreeWhiteSoldiers => Box::new(Candlestick::new(ThreeWhiteSoldiers)?),
            Self::ThreeBlackCrows => Box::new(Candlestick::new(ThreeBlackCrows)?),
        })
    }
}

impl BarIndicatorSpec {
    /// Construct the described indicator.
    pub fn build(&self) -> IndicatorResult<BoxedBarIndicator> {
        Ok(match *self {
            Self::TrueRange => Box::new(TrueRange::new()),
            Self::Atr { period, ma_type } => Box::new(Atr::with_ma_type(period, ma_type)?),
            Self::KeltnerChannels { period, k, ma_type } => {
                Box::new(KeltnerChannels::with_params(period, k, ma_type)?)
            }
            Self::DonchianChannel {
                upper_period,
                lower_period,
            } => Box::new(DonchianChannel::with_periods(upper_period, lower_period)?),
            Self::Stochastic {
                period,
                k_period,
                d_period,
            } => Box::new(Stochastic::new(period, k_period, d_period)?),
            Self::WilliamsR { period } => Box::new(WilliamsR::new(period)?),
            Self::Cci { period } => Box::new(Cci::new(period)?),
            Self::Adx { period } => Box::new(Adx::new(period)?),
            Self::Adxr { period } => Box::new(Adxr::new(period)?),
            Self::ParabolicSar {
                af_start,
                af_increment,
                af_max,
            } => Box::new(ParabolicSar::with_factors(af_start, af_increment, af_max)?),
            Self::Ichimoku {
                tenkan_period,
                kijun_period,
                senkou_a_delay,
                senkou_b_period,
                senkou_b_delay,
                chikou_delay,
            } => Box::new(Ichimoku::new(
                tenkan_period,
                kijun_period,
                senkou_a_delay,
                senkou_b_period,
                senkou_b_delay,
                chikou_delay,
            )?),
            Self::Obv => Box::new(Obv::new()),
            Self::Mfi { period } => Box::new(Mfi::new(period)?),
            Self::Frama { period } => Box::new(Frama::new(period)?),
            Self::Candlestick { pattern } => pattern.build()?,
        })
    }
}

impl AppConfig {
    /// Build every configured indicator.
    ///
    /// Each indicator is renamed to its configured name; names must be
    /// unique across both lists.
    pub fn build(&self) -> Result<IndicatorSet, SettingsError> {
        let mut names = HashSet::new();
        let mut check_name = |name: &str| {
            if names.insert(name.to_string()) {
                Ok(())
            } else {
                Err(SettingsError::DuplicateName(name.to_string()))
            }
        };

        let mut price = Vec::with_capacity(self.price_indicators.len());
        for PriceIndicatorSettings { name, spec } in &self.price_indicators {
            check_name(name)?;
            let indicator = spec.build().map_err(|e| SettingsError::indicator(name, e))?;
            price.push(indicator.with_name(name.as_str()));
        }

        let mut bar = Vec::with_capacity(self.bar_indicators.len());
        for BarIndicatorSettings { name, spec } in &self.bar_indicators {
            check_name(name)?;
            let indicator = spec.build().map_err(|e| SettingsError::indicator(name, e))?;
            bar.push(indicator.with_name(name.as_str()));
        }

        debug!(
            price_indicators = price.len(),
            bar_indicators = bar.len(),
            "built indicator set"
        );
        Ok(IndicatorSet { price, bar })
    }
}

/// Indicators built from configuration, fed together from one bar stream.
#[derive(Debug)]
pub struct IndicatorSet {
    price: Vec<BoxedIndicator>,
    bar: Vec<BoxedBarIndicator>,
}

impl IndicatorSet {
    /// Feed `bar` to every bar indicator and its close to every price
    /// indicator, stopping at the first error.
    pub fn update(&mut self, bar: &Bar) -> IndicatorResult<()> {
        let close = IndicatorDataPoint::from(bar);
        for indicator in &mut self.price {
            indicator.update(&close)?;
        }
        for indicator in &mut self.bar {
            indicator.update(bar)?;
        }
        Ok(())
    }

    /// Current value of the named indicator.
    pub fn get(&self, name: &str) -> Option<IndicatorDataPoint> {
        self.price
            .iter()
            .map(|i| (i.name(), i.current(), i.is_ready()))
            .chain(self.bar.iter().map(|i| (i.name(), i.current(), i.is_ready())))
            .find(|(n, ..)| *n == name)
            .map(|(_, current, _)| current)
    }

    /// Names and values of the indicators that are ready.
    pub fn ready_values(&self) -> Vec<(&str, IndicatorDataPoint)> {
        let price = self.price.iter().map(|i| (i.name(), i.current(), i.is_ready()));
        let bar = self.bar.iter().map(|i| (i.name(), i.current(), i.is_ready()));
        price
            .chain(bar)
            .filter(|(.., ready)| *ready)
            .map(|(name, current, _)| (name, current))
            .collect()
    }

    pub fn price_indicators(&self) -> &[BoxedIndicator] {
        &self.price
    }

    pub fn bar_indicators(&self) -> &[BoxedBarIndicator] {
        &self.bar
    }

    pub fn price_indicators_mut(&mut self) -> &mut [BoxedIndicator] {
        &mut self.price
    }

    pub fn bar_indicators_mut(&mut self) -> &mut [BoxedBarIndicator] {
        &mut self.bar
    }

    pub fn len(&self) -> usize {
        self.price.len() + self.bar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset every indicator in the set.
    pub fn reset(&mut self) {
        self.price.iter_mut().for_each(|i| i.reset());
        self.bar.iter_mut().for_each(|i| i.reset());
    }
}

//! Streaming technical indicators.
//!
//! Every indicator implements [`trading_core::Indicator`] and is updated one
//! sample at a time, keeping only the rolling state it needs:
//! - Building blocks (identity, constant, delay, momentum, rate of change)
//! - Rolling statistics (sum, extremes, variance, standard deviation)
//! - Moving averages (SMA, EMA, WMA, DEMA, TEMA, TRIMA, KAMA, HMA, T3, ALMA, FRAMA, LSMA)
//! - Composites built from other indicators (`plus`, `over`, `of`, `weighted_by`)
//! - Bands and channels (Bollinger, Keltner, Donchian, regression)
//! - Oscillators, trend and volume indicators (RSI, MACD, ADX, PSAR, Ichimoku, MFI)
//! - Candlestick patterns

pub mod candlestick;
pub mod composite;
pub mod extensions;
pub mod momentum;
pub mod moving_average;
pub mod primitives;
pub mod regression;
pub mod statistics;
pub mod trend;
pub mod volatility;
pub mod volume;

#[cfg(test)]
mod test_util;

pub use candlestick::{CandleSettings, Candlestick, Pattern};
pub use composite::CompositeIndicator;
pub use extensions::{of, IndicatorExtensions, WeightedAverage};
pub use momentum::{Cci, Macd, MacdOutput, Rsi, Stochastic, StochasticOutput, WilliamsR};
pub use moving_average::{
    Alma, Dema, Ema, Frama, Hma, Kama, Lsma, MovingAverageType, Sma, Tema, Trima, Wma, T3,
};
pub use primitives::{Constant, Delay, Identity, Momentum, RateOfChange, RateOfChangePercent};
pub use regression::RegressionChannel;
pub use statistics::{Maximum, MeanAbsoluteDeviation, Minimum, StdDev, Sum, Variance};
pub use trend::{Adx, Adxr, Ichimoku, ParabolicSar};
pub use volatility::{
    Atr, BollingerBands, BollingerOutput, DonchianChannel, KeltnerChannels, TrueRange,
};
pub use volume::{Mfi, Obv};

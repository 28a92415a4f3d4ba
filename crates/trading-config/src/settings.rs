//! Configuration structures.

use serde::{Deserialize, Serialize};
use trading_indicators::MovingAverageType;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Indicators fed with each bar's close.
    #[serde(default)]
    pub price_indicators: Vec<PriceIndicatorSettings>,
    /// Indicators fed with whole bars.
    #[serde(default)]
    pub bar_indicators: Vec<BarIndicatorSettings>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A named indicator over single prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceIndicatorSettings {
    pub name: String,
    #[serde(flatten)]
    pub spec: PriceIndicatorSpec,
}

/// A named indicator over bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarIndicatorSettings {
    pub name: String,
    #[serde(flatten)]
    pub spec: BarIndicatorSpec,
}

fn default_k() -> f64 {
    2.0
}

fn wilders() -> MovingAverageType {
    MovingAverageType::Wilders
}

fn exponential() -> MovingAverageType {
    MovingAverageType::Exponential
}

/// Price indicator kinds and their parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PriceIndicatorSpec {
    Sma {
        period: usize,
    },
    Ema {
        period: usize,
    },
    MovingAverage {
        ma_type: MovingAverageType,
        period: usize,
    },
    Momentum {
        period: usize,
    },
    RateOfChange {
        period: usize,
    },
    RateOfChangePercent {
        period: usize,
    },
    Delay {
        period: usize,
    },
    Maximum {
        period: usize,
    },
    Minimum {
        period: usize,
    },
    StdDev {
        period: usize,
    },
    Rsi {
        period: usize,
        #[serde(default = "wilders")]
        ma_type: MovingAverageType,
    },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
        #[serde(default = "exponential")]
        ma_type: MovingAverageType,
    },
    BollingerBands {
        period: usize,
        #[serde(default = "default_k")]
        k: f64,
        #[serde(default)]
        ma_type: MovingAverageType,
    },
    RegressionChannel {
        period: usize,
        #[serde(default = "default_k")]
        k: f64,
    },
}

/// Candlestick pattern rules selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Doji,
    Marubozu,
    Hammer,
    HangingMan,
    InvertedHammer,
    ShootingStar,
    Engulfing,
    Harami,
    DarkCloudCover,
    Piercing,
    MorningStar,
    EveningStar,
    ThreeWhiteSoldiers,
    ThreeBlackCrows,
}

fn default_af_start() -> f64 {
    0.02
}

fn default_af_max() -> f64 {
    0.2
}

/// Bar indicator kinds and their parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BarIndicatorSpec {
    TrueRange,
    Atr {
        period: usize,
        #[serde(default = "wilders")]
        ma_type: MovingAverageType,
    },
    KeltnerChannels {
        period: usize,
        #[serde(default = "default_k")]
        k: f64,
        #[serde(default = "exponential")]
        ma_type: MovingAverageType,
    },
    DonchianChannel {
        upper_period: usize,
        lower_period: usize,
    },
    Stochastic {
        period: usize,
        k_period: usize,
        d_period: usize,
    },
    WilliamsR {
        period: usize,
    },
    Cci {
        period: usize,
    },
    Adx {
        period: usize,
    },
    Adxr {
        period: usize,
    },
    ParabolicSar {
        #[serde(default = "default_af_start")]
        af_start: f64,
        #[serde(default = "default_af_start")]
        af_increment: f64,
        #[serde(default = "default_af_max")]
        af_max: f64,
    },
    Ichimoku {
        tenkan_period: usize,
        kijun_period: usize,
        senkou_a_delay: usize,
        senkou_b_period: usize,
        senkou_b_delay: usize,
        chikou_delay: usize,
    },
    Obv,
    Mfi {
        period: usize,
    },
    Frama {
        period: usize,
    },
    Candlestick {
        pattern: PatternKind,
    },
}

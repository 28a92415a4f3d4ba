//! Moving average indicators.

mod arnaud_legoux;
mod double_exponential;
mod exponential;
mod fractal_adaptive;
mod hull;
mod kaufman;
mod least_squares;
mod simple;
mod t3;
mod triangular;
mod triple_exponential;
mod weighted;

pub use arnaud_legoux::Alma;
pub use double_exponential::Dema;
pub use exponential::Ema;
pub use fractal_adaptive::Frama;
pub use hull::Hma;
pub use kaufman::Kama;
pub use least_squares::Lsma;
pub use simple::Sma;
pub use t3::T3;
pub use triangular::Trima;
pub use triple_exponential::Tema;
pub use weighted::Wma;

use serde::{Deserialize, Serialize};
use std::fmt;
use trading_core::{BoxedIndicator, IndicatorResult};

/// Moving average selectable at runtime, e.g. from configuration or as the
/// smoothing stage of a band or oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovingAverageType {
    #[default]
    Simple,
    Exponential,
    Wilders,
    LinearWeighted,
    DoubleExponential,
    TripleExponential,
    Triangular,
    T3,
    Kama,
    Hull,
    Alma,
}

impl MovingAverageType {
    /// Build a moving average of this type over `period` values.
    pub fn as_indicator(self, period: usize) -> IndicatorResult<BoxedIndicator> {
        Ok(match self {
            MovingAverageType::Simple => Box::new(Sma::new(period)?),
            MovingAverageType::Exponential => Box::new(Ema::new(period)?),
            MovingAverageType::Wilders => Box::new(Ema::wilders(period)?),
            MovingAverageType::LinearWeighted => Box::new(Wma::new(period)?),
            MovingAverageType::DoubleExponential => Box::new(Dema::new(period)?),
            MovingAverageType::TripleExponential => Box::new(Tema::new(period)?),
            MovingAverageType::Triangular => Box::new(Trima::new(period)?),
            MovingAverageType::T3 => Box::new(T3::new(period)?),
            MovingAverageType::Kama => Box::new(Kama::new(period)?),
            MovingAverageType::Hull => Box::new(Hma::new(period)?),
            MovingAverageType::Alma => Box::new(Alma::new(period)?),
        })
    }
}

impl fmt::Display for MovingAverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MovingAverageType::Simple => "SMA",
            MovingAverageType::Exponential => "EMA",
            MovingAverageType::Wilders => "WILDERS",
            MovingAverageType::LinearWeighted => "LWMA",
            MovingAverageType::DoubleExponential => "DEMA",
            MovingAverageType::TripleExponential => "TEMA",
            MovingAverageType::Triangular => "TRIMA",
            MovingAverageType::T3 => "T3",
            MovingAverageType::Kama => "KAMA",
            MovingAverageType::Hull => "HMA",
            MovingAverageType::Alma => "ALMA",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::feed;
    use trading_core::Indicator;

    const ALL: [MovingAverageType; 11] = [
        MovingAverageType::Simple,
        MovingAverageType::Exponential,
        MovingAverageType::Wilders,
        MovingAverageType::LinearWeighted,
        MovingAverageType::DoubleExponential,
        MovingAverageType::TripleExponential,
        MovingAverageType::Triangular,
        MovingAverageType::T3,
        MovingAverageType::Kama,
        MovingAverageType::Hull,
        MovingAverageType::Alma,
    ];

    #[test]
    fn test_every_type_builds_and_warms_up() {
        for ma_type in ALL {
            let mut ma = ma_type.as_indicator(4).unwrap();
            let warm_up = ma.warm_up_period();

            feed(&mut ma, &vec![10.0; warm_up - 1]);
            assert!(!ma.is_ready(), "{ma_type} ready early");

            ma.update(&crate::test_util::point(warm_up as i64, 10.0)).unwrap();
            assert!(ma.is_ready(), "{ma_type} not ready after {warm_up}");
            assert!((ma.current().price - 10.0).abs() < 1e-9, "{ma_type} drifted on flat input");
        }
    }

    #[test]
    fn test_zero_period_rejected() {
        for ma_type in ALL {
            assert!(ma_type.as_indicator(0).is_err(), "{ma_type} accepted period 0");
        }
    }

    #[test]
    fn test_serde_names() {
        let parsed: MovingAverageType = serde_json::from_str("\"linear_weighted\"").unwrap();
        assert_eq!(parsed, MovingAverageType::LinearWeighted);
        assert_eq!(serde_json::to_string(&MovingAverageType::T3).unwrap(), "\"t3\"");
    }
}

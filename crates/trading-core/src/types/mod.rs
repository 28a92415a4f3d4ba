//! Core data types for the indicator engine.

mod data_point;
mod ohlcv;
mod rolling_window;

pub use data_point::{DataPoint, IndicatorDataPoint, TimeZone};
pub use ohlcv::Bar;
pub use rolling_window::RollingWindow;

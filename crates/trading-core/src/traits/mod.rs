//! Core traits for the indicator engine.

mod indicator;

pub use indicator::{
    BoxedBarIndicator, BoxedIndicator, Indicator, IndicatorBase, PriceIndicator, UpdatedListener,
};

//! Core types and traits for the streaming indicator engine.
//!
//! This crate provides the foundational building blocks including:
//! - Timestamped inputs (IndicatorDataPoint, Bar) and the DataPoint trait
//! - RollingWindow, the fixed-capacity history buffer
//! - The Indicator trait and the IndicatorBase update state machine
//! - DataFeed, which fans aggregator output out to registered indicators

pub mod error;
pub mod feed;
pub mod traits;
pub mod types;

pub use error::{require_period, IndicatorError, IndicatorResult};
pub use feed::{shared, DataFeed, Shared};
pub use traits::*;
pub use types::*;

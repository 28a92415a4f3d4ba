//! Indicator trait definitions.
//!
//! Every indicator embeds an [`IndicatorBase`] holding its name, current
//! value, sample count and `Updated` listeners. The provided
//! [`Indicator::update`] drives the shared state machine: it rejects
//! out-of-order input, ignores duplicate timestamps, runs the indicator's
//! own recurrence and notifies listeners once the indicator is ready.

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, trace};

use crate::error::{IndicatorError, IndicatorResult};
use crate::types::{Bar, DataPoint, IndicatorDataPoint, TimeZone};

/// Callback invoked synchronously with an indicator's new value.
pub type UpdatedListener = Box<dyn FnMut(&IndicatorDataPoint) -> IndicatorResult<()>>;

/// State shared by all indicators.
pub struct IndicatorBase {
    name: String,
    current: IndicatorDataPoint,
    samples: usize,
    listeners: Vec<UpdatedListener>,
}

impl IndicatorBase {
    /// Create an uninitialized base.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: IndicatorDataPoint::initial(),
            samples: 0,
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn current(&self) -> IndicatorDataPoint {
        self.current
    }

    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Number of registered `Updated` listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Decide whether a sample at `occurred_at` is new.
    ///
    /// Returns `Ok(false)` for a duplicate of the current timestamp and an
    /// [`IndicatorError::OutOfOrder`] for an earlier one. An indicator that
    /// has not accepted anything yet admits every timestamp.
    pub fn admit(&self, occurred_at: DateTime<Utc>) -> IndicatorResult<bool> {
        if self.samples == 0 {
            return Ok(true);
        }

        if occurred_at < self.current.occurred_at {
            debug!(
                indicator = %self.name,
                current = %self.current.occurred_at,
                received = %occurred_at,
                "rejecting out-of-order sample"
            );
            return Err(IndicatorError::OutOfOrder {
                indicator: self.name.clone(),
                current: self.current.occurred_at,
                received: occurred_at,
            });
        }

        Ok(occurred_at > self.current.occurred_at)
    }

    /// Count a newly admitted sample.
    #[inline]
    pub fn begin_sample(&mut self) {
        self.samples += 1;
    }

    /// Undo [`begin_sample`](Self::begin_sample) after a failed recurrence.
    #[inline]
    pub fn rollback_sample(&mut self) {
        self.samples = self.samples.saturating_sub(1);
    }

    #[inline]
    pub fn set_current(&mut self, current: IndicatorDataPoint) {
        self.current = current;
    }

    /// Register a listener for `Updated` notifications.
    pub fn on_updated<F>(&mut self, listener: F)
    where
        F: FnMut(&IndicatorDataPoint) -> IndicatorResult<()> + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Fire `Updated` with the current value, in registration order.
    ///
    /// Stops at and returns the first listener error.
    pub fn notify(&mut self) -> IndicatorResult<()> {
        let current = self.current;
        for listener in &mut self.listeners {
            listener(&current)?;
        }
        Ok(())
    }

    /// Return to the post-construction state. Listeners stay registered.
    pub fn reset(&mut self) {
        self.current = IndicatorDataPoint::initial();
        self.samples = 0;
    }
}

impl fmt::Debug for IndicatorBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicatorBase")
            .field("name", &self.name)
            .field("current", &self.current)
            .field("samples", &self.samples)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Streaming indicator that maintains internal state.
///
/// Implementors provide the recurrence ([`compute_next_value`](Self::compute_next_value))
/// and a readiness predicate; ordering, duplicate suppression, sample
/// counting and notification come from the provided [`update`](Self::update).
pub trait Indicator {
    /// The input consumed on each update.
    type Input: DataPoint;

    fn base(&self) -> &IndicatorBase;

    fn base_mut(&mut self) -> &mut IndicatorBase;

    /// Check if the indicator has enough data to produce meaningful values.
    fn is_ready(&self) -> bool;

    /// Number of accepted updates needed before [`is_ready`](Self::is_ready) holds.
    fn warm_up_period(&self) -> usize;

    /// Feed one admitted input through the recurrence and return the new value.
    ///
    /// Called by [`update`](Self::update) after the sample count has been
    /// incremented; not meant to be called directly.
    fn compute_next_value(&mut self, input: &Self::Input) -> IndicatorResult<f64>;

    /// Reset owned children and accumulated state beyond the base.
    fn reset_state(&mut self) {}

    /// Get the name of the indicator.
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Get the current value without adding new data.
    fn current(&self) -> IndicatorDataPoint {
        self.base().current()
    }

    /// Number of accepted (non-duplicate) updates.
    fn samples(&self) -> usize {
        self.base().samples()
    }

    /// Update the indicator with a new input.
    ///
    /// Returns the current value after the update. A duplicate timestamp
    /// leaves the indicator untouched and returns its current value.
    fn update(&mut self, input: &Self::Input) -> IndicatorResult<IndicatorDataPoint> {
        let occurred_at = input.occurred_at();

        if !self.base().admit(occurred_at)? {
            trace!(indicator = self.name(), %occurred_at, "duplicate sample ignored");
            return Ok(self.current());
        }

        self.base_mut().begin_sample();
        let price = match self.compute_next_value(input) {
            Ok(price) => price,
            Err(err) => {
                self.base_mut().rollback_sample();
                return Err(err);
            }
        };

        let current = IndicatorDataPoint::new(occurred_at, input.time_zone(), price);
        self.base_mut().set_current(current);

        if self.is_ready() {
            self.base_mut().notify()?;
        }

        Ok(current)
    }

    /// Reset the indicator and everything it owns.
    fn reset(&mut self) {
        self.base_mut().reset();
        self.reset_state();
    }

    /// Register a listener for `Updated` notifications.
    fn on_updated<F>(&mut self, listener: F)
    where
        Self: Sized,
        F: FnMut(&IndicatorDataPoint) -> IndicatorResult<()> + 'static,
    {
        self.base_mut().on_updated(listener);
    }

    /// Replace the default name.
    fn with_name(mut self, name: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().rename(name);
        self
    }
}

/// Indicator over single price values, selected at runtime.
pub type BoxedIndicator = Box<dyn Indicator<Input = IndicatorDataPoint>>;

/// Indicator over bars, selected at runtime.
pub type BoxedBarIndicator = Box<dyn Indicator<Input = Bar>>;

impl<T: DataPoint> fmt::Debug for dyn Indicator<Input = T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indicator")
            .field("base", self.base())
            .finish()
    }
}

impl<I: Indicator + ?Sized> Indicator for Box<I> {
    type Input = I::Input;

    fn base(&self) -> &IndicatorBase {
        (**self).base()
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        (**self).base_mut()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn warm_up_period(&self) -> usize {
        (**self).warm_up_period()
    }

    fn compute_next_value(&mut self, input: &Self::Input) -> IndicatorResult<f64> {
        (**self).compute_next_value(input)
    }

    fn reset_state(&mut self) {
        (**self).reset_state()
    }

    fn update(&mut self, input: &Self::Input) -> IndicatorResult<IndicatorDataPoint> {
        (**self).update(input)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Convenience entry points for indicators fed with single price values.
pub trait PriceIndicator: Indicator<Input = IndicatorDataPoint> {
    /// Update from the parts of a data point.
    fn update_price(
        &mut self,
        occurred_at: DateTime<Utc>,
        time_zone: TimeZone,
        price: f64,
    ) -> IndicatorResult<IndicatorDataPoint> {
        self.update(&IndicatorDataPoint::new(occurred_at, time_zone, price))
    }
}

impl<T: Indicator<Input = IndicatorDataPoint> + ?Sized> PriceIndicator for T {}

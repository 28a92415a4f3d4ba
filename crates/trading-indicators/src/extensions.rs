//! Fluent combinators for building indicator pipelines.
//!
//! ```ignore
//! let close = shared(Identity::new("close"));
//! let momentum = of(Momentum::new(10)?, &close)?;
//! let smoothed = momentum.sma(5)?;
//! let spread = close.minus(&smoothed)?;
//! ```

use std::rc::Rc;
use tracing::trace;

use trading_core::{
    require_period, shared, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorError,
    IndicatorResult, RollingWindow, Shared,
};

use crate::composite::{name_of, reentrant, CompositeIndicator};
use crate::moving_average::{Ema, Sma};
use crate::primitives::Constant;
use crate::statistics::{Maximum, Minimum};

/// Feed `second` with every ready value of `first`.
///
/// Returns the shared handle of `second`; `first` keeps being updated by
/// its owner.
pub fn of<S, F>(second: S, first: &Shared<F>) -> IndicatorResult<Shared<S>>
where
    S: Indicator<Input = IndicatorDataPoint> + 'static,
    F: Indicator + 'static,
{
    let name = second.name().to_string();
    let second = shared(second);
    let target = Rc::downgrade(&second);

    first
        .try_borrow_mut()
        .map_err(|_| reentrant(&name))?
        .base_mut()
        .on_updated(move |point| {
            let Some(target) = target.upgrade() else {
                return Ok(());
            };
            let mut target = target
                .try_borrow_mut()
                .map_err(|_| reentrant("chained indicator"))?;
            target.update(point).map(|_| ())
        });

    Ok(second)
}

/// Rolling weighted average `sum(value * weight) / sum(weight)`.
///
/// Values and weights are paired by timestamp, whichever side arrives
/// first. A sample missing either side is dropped once a newer sample
/// arrives. A window whose weights sum to zero keeps the previous average.
#[derive(Debug)]
pub struct WeightedAverage {
    base: IndicatorBase,
    pending_value: Option<IndicatorDataPoint>,
    pending_weight: Option<IndicatorDataPoint>,
    window: RollingWindow<(f64, f64)>,
}

impl WeightedAverage {
    fn new(name: String, period: usize) -> IndicatorResult<Self> {
        let period = require_period("WeightedBy", period)?;
        Ok(Self {
            base: IndicatorBase::new(name),
            pending_value: None,
            pending_weight: None,
            window: RollingWindow::new(period)?,
        })
    }

    /// Offer the value side of a sample.
    pub fn offer_value(&mut self, value: &IndicatorDataPoint) -> IndicatorResult<()> {
        self.pending_value = Some(*value);
        self.pair()
    }

    /// Offer the weight side of a sample.
    pub fn offer_weight(&mut self, weight: &IndicatorDataPoint) -> IndicatorResult<()> {
        self.pending_weight = Some(*weight);
        self.pair()
    }

    fn pair(&mut self) -> IndicatorResult<()> {
        let (Some(value), Some(weight)) = (self.pending_value, self.pending_weight) else {
            return Ok(());
        };

        if value.occurred_at < weight.occurred_at {
            trace!(indicator = self.name(), at = %value.occurred_at, "unpaired value dropped");
            self.pending_value = None;
            return Ok(());
        }
        if weight.occurred_at < value.occurred_at {
            trace!(indicator = self.name(), at = %weight.occurred_at, "unpaired weight dropped");
            self.pending_weight = None;
            return Ok(());
        }

        let result = self.update(&value).map(|_| ());
        self.pending_value = None;
        self.pending_weight = None;
        result
    }
}

impl Indicator for WeightedAverage {
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        self.window.is_ready()
    }

    fn warm_up_period(&self) -> usize {
        self.window.size()
    }

    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        let weight = self
            .pending_weight
            .filter(|w| w.occurred_at == input.occurred_at)
            .ok_or_else(|| {
                IndicatorError::InvalidState(format!(
                    "{} has no weight at {}",
                    self.name(),
                    input.occurred_at
                ))
            })?;
        self.window.add((input.price, weight.price));

        let (weighted, total) = self
            .window
            .iter()
            .fold((0.0, 0.0), |(vw, w), &(value, weight)| (vw + value * weight, w + weight));

        if total == 0.0 {
            trace!(indicator = self.name(), "weights sum to zero");
            return Ok(self.current().price);
        }
        Ok(weighted / total)
    }

    fn reset_state(&mut self) {
        self.window.reset();
        self.pending_value = None;
        self.pending_weight = None;
    }
}

/// Combinators available on every shared indicator.
pub trait IndicatorExtensions {
    type Source: Indicator + 'static;

    fn handle(&self) -> &Shared<Self::Source>;

    /// `self + right`
    fn plus<R>(
        &self,
        right: &Shared<R>,
    ) -> IndicatorResult<Shared<CompositeIndicator<Self::Source, R>>>
    where
        R: Indicator + 'static,
    {
        let name = format!("{}+{}", name_of(self.handle()), name_of(right));
        CompositeIndicator::new(name, self.handle(), right, |l, r| Some(l + r))
    }

    /// `self - right`
    fn minus<R>(
        &self,
        right: &Shared<R>,
    ) -> IndicatorResult<Shared<CompositeIndicator<Self::Source, R>>>
    where
        R: Indicator + 'static,
    {
        let name = format!("{}-{}", name_of(self.handle()), name_of(right));
        CompositeIndicator::new(name, self.handle(), right, |l, r| Some(l - r))
    }

    /// `self * right`
    fn times<R>(
        &self,
        right: &Shared<R>,
    ) -> IndicatorResult<Shared<CompositeIndicator<Self::Source, R>>>
    where
        R: Indicator + 'static,
    {
        let name = format!("{}*{}", name_of(self.handle()), name_of(right));
        CompositeIndicator::new(name, self.handle(), right, |l, r| Some(l * r))
    }

    /// `self / right`, skipping updates while `right` is zero.
    fn over<R>(
        &self,
        right: &Shared<R>,
    ) -> IndicatorResult<Shared<CompositeIndicator<Self::Source, R>>>
    where
        R: Indicator + 'static,
    {
        let name = format!("{}/{}", name_of(self.handle()), name_of(right));
        CompositeIndicator::new(name, self.handle(), right, |l, r| (r != 0.0).then(|| l / r))
    }

    fn plus_value(
        &self,
        value: f64,
    ) -> IndicatorResult<Shared<CompositeIndicator<Self::Source, Constant>>> {
        self.plus(&shared(Constant::new(value)))
    }

    fn minus_value(
        &self,
        value: f64,
    ) -> IndicatorResult<Shared<CompositeIndicator<Self::Source, Constant>>> {
        self.minus(&shared(Constant::new(value)))
    }

    fn times_value(
        &self,
        value: f64,
    ) -> IndicatorResult<Shared<CompositeIndicator<Self::Source, Constant>>> {
        self.times(&shared(Constant::new(value)))
    }

    fn over_value(
        &self,
        value: f64,
    ) -> IndicatorResult<Shared<CompositeIndicator<Self::Source, Constant>>> {
        self.over(&shared(Constant::new(value)))
    }

    /// Rolling average of `self` weighted by `weight` over `period` samples.
    fn weighted_by<W>(
        &self,
        weight: &Shared<W>,
        period: usize,
    ) -> IndicatorResult<Shared<WeightedAverage>>
    where
        W: Indicator + 'static,
    {
        let name = format!("{}_WeightedBy_{}", name_of(self.handle()), name_of(weight));
        let average = shared(WeightedAverage::new(name.clone(), period)?);

        let target = Rc::downgrade(&average);
        weight
            .try_borrow_mut()
            .map_err(|_| reentrant(&name))?
            .base_mut()
            .on_updated({
                let target = target.clone();
                move |point| {
                    let Some(target) = target.upgrade() else {
                        return Ok(());
                    };
                    let mut average = target
                        .try_borrow_mut()
                        .map_err(|_| reentrant("weighted average"))?;
                    average.offer_weight(point)
                }
            });

        self.handle()
            .try_borrow_mut()
            .map_err(|_| reentrant(&name))?
            .base_mut()
            .on_updated(move |point| {
                let Some(target) = target.upgrade() else {
                    return Ok(());
                };
                let mut average = target
                    .try_borrow_mut()
                    .map_err(|_| reentrant("weighted average"))?;
                average.offer_value(point)
            });

        Ok(average)
    }

    fn sma(&self, period: usize) -> IndicatorResult<Shared<Sma>> {
        let sma = Sma::new(period)?;
        let name = format!("{}_Of_{}", sma.name(), name_of(self.handle()));
        of(sma.with_name(name), self.handle())
    }

    fn ema(&self, period: usize) -> IndicatorResult<Shared<Ema>> {
        let ema = Ema::new(period)?;
        let name = format!("{}_Of_{}", ema.name(), name_of(self.handle()));
        of(ema.with_name(name), self.handle())
    }

    fn maximum(&self, period: usize) -> IndicatorResult<Shared<Maximum>> {
        let max = Maximum::new(period)?;
        let name = format!("{}_Of_{}", max.name(), name_of(self.handle()));
        of(max.with_name(name), self.handle())
    }

    fn minimum(&self, period: usize) -> IndicatorResult<Shared<Minimum>> {
        let min = Minimum::new(period)?;
        let name = format!("{}_Of_{}", min.name(), name_of(self.handle()));
        of(min.with_name(name), self.handle())
    }
}

impl<T: Indicator + 'static> IndicatorExtensions for Shared<T> {
    type Source = T;

    fn handle(&self) -> &Shared<T> {
        self
    }
}

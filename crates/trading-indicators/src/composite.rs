//! Indicators combining two other indicators.
//!
//! A [`CompositeIndicator`] listens to the `Updated` notifications of a
//! left and a right indicator and recomputes `compose(left, right)` each
//! time either side produces a value. The sides are shared handles: they
//! keep being fed by whoever owns them, and the composite only holds weak
//! references from inside their listeners.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

use trading_core::{
    shared, Indicator, IndicatorBase, IndicatorDataPoint, IndicatorError, IndicatorResult, Shared,
};

/// Combines the two side values; `None` skips the update.
pub type Composer = Box<dyn Fn(f64, f64) -> Option<f64>>;

pub(crate) fn reentrant(name: &str) -> IndicatorError {
    IndicatorError::InvalidState(format!(
        "{name} was updated while already updating; indicator graph has a cycle"
    ))
}

/// Name of a shared indicator, or a placeholder while it is mid-update.
pub(crate) fn name_of<T: Indicator>(indicator: &Shared<T>) -> String {
    indicator
        .try_borrow()
        .map(|i| i.name().to_string())
        .unwrap_or_else(|_| "?".to_string())
}

/// Latest ready value of a side.
///
/// A side that is mid-update (it is the one notifying us) cannot be
/// borrowed, so the value it just announced is used instead.
pub(crate) fn side_value<T: Indicator>(
    side: &Shared<T>,
    announced: Option<IndicatorDataPoint>,
) -> Option<IndicatorDataPoint> {
    match side.try_borrow() {
        Ok(side) => side.is_ready().then(|| side.current()),
        Err(_) => announced,
    }
}

pub(crate) fn side_ready<T: Indicator>(side: &Shared<T>, announced: bool) -> bool {
    side.try_borrow().map(|s| s.is_ready()).unwrap_or(announced)
}

/// Update an owned shared child.
pub(crate) fn update_shared<T: Indicator>(
    child: &Shared<T>,
    input: &T::Input,
) -> IndicatorResult<IndicatorDataPoint> {
    let mut child = child.try_borrow_mut().map_err(|_| reentrant("child indicator"))?;
    child.update(input)
}

/// Current price of an owned shared child, 0 while it is mid-update.
pub(crate) fn price_of<T: Indicator>(child: &Shared<T>) -> f64 {
    child.try_borrow().map(|c| c.current().price).unwrap_or_default()
}

pub(crate) fn reset_shared<T: Indicator>(child: &Shared<T>) {
    if let Ok(mut child) = child.try_borrow_mut() {
        child.reset();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Binary combination of two indicators.
pub struct CompositeIndicator<L, R> {
    base: IndicatorBase,
    left: Shared<L>,
    right: Shared<R>,
    composer: Composer,
    left_value: Option<IndicatorDataPoint>,
    right_value: Option<IndicatorDataPoint>,
    warm_up: usize,
}

impl<L, R> CompositeIndicator<L, R>
where
    L: Indicator + 'static,
    R: Indicator + 'static,
{
    /// Wire `composer` over `left` and `right`.
    ///
    /// Fails if either side is currently borrowed.
    pub fn new<F>(
        name: impl Into<String>,
        left: &Shared<L>,
        right: &Shared<R>,
        composer: F,
    ) -> IndicatorResult<Shared<Self>>
    where
        F: Fn(f64, f64) -> Option<f64> + 'static,
    {
        let name = name.into();
        let warm_up = {
            let l = left.try_borrow().map_err(|_| reentrant(&name))?;
            let r = right.try_borrow().map_err(|_| reentrant(&name))?;
            l.warm_up_period().max(r.warm_up_period())
        };

        let composite = shared(Self {
            base: IndicatorBase::new(name.clone()),
            left: Rc::clone(left),
            right: Rc::clone(right),
            composer: Box::new(composer),
            left_value: side_value(left, None),
            right_value: side_value(right, None),
            warm_up,
        });

        let weak = Rc::downgrade(&composite);
        left.try_borrow_mut()
            .map_err(|_| reentrant(&name))?
            .base_mut()
            .on_updated(move |point| Self::forward(&weak, Side::Left, *point));

        let weak = Rc::downgrade(&composite);
        right
            .try_borrow_mut()
            .map_err(|_| reentrant(&name))?
            .base_mut()
            .on_updated(move |point| Self::forward(&weak, Side::Right, *point));

        Ok(composite)
    }

    fn forward(
        weak: &Weak<RefCell<Self>>,
        side: Side,
        point: IndicatorDataPoint,
    ) -> IndicatorResult<()> {
        let Some(composite) = weak.upgrade() else {
            return Ok(());
        };
        let mut composite = composite.try_borrow_mut().map_err(|_| reentrant("composite"))?;
        match side {
            Side::Left => composite.left_value = Some(point),
            Side::Right => composite.right_value = Some(point),
        }
        composite.recompute(side)
    }

    /// Combine the latest side values and publish the result.
    fn recompute(&mut self, notifier: Side) -> IndicatorResult<()> {
        let left = side_value(&self.left, self.left_value);
        let right = side_value(&self.right, self.right_value);
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(());
        };

        // The other side is an upstream still in its own update: it will
        // notify with a value for this timestamp once it is done.
        let pending = match notifier {
            Side::Left => self.right.try_borrow().is_err() && right.occurred_at < left.occurred_at,
            Side::Right => self.left.try_borrow().is_err() && left.occurred_at < right.occurred_at,
        };
        if pending {
            trace!(indicator = self.name(), "waiting for upstream side");
            return Ok(());
        }

        let Some(value) = (self.composer)(left.price, right.price) else {
            trace!(indicator = self.name(), "composer skipped update");
            return Ok(());
        };

        let latest = if right.occurred_at > left.occurred_at { right } else { left };
        let point = latest.with_price(value);

        if self.samples() > 0 && point.occurred_at == self.current().occurred_at {
            // Second side catching up with the same timestamp.
            self.base.set_current(point);
            if self.is_ready() {
                self.base.notify()?;
            }
            return Ok(());
        }

        self.update(&point).map(|_| ())
    }

    pub fn left(&self) -> &Shared<L> {
        &self.left
    }

    pub fn right(&self) -> &Shared<R> {
        &self.right
    }
}

impl<L, R> Indicator for CompositeIndicator<L, R>
where
    L: Indicator + 'static,
    R: Indicator + 'static,
{
    type Input = IndicatorDataPoint;

    fn base(&self) -> &IndicatorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut IndicatorBase {
        &mut self.base
    }

    fn is_ready(&self) -> bool {
        side_ready(&self.left, self.left_value.is_some())
            && side_ready(&self.right, self.right_value.is_some())
    }

    fn warm_up_period(&self) -> usize {
        self.warm_up
    }

    /// Values arrive already composed from the side listeners.
    fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
        Ok(input.price)
    }

    fn reset_state(&mut self) {
        if let Ok(mut left) = self.left.try_borrow_mut() {
            left.reset();
        }
        if let Ok(mut right) = self.right.try_borrow_mut() {
            right.reset();
        }
        self.left_value = side_value(&self.left, None);
        self.right_value = side_value(&self.right, None);
    }
}

impl<L, R> std::fmt::Debug for CompositeIndicator<L, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeIndicator")
            .field("base", &self.base)
            .field("left_value", &self.left_value)
            .field("right_value", &self.right_value)
            .finish()
    }
}

//! Registration of indicators against an aggregator's output.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::error::{IndicatorError, IndicatorResult};
use crate::traits::Indicator;

/// Indicator handle shared between its owner and the listeners that feed it.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap an indicator in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

type Consumer<T> = Box<dyn FnMut(&T) -> IndicatorResult<()>>;

/// Fans out each published item of type `T` to registered indicators.
///
/// Each registration carries a selector turning a `T` into that indicator's
/// input, so a bar feed can drive price indicators off the close, bar
/// indicators off the whole bar, and so on.
pub struct DataFeed<T> {
    name: String,
    consumers: Vec<Consumer<T>>,
}

impl<T: 'static> DataFeed<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            consumers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `indicator`, fed with `selector(item)` for every published item.
    pub fn register<I, F>(&mut self, indicator: &Shared<I>, selector: F)
    where
        I: Indicator + 'static,
        F: Fn(&T) -> I::Input + 'static,
    {
        if let Ok(target) = indicator.try_borrow() {
            debug!(feed = %self.name, indicator = target.name(), "registered indicator");
        }

        let target = Rc::clone(indicator);
        self.consumers.push(Box::new(move |item| {
            let mut indicator = target.try_borrow_mut().map_err(|_| {
                IndicatorError::InvalidState("indicator is already being updated".into())
            })?;
            indicator.update(&selector(item)).map(|_| ())
        }));
    }

    /// Deliver `item` to every registration in order, stopping at the first error.
    pub fn publish(&mut self, item: &T) -> IndicatorResult<()> {
        for consumer in &mut self.consumers {
            consumer(item)?;
        }
        Ok(())
    }

    /// Number of registered indicators.
    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::IndicatorBase;
    use crate::types::{Bar, IndicatorDataPoint};
    use chrono::DateTime;

    struct Last {
        base: IndicatorBase,
    }

    impl Indicator for Last {
        type Input = IndicatorDataPoint;

        fn base(&self) -> &IndicatorBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut IndicatorBase {
            &mut self.base
        }

        fn is_ready(&self) -> bool {
            self.samples() > 0
        }

        fn warm_up_period(&self) -> usize {
            1
        }

        fn compute_next_value(&mut self, input: &IndicatorDataPoint) -> IndicatorResult<f64> {
            Ok(input.price)
        }
    }

    fn last(name: &str) -> Shared<Last> {
        shared(Last {
            base: IndicatorBase::new(name),
        })
    }

    fn bar(secs: i64, close: f64) -> Bar {
        Bar::new(DateTime::from_timestamp(secs, 0).unwrap(), close, close + 1.0, close - 1.0, close, 10.0)
    }

    #[test]
    fn test_publish_uses_selectors() {
        let close = last("close");
        let high = last("high");

        let mut feed = DataFeed::<Bar>::new("bars");
        feed.register(&close, |bar: &Bar| IndicatorDataPoint::from(bar));
        feed.register(&high, |bar: &Bar| bar.point(bar.high));
        assert_eq!(feed.len(), 2);

        feed.publish(&bar(60, 100.0)).unwrap();

        assert_eq!(close.borrow().current().price, 100.0);
        assert_eq!(high.borrow().current().price, 101.0);
    }

    #[test]
    fn test_publish_propagates_errors() {
        let close = last("close");
        let mut feed = DataFeed::<Bar>::new("bars");
        feed.register(&close, |bar: &Bar| IndicatorDataPoint::from(bar));

        feed.publish(&bar(120, 1.0)).unwrap();
        let err = feed.publish(&bar(60, 2.0)).unwrap_err();
        assert!(matches!(err, IndicatorError::OutOfOrder { .. }));
    }

    #[test]
    fn test_busy_indicator_reports_invalid_state() {
        let close = last("close");
        let mut feed = DataFeed::<Bar>::new("bars");
        feed.register(&close, |bar: &Bar| IndicatorDataPoint::from(bar));

        let _guard = close.borrow_mut();
        assert!(matches!(
            feed.publish(&bar(60, 1.0)),
            Err(IndicatorError::InvalidState(_))
        ));
    }
}

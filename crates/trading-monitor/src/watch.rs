//! Tracing observers for `Updated` notifications.

use tracing::info;

use trading_config::IndicatorSet;
use trading_core::{Indicator, IndicatorError, IndicatorResult, Shared};

/// Emit one `info!` event for every `Updated` notification of `indicator`.
pub fn watch<I: Indicator + ?Sized>(indicator: &mut I) {
    let name = indicator.name().to_string();
    indicator.base_mut().on_updated(move |point| {
        info!(
            indicator = %name,
            occurred_at = %point.occurred_at,
            value = point.price,
            "indicator updated"
        );
        Ok(())
    });
}

/// [`watch`] an indicator behind a shared handle.
pub fn watch_shared<I: Indicator>(indicator: &Shared<I>) -> IndicatorResult<()> {
    let mut indicator = indicator.try_borrow_mut().map_err(|_| {
        IndicatorError::InvalidState("cannot watch an indicator while it is updating".into())
    })?;
    watch(&mut *indicator);
    Ok(())
}

/// [`watch`] every indicator of a configured set.
pub fn watch_set(set: &mut IndicatorSet) {
    for indicator in set.price_indicators_mut() {
        watch(indicator);
    }
    for indicator in set.bar_indicators_mut() {
        watch(indicator);
    }
}

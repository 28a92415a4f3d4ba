//! Fixed-capacity window over the most recent values.

use std::ops::{Index, IndexMut};

use crate::error::{require_period, IndicatorError, IndicatorResult};

/// Circular buffer holding the last `size` values in reverse insertion
/// order: `window[0]` is the most recently added value.
///
/// Tracks the total number of values ever added, including those that
/// have since fallen off the back, and keeps the last evicted value.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    size: usize,
    values: Vec<T>,
    /// Physical slot of the oldest value once the window is full.
    tail: usize,
    samples: usize,
    most_recently_removed: Option<T>,
}

impl<T> RollingWindow<T> {
    /// Create a window retaining `size` values.
    pub fn new(size: usize) -> IndicatorResult<Self> {
        require_period("RollingWindow", size)?;
        Ok(Self {
            size,
            values: Vec::with_capacity(size),
            tail: 0,
            samples: 0,
            most_recently_removed: None,
        })
    }

    /// Maximum number of retained values.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of values currently retained.
    #[inline]
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Total number of values added since construction or reset.
    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// `true` once at least `size` values have been added.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.samples >= self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Add a value at the front, evicting the oldest value when full.
    ///
    /// Returns a reference to the evicted value, if any.
    pub fn add(&mut self, value: T) -> Option<&T> {
        self.samples += 1;

        if self.values.len() < self.size {
            self.values.push(value);
            return None;
        }

        let removed = std::mem::replace(&mut self.values[self.tail], value);
        self.tail = (self.tail + 1) % self.size;
        self.most_recently_removed = Some(removed);
        self.most_recently_removed.as_ref()
    }

    /// The value evicted by the last `add` on a full window.
    pub fn most_recently_removed(&self) -> IndicatorResult<&T> {
        self.most_recently_removed.as_ref().ok_or_else(|| {
            IndicatorError::InvalidState("no value has been removed from the window yet".into())
        })
    }

    /// Value `index` steps back from the most recent one.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.physical(index).map(|slot| &self.values[slot])
    }

    /// Overwrite the value `index` steps back from the most recent one.
    pub fn set(&mut self, index: usize, value: T) -> IndicatorResult<()> {
        let slot = self.physical(index).ok_or(IndicatorError::OutOfRange {
            index,
            count: self.count(),
        })?;
        self.values[slot] = value;
        Ok(())
    }

    /// Most recently added value.
    #[inline]
    pub fn newest(&self) -> Option<&T> {
        self.get(0)
    }

    /// Oldest retained value.
    #[inline]
    pub fn oldest(&self) -> Option<&T> {
        self.count().checked_sub(1).and_then(|last| self.get(last))
    }

    /// Iterate from the most recent value to the oldest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        (0..self.count()).map(move |i| &self.values[self.slot(i)])
    }

    /// Drop all values and the sample count. Capacity is unchanged.
    pub fn reset(&mut self) {
        self.values.clear();
        self.tail = 0;
        self.samples = 0;
        self.most_recently_removed = None;
    }

    #[inline]
    fn physical(&self, index: usize) -> Option<usize> {
        (index < self.count()).then(|| self.slot(index))
    }

    #[inline]
    fn slot(&self, index: usize) -> usize {
        let count = self.count();
        (self.tail + count - 1 - index) % count
    }
}

impl<T> Index<usize> for RollingWindow<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.physical(index) {
            Some(slot) => &self.values[slot],
            None => panic!(
                "index {} out of range for window holding {} values",
                index,
                self.count()
            ),
        }
    }
}

impl<T> IndexMut<usize> for RollingWindow<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.physical(index) {
            Some(slot) => &mut self.values[slot],
            None => panic!(
                "index {} out of range for window holding {} values",
                index,
                self.count()
            ),
        }
    }
}

//! Iterator adapters that drive an indicator.
//!
//! [`IndicatorIteratorExt::with_indicator`] wraps any [`Iterator`] so every yielded item
//! updates an [`Indicator`] with the running item count. A bar therefore fills as items
//! arrive, and a spinner turns once per item.
//!
//! # Example
//!
//! ```
//! use stacked_progress::{BarIndicator, IndicatorIteratorExt, SharedBuffer};
//!
//! let (buffer, sink) = SharedBuffer::with_sink();
//! let bar = BarIndicator::builder(4.0).width(4).title("items").sink(sink).build()?;
//!
//! let sum: u32 = [1, 2, 3, 4].into_iter().with_indicator(bar).sum();
//!
//! assert_eq!(sum, 10);
//! assert!(buffer.contents().ends_with("items:[####] 100%"));
//! # Ok::<(), stacked_progress::ConfigError>(())
//! ```

use crate::Indicator;

/// An iterator adapter that updates an indicator on every item.
pub struct IndicatorIter<I, T> {
    iter: I,
    indicator: T,
    count: u64,
}

impl<I, T> IndicatorIter<I, T> {
    /// Creates a new `IndicatorIter`.
    ///
    /// Note: This is usually constructed via [`IndicatorIteratorExt::with_indicator`].
    pub const fn new(iter: I, indicator: T) -> Self {
        Self {
            iter,
            indicator,
            count: 0,
        }
    }

    /// Items yielded so far.
    #[must_use]
    pub const fn count_so_far(&self) -> u64 {
        self.count
    }
}

impl<I: Iterator, T: Indicator> Iterator for IndicatorIter<I, T> {
    type Item = I::Item;

    #[allow(clippy::cast_precision_loss)]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next()?;
        self.count += 1;
        self.indicator.update(self.count as f64);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Extension trait to attach an indicator to any iterator.
pub trait IndicatorIteratorExt: Iterator + Sized {
    /// Wraps the iterator so each item updates `indicator` with the item count.
    fn with_indicator<T: Indicator>(self, indicator: T) -> IndicatorIter<Self, T> {
        IndicatorIter::new(self, indicator)
    }
}

impl<I: Iterator> IndicatorIteratorExt for I {}

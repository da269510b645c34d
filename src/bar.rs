//! Determinate bar indicator.
//!
//! A bar renders `{title}:[{filled}{padding}] {percent}%`. The filled segment is
//! `floor(value / total * width)` copies of the symbol; the padding fills the rest of
//! the field with spaces, scaled by the [`WidthMultiplier`].
//!
//! Values beyond `total` are drawn as-is: the filled segment grows past the field and
//! the percentage exceeds 100. The overflow is capped at ten field widths, and
//! non-finite inputs are ignored like zero.

use std::{fmt, sync::Arc};

use compact_str::CompactString;
use parking_lot::Mutex;

use crate::{Indicator, builder::BarBuilder, indicator::filter_title, io::Sink, terminal};

/// Default width of a bar's field.
pub const DEFAULT_BAR_WIDTH: usize = 25;

/// Default total of a bar.
pub const DEFAULT_BAR_TOTAL: f64 = 100.0;

/// Default fill symbol.
pub const DEFAULT_BAR_SYMBOL: char = '#';

/// Longest filled segment drawn, as a multiple of the width.
const MAX_OVERFLOW_WIDTHS: usize = 10;

/// Scale applied to the padding segment.
///
/// Some terminal/font combinations render the filled symbol two columns wide; doubling
/// the padding keeps the closing bracket in place there.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "rkyv", rkyv(derive(Debug, Eq, PartialEq)))]
pub enum WidthMultiplier {
    /// One space per empty cell.
    #[default]
    Single,
    /// Two spaces per empty cell.
    Double,
}

impl WidthMultiplier {
    /// The numeric factor.
    #[must_use]
    pub const fn factor(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

/// A thread-safe, cloneable progress bar handle.
///
/// Clones share the same current value and sink.
#[derive(Clone)]
pub struct BarIndicator {
    title: CompactString,
    width: usize,
    total: f64,
    symbol: char,
    multiplier: WidthMultiplier,
    sink: Sink,
    value: Arc<Mutex<f64>>,
}

impl fmt::Debug for BarIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarIndicator")
            .field("title", &self.title)
            .field("total", &self.total)
            .field("value", &*self.value.lock())
            .finish_non_exhaustive()
    }
}

impl BarIndicator {
    /// Creates a bar with default width and symbol, writing to standard output.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTotal`](crate::ConfigError::InvalidTotal) unless
    /// `total` is positive and finite.
    pub fn new(title: &str, total: f64) -> Result<Self, crate::ConfigError> {
        Self::builder(total).title(title).build()
    }

    /// Starts a [`BarBuilder`] for a bar reaching 100% at `total`.
    #[must_use]
    pub fn builder(total: f64) -> BarBuilder {
        BarBuilder::new(total)
    }

    pub(crate) fn from_parts(
        title: &str,
        width: usize,
        total: f64,
        symbol: char,
        multiplier: WidthMultiplier,
        sink: Sink,
    ) -> Self {
        Self {
            title: filter_title(title),
            width,
            total,
            symbol,
            multiplier,
            sink,
            value: Arc::new(Mutex::new(0.0)),
        }
    }

    /// The sanitized title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The configured field width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The value representing 100%.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// The fill symbol.
    #[must_use]
    pub const fn symbol(&self) -> char {
        self.symbol
    }

    /// The padding multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> WidthMultiplier {
        self.multiplier
    }

    /// The last strictly positive value supplied, or `0` if none yet.
    #[must_use]
    pub fn value(&self) -> f64 {
        *self.value.lock()
    }

    /// The whole-number percentage currently shown.
    #[must_use]
    pub fn percent(&self) -> u64 {
        self.layout(self.value()).2
    }

    /// The current line text, without control sequences.
    #[must_use]
    pub fn line(&self) -> String {
        self.render(self.value())
    }

    /// Returns `(filled, padding, percent)` for `value`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn layout(&self, value: f64) -> (usize, usize, u64) {
        let ratio = value / self.total;
        let filled = ((ratio * self.width as f64).floor() as usize)
            .min(self.width.saturating_mul(MAX_OVERFLOW_WIDTHS));
        let padding = self.width.saturating_sub(filled) * self.multiplier.factor();
        let percent = (ratio * 100.0).floor() as u64;
        (filled, padding, percent)
    }

    fn render(&self, value: f64) -> String {
        let (filled, padding, percent) = self.layout(value);
        let capacity = self
            .title
            .len()
            .saturating_add(filled)
            .saturating_add(padding)
            .saturating_add(8);
        let mut line = String::with_capacity(capacity);
        line.push_str(&self.title);
        line.push_str(":[");
        line.extend(std::iter::repeat_n(self.symbol, filled));
        line.extend(std::iter::repeat_n(' ', padding));
        line.push_str("] ");
        line.push_str(&percent.to_string());
        line.push('%');
        line
    }
}

impl Indicator for BarIndicator {
    fn update(&self, progress: f64) {
        let mut value = self.value.lock();
        if progress.is_finite() && progress > 0.0 {
            *value = progress;
        }
        self.sink
            .write_str(&format!("{}{}", terminal::line_reset(), self.render(*value)));
    }
}

#[cfg(test)]
mod tests {
    use super::{BarIndicator, WidthMultiplier};
    use crate::{Indicator, error::ConfigError, io::SharedBuffer, terminal::CLEAR_TO_END};

    fn bar(total: f64, width: usize) -> (BarIndicator, SharedBuffer) {
        let (buffer, sink) = SharedBuffer::with_sink();
        let bar = BarIndicator::builder(total)
            .title("job")
            .width(width)
            .sink(sink)
            .build()
            .unwrap();
        (bar, buffer)
    }

    /// Percent Computation
    /// 50 of 200 over ten cells fills two and reads 25%.
    #[test]
    fn test_bar_percent() {
        let (bar, buffer) = bar(200.0, 10);
        bar.update(50.0);

        assert_eq!(buffer.take(), format!("\r{CLEAR_TO_END}job:[##        ] 25%"));
        assert_eq!(bar.percent(), 25);
    }

    /// Value Retention
    /// Zero and negative inputs repaint the previous value.
    #[test]
    fn test_bar_retains_value() {
        let (bar, buffer) = bar(100.0, 10);
        for progress in [50.0, 0.0, -5.0] {
            bar.update(progress);
            assert_eq!(
                buffer.take(),
                format!("\r{CLEAR_TO_END}job:[#####     ] 50%"),
                "progress {progress}"
            );
        }
        assert!((bar.value() - 50.0).abs() < f64::EPSILON);
    }

    /// Fresh Bar
    /// A bar that never saw a positive value is empty.
    #[test]
    fn test_bar_empty() {
        let (bar, _buffer) = bar(100.0, 4);
        bar.update(0.0);
        assert_eq!(bar.line(), "job:[    ] 0%");
    }

    /// Double-Width Padding
    /// Only the empty segment is doubled.
    #[test]
    fn test_bar_double_width() {
        let (buffer, sink) = SharedBuffer::with_sink();
        let bar = BarIndicator::builder(10.0)
            .width(4)
            .symbol('█')
            .multiplier(WidthMultiplier::Double)
            .sink(sink)
            .build()
            .unwrap();
        bar.update(5.0);

        assert!(buffer.contents().ends_with(":[██    ] 50%"));
    }

    /// Overflow
    /// Values past the total are not clamped.
    #[test]
    fn test_bar_overflow() {
        let (bar, _buffer) = bar(10.0, 4);
        bar.update(15.0);
        assert_eq!(bar.line(), "job:[######] 150%");
    }

    /// Math Safety
    /// Infinite inputs are ignored and huge values draw a bounded line without panicking.
    #[test]
    fn test_bar_math_safety() {
        let (bar, buffer) = bar(100.0, 10);
        bar.update(50.0);
        bar.update(f64::INFINITY);
        bar.update(f64::NEG_INFINITY);
        bar.update(f64::NAN);
        assert!((bar.value() - 50.0).abs() < f64::EPSILON);
        assert_eq!(bar.line(), "job:[#####     ] 50%");
        let _ = buffer.take();

        bar.update(1e30);
        let line = bar.line();
        assert!(line.starts_with(&format!("job:[{}]", "#".repeat(100))));
        assert!(buffer.take().ends_with('%'));
    }

    /// Configuration Errors
    #[test]
    fn test_bar_rejects_bad_config() {
        assert_eq!(
            BarIndicator::builder(0.0).build().unwrap_err(),
            ConfigError::InvalidTotal(0.0)
        );
        assert!(matches!(
            BarIndicator::builder(f64::NAN).build(),
            Err(ConfigError::InvalidTotal(_))
        ));
        assert_eq!(
            BarIndicator::builder(10.0).width(0).build().unwrap_err(),
            ConfigError::ZeroWidth
        );
    }
}

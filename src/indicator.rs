//! The update contract shared by every indicator.
//!
//! An [`Indicator`] is a single progress-reporting unit rendered as one terminal line.
//! Calling [`Indicator::update`] advances its state and repaints that line immediately.
//! Implementations guard their mutable state with their own lock, so one handle may be
//! updated from many threads at once.

use std::sync::Arc;

use compact_str::CompactString;

/// A progress-reporting unit that repaints itself on every update.
pub trait Indicator: Send + Sync {
    /// Feeds a progress signal and repaints the indicator's line.
    ///
    /// The meaning of `progress` depends on the variant: a spinner only looks at its
    /// sign, a bar treats positive values as the new absolute position. A value of `0`
    /// repaints without changing anything.
    fn update(&self, progress: f64);
}

impl<T: Indicator + ?Sized> Indicator for Arc<T> {
    fn update(&self, progress: f64) {
        (**self).update(progress);
    }
}

impl<T: Indicator + ?Sized> Indicator for &T {
    fn update(&self, progress: f64) {
        (**self).update(progress);
    }
}

/// Strips every carriage return, tab and newline from `raw`.
///
/// Those characters would break single-line redraw, so titles are passed through this
/// at construction.
#[must_use]
pub fn filter_title(raw: &str) -> CompactString {
    raw.chars()
        .filter(|c| !matches!(c, '\r' | '\t' | '\n'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::filter_title;

    /// Title Sanitation
    /// Control characters vanish wherever they appear; everything else is kept in order.
    #[test]
    fn test_filter_title() {
        assert_eq!(filter_title("plain"), "plain");
        assert_eq!(filter_title("\rdown\tload\n"), "download");
        assert_eq!(filter_title("\r\n\t"), "");
        assert_eq!(filter_title("a \r\rb\t\nc "), "a bc ");
        assert_eq!(filter_title("tâche\n✓"), "tâche✓");
    }

    #[test]
    fn test_filter_title_never_leaves_control_chars() {
        let pieces = ["x", "\r", "\t", "\n", "yz", " "];
        for a in pieces {
            for b in pieces {
                for c in pieces {
                    let raw = format!("{a}{b}{c}");
                    let filtered = filter_title(&raw);
                    let expected: String =
                        raw.chars().filter(|ch| !"\r\t\n".contains(*ch)).collect();
                    assert!(!filtered.contains(['\r', '\t', '\n']));
                    assert_eq!(filtered.as_str(), expected);
                }
            }
        }
    }
}

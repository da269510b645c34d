//! Fluent construction of indicators.
//!
//! [`SpinnerIndicator::new`] and [`BarIndicator::new`] cover the common case. The
//! builders here add the rest: a custom width, fill symbol, padding multiplier, or an
//! output [`Sink`] other than standard output.
//!
//! The plain option structs [`SpinnerOptions`] and [`BarOptions`] hold the same settings
//! as data. With the `serde` feature they can be loaded from any configuration format
//! and turned into a builder with `From`.

use compact_str::CompactString;

use crate::{
    bar::{BarIndicator, DEFAULT_BAR_SYMBOL, DEFAULT_BAR_TOTAL, DEFAULT_BAR_WIDTH, WidthMultiplier},
    error::ConfigError,
    io::Sink,
    spinner::{DEFAULT_SPINNER_WIDTH, SpinnerIndicator},
};

/// Spinner settings as plain data.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpinnerOptions {
    /// Label drawn before the glyph.
    pub title: CompactString,
    /// Field width.
    pub width: usize,
}

impl Default for SpinnerOptions {
    fn default() -> Self {
        Self {
            title: CompactString::default(),
            width: DEFAULT_SPINNER_WIDTH,
        }
    }
}

/// Bar settings as plain data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BarOptions {
    /// Label drawn before the bar.
    pub title: CompactString,
    /// Value representing 100%.
    pub total: f64,
    /// Field width in cells.
    pub width: usize,
    /// Fill symbol.
    pub symbol: char,
    /// Padding multiplier.
    pub multiplier: WidthMultiplier,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            title: CompactString::default(),
            total: DEFAULT_BAR_TOTAL,
            width: DEFAULT_BAR_WIDTH,
            symbol: DEFAULT_BAR_SYMBOL,
            multiplier: WidthMultiplier::Single,
        }
    }
}

/// A builder for [`SpinnerIndicator`].
#[derive(Clone, Debug, Default)]
pub struct SpinnerBuilder {
    options: SpinnerOptions,
    sink: Option<Sink>,
}

impl SpinnerBuilder {
    /// Starts from the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title. Control characters are stripped at build time.
    #[must_use]
    pub fn title(mut self, title: impl Into<CompactString>) -> Self {
        self.options.title = title.into();
        self
    }

    /// Sets the field width.
    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.options.width = width;
        self
    }

    /// Sets the output sink. Defaults to standard output.
    #[must_use]
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Consumes the builder and returns the spinner.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWidth`] for a zero width.
    pub fn build(self) -> Result<SpinnerIndicator, ConfigError> {
        if self.options.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        Ok(SpinnerIndicator::from_parts(
            &self.options.title,
            self.options.width,
            self.sink.unwrap_or_default(),
        ))
    }
}

impl From<SpinnerOptions> for SpinnerBuilder {
    fn from(options: SpinnerOptions) -> Self {
        Self {
            options,
            sink: None,
        }
    }
}

/// A builder for [`BarIndicator`].
#[derive(Clone, Debug, Default)]
pub struct BarBuilder {
    options: BarOptions,
    sink: Option<Sink>,
}

impl BarBuilder {
    /// Starts from the default options with the given total.
    #[must_use]
    pub fn new(total: f64) -> Self {
        Self {
            options: BarOptions {
                total,
                ..BarOptions::default()
            },
            sink: None,
        }
    }

    /// Sets the title. Control characters are stripped at build time.
    #[must_use]
    pub fn title(mut self, title: impl Into<CompactString>) -> Self {
        self.options.title = title.into();
        self
    }

    /// Sets the field width in cells.
    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.options.width = width;
        self
    }

    /// Sets the fill symbol.
    #[must_use]
    pub const fn symbol(mut self, symbol: char) -> Self {
        self.options.symbol = symbol;
        self
    }

    /// Sets the padding multiplier.
    #[must_use]
    pub const fn multiplier(mut self, multiplier: WidthMultiplier) -> Self {
        self.options.multiplier = multiplier;
        self
    }

    /// Shorthand for [`WidthMultiplier::Double`] when `double` is set.
    #[must_use]
    pub const fn double_width(self, double: bool) -> Self {
        self.multiplier(if double {
            WidthMultiplier::Double
        } else {
            WidthMultiplier::Single
        })
    }

    /// Sets the output sink. Defaults to standard output.
    #[must_use]
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Consumes the builder and returns the bar.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTotal`] unless the total is positive and finite,
    /// and [`ConfigError::ZeroWidth`] for a zero width.
    pub fn build(self) -> Result<BarIndicator, ConfigError> {
        let BarOptions {
            title,
            total,
            width,
            symbol,
            multiplier,
        } = self.options;
        if !(total.is_finite() && total > 0.0) {
            return Err(ConfigError::InvalidTotal(total));
        }
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        Ok(BarIndicator::from_parts(
            &title,
            width,
            total,
            symbol,
            multiplier,
            self.sink.unwrap_or_default(),
        ))
    }
}

impl From<BarOptions> for BarBuilder {
    fn from(options: BarOptions) -> Self {
        Self {
            options,
            sink: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BarBuilder, BarOptions, SpinnerBuilder, SpinnerOptions};
    use crate::{ConfigError, WidthMultiplier, io::SharedBuffer};

    /// Defaults
    /// Unset options fall back to width 25, `#`, single width for bars and width 10
    /// for spinners.
    #[test]
    fn test_defaults() {
        let bar = BarBuilder::new(100.0).build().unwrap();
        assert_eq!(bar.width(), 25);
        assert_eq!(bar.symbol(), '#');
        assert_eq!(bar.multiplier(), WidthMultiplier::Single);
        assert_eq!(bar.title(), "");

        let spinner = SpinnerBuilder::new().build().unwrap();
        assert_eq!(spinner.width(), 10);
    }

    /// Options Conversion
    /// A builder made from option data honours every field.
    #[test]
    fn test_from_options() {
        let (buffer, sink) = SharedBuffer::with_sink();
        let options = BarOptions {
            title: "fetch\t".into(),
            total: 8.0,
            width: 4,
            symbol: '=',
            multiplier: WidthMultiplier::Double,
        };
        let bar = BarBuilder::from(options).sink(sink).build().unwrap();
        crate::Indicator::update(&bar, 2.0);

        assert!(buffer.contents().ends_with("fetch:[=      ] 25%"));
    }

    #[test]
    fn test_double_width_flag() {
        let bar = BarBuilder::new(1.0).double_width(true).build().unwrap();
        assert_eq!(bar.multiplier(), WidthMultiplier::Double);
    }

    #[test]
    fn test_spinner_zero_width() {
        let options = SpinnerOptions {
            width: 0,
            ..SpinnerOptions::default()
        };
        assert_eq!(
            SpinnerBuilder::from(options).build().unwrap_err(),
            ConfigError::ZeroWidth
        );
    }

    /// Options Loading
    /// Partial configuration falls back to defaults for the missing fields.
    #[cfg(feature = "serde")]
    #[test]
    fn test_options_from_json() {
        let bar: BarOptions =
            serde_json::from_str(r#"{"title": "sync", "total": 40.0, "symbol": "=", "multiplier": "Double"}"#)
                .unwrap();
        assert_eq!(bar.width, 25);
        assert_eq!(bar.symbol, '=');
        assert_eq!(bar.multiplier, WidthMultiplier::Double);
        let bar = BarBuilder::from(bar).build().unwrap();
        assert!((bar.total() - 40.0).abs() < f64::EPSILON);

        let spinner: SpinnerOptions = serde_json::from_str(r#"{"width": 4}"#).unwrap();
        assert_eq!(spinner, SpinnerOptions { width: 4, ..SpinnerOptions::default() });
    }
}

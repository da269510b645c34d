//! # `stacked_progress`
//!
//! Thread-safe terminal progress indicators that redraw in place.
//!
//! Two indicator styles are provided, a [`SpinnerIndicator`] for work of unknown size
//! and a [`BarIndicator`] with a percentage. Each repaints its own line on every
//! [`Indicator::update`]. A [`Coordinator`] stacks several of them as a block of lines
//! and redraws the whole block atomically whenever one of them changes.
//!
//! Output only ever moves the cursor up and clears to the end of the line; there is no
//! terminal-size detection or column positioning.
//!
//! ## Modules
//!
//! * [`bar`]: The determinate [`BarIndicator`].
//! * [`builder`]: Builders and plain option structs for configuring indicators.
//! * [`coordinator`]: The [`Coordinator`] registry and synchronized redraw.
//! * [`error`]: Configuration errors.
//! * [`indicator`]: The [`Indicator`] contract and title sanitation.
//! * [`io`]: Output [`Sink`]s and byte-counting [`Read`](std::io::Read)/[`Write`](std::io::Write) wrappers.
//! * [`iter`]: Extension traits for driving an indicator from an iterator.
//! * [`spinner`]: The indeterminate [`SpinnerIndicator`].
//! * [`terminal`]: Control sequences.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bar;
pub mod builder;
pub mod coordinator;
pub mod error;
pub mod indicator;
pub mod io;
pub mod iter;
pub mod spinner;
pub mod terminal;

pub use bar::{BarIndicator, WidthMultiplier};
pub use builder::{BarBuilder, BarOptions, SpinnerBuilder, SpinnerOptions};
pub use coordinator::{Coordinator, KeyedIndicator};
pub use error::ConfigError;
pub use indicator::{Indicator, filter_title};
pub use io::{IndicatorReader, IndicatorWriter, SharedBuffer, Sink};
pub use iter::{IndicatorIter, IndicatorIteratorExt};
pub use spinner::{Glyph, SpinnerIndicator};

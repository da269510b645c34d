//! Indeterminate spinner indicator.
//!
//! A spinner renders `{title}:[{glyph}]` and rotates its glyph through
//! `- \ | /` once per update while it is active. A positive progress signal activates
//! it, a negative one freezes it on whatever glyph it last showed.

use std::{fmt, sync::Arc};

use compact_str::CompactString;
use parking_lot::Mutex;

use crate::{Indicator, builder::SpinnerBuilder, indicator::filter_title, io::Sink, terminal};

/// Default width of a spinner's field.
pub const DEFAULT_SPINNER_WIDTH: usize = 10;

/// The rotating character shown by a spinner.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "rkyv", rkyv(derive(Debug, Eq, PartialEq)))]
pub enum Glyph {
    /// Nothing drawn yet. Only a fresh spinner shows this.
    #[default]
    Blank,
    /// `-`
    Dash,
    /// `\`
    Backslash,
    /// `|`
    Pipe,
    /// `/`
    Slash,
}

impl Glyph {
    /// The glyph that follows this one in the rotation.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Blank | Self::Slash => Self::Dash,
            Self::Dash => Self::Backslash,
            Self::Backslash => Self::Pipe,
            Self::Pipe => Self::Slash,
        }
    }

    /// The text drawn for this glyph.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "",
            Self::Dash => "-",
            Self::Backslash => "\\",
            Self::Pipe => "|",
            Self::Slash => "/",
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct SpinnerState {
    glyph: Glyph,
    active: bool,
}

/// A thread-safe, cloneable spinner handle.
///
/// Clones share the same glyph state and sink.
#[derive(Clone)]
pub struct SpinnerIndicator {
    title: CompactString,
    width: usize,
    sink: Sink,
    state: Arc<Mutex<SpinnerState>>,
}

impl fmt::Debug for SpinnerIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SpinnerIndicator")
            .field("title", &self.title)
            .field("glyph", &state.glyph)
            .field("active", &state.active)
            .finish_non_exhaustive()
    }
}

impl SpinnerIndicator {
    /// Creates a spinner with the default width, writing to standard output.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self::from_parts(title, DEFAULT_SPINNER_WIDTH, Sink::stdout())
    }

    /// Starts a [`SpinnerBuilder`] for a custom width or sink.
    #[must_use]
    pub fn builder() -> SpinnerBuilder {
        SpinnerBuilder::new()
    }

    pub(crate) fn from_parts(title: &str, width: usize, sink: Sink) -> Self {
        Self {
            title: filter_title(title),
            width,
            sink,
            state: Arc::new(Mutex::new(SpinnerState::default())),
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

    /// The glyph currently shown.
    #[must_use]
    pub fn glyph(&self) -> Glyph {
        self.state.lock().glyph
    }

    /// Whether updates currently advance the glyph.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// The current line text, without control sequences.
    #[must_use]
    pub fn line(&self) -> String {
        self.render(self.state.lock().glyph)
    }

    fn render(&self, glyph: Glyph) -> String {
        format!("{}:[{glyph}]", self.title)
    }
}

impl Indicator for SpinnerIndicator {
    fn update(&self, progress: f64) {
        let mut state = self.state.lock();
        if progress > 0.0 {
            state.active = true;
        } else if progress < 0.0 {
            state.active = false;
        }
        if state.active {
            state.glyph = state.glyph.next();
        }
        self.sink
            .write_str(&format!("{}{}", terminal::line_reset(), self.render(state.glyph)));
    }
}

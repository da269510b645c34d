//! Grouped, synchronized redraw of several indicators.
//!
//! A [`Coordinator`] owns a registry of indicators keyed by name and draws them as a
//! block of stacked lines. Every [`Coordinator::update`] moves the cursor back to the
//! top of the previously drawn block and repaints every line, so the block stays in
//! place while individual indicators change.
//!
//! # Display Order
//!
//! Each registration records an `index` equal to the registry size right after the
//! insertion, plus a sequence number that only ever grows. Lines are drawn in ascending
//! `(index, sequence)` order. Registering distinct keys therefore draws them in
//! insertion order, while registering an existing key again moves it below every entry
//! that was not re-registered after it.
//!
//! # Synchronization Strategy
//!
//! A single [`Mutex`](parking_lot::Mutex) guards the registry *and* the output of a
//! redraw. The cursor-up prefix and every line of a block are written while it is held,
//! so two callers can never interleave their blocks. Locks are always taken in the same
//! order: coordinator, then the indicator's own lock, then the sink's lock (held for a
//! single write).
//!
//! An indicator's `update` must not call back into the coordinator that owns it; in
//! particular, do not register a [`KeyedIndicator`] with its own coordinator.

use std::{collections::HashMap, fmt, sync::Arc};

use compact_str::CompactString;
use parking_lot::Mutex;

use crate::{
    BarIndicator, ConfigError, Indicator, SpinnerIndicator,
    builder::{BarBuilder, SpinnerBuilder},
    io::Sink,
    spinner::DEFAULT_SPINNER_WIDTH,
    terminal,
};

const LOG_TARGET: &str = "stacked_progress::coordinator";

struct Entry {
    index: usize,
    sequence: u64,
    indicator: Arc<dyn Indicator>,
}

#[derive(Default)]
struct Registry {
    entries: HashMap<CompactString, Entry>,
    next_sequence: u64,
}

impl Registry {
    /// Entries in display order.
    fn ordered(&self) -> Vec<(&CompactString, &Entry)> {
        let mut ordered: Vec<_> = self.entries.iter().collect();
        ordered.sort_by_key(|(_, entry)| (entry.index, entry.sequence));
        ordered
    }
}

/// A thread-safe, cloneable coordinator for a block of stacked indicators.
///
/// Cloning is cheap and every clone shares the same registry and sink, so one
/// coordinator can be created by the orchestrating code and handed to each worker.
///
/// # Examples
///
/// ```
/// use stacked_progress::{Coordinator, SharedBuffer};
///
/// let (buffer, sink) = SharedBuffer::with_sink();
/// let coordinator = Coordinator::new(sink);
/// let _download = coordinator.add_bar("download", "download", 100.0)?;
/// let _index = coordinator.add_spinner("index", "index");
///
/// coordinator.update("download", 50.0);
///
/// let output = buffer.contents();
/// assert!(output.contains("] 50%\n"));
/// assert!(output.ends_with("index:[]\n"));
/// # Ok::<(), stacked_progress::ConfigError>(())
/// ```
#[derive(Clone, Default)]
pub struct Coordinator {
    registry: Arc<Mutex<Registry>>,
    sink: Sink,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("count", &self.len())
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Creates an empty coordinator writing cursor movements and line breaks to `sink`.
    ///
    /// Indicators registered with it should write to the same sink; the
    /// [`add_spinner`](Self::add_spinner) and [`add_bar`](Self::add_bar) shorthands take
    /// care of that.
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self {
            registry: Arc::default(),
            sink,
        }
    }

    /// Creates an empty coordinator writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Sink::stdout())
    }

    /// The sink this coordinator writes to.
    #[must_use]
    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Registers `indicator` under `key`, replacing any previous entry for that key.
    ///
    /// An empty key is ignored. The entry is placed after all current entries, except
    /// that when `key` was already present the registry does not grow, so it shares its
    /// index with the last entry and is drawn after it.
    pub fn put(&self, key: &str, indicator: impl Indicator + 'static) {
        if key.is_empty() {
            log::debug!(target: LOG_TARGET, "Ignoring registration with an empty key");
            return;
        }

        let mut registry = self.registry.lock();
        let sequence = registry.next_sequence;
        registry.next_sequence += 1;
        registry.entries.insert(
            CompactString::from(key),
            Entry {
                index: 0,
                sequence,
                indicator: Arc::new(indicator),
            },
        );
        let index = registry.entries.len() - 1;
        if let Some(entry) = registry.entries.get_mut(key) {
            entry.index = index;
        }
        log::trace!(target: LOG_TARGET, "Registered '{key}' at index {index}");
    }

    /// Creates a spinner on this coordinator's sink, registers it and returns the handle.
    #[must_use]
    pub fn add_spinner(&self, key: &str, title: &str) -> SpinnerIndicator {
        let spinner = SpinnerIndicator::from_parts(title, DEFAULT_SPINNER_WIDTH, self.sink.clone());
        self.put(key, spinner.clone());
        spinner
    }

    /// Registers a spinner built from `builder`, writing to this coordinator's sink.
    ///
    /// # Errors
    ///
    /// Propagates the builder's [`ConfigError`].
    pub fn add_spinner_with(
        &self,
        key: &str,
        builder: SpinnerBuilder,
    ) -> Result<SpinnerIndicator, ConfigError> {
        let spinner = builder.sink(self.sink.clone()).build()?;
        self.put(key, spinner.clone());
        Ok(spinner)
    }

    /// Creates a bar on this coordinator's sink, registers it and returns the handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTotal`] unless `total` is positive and finite.
    pub fn add_bar(&self, key: &str, title: &str, total: f64) -> Result<BarIndicator, ConfigError> {
        self.add_bar_with(key, BarBuilder::new(total).title(title))
    }

    /// Registers a bar built from `builder`, writing to this coordinator's sink.
    ///
    /// # Errors
    ///
    /// Propagates the builder's [`ConfigError`].
    pub fn add_bar_with(&self, key: &str, builder: BarBuilder) -> Result<BarIndicator, ConfigError> {
        let bar = builder.sink(self.sink.clone()).build()?;
        self.put(key, bar.clone());
        Ok(bar)
    }

    /// Returns an [`Indicator`] whose updates redraw this coordinator for `key`.
    #[must_use]
    pub fn keyed(&self, key: &str) -> KeyedIndicator {
        KeyedIndicator {
            coordinator: self.clone(),
            key: CompactString::from(key),
        }
    }

    /// Removes every entry, e.g. before tracking a fresh batch of tasks.
    pub fn clear(&self) {
        self.registry.lock().entries.clear();
        log::trace!(target: LOG_TARGET, "Cleared registry");
    }

    /// Redraws the whole block, feeding `progress` to the entry under `key` and `0` to
    /// every other entry.
    ///
    /// The cursor first moves up once per registered entry, then each entry repaints its
    /// line followed by a line break. An empty key does nothing. An unknown key redraws
    /// every entry unchanged without registering anything.
    pub fn update(&self, key: &str, progress: f64) {
        if key.is_empty() {
            log::debug!(target: LOG_TARGET, "Ignoring update with an empty key");
            return;
        }

        let registry = self.registry.lock();
        if !registry.entries.contains_key(key) {
            log::debug!(target: LOG_TARGET, "Update for unregistered key '{key}'; redrawing unchanged");
        }

        self.sink
            .write_str(&terminal::cursor_up(registry.entries.len()));
        for (name, entry) in registry.ordered() {
            let signal = if name.as_str() == key { progress } else { 0.0 };
            entry.indicator.update(signal);
            self.sink.write_str("\n");
        }
    }

    /// Registered keys in display order.
    #[must_use]
    pub fn keys(&self) -> Vec<CompactString> {
        self.registry
            .lock()
            .ordered()
            .into_iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Whether `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.registry.lock().entries.contains_key(key)
    }

    /// Number of registered entries, which is also the height of the drawn block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.lock().entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.lock().entries.is_empty()
    }
}

/// An [`Indicator`] bound to one key of a [`Coordinator`].
///
/// Updating it redraws the coordinator's whole block, which makes it usable with the
/// [`io`](crate::io) and [`iter`](crate::iter) adapters.
#[derive(Clone, Debug)]
pub struct KeyedIndicator {
    coordinator: Coordinator,
    key: CompactString,
}

impl KeyedIndicator {
    /// The key updates are routed to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Indicator for KeyedIndicator {
    fn update(&self, progress: f64) {
        self.coordinator.update(&self.key, progress);
    }
}

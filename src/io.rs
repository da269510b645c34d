//! Output sinks and I/O wrappers.
//!
//! Every indicator and [`Coordinator`](crate::Coordinator) writes through a [`Sink`], a
//! cloneable handle to one shared [`Write`] stream. Each write takes the sink's lock
//! for the duration of a single `write_all`, so a rendered line is never interleaved
//! with another writer's bytes. No flush is performed after a write; call
//! [`Sink::flush`] when the stream needs it.
//!
//! [`IndicatorReader`] and [`IndicatorWriter`] are pass-through middleware: every
//! non-empty read or write updates an [`Indicator`] with the cumulative byte count.

use std::{
    fmt,
    io::{self, Read, Write},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::Indicator;

const LOG_TARGET: &str = "stacked_progress::io";

/// A thread-safe, cloneable handle to an output stream.
///
/// Cloning is cheap (Arc bump); all clones write to the same underlying stream.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Sink {
    /// Wraps an arbitrary writer.
    #[must_use]
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// A sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// A sink writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Writes `text` in one locked `write_all`.
    ///
    /// Failures are logged and dropped: progress output never interrupts the caller.
    pub fn write_str(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Err(err) = self.inner.lock().write_all(text.as_bytes()) {
            log::warn!(target: LOG_TARGET, "Failed to write progress output: {err}");
        }
    }

    /// Flushes the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the wrapped writer.
    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// An in-memory, cloneable byte buffer implementing [`Write`].
///
/// Useful for capturing rendered output: hand a clone to [`Sink::new`] and read the
/// collected text back with [`contents`](Self::contents).
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer and a [`Sink`] that writes into it.
    #[must_use]
    pub fn with_sink() -> (Self, Sink) {
        let buffer = Self::new();
        let sink = Sink::new(buffer.clone());
        (buffer, sink)
    }

    /// Returns everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Returns everything written so far and empties the buffer.
    #[must_use]
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.bytes.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A wrapper around [`Read`] that reports the bytes read so far to an [`Indicator`].
pub struct IndicatorReader<R, I> {
    inner: R,
    indicator: I,
    transferred: u64,
}

impl<R, I> IndicatorReader<R, I> {
    /// Creates a new `IndicatorReader` wrapping `inner`.
    pub const fn new(inner: R, indicator: I) -> Self {
        Self {
            inner,
            indicator,
            transferred: 0,
        }
    }

    /// Total bytes read through this wrapper.
    #[must_use]
    pub const fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Unwraps the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, I: Indicator> Read for IndicatorReader<R, I> {
    #[allow(clippy::cast_precision_loss)]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.transferred += n as u64;
            self.indicator.update(self.transferred as f64);
        }
        Ok(n)
    }
}

/// A wrapper around [`Write`] that reports the bytes written so far to an [`Indicator`].
pub struct IndicatorWriter<W, I> {
    inner: W,
    indicator: I,
    transferred: u64,
}

impl<W, I> IndicatorWriter<W, I> {
    /// Creates a new `IndicatorWriter` wrapping `inner`.
    pub const fn new(inner: W, indicator: I) -> Self {
        Self {
            inner,
            indicator,
            transferred: 0,
        }
    }

    /// Total bytes written through this wrapper.
    #[must_use]
    pub const fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Unwraps the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write, I: Indicator> Write for IndicatorWriter<W, I> {
    #[allow(clippy::cast_precision_loss)]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if n > 0 {
            self.transferred += n as u64;
            self.indicator.update(self.transferred as f64);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read as _, Write as _};

    use super::{IndicatorReader, IndicatorWriter, SharedBuffer};
    use crate::BarIndicator;

    /// Sink Capture
    /// Verifies clones of a sink share one buffer and `take` drains it.
    #[test]
    fn test_shared_buffer_sink() {
        let (buffer, sink) = SharedBuffer::with_sink();
        let other = sink.clone();

        sink.write_str("ab");
        other.write_str("cd");

        assert_eq!(buffer.take(), "abcd");
        assert_eq!(buffer.contents(), "");
    }

    /// Flush
    /// Flushing goes through to the wrapped writer; standard streams accept it too.
    #[test]
    fn test_sink_flush() {
        let (buffer, sink) = SharedBuffer::with_sink();
        sink.write_str("x");
        sink.flush().unwrap();
        assert_eq!(buffer.contents(), "x");

        let stderr = super::Sink::stderr();
        stderr.write_str("");
        stderr.flush().unwrap();
    }

    /// Reader Tracking
    /// Verifies the bar follows the cumulative number of bytes read.
    #[test]
    fn test_io_reader() {
        let (_buffer, sink) = SharedBuffer::with_sink();
        let bar = BarIndicator::builder(100.0).sink(sink).build().unwrap();
        let data = vec![0u8; 100];
        let mut reader = IndicatorReader::new(Cursor::new(&data), bar.clone());

        let mut buf = [0u8; 10];
        reader.read_exact(&mut buf).unwrap();
        reader.read_exact(&mut buf).unwrap();

        assert_eq!(reader.transferred(), 20);
        assert!((bar.value() - 20.0).abs() < f64::EPSILON);
    }

    /// Writer Tracking
    /// Verifies bytes written are counted and rendered.
    #[test]
    fn test_io_writer() {
        let (buffer, sink) = SharedBuffer::with_sink();
        let bar = BarIndicator::builder(10.0)
            .width(10)
            .title("copy")
            .sink(sink)
            .build()
            .unwrap();
        let mut writer = IndicatorWriter::new(Vec::new(), bar);

        writer.write_all(&[1, 2, 3, 4, 5]).unwrap();

        assert_eq!(writer.transferred(), 5);
        assert!(buffer.contents().ends_with("copy:[#####     ] 50%"));
        assert_eq!(writer.into_inner(), vec![1, 2, 3, 4, 5]);
    }
}

//! Running-average metric logger
//!
//! [`RunningLogger`] collects scalar samples (loss, accuracy, grad norm, ...)
//! emitted at arbitrary points of a training loop and periodically reduces each
//! series to its mean. Every flush writes one `"<name> <mean>"` line per series
//! to the log file, echoes the same text to stdout, and starts a fresh window.

use crate::error::LoggerError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A named sequence of samples accumulated since the last flush.
#[derive(Debug, Clone)]
struct Series {
    name: String,
    values: Vec<f64>,
}

/// Accumulates named scalar series and writes their means on [`flush`].
///
/// Series are reported in the order they were first registered, either
/// explicitly with [`register_series`] or implicitly by the first
/// [`append`] to an unknown name. A flush clears every series, so the
/// ordering is re-established from scratch for the next window.
///
/// The log file is truncated on creation and stays open until the logger is
/// dropped. The logger is not synchronized; share it across threads only
/// behind a lock.
///
/// # Example
///
/// ```no_run
/// use train_utils::logger::RunningLogger;
///
/// let mut logger = RunningLogger::create("logs/train.log").unwrap();
/// logger.write_line("epoch 1").unwrap();
/// for step in 0..100 {
///     logger.append("loss", 1.0 / (step + 1) as f64);
/// }
/// logger.flush().unwrap();
/// ```
///
/// [`flush`]: RunningLogger::flush
/// [`register_series`]: RunningLogger::register_series
/// [`append`]: RunningLogger::append
pub struct RunningLogger {
    path: PathBuf,
    file: BufWriter<File>,
    series: Vec<Series>,
}

impl RunningLogger {
    /// Opens `path` for writing, truncating any previous contents.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, LoggerError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| LoggerError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "opened metric log");
        Ok(Self {
            path,
            file: BufWriter::new(file),
            series: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts tracking `name` if it is not tracked yet.
    ///
    /// Registering fixes the series' position in the next flush even before
    /// any sample arrives. Registering an existing series is a no-op.
    pub fn register_series(&mut self, name: &str) {
        self.series_mut(name);
    }

    /// Appends `value` to the series `key`, registering the series first if needed.
    pub fn append(&mut self, key: &str, value: f64) {
        trace!(key, value, "append sample");
        self.series_mut(key).values.push(value);
    }

    fn series_mut(&mut self, name: &str) -> &mut Series {
        let idx = match self.series.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.series.push(Series {
                    name: name.to_string(),
                    values: Vec::new(),
                });
                self.series.len() - 1
            }
        };
        &mut self.series[idx]
    }

    /// Names of the tracked series in output order.
    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Samples accumulated for `key` since the last flush.
    pub fn pending(&self, key: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.name == key)
            .map(|s| s.values.as_slice())
    }

    /// Returns true when no series is tracked.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Writes the mean of every series, one per line, then clears all series.
    ///
    /// Equivalent to `flush_with("\n")`.
    pub fn flush(&mut self) -> Result<String, LoggerError> {
        self.flush_with("\n")
    }

    /// Writes the mean of every series joined by `delimiter`, then clears all series.
    ///
    /// Each entry is formatted as `"<name> <mean>"` with 6 decimal places. The
    /// joined text is followed by a newline in the file, flushed to disk and
    /// printed to stdout. Series registered without samples are skipped. With
    /// nothing to report an empty line is written.
    ///
    /// # Returns
    ///
    /// The emitted text without its trailing newline.
    pub fn flush_with(&mut self, delimiter: &str) -> Result<String, LoggerError> {
        let msgs: Vec<String> = self
            .series
            .iter()
            .filter(|s| !s.values.is_empty())
            .map(|s| format!("{} {}", s.name, format_mean(mean(&s.values))))
            .collect();
        let msg = msgs.join(delimiter);

        self.emit(&msg)?;
        debug!(series = self.series.len(), "flushed running means");
        self.series.clear();
        Ok(msg)
    }

    /// Writes `msg` as its own line, bypassing aggregation.
    pub fn write_line(&mut self, msg: &str) -> Result<(), LoggerError> {
        self.emit(msg)
    }

    fn emit(&mut self, msg: &str) -> Result<(), LoggerError> {
        writeln!(self.file, "{}", msg)
            .and_then(|_| self.file.flush())
            .map_err(|source| LoggerError::Io {
                path: self.path.clone(),
                source,
            })?;
        println!("{}", msg);
        Ok(())
    }
}

/// Formats a mean with 6 decimal places, writing NaN as `nan`.
fn format_mean(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.6}", value)
    }
}

/// Arithmetic mean of `values`, or NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

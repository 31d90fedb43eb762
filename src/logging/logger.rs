//! Logger handle with a swappable output target

use crate::lifecycle::ExitStatus;
use chrono::Local;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

const MODULE: &str = "logging";

/// Sink that formatted log lines are written into
pub type OutputTarget = Box<dyn Write + Send>;

/// Severities supported by the logger facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Unrecoverable startup failure
    Fatal,
    /// Warning: something the operator should notice
    Warn,
    /// Info: informational messages
    Info,
    /// Debug: only emitted when debug mode is on
    Debug,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
            Severity::Warn => write!(f, "WARN"),
            Severity::Info => write!(f, "INFO"),
            Severity::Debug => write!(f, "DEBUG"),
        }
    }
}

#[derive(Clone)]
struct SharedOutput(Arc<Mutex<OutputTarget>>);

struct OutputWriter<'a>(MutexGuard<'a, OutputTarget>);

impl Write for OutputWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedOutput {
    type Writer = OutputWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        OutputWriter(self.0.lock())
    }
}

struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Explicit logging handle shared by every component of one run.
///
/// Each handle owns its own tracing [`Dispatch`], so no process-global
/// subscriber is installed. Clones share the same output target.
#[derive(Clone)]
pub struct Logger {
    output: SharedOutput,
    dispatch: Dispatch,
    debug: bool,
}

impl Logger {
    /// Create a logger writing to stdout
    pub fn new(debug: bool) -> Self {
        Self::with_console(Box::new(io::stdout()), debug)
    }

    /// Create a logger whose default output target is `console`
    pub fn with_console(console: OutputTarget, debug: bool) -> Self {
        let output = SharedOutput(Arc::new(Mutex::new(console)));
        let level = if debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(output.clone())
            .with_timer(LocalTimestamp)
            .with_ansi(false)
            .with_target(false)
            .with_filter(level);
        let subscriber = tracing_subscriber::registry().with(layer);

        Self {
            output,
            dispatch: Dispatch::new(subscriber),
            debug,
        }
    }

    /// Whether debug-level lines are emitted
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// The dispatch every line of this logger goes through
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the current tracing dispatcher, so plain
    /// `tracing` macros inside it land on the same output target.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Replace the output target, returning the previous one.
    ///
    /// Lines emitted after this call returns go to `target`. The previous
    /// target is flushed and handed back so the caller can restore or close
    /// it. A failed flush is reported as a warning on the new target.
    pub fn swap_output(&self, target: OutputTarget) -> OutputTarget {
        let mut previous = std::mem::replace(&mut *self.output.0.lock(), target);
        if let Err(error) = previous.flush() {
            self.warn(MODULE, format!("flush previous log output fail: {error}"));
        }
        previous
    }

    /// Log a message at the given severity
    pub fn log(&self, severity: Severity, module: &str, message: &str) {
        self.in_scope(|| match severity {
            Severity::Fatal => tracing::error!(module, fatal = true, "{message}"),
            Severity::Warn => tracing::warn!(module, "{message}"),
            Severity::Info => tracing::info!(module, "{message}"),
            Severity::Debug => tracing::debug!(module, "{message}"),
        });
    }

    /// Log a debug message
    pub fn debug<S: AsRef<str>>(&self, module: &str, message: S) {
        self.log(Severity::Debug, module, message.as_ref());
    }

    /// Log an info message
    pub fn info<S: AsRef<str>>(&self, module: &str, message: S) {
        self.log(Severity::Info, module, message.as_ref());
    }

    /// Log a warning message
    pub fn warn<S: AsRef<str>>(&self, module: &str, message: S) {
        self.log(Severity::Warn, module, message.as_ref());
    }

    /// Log a fatal message and return the exit status the process must end with
    pub fn fatal<S: AsRef<str>>(&self, module: &str, message: S) -> ExitStatus {
        self.log(Severity::Fatal, module, message.as_ref());
        ExitStatus::Fatal
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

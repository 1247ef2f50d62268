//! Logging context handed from the bootstrap down to the delegate.
//!
//! Nothing here installs a global subscriber. A [`LogContext`] owns its own
//! `Dispatch` and is made the default only for the duration of
//! [`LogContext::in_scope`], so several contexts can coexist in one process.

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{LaunchError, Result};
use chrono::Local;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Target of the `App Init` / `App Exit` markers. Always enabled at `info`.
pub const LIFECYCLE_TARGET: &str = "kernel_boot::lifecycle";

/// Date and microsecond-resolution time, e.g. `2026/10/16 09:41:07.123456`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

/// Renders `<prefix><date> <time> <file>:<line>: <message>`.
#[derive(Debug, Clone)]
pub struct PrefixedFormat {
    prefix: String,
}

impl PrefixedFormat {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for PrefixedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{}{} ",
            self.prefix,
            Local::now().format(TIMESTAMP_FORMAT)
        )?;

        // Events bridged from other facades may lack a location.
        match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => {
                write!(writer, "{}:{}: ", source_path(meta.target(), file), line)?
            }
            _ => write!(writer, "{}: ", meta.target())?,
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// rustc records this package's files relative to the manifest; anchor them
/// so the location is a full path. Other crates' paths are left as compiled.
fn source_path(target: &str, file: &str) -> String {
    let ours = target == env!("CARGO_CRATE_NAME")
        || target.starts_with(concat!(env!("CARGO_CRATE_NAME"), "::"));
    if ours {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join(file)
            .display()
            .to_string()
    } else {
        file.to_string()
    }
}

#[derive(Clone, Debug)]
pub struct LogContext {
    dispatch: Dispatch,
}

impl LogContext {
    /// Builds a context that writes to standard error.
    pub fn new(config: &LoggingConfig) -> Result<Self> {
        Self::with_writer(config, io::stderr)
    }

    pub fn with_writer<W>(config: &LoggingConfig, make_writer: W) -> Result<Self>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = build_filter(config)?;
        let registry = tracing_subscriber::registry().with(filter);

        let dispatch = match config.format {
            LogFormat::Prefixed => Dispatch::new(
                registry.with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .event_format(PrefixedFormat::new(config.prefix.clone()))
                        .with_writer(make_writer),
                ),
            ),
            LogFormat::Json => Dispatch::new(
                registry.with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_file(true)
                        .with_line_number(true)
                        .with_writer(make_writer),
                ),
            ),
        };

        Ok(Self { dispatch })
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Runs `f` with this context as the thread's default dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if config.respect_rust_log => filter,
        _ => EnvFilter::try_new(&config.level).map_err(|e| LaunchError::LoggerError {
            message: format!("invalid filter '{}': {}", config.level, e),
        })?,
    };

    let lifecycle: Directive = format!("{}=info", LIFECYCLE_TARGET)
        .parse()
        .map_err(|e| LaunchError::LoggerError {
            message: format!("invalid lifecycle directive: {}", e),
        })?;

    Ok(filter.add_directive(lifecycle))
}

/// In-memory sink, usable anywhere a `MakeWriter` is expected.
#[derive(Clone, Debug, Default)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

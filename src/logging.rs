//! Structured logging.
//!
//! Log records are produced with the [`tracing`] macros and rendered as
//! logfmt lines (`time=... level=debug msg=... key=value`) by the [`Logfmt`]
//! event formatter. Instead of relying on a process-wide subscriber, code that
//! needs to log receives a [`Logger`] and runs its logging inside
//! [`Logger::in_scope`].

use std::{
    fmt::{self, Write as _},
    io,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Result;
use chrono::{Local, SecondsFormat};
use tracing::{
    Dispatch, Event, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
};
use tracing_subscriber::{
    fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter, format::Writer},
    registry::LookupSpan,
};

/// A handle to a logging sink, passed explicitly to whoever needs to log.
///
/// Cloning is cheap: clones share the same subscriber and writer.
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Build a logger that writes logfmt lines at `level` and above to `make_writer`.
    #[must_use]
    pub fn new<W>(level: LevelFilter, make_writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(make_writer)
            .event_format(Logfmt)
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Build a logger writing to standard error.
    #[must_use]
    pub fn stderr(level: LevelFilter) -> Self {
        Self::new(level, io::stderr)
    }

    /// A logger that discards every record.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Run `f` with this logger as the current thread's default subscriber.
    ///
    /// Any `tracing` event emitted inside `f` (and not inside a nested
    /// `in_scope` of another logger) is written to this logger's sink.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

/// Parse a log level name (`trace`, `debug`, `info`, `warn`, `error` or `off`).
///
/// # Errors
///
/// Returns an error if `level` is not a recognised level name.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .map_err(|e| anyhow::anyhow!("Invalid log level '{level}': {e}"))
}

/// Event formatter producing one logfmt line per event.
///
/// Fields are written in the order `time`, `level`, `msg`, then the event's
/// own fields in the order they were recorded. Span context is not rendered.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logfmt;

impl<S, N> FormatEvent<S, N> for Logfmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let time = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);
        let level = event.metadata().level().to_string().to_lowercase();

        write_pair(&mut writer, "time", &time)?;
        writer.write_char(' ')?;
        write_pair(&mut writer, "level", &level)?;
        writer.write_char(' ')?;
        write_pair(&mut writer, "msg", fields.message.as_deref().unwrap_or_default())?;

        for (key, value) in &fields.fields {
            writer.write_char(' ')?;
            write_pair(&mut writer, key, value)?;
        }

        writeln!(writer)
    }
}

/// Collects an event's message and fields as strings.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Write `key=value`, quoting the value when needed.
fn write_pair(w: &mut impl fmt::Write, key: &str, value: &str) -> fmt::Result {
    w.write_str(key)?;
    w.write_char('=')?;

    if !needs_quoting(value) {
        return w.write_str(value);
    }

    w.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                w.write_char('\\')?;
                w.write_char(c)?;
            }
            '\n' => w.write_str("\\n")?,
            '\r' => w.write_str("\\r")?,
            '\t' => w.write_str("\\t")?,
            _ => w.write_char(c)?,
        }
    }
    w.write_char('"')
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
}

/// An in-memory, shareable log sink.
///
/// Every clone appends to the same buffer, which makes it usable as a
/// [`MakeWriter`] for capturing log output.
#[derive(Clone, Debug, Default)]
pub struct BufferWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl BufferWriter {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

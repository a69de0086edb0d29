//! Execution time logging.
//!
//! [`print_exec_time`] starts a timer and returns an [`ExecTimer`] guard. When
//! the guard is dropped (or [`ExecTimer::finish`] is called) a single debug
//! record is emitted with the label as its message and the elapsed time in a
//! `took` field.

use std::time::{Duration, Instant};

use crate::logging::Logger;

/// Start timing an operation labelled `label`.
///
/// The start instant is captured now, not when the guard is released. Bind
/// the guard to a named variable so it lives until the end of the scope:
///
/// ```no_run
/// # use doku_du::{logging::Logger, utils::print_exec_time};
/// # use tracing::level_filters::LevelFilter;
/// let logger = Logger::stderr(LevelFilter::DEBUG);
/// let _timer = print_exec_time(&logger, "walk volumes");
/// // ... work; the record is written when `_timer` goes out of scope,
/// // including on early returns.
/// ```
///
/// Note that `let _ = print_exec_time(..)` drops the guard immediately.
#[must_use = "the elapsed time is logged when the returned guard is dropped"]
pub fn print_exec_time(logger: &Logger, label: impl Into<String>) -> ExecTimer {
    ExecTimer {
        logger: logger.clone(),
        label: label.into(),
        start: Instant::now(),
        emitted: false,
    }
}

/// Guard that logs the time elapsed since its creation, exactly once.
#[derive(Debug)]
pub struct ExecTimer {
    logger: Logger,
    label: String,
    start: Instant,
    emitted: bool,
}

impl ExecTimer {
    /// The label this timer reports under.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Time elapsed since the timer was started, without logging it.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Log the elapsed time now and return it.
    pub fn finish(mut self) -> Duration {
        self.emit()
    }

    fn emit(&mut self) -> Duration {
        let took = self.start.elapsed();

        if !self.emitted {
            self.emitted = true;
            let label = self.label.as_str();
            self.logger
                .in_scope(|| tracing::debug!(took = ?took, "{label}"));
        }

        took
    }
}

impl Drop for ExecTimer {
    fn drop(&mut self) {
        self.emit();
    }
}

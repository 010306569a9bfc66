//! Progress reporting and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Receives progress from a running paint and answers whether to stop.
///
/// Calls are fire-and-forget; a sink cannot fail the operation.
pub trait ProgressSink {
    /// A run with `max` assignments is starting.
    fn begin(&mut self, max: usize);

    /// `current` of `max` assignments have been applied.
    fn report(&mut self, current: usize, max: usize);

    /// Polled between batches.
    fn is_cancelled(&self) -> bool;

    /// The run finished, successfully or not.
    fn end(&mut self);
}

impl<T: ProgressSink + ?Sized> ProgressSink for &mut T {
    fn begin(&mut self, max: usize) {
        (**self).begin(max);
    }

    fn report(&mut self, current: usize, max: usize) {
        (**self).report(current, max);
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }

    fn end(&mut self) {
        (**self).end();
    }
}

/// Thread-safe cancellation signal.
///
/// Clones share the same flag, so a handler on another thread can stop a run.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// A sink that ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&mut self, _max: usize) {}

    fn report(&mut self, _current: usize, _max: usize) {}

    fn is_cancelled(&self) -> bool {
        false
    }

    fn end(&mut self) {}
}

/// Logs progress through `tracing` and reads cancellation from a [`CancelFlag`].
#[derive(Debug, Clone)]
pub struct LogProgress {
    title: String,
    cancel: CancelFlag,
    last_percent: Option<usize>,
}

impl LogProgress {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cancel: CancelFlag::new(),
            last_percent: None,
        }
    }

    /// Share an existing cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    fn percent(current: usize, max: usize) -> usize {
        if max == 0 {
            100
        } else {
            current.min(max) * 100 / max
        }
    }
}

impl ProgressSink for LogProgress {
    fn begin(&mut self, max: usize) {
        self.last_percent = None;
        info!("{}: applying {} vertex colors", self.title, max);
    }

    fn report(&mut self, current: usize, max: usize) {
        let percent = Self::percent(current, max);
        // Only log when the whole percentage moves.
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            debug!("{}: {}/{} ({}%)", self.title, current, max, percent);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn end(&mut self) {
        debug!("{}: finished", self.title);
    }
}

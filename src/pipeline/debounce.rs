use std::time::Duration;
use tokio::time::Instant;

/// Trailing-edge debounce window for one event stream.
///
/// Every [`push`](Self::push) replaces the pending value and restarts the
/// quiet window; nothing is emitted on the leading edge. The owner is
/// expected to sleep until [`deadline`](Self::deadline) and then call
/// [`take_due`](Self::take_due).
#[derive(Debug)]
pub struct DebounceWindow<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> DebounceWindow<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Arm (or re-arm) the window with a new value.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.window));
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Instant at which the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Take the pending value once its quiet window has elapsed.
    pub fn take_due(&mut self) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= Instant::now() => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

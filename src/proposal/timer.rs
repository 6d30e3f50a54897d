// One-shot step timer.
// Deadlines are polled from the frame loop instead of registering browser
// callbacks, so whoever owns the timer also owns its cancellation.

/// Cancellable one-shot deadline in `performance.now()` milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepTimer {
    due_ms: Option<f64>,
}

impl StepTimer {
    pub fn new() -> Self {
        Self { due_ms: None }
    }

    /// Schedule firing `dwell_ms` after `now_ms`. Replaces any pending deadline.
    pub fn arm(&mut self, now_ms: f64, dwell_ms: f64) {
        self.due_ms = Some(now_ms + dwell_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }

    /// `true` exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.due_ms.map(|due| (due - now_ms).max(0.0))
    }
}

//! Wake signal and completion latch.
//!
//! The wake signal is a single binary flag: any number of [`WakeSignal::set`]
//! calls before a [`WakeSignal::wait`] collapse into one wake-up. The writer
//! lifecycle lives under the same mutex, so the disposing thread's
//! transition to [`Lifecycle::Disposing`] is always visible to the consumer
//! when it wakes.

use std::sync::{Condvar, Mutex, PoisonError};

use serde::Serialize;

use super::lock;
use crate::errors::ConsumerExit;

/// Writer lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Lifecycle {
    /// Accepting and flushing lines.
    Running,
    /// Shutdown requested; the consumer is performing its final drain.
    Disposing,
    /// The consumer thread has exited; nothing will be flushed anymore.
    Stopped,
}

#[derive(Debug)]
struct SignalState {
    wake_pending: bool,
    dispose_requested: bool,
    lifecycle: Lifecycle,
}

/// Coalescing wake-up notification for the consumer thread.
#[derive(Debug)]
pub struct WakeSignal {
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl WakeSignal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SignalState {
                wake_pending: false,
                dispose_requested: false,
                lifecycle: Lifecycle::Running,
            }),
            cond: Condvar::new(),
        }
    }

    /// Mark a wake-up as pending. Never blocks beyond the short mutex hold.
    pub fn set(&self) {
        let mut state = lock(&self.state);
        state.wake_pending = true;
        self.cond.notify_one();
    }

    /// Block until a wake-up is pending, then clear it.
    ///
    /// Returns the lifecycle observed at wake time.
    pub fn wait(&self) -> Lifecycle {
        let guard = lock(&self.state);
        let mut state = self
            .cond
            .wait_while(guard, |s| !s.wake_pending)
            .unwrap_or_else(PoisonError::into_inner);
        state.wake_pending = false;
        state.lifecycle
    }

    /// Request shutdown: move `Running` to `Disposing` and wake the consumer.
    ///
    /// Returns `true` only for the first call; later calls change nothing.
    /// If the consumer already stopped on its own, the lifecycle stays
    /// `Stopped`.
    pub fn request_dispose(&self) -> bool {
        let mut state = lock(&self.state);
        if state.dispose_requested {
            return false;
        }
        state.dispose_requested = true;
        if state.lifecycle == Lifecycle::Running {
            state.lifecycle = Lifecycle::Disposing;
        }
        state.wake_pending = true;
        self.cond.notify_one();
        true
    }

    /// Record that the consumer thread has left its loop.
    pub fn mark_stopped(&self) {
        lock(&self.state).lifecycle = Lifecycle::Stopped;
    }

    pub fn lifecycle(&self) -> Lifecycle {
        lock(&self.state).lifecycle
    }

    pub fn is_disposing(&self) -> bool {
        self.lifecycle() == Lifecycle::Disposing
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot latch released when the consumer thread finishes.
///
/// Carries the [`ConsumerExit`] so the disposing thread (and anyone else)
/// can see how the consumer ended. Only the first `complete` call counts.
#[derive(Debug, Default)]
pub struct Completion {
    outcome: Mutex<Option<ConsumerExit>>,
    cond: Condvar,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the latch. Returns `false` if it was already released.
    pub fn complete(&self, exit: ConsumerExit) -> bool {
        let mut outcome = lock(&self.outcome);
        if outcome.is_some() {
            return false;
        }
        *outcome = Some(exit);
        self.cond.notify_all();
        true
    }

    /// Block until the latch is released.
    pub fn wait(&self) -> ConsumerExit {
        let guard = lock(&self.outcome);
        let outcome = self
            .cond
            .wait_while(guard, |o| o.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        outcome.clone().unwrap_or(ConsumerExit::Drained)
    }

    /// The recorded outcome, if the latch has been released.
    pub fn get(&self) -> Option<ConsumerExit> {
        lock(&self.outcome).clone()
    }
}

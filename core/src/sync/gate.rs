use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use super::lock;

#[derive(Debug, Default)]
struct GateInner {
    busy: Mutex<bool>,
    cond: Condvar,
}

/// Observable "flush in progress" state.
///
/// The consumer thread marks the gate busy for the duration of every drain
/// cycle and idle again when the cycle ends (or the consumer exits for any
/// reason). Outside code can only observe it: wait for the gate to be idle
/// before reading side effects produced by the sink.
///
/// Idle does not mean the queue is empty. A line enqueued just before
/// [`wait_idle`](Self::wait_idle) may not have woken the consumer yet.
/// The gate has no influence on scheduling.
#[derive(Debug, Clone, Default)]
pub struct FlushGate {
    inner: Arc<GateInner>,
}

impl FlushGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a drain cycle is executing.
    pub fn is_busy(&self) -> bool {
        *lock(&self.inner.busy)
    }

    /// Block until no drain cycle is executing.
    pub fn wait_idle(&self) {
        let guard = lock(&self.inner.busy);
        let _idle = self
            .inner
            .cond
            .wait_while(guard, |busy| *busy)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block until idle or until `timeout` elapses.
    /// Returns `true` if the gate was observed idle.
    pub fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        let guard = lock(&self.inner.busy);
        let (_idle, result) = self
            .inner
            .cond
            .wait_timeout_while(guard, timeout, |busy| *busy)
            .unwrap_or_else(PoisonError::into_inner);
        !result.timed_out()
    }

    /// Mark the gate busy until the returned guard is dropped.
    pub(crate) fn enter(&self) -> BusyGuard {
        self.set_busy(true);
        BusyGuard { gate: self.clone() }
    }

    fn set_busy(&self, busy: bool) {
        let mut state = lock(&self.inner.busy);
        *state = busy;
        if !busy {
            self.inner.cond.notify_all();
        }
    }
}

/// Re-opens the gate on drop, including while unwinding from a panicking sink.
pub(crate) struct BusyGuard {
    gate: FlushGate,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.gate.set_busy(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let gate = FlushGate::new();
        assert!(!gate.is_busy());
        assert!(gate.wait_idle_timeout(Duration::from_millis(1)));
        gate.wait_idle();
    }

    #[test]
    fn busy_while_guard_is_held() {
        let gate = FlushGate::new();
        let guard = gate.enter();
        assert!(gate.is_busy());
        assert!(!gate.wait_idle_timeout(Duration::from_millis(20)));
        drop(guard);
        assert!(!gate.is_busy());
    }

    #[test]
    fn clones_observe_the_same_state() {
        let gate = FlushGate::new();
        let view = gate.clone();
        let _guard = gate.enter();
        assert!(view.is_busy());
    }

    #[test]
    fn wait_idle_unblocks_when_guard_drops() {
        let gate = FlushGate::new();
        let view = gate.clone();

        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let holder = std::thread::spawn(move || {
            let _guard = gate.enter();
            entered_tx.send(()).unwrap();
            std::thread::sleep(Duration::from_millis(50));
        });

        entered_rx.recv().unwrap();
        assert!(view.wait_idle_timeout(Duration::from_secs(5)));
        assert!(!view.is_busy());
        holder.join().unwrap();
    }

    #[test]
    fn guard_reopens_gate_on_panic() {
        let gate = FlushGate::new();
        let inner = gate.clone();
        let result = std::thread::spawn(move || {
            let _guard = inner.enter();
            panic!("sink blew up");
        })
        .join();
        assert!(result.is_err());
        assert!(!gate.is_busy());
    }
}

//! Synchronization primitives shared between producers, the consumer
//! thread, and the disposing thread.
//!
//! - [`queue`]: the unbounded handoff queue producers push lines into.
//! - [`signal`]: the coalescing wake signal (which also carries the writer
//!   lifecycle) and the one-shot completion latch used during shutdown.
//! - [`gate`]: the externally observable "flush in progress" gate.
//!
//! Every mutex here guards plain flags that stay valid if a holder panics,
//! so poisoning is recovered from instead of propagated.

pub mod gate;
pub mod queue;
pub mod signal;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use gate::FlushGate;
pub use queue::{handoff_queue, QueueConsumer, QueueProducer};
pub use signal::{Completion, Lifecycle, WakeSignal};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Unbounded multi-producer, single-consumer handoff queue.
//!
//! Backed by `tokio::sync::mpsc::unbounded_channel`. Neither `send` nor
//! `try_recv` needs a runtime, so both ends are used from plain threads.
//! Sending never blocks and never applies back-pressure.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Create a connected producer/consumer pair.
pub fn handoff_queue() -> (QueueProducer, QueueConsumer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueProducer { tx }, QueueConsumer { rx })
}

/// Producer end; cheap to clone, safe to use from any thread.
#[derive(Debug, Clone)]
pub struct QueueProducer {
    tx: UnboundedSender<String>,
}

impl QueueProducer {
    /// Append a line to the tail of the queue.
    ///
    /// Returns `false` when the consumer end is gone and the line was
    /// dropped.
    pub fn enqueue(&self, line: String) -> bool {
        self.tx.send(line).is_ok()
    }
}

/// Consumer end, owned by the single consumer thread.
#[derive(Debug)]
pub struct QueueConsumer {
    rx: UnboundedReceiver<String>,
}

impl QueueConsumer {
    /// Remove and return the head of the queue, or `None` if it is empty.
    pub fn try_dequeue(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Refuse further lines. Lines already queued can still be dequeued;
    /// every later `enqueue` reports a drop.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

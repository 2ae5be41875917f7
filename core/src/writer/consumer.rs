//! The single background consumer.
//!
//! One drain cycle per wake-up:
//!
//! 1. Wait on the wake signal.
//! 2. Mark the flush gate busy.
//! 3. Move queued lines into the batch buffer, delivering the buffer to the
//!    sink whenever the next line would overflow its capacity.
//! 4. If at least one line was processed, deliver whatever is left.
//! 5. Mark the gate idle. If shutdown was requested, close the queue, run
//!    one more drain pass for lines that raced in alongside `dispose`, then
//!    exit.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::errors::{ConsumerExit, SinkError};
use crate::output::{Batch, BatchBuffer};
use crate::sink::TextSink;
use crate::stats::WriterStats;
use crate::sync::{Completion, FlushGate, QueueConsumer, WakeSignal};

pub(crate) struct Consumer<S: TextSink> {
    pub(crate) queue: QueueConsumer,
    pub(crate) buffer: BatchBuffer,
    pub(crate) sink: S,
    pub(crate) signal: Arc<WakeSignal>,
    pub(crate) gate: FlushGate,
    pub(crate) stats: Arc<WriterStats>,
}

impl<S: TextSink> Consumer<S> {
    fn run(mut self) -> Result<(), SinkError> {
        loop {
            self.signal.wait();

            let busy = self.gate.enter();
            self.drain_cycle()?;

            if self.signal.is_disposing() {
                // Lines sent after this are refused and counted as dropped.
                self.queue.close();
                let drained = self.drain_cycle()?;
                if drained > 0 {
                    debug!("Final drain delivered {} late line(s)", drained);
                }
                drop(busy);
                return Ok(());
            }
            drop(busy);
        }
    }

    /// Empty the queue into the buffer. Returns the number of lines processed.
    fn drain_cycle(&mut self) -> Result<usize, SinkError> {
        let mut processed = 0;
        while let Some(line) = self.queue.try_dequeue() {
            if let Some(batch) = self.buffer.push(&line) {
                self.deliver(batch)?;
            }
            processed += 1;
        }

        if processed > 0 {
            if let Some(batch) = self.buffer.flush() {
                self.deliver(batch)?;
            }
        }
        Ok(processed)
    }

    fn deliver(&mut self, batch: Batch) -> Result<(), SinkError> {
        self.sink.write_batch(&batch.text)?;
        debug!(
            "Flushed batch: {} line(s), {} char(s)",
            batch.lines, batch.chars
        );
        self.stats.record_flush(&batch);
        Ok(())
    }
}

/// Thread entry point. Always marks the writer stopped and releases the
/// completion latch, whether the loop drained, the sink failed, or it panicked.
pub(crate) fn consumer_main<S: TextSink>(consumer: Consumer<S>, completion: Arc<Completion>) {
    let signal = consumer.signal.clone();
    info!("Writer consumer started");

    let exit = match panic::catch_unwind(AssertUnwindSafe(|| consumer.run())) {
        Ok(Ok(())) => {
            info!("Writer consumer drained and stopped");
            ConsumerExit::Drained
        }
        Ok(Err(e)) => {
            error!("Sink failed, writer stopped: {e}");
            ConsumerExit::SinkFailed(e.to_string())
        }
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            error!("PANIC in writer consumer: {msg}");
            ConsumerExit::Panicked(msg)
        }
    };

    signal.mark_stopped();
    completion.complete(exit);
}

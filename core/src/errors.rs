//! Error types for the linebatch core crate.
//!
//! Producers never see an error: `enqueue` always succeeds. Errors surface
//! only at construction time ([`WriterError`]) and inside the consumer thread
//! when a sink rejects a batch ([`SinkError`]). How the consumer thread ended
//! is reported separately as a [`ConsumerExit`].

use thiserror::Error;

/// Errors returned when building or starting a writer.
#[derive(Error, Debug)]
pub enum WriterError {
    /// The writer configuration is invalid.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The background consumer thread could not be started.
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),
}

/// Errors raised by a [`TextSink`](crate::sink::TextSink) while accepting a batch.
#[derive(Error, Debug)]
pub enum SinkError {
    /// A low-level I/O error while writing the batch.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink refused the batch for a reason of its own.
    #[error("Sink rejected batch: {0}")]
    Rejected(String),
}

/// How the consumer thread terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerExit {
    /// Normal shutdown after the final drain.
    Drained,

    /// The sink returned an error; remaining queued lines were dropped.
    SinkFailed(String),

    /// The sink (or the loop itself) panicked.
    Panicked(String),
}

impl ConsumerExit {
    /// `true` for a clean, fully drained shutdown.
    pub fn is_clean(&self) -> bool {
        matches!(self, ConsumerExit::Drained)
    }
}

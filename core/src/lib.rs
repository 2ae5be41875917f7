//! Asynchronous batching text writer.
//!
//! Producers hand lines to an [`AsyncLineWriter`] from any thread without
//! blocking. A single background consumer thread batches them (bounded by a
//! character capacity) and forwards each batch to a [`TextSink`], so
//! producers never wait on the sink's latency.

pub mod config;
pub mod errors;
pub mod output;
pub mod sink;
pub mod stats;
pub mod sync;
pub mod writer;

pub use config::{WriterConfig, LINE_SEPARATOR};
pub use errors::{ConsumerExit, SinkError, WriterError};
pub use sink::{FileSink, FnSink, MemorySink, MemorySinkHandle, TextSink};
pub use stats::StatsSnapshot;
pub use sync::{FlushGate, Lifecycle};
pub use writer::AsyncLineWriter;

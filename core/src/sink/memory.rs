use std::sync::{Arc, Mutex};

use super::TextSink;
use crate::config::LINE_SEPARATOR;
use crate::errors::SinkError;
use crate::sync::lock;

type BatchLog = Arc<Mutex<Vec<String>>>;

/// Records every batch it receives.
///
/// The sink itself moves into the writer; keep the [`MemorySinkHandle`]
/// returned alongside it to read what was delivered.
pub struct MemorySink {
    batches: BatchLog,
}

impl MemorySink {
    pub fn new() -> (Self, MemorySinkHandle) {
        let batches: BatchLog = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                batches: batches.clone(),
            },
            MemorySinkHandle { batches },
        )
    }
}

impl TextSink for MemorySink {
    fn write_batch(&mut self, text: &str) -> Result<(), SinkError> {
        lock(&self.batches).push(text.to_string());
        Ok(())
    }
}

/// Cloneable read side of a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct MemorySinkHandle {
    batches: BatchLog,
}

impl MemorySinkHandle {
    /// All batches received so far, oldest first.
    pub fn batches(&self) -> Vec<String> {
        lock(&self.batches).clone()
    }

    pub fn batch_count(&self) -> usize {
        lock(&self.batches).len()
    }

    /// Every received line, in delivery order.
    ///
    /// Batches are split on [`LINE_SEPARATOR`], so a line that itself
    /// contains the separator comes back as several lines.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.batches)
            .iter()
            .flat_map(|batch| batch.split(LINE_SEPARATOR))
            .map(str::to_string)
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.batches).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_batches_in_order() {
        let (mut sink, handle) = MemorySink::new();
        sink.write_batch("one").unwrap();
        sink.write_batch("two").unwrap();
        assert_eq!(handle.batches(), vec!["one", "two"]);
        assert_eq!(handle.batch_count(), 2);
    }

    #[test]
    fn lines_splits_batches() {
        let (mut sink, handle) = MemorySink::new();
        sink.write_batch(&format!("a{LINE_SEPARATOR}b")).unwrap();
        sink.write_batch("c").unwrap();
        assert_eq!(handle.lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn clear_empties_log_for_all_handles() {
        let (mut sink, handle) = MemorySink::new();
        let other = handle.clone();
        sink.write_batch("x").unwrap();
        other.clear();
        assert_eq!(handle.batch_count(), 0);
        assert!(handle.lines().is_empty());
    }
}

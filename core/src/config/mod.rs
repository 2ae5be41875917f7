use serde::{Deserialize, Serialize};

use crate::errors::WriterError;

/// Separator placed between lines inside a flushed batch.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// Separator placed between lines inside a flushed batch.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Default batch capacity, in characters.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Default name of the background consumer thread.
pub const DEFAULT_THREAD_NAME: &str = "linebatch-writer";

/// Writer configuration.
///
/// - `capacity`: maximum batch length in characters, separators included.
///   A single line longer than this is still delivered, alone in its batch.
/// - `thread_name`: name given to the consumer thread (shows up in panics
///   and debuggers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

impl WriterConfig {
    /// Config with the given capacity and default thread name.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Reject values the consumer loop cannot work with.
    pub fn validate(&self) -> Result<(), WriterError> {
        if self.capacity == 0 {
            return Err(WriterError::InvalidConfig(
                "capacity must be greater than zero".into(),
            ));
        }
        if self.thread_name.is_empty() {
            return Err(WriterError::InvalidConfig(
                "thread name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            thread_name: default_thread_name(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_thread_name() -> String {
    DEFAULT_THREAD_NAME.to_string()
}

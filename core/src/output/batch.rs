use crate::config::LINE_SEPARATOR;

/// A flushed batch: lines joined by [`LINE_SEPARATOR`], no trailing separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub text: String,
    /// Number of lines joined into `text`.
    pub lines: usize,
    /// Length of `text` in characters.
    pub chars: usize,
}

/// Capacity-bounded text accumulator owned by the consumer thread.
///
/// Lines are joined with [`LINE_SEPARATOR`]. Length is counted in
/// characters, separators included. Before a line is appended the buffer
/// checks whether the result would exceed `capacity`; if so, the current
/// contents are handed back as a [`Batch`] and the line starts a new one.
/// A single line longer than `capacity` is accepted into an empty buffer,
/// so it always ends up alone in its batch.
pub struct BatchBuffer {
    capacity: usize,
    pending: String,
    pending_chars: usize,
    pending_lines: usize,
    separator_chars: usize,
}

impl BatchBuffer {
    /// Create an empty buffer with the given capacity in characters.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pending: String::new(),
            pending_chars: 0,
            pending_lines: 0,
            separator_chars: LINE_SEPARATOR.chars().count(),
        }
    }

    /// Append a line, returning the batch that had to be displaced first
    /// when appending would have overflowed the capacity.
    pub fn push(&mut self, line: &str) -> Option<Batch> {
        let line_chars = line.chars().count();
        let displaced = if self.would_overflow(line_chars) {
            self.flush()
        } else {
            None
        };

        if self.pending_lines > 0 {
            self.pending.push_str(LINE_SEPARATOR);
            self.pending_chars += self.separator_chars;
        }
        self.pending.push_str(line);
        self.pending_chars += line_chars;
        self.pending_lines += 1;

        displaced
    }

    /// Drain all pending text, regardless of size.
    /// Returns `None` if no line has been appended since the last flush.
    pub fn flush(&mut self) -> Option<Batch> {
        if self.pending_lines == 0 {
            return None;
        }
        let batch = Batch {
            text: std::mem::take(&mut self.pending),
            lines: self.pending_lines,
            chars: self.pending_chars,
        };
        self.pending_chars = 0;
        self.pending_lines = 0;
        Some(batch)
    }

    fn would_overflow(&self, line_chars: usize) -> bool {
        self.pending_lines > 0
            && self.pending_chars + self.separator_chars + line_chars > self.capacity
    }

    /// Characters currently buffered.
    pub fn pending_chars(&self) -> usize {
        self.pending_chars
    }

    /// Lines currently buffered.
    pub fn pending_lines(&self) -> usize {
        self.pending_lines
    }

    pub fn is_empty(&self) -> bool {
        self.pending_lines == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

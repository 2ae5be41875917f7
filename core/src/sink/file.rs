use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::TextSink;
use crate::config::LINE_SEPARATOR;
use crate::errors::SinkError;

/// Appends every batch to a file, followed by one line separator.
///
/// The file is created if it does not exist and is never truncated.
/// Each batch is flushed to the OS before `write_batch` returns.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Open `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!("File sink opened: {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSink for FileSink {
    fn write_batch(&mut self, text: &str) -> Result<(), SinkError> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(LINE_SEPARATOR.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_batches_with_trailing_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");

        let mut sink = FileSink::open(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        sink.write_batch(&format!("a{LINE_SEPARATOR}b")).unwrap();
        sink.write_batch("c").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!("a{LINE_SEPARATOR}b{LINE_SEPARATOR}c{LINE_SEPARATOR}")
        );
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");

        FileSink::open(&path).unwrap().write_batch("first").unwrap();
        FileSink::open(&path).unwrap().write_batch("second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!("first{LINE_SEPARATOR}second{LINE_SEPARATOR}")
        );
    }

    #[test]
    fn open_in_missing_directory_fails_with_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.log");
        let err = FileSink::open(&path).err().unwrap();
        assert!(matches!(err, SinkError::Io(_)));
    }
}

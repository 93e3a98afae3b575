//! Append-only log file repository.
//!
//! `FileRepository<T>` stores any serializable type in an append-only log.
//! Episode event logs are `FileRepository<LogRecord>`.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::events::{LogRecord, LogSink};
use crate::repository::{RepositoryError, Result};

/// Write buffer size; episode logs are small, so flushing stays cheap.
const WRITE_BUFFER: usize = 64 * 1024;

/// Generic file-based repository for append-only logs.
///
/// Stores items of type `T` in a file using the format:
/// ```text
/// [u32 length][bincode serialized T]
/// [u32 length][bincode serialized T]
/// ...
/// ```
pub struct FileRepository<T> {
    /// File name, used in logs
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    /// Byte offset of the next write
    current_offset: u64,
    _phantom: PhantomData<T>,
}

impl<T> FileRepository<T>
where
    T: Serialize,
{
    /// Create a new file repository.
    ///
    /// # Errors
    ///
    /// Returns error if the file already exists (prevents accidental overwrites).
    pub fn create(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let filename = filename.as_ref();

        std::fs::create_dir_all(base_dir)?;

        let path = base_dir.join(filename);
        if path.exists() {
            return Err(RepositoryError::LogAlreadyExists(path.display().to_string()));
        }

        let file = OpenOptions::new().create_new(true).write(true).open(&path)?;
        tracing::debug!("Created log: {}", path.display());

        Ok(Self {
            name: filename.to_string(),
            path,
            writer: BufWriter::with_capacity(WRITE_BUFFER, file),
            current_offset: 0,
            _phantom: PhantomData,
        })
    }

    /// Append an item to the log.
    ///
    /// Returns the byte offset where the item was written.
    pub fn append(&mut self, item: &T) -> Result<u64> {
        let offset = self.current_offset;

        let bytes =
            bincode::serialize(item).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let len = u32::try_from(bytes.len()).map_err(|_| {
            RepositoryError::Serialization(format!("entry of {} bytes is too large", bytes.len()))
        })?;

        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(&bytes)?;

        self.current_offset += 4 + u64::from(len);

        Ok(offset)
    }

    /// Flush buffered writes to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Drop for FileRepository<T> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("Failed to flush log '{}' on drop: {}", self.name, e);
        }
    }
}

impl LogSink for FileRepository<LogRecord> {
    fn record(&mut self, record: &LogRecord) -> Result<()> {
        self.append(record).map(|_| ())
    }

    fn flush(&mut self) -> Result<()> {
        FileRepository::flush(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestItem {
        id: u64,
        name: String,
    }

    fn item(id: u64, name: &str) -> TestItem {
        TestItem {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn offsets_follow_length_prefixed_entries() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = FileRepository::<TestItem>::create(temp_dir.path(), "test.log").unwrap();

        let offset1 = repo.append(&item(1, "first")).unwrap();
        let offset2 = repo.append(&item(2, "second")).unwrap();
        repo.flush().unwrap();

        let first_len = bincode::serialize(&item(1, "first")).unwrap().len() as u64;
        assert_eq!(offset1, 0);
        assert_eq!(offset2, 4 + first_len);

        let bytes = std::fs::read(repo.path()).unwrap();
        let prefix = u32::from_le_bytes(bytes[..4].try_into().unwrap()) as u64;
        assert_eq!(prefix, first_len);
        let second: TestItem = bincode::deserialize(&bytes[offset2 as usize + 4..]).unwrap();
        assert_eq!(second, item(2, "second"));
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let _repo = FileRepository::<TestItem>::create(temp_dir.path(), "test.log").unwrap();

        let err = FileRepository::<TestItem>::create(temp_dir.path(), "test.log")
            .err()
            .unwrap();
        assert!(matches!(err, RepositoryError::LogAlreadyExists(_)));
    }
}

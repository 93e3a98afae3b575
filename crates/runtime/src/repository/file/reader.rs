//! Buffered sequential reader for completed log files.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::repository::{RepositoryError, Result};

/// Reads a finished `[u32 len][bincode]` log from start to end.
pub struct RecordReader<T> {
    reader: BufReader<File>,
    path: PathBuf,
    bytes_read: u64,
    entries_read: u64,
    _phantom: PhantomData<T>,
}

impl<T: DeserializeOwned> RecordReader<T> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let size = file.metadata()?.len();

        debug!("Opened log for reading: {} ({} bytes)", path.display(), size);

        Ok(Self {
            reader: BufReader::new(file),
            path,
            bytes_read: 0,
            entries_read: 0,
            _phantom: PhantomData,
        })
    }

    /// Next entry, or `None` at a clean end of file.
    ///
    /// # Errors
    ///
    /// `CorruptedData` when the file ends inside an entry.
    pub fn read_next(&mut self) -> Result<Option<T>> {
        let mut len_bytes = [0u8; 4];
        match self.reader.read_exact(&mut len_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let len = u32::from_le_bytes(len_bytes) as usize;

        let mut data = vec![0u8; len];
        if let Err(e) = self.reader.read_exact(&mut data) {
            return Err(match e.kind() {
                ErrorKind::UnexpectedEof => RepositoryError::CorruptedData(format!(
                    "{} is truncated after {} entries",
                    self.path.display(),
                    self.entries_read
                )),
                _ => RepositoryError::Io(e),
            });
        }

        let entry = bincode::deserialize(&data)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        self.bytes_read += 4 + len as u64;
        self.entries_read += 1;
        Ok(Some(entry))
    }

    pub fn read_all(&mut self) -> Result<Vec<T>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.read_next()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn entries_read(&self) -> u64 {
        self.entries_read
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;
    use crate::repository::FileRepository;

    #[test]
    fn reads_back_everything_written() {
        let dir = TempDir::new().unwrap();
        let mut repo = FileRepository::<u32>::create(dir.path(), "numbers.log").unwrap();
        for n in [3u32, 1, 4, 1, 5] {
            repo.append(&n).unwrap();
        }
        repo.flush().unwrap();

        let mut reader = RecordReader::<u32>::open(repo.path()).unwrap();
        assert_eq!(reader.read_all().unwrap(), vec![3, 1, 4, 1, 5]);
        assert_eq!(reader.entries_read(), 5);
        assert_eq!(reader.bytes_read(), std::fs::metadata(repo.path()).unwrap().len());
    }

    #[test]
    fn truncated_tail_is_corruption() {
        let dir = TempDir::new().unwrap();
        let path = {
            let mut repo = FileRepository::<u64>::create(dir.path(), "cut.log").unwrap();
            repo.append(&7).unwrap();
            repo.flush().unwrap();
            repo.path().to_path_buf()
        };
        // length prefix promising 8 bytes, followed by only 2
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&8u32.to_le_bytes()).unwrap();
        file.write_all(&[1, 2]).unwrap();

        let mut reader = RecordReader::<u64>::open(&path).unwrap();
        assert_eq!(reader.read_next().unwrap(), Some(7));
        assert!(matches!(reader.read_next(), Err(RepositoryError::CorruptedData(_))));
    }
}

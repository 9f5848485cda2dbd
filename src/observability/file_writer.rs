//! Rotating log file writer with size-based rotation and backup retention.
//!
//! The writer implements [`std::io::Write`] so it can back a `tracing-subscriber`
//! fmt layer when wrapped in a `Mutex`. When the active file would grow past the
//! size threshold it is shifted to `<name>.1`, existing backups move up one
//! number, and backups beyond the retention limit are deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default maximum file size before rotation (10 MiB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of backup files kept after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Size-rotated append-only file.
///
/// The file is opened lazily on the first write, so construction never fails.
pub struct RotatingFileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: Option<File>,
    written: u64,
}

impl RotatingFileWriter {
    /// Writer with the default 10 MiB threshold and 3 backups.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Writer with explicit limits.
    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            file: None,
            written: 0,
        }
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn open(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new().create(true).append(true).open(&self.file_path)?;
            self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))
    }

    /// Shifts the active file into the backup chain.
    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        self.written = 0;

        if self.max_backups == 0 {
            return match fs::remove_file(&self.file_path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            };
        }

        let _ = fs::remove_file(self.backup_path(self.max_backups));
        for n in (1..self.max_backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        if self.file_path.exists() {
            fs::rename(&self.file_path, self.backup_path(1))?;
        }
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.open()?;
        let incoming = u64::try_from(buf.len()).unwrap_or(u64::MAX);
        if self.written > 0 && self.written.saturating_add(incoming) > self.max_bytes {
            self.rotate()?;
        }

        let file = self.open()?;
        let n = file.write(buf)?;
        self.written = self.written.saturating_add(u64::try_from(n).unwrap_or(u64::MAX));
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_and_keeps_bounded_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.log");
        let mut writer = RotatingFileWriter::with_limits(path.clone(), 10, 2);

        for line in ["aaaaaaaa\n", "bbbbbbbb\n", "cccccccc\n", "dddddddd\n"] {
            writer.write_all(line.as_bytes()).unwrap();
        }
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "dddddddd\n");
        assert_eq!(fs::read_to_string(dir.path().join("viewer.log.1")).unwrap(), "cccccccc\n");
        assert_eq!(fs::read_to_string(dir.path().join("viewer.log.2")).unwrap(), "bbbbbbbb\n");
        assert!(!dir.path().join("viewer.log.3").exists());
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.log");
        fs::write(&path, "old\n").unwrap();

        let mut writer = RotatingFileWriter::new(path.clone());
        writer.write_all(b"new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }
}

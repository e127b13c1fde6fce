//! File appender writing already laid-out events.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Appends formatted events to a file, flushing after every event.
pub struct FileAppender {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileAppender {
    /// Open `path`, creating missing parent directories.
    ///
    /// With `append` false an existing file is truncated.
    pub fn open(path: impl Into<PathBuf>, append: bool) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(append)
            .write(true)
            .truncate(!append)
            .open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn append(&self, event: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(event.as_bytes())?;
        writer.flush()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

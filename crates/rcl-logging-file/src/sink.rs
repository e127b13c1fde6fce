//! File sinks.
//!
//! A sink receives already formatted messages and appends them one per line.
//! Both sinks guard their writer with a mutex, so concurrent `write_line`
//! calls from many threads never interleave within a line.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Destination for formatted log lines.
pub trait Sink: Send + Sync {
    /// Append `msg` followed by a newline.
    fn write_line(&self, msg: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()>;

    /// Path of the active file.
    fn path(&self) -> &Path;
}

/// Single file, truncated when opened.
pub struct BasicFileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl BasicFileSink {
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl Sink for BasicFileSink {
    fn write_line(&self, msg: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(msg.as_bytes())?;
        writer.write_all(b"\n")
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BasicFileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

struct RotatingState {
    /// `None` only while files are being shuffled during a rotation
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

/// Size-bounded file with numbered backups.
///
/// ```text
/// talker_42_1700000000000.log     ← active
/// talker_42_1700000000000.1.log   ← most recent backup
/// talker_42_1700000000000.N.log   ← oldest kept (N = max_files)
/// ```
///
/// A line that would push the active file past `max_size` triggers a
/// rotation first, unless the active file is still empty.
pub struct RotatingFileSink {
    base_path: PathBuf,
    max_size: u64,
    max_files: u64,
    state: Mutex<RotatingState>,
}

impl RotatingFileSink {
    pub fn new(path: impl Into<PathBuf>, max_size: u64, max_files: u64) -> io::Result<Self> {
        if max_size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "rotating sink max_size cannot be zero",
            ));
        }

        let base_path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&base_path)?;
        let current_size = file.metadata()?.len();

        Ok(Self {
            base_path,
            max_size,
            max_files,
            state: Mutex::new(RotatingState {
                writer: Some(BufWriter::new(file)),
                current_size,
            }),
        })
    }

    /// Name of backup `index`; index 0 is the active file.
    pub fn backup_path(&self, index: u64) -> PathBuf {
        calc_filename(&self.base_path, index)
    }

    fn rotate(&self, state: &mut RotatingState) -> io::Result<()> {
        if let Some(mut writer) = state.writer.take() {
            writer.flush()?;
        }

        for index in (1..=self.max_files).rev() {
            let src = self.backup_path(index - 1);
            if !src.exists() {
                continue;
            }
            let target = self.backup_path(index);
            match fs::remove_file(&target) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
            fs::rename(&src, &target)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.base_path)?;
        state.writer = Some(BufWriter::new(file));
        state.current_size = 0;
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn write_line(&self, msg: &str) -> io::Result<()> {
        let line_len = msg.len() as u64 + 1;
        let mut state = self.state.lock();

        let mut new_size = state.current_size + line_len;
        if new_size > self.max_size && state.current_size > 0 {
            self.rotate(&mut state)?;
            new_size = line_len;
        }

        let writer = state
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "rotating sink is closed"))?;
        writer.write_all(msg.as_bytes())?;
        writer.write_all(b"\n")?;
        state.current_size = new_size;
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        match self.state.lock().writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    fn path(&self) -> &Path {
        &self.base_path
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// `dir/name.log` + 3 → `dir/name.3.log`; files without an extension get `.3` appended.
fn calc_filename(base: &Path, index: u64) -> PathBuf {
    if index == 0 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{}.{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}.{}", stem, index),
    };
    base.with_file_name(name)
}

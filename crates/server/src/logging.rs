//! Log output for the server binary.
//!
//! Events always go to stdout. With a `log_file` configured they are mirrored
//! into that file, which is renamed to `<path>.<unix seconds>` and reopened
//! once a write would push it past [`MAX_LOG_FILE_BYTES`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub const MAX_LOG_FILE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("can't open log file {path}: {source}")]
    File { path: PathBuf, source: io::Error },

    #[error("setting default subscriber failed: {source}")]
    Install {
        #[from]
        source: SetGlobalDefaultError,
    },
}

/// Installs the global `FmtSubscriber` at `level`, writing to stdout and, if
/// given, to a [`RotatingFile`] at `log_file`.
pub fn init(level: Level, log_file: Option<&Path>) -> Result<(), LoggingError> {
    let builder = FmtSubscriber::builder().with_max_level(level);

    match log_file {
        None => tracing::subscriber::set_global_default(builder.finish())?,
        Some(path) => {
            let file = RotatingFile::open(path, MAX_LOG_FILE_BYTES)
                .map_err(|source| LoggingError::File { path: path.to_path_buf(), source })?;
            let subscriber = builder.with_ansi(false).with_writer(io::stdout.and(Mutex::new(file))).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

/// An append-only file that is moved aside when it grows past `max_bytes`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    max_bytes: u64,
    written: u64,
}

impl RotatingFile {
    /// Opens `path` for appending; bytes already in the file count towards `max_bytes`.
    pub fn open<P: Into<PathBuf>>(path: P, max_bytes: u64) -> io::Result<Self> {
        let path = path.into();
        let file = append_to(&path)?;
        let written = file.metadata()?.len();
        Ok(Self { path, file, max_bytes, written })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let stamp = SystemTime::now().duration_since(UNIX_EPOCH).map(|elapsed| elapsed.as_secs()).unwrap_or_default();
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".{stamp}"));
        fs::rename(&self.path, backup)?;

        self.file = append_to(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written.saturating_add(buf.len() as u64) > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn append_to(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

//! File sink: writes each document to a file instead of a device.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{PrintError, Printer};

/// Writes documents to a file, appending in send order.
///
/// Useful for print-to-file, spooling directories, and tests.
pub struct FilePrinter {
    out: BufWriter<File>,
    path: PathBuf,
}

impl FilePrinter {
    /// Create (or truncate) `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, PrintError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| PrintError::FileFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            out: BufWriter::new(file),
            path,
        })
    }

    /// Open `path` for appending, creating it when absent. Earlier content
    /// is kept.
    pub fn append(path: impl AsRef<Path>) -> Result<Self, PrintError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| PrintError::FileFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            out: BufWriter::new(file),
            path,
        })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Printer for FilePrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        let fail = |source| PrintError::FileFailed {
            path: self.path.display().to_string(),
            source,
        };
        self.out.write_all(data).map_err(fail)?;
        self.out.flush().map_err(fail)?;
        info!(path = %self.path.display(), bytes = data.len(), "wrote label to file");
        Ok(())
    }
}

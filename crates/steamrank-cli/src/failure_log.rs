//! Append-only log of identifiers whose fetch failed during a bulk pass.
//!
//! One `<appid>\t<name>` line per failure. The retry pass reads the same file
//! back with whitespace splitting.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use steamrank_core::IdentifierRecord;

pub(crate) struct FailureLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FailureLog {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened.
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record and flushes, so a crash mid-pass keeps every
    /// failure already seen.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the write or flush fails.
    pub(crate) fn append(&mut self, record: &IdentifierRecord) -> io::Result<()> {
        writeln!(self.writer, "{}\t{}", record.appid, record.name)?;
        self.writer.flush()
    }
}

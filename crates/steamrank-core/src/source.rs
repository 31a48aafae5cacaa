//! Line-oriented identifier lists.
//!
//! The bulk list is `<appid>\t<name>` per line; the failure log is
//! `<appid> <name with spaces>` with arbitrary whitespace between tokens.
//! [`IdentifierSource`] turns either into a lazy sequence of
//! [`IdentifierRecord`]s, skipping blank and malformed lines.

use std::io::BufRead;

use thiserror::Error;

/// One `(appid, name)` pair read from an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRecord {
    pub appid: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// Split on the first tab only.
    Tab,
    /// First whitespace token is the id; the rest, single-space joined, is
    /// the name.
    Whitespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed line {line_number}: {reason}")]
pub struct MalformedLine {
    pub line_number: usize,
    pub reason: &'static str,
}

/// Parses one raw line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`MalformedLine`] when a tab-format line has no tab.
pub fn parse_line(
    raw: &str,
    format: LineFormat,
    line_number: usize,
) -> Result<Option<IdentifierRecord>, MalformedLine> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(None);
    }

    match format {
        LineFormat::Tab => {
            let (appid, name) = line.split_once('\t').ok_or(MalformedLine {
                line_number,
                reason: "expected <appid>\\t<name>",
            })?;
            Ok(Some(IdentifierRecord {
                appid: appid.trim().to_string(),
                name: name.trim().to_string(),
            }))
        }
        LineFormat::Whitespace => {
            let mut tokens = line.split_whitespace();
            // A trimmed non-empty line always has a first token.
            let Some(appid) = tokens.next() else {
                return Ok(None);
            };
            let name = tokens.collect::<Vec<_>>().join(" ");
            Ok(Some(IdentifierRecord {
                appid: appid.to_string(),
                name,
            }))
        }
    }
}

/// Lazy, single-use sequence of identifier records over a reader.
///
/// Malformed lines are logged and counted, never yielded. A read error ends
/// the sequence.
pub struct IdentifierSource<R> {
    reader: R,
    format: LineFormat,
    line_number: usize,
    malformed: usize,
    buf: String,
    done: bool,
}

impl<R: BufRead> IdentifierSource<R> {
    #[must_use]
    pub fn new(reader: R, format: LineFormat) -> Self {
        Self {
            reader,
            format,
            line_number: 0,
            malformed: 0,
            buf: String::new(),
            done: false,
        }
    }

    /// Number of malformed lines skipped so far.
    #[must_use]
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

impl<R: BufRead> Iterator for IdentifierSource<R> {
    type Item = IdentifierRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_number += 1;
                    match parse_line(&self.buf, self.format, self.line_number) {
                        Ok(Some(record)) => return Some(record),
                        Ok(None) => {}
                        Err(err) => {
                            self.malformed += 1;
                            tracing::warn!(
                                line = self.line_number,
                                content = %self.buf.trim(),
                                "skipping malformed line: {}",
                                err.reason
                            );
                        }
                    }
                }
                Err(err) => {
                    tracing::error!(
                        line = self.line_number + 1,
                        error = %err,
                        "failed to read identifier list; stopping"
                    );
                    self.done = true;
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;

//! # Source Module
//!
//! Record sources feed raw records into the dispatcher, one blocking
//! pull at a time.
//!
//! ## Contract
//! `Ok(None)` means the source is exhausted. An empty record is still
//! `Ok(Some(..))`. An `Err` is fatal for the run.
//!
//! ## Example
//! ```rust,ignore
//! let source = LineSource::open("data.txt")?;
//! let source = IterSource::new(vec!["Event1 a=1 b=2"]);
//! ```

use crate::error::SourceError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Produces a lazy, finite sequence of raw records
///
/// Implement this trait to feed custom inputs (e.g., for testing).
/// A caller that wants to stop a run early makes its source report
/// exhaustion.
pub trait RecordSource {
    type Record;

    /// Pull the next record, blocking if necessary
    fn next_record(&mut self) -> Result<Option<Self::Record>, SourceError>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    type Record = S::Record;

    fn next_record(&mut self) -> Result<Option<Self::Record>, SourceError> {
        (**self).next_record()
    }
}

/// Source over any iterator that cannot fail
pub struct IterSource<I> {
    inner: I,
}

impl<I: Iterator> IterSource<I> {
    pub fn new(records: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: records.into_iter(),
        }
    }
}

impl<I: Iterator> RecordSource for IterSource<I> {
    type Record = I::Item;

    fn next_record(&mut self) -> Result<Option<Self::Record>, SourceError> {
        Ok(self.inner.next())
    }
}

/// Line-oriented source over any buffered reader
///
/// Each line is one record, without its line terminator. Bytes that are
/// not valid UTF-8 are replaced with U+FFFD rather than failing the read,
/// so only real I/O errors end a run.
pub struct LineSource<B> {
    reader: B,
    lines_read: usize,
}

impl<B: BufRead> LineSource<B> {
    pub fn new(reader: B) -> Self {
        Self {
            reader,
            lines_read: 0,
        }
    }

    /// Number of lines produced so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }
}

impl LineSource<BufReader<File>> {
    /// Open a file as a line source
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<B: BufRead> RecordSource for LineSource<B> {
    type Record = String;

    fn next_record(&mut self) -> Result<Option<String>, SourceError> {
        let mut bytes = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut bytes)
            .map_err(|source| SourceError::Io {
                record: self.lines_read,
                source,
            })?;

        if read == 0 {
            return Ok(None);
        }

        if bytes.ends_with(b"\n") {
            bytes.pop();
            if bytes.ends_with(b"\r") {
                bytes.pop();
            }
        }

        // Invalid bytes only affect this line
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(error) => {
                warn!(
                    record = self.lines_read,
                    "Line is not valid UTF-8, replacing invalid bytes"
                );
                String::from_utf8_lossy(error.as_bytes()).into_owned()
            }
        };

        self.lines_read += 1;
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn drain<S: RecordSource>(source: &mut S) -> Vec<S::Record> {
        let mut records = Vec::new();
        while let Some(record) = source.next_record().unwrap() {
            records.push(record);
        }
        records
    }

    #[test]
    fn iter_source_yields_then_exhausts() {
        let mut source = IterSource::new(vec![1, 2, 3]);
        assert_eq!(drain(&mut source), vec![1, 2, 3]);
        assert!(source.next_record().unwrap().is_none());
    }

    #[test]
    fn line_source_strips_terminators() {
        let mut source = LineSource::new(Cursor::new("first\r\nsecond\nlast"));
        assert_eq!(drain(&mut source), vec!["first", "second", "last"]);
        assert_eq!(source.lines_read(), 3);
    }

    #[test]
    fn empty_line_is_not_exhaustion() {
        let mut source = LineSource::new(Cursor::new("a\n\nb\n"));
        assert_eq!(drain(&mut source), vec!["a", "", "b"]);
    }

    #[test]
    fn open_missing_file_names_path() {
        let error = match LineSource::open("/nonexistent/records.log") {
            Err(error) => error,
            Ok(_) => panic!("expected open to fail"),
        };
        assert!(error.to_string().contains("/nonexistent/records.log"));
    }

    #[test]
    fn open_reads_file_lines() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first\r\nsecond\n").unwrap();

        let mut source = LineSource::open(file.path()).unwrap();
        assert_eq!(drain(&mut source), vec!["first", "second"]);
        assert_eq!(source.lines_read(), 2);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let mut source = LineSource::new(Cursor::new(b"a=1\na=\xff\r\na=3\n".to_vec()));
        assert_eq!(drain(&mut source), vec!["a=1", "a=\u{FFFD}", "a=3"]);
        assert_eq!(source.lines_read(), 3);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
        }
    }

    #[test]
    fn read_failure_is_a_source_error() {
        let mut source = LineSource::new(BufReader::new(FailingReader));
        let error = source.next_record().unwrap_err();
        assert!(matches!(error, SourceError::Io { record: 0, .. }));
    }
}

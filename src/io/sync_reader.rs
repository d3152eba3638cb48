//! Synchronous CSV reader with iterator interface
//!
//! Streams rows from a CSV file and converts each into a domain type through
//! [`CsvInput`]. The same reader serves the accounts file and the points
//! requests file.
//!
//! ```no_run
//! use points_ledger::io::sync_reader::SyncReader;
//! use points_ledger::types::LedgerRecord;
//! use std::path::Path;
//!
//! let reader = SyncReader::<LedgerRecord>::new(Path::new("requests.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Request for account {}", record.account),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Row errors are yielded as `ParseError` items carrying the line number
//!   (the header is line 1)

use crate::io::csv_format::CsvInput;
use crate::types::LedgerError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Streaming CSV reader yielding one `T` per row
#[derive(Debug)]
pub struct SyncReader<T> {
    reader: csv::Reader<File>,
    line_num: u64,
    _record: PhantomData<T>,
}

impl<T: CsvInput> SyncReader<T> {
    /// Open a CSV file for streaming iteration
    ///
    /// Fields are trimmed and rows may omit trailing columns.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the file does not exist
    /// - `IoError` if it cannot be opened for another reason
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LedgerError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                LedgerError::IoError {
                    message: format!("Failed to open file '{}': {}", path.display(), e),
                }
            }
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
            _record: PhantomData,
        })
    }
}

impl<T: CsvInput> Iterator for SyncReader<T> {
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<T::Raw>();
        let row = deserializer.next()?;
        self.line_num += 1;

        let line = Some(self.line_num);
        Some(match row {
            Ok(raw) => T::from_raw(raw).map_err(|message| LedgerError::ParseError { line, message }),
            Err(e) => Err(LedgerError::ParseError {
                line,
                message: format!("CSV parse error: {}", e),
            }),
        })
    }
}

//! Lazy reader for cell catalog sources.
//!
//! A catalog is a comma-delimited file whose header names at least the columns in
//! [`REQUIRED_COLUMNS`]. Column names are matched exactly; any other column is ignored.
//! Records are produced one at a time and the first malformed row ends the scan.

use crate::core::models::cell::CellRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub const PRODUCT_COLUMN: &str = "Product";
pub const THICKNESS_COLUMN: &str = "Thickness";
pub const WIDTH_COLUMN: &str = "Width";
pub const LENGTH_COLUMN: &str = "Length";
pub const CAPACITY_COLUMN: &str = "Capacity";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    PRODUCT_COLUMN,
    THICKNESS_COLUMN,
    WIDTH_COLUMN,
    LENGTH_COLUMN,
    CAPACITY_COLUMN,
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Source '{path}' is missing required column '{column}'")]
    MissingColumn { path: String, column: &'static str },
    #[error(
        "Malformed record in '{path}' at line {line}: field '{field}' is not a number (found '{value}')"
    )]
    MalformedRecord {
        path: String,
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl CatalogError {
    /// The source location the error was raised for.
    pub fn path(&self) -> &str {
        match self {
            Self::Io { path, .. }
            | Self::Csv { path, .. }
            | Self::MissingColumn { path, .. }
            | Self::MalformedRecord { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    product: usize,
    thickness: usize,
    width: usize,
    length: usize,
    capacity: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, path: &str) -> Result<Self, CatalogError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| CatalogError::MissingColumn {
                    path: path.to_string(),
                    column,
                })
        };
        let mut indices = [0; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find(column)?;
        }
        let [product, thickness, width, length, capacity] = indices;
        Ok(Self {
            product,
            thickness,
            width,
            length,
            capacity,
        })
    }
}

/// One-pass iterator over the records of a single catalog source.
///
/// The iterator fuses after the first error: a malformed row aborts the scan of its
/// source and no later rows are inspected.
pub struct CellRecords<R = File> {
    path: String,
    inner: Option<(csv::StringRecordsIntoIter<R>, ColumnIndex)>,
    failed: bool,
}

/// Opens a catalog source for scanning.
///
/// A blank location yields an empty sequence so callers can pass through gaps in a
/// user-supplied source list. The header row is validated here, before any record is read.
pub fn open(location: &str) -> Result<CellRecords<File>, CatalogError> {
    if location.trim().is_empty() {
        return Ok(CellRecords::empty());
    }

    let file = File::open(Path::new(location)).map_err(|e| CatalogError::Io {
        path: location.to_string(),
        source: e,
    })?;
    CellRecords::from_reader(location, file)
}

impl<R> CellRecords<R> {
    pub fn empty() -> Self {
        Self {
            path: String::new(),
            inner: None,
            failed: false,
        }
    }
}

impl<R: Read> CellRecords<R> {
    /// Wraps an already-open reader; `path` is only used for diagnostics.
    pub fn from_reader(path: &str, reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader.headers().map_err(|e| CatalogError::Csv {
            path: path.to_string(),
            source: e,
        })?;
        let columns = ColumnIndex::resolve(headers, path)?;

        Ok(Self {
            path: path.to_string(),
            inner: Some((csv_reader.into_records(), columns)),
            failed: false,
        })
    }

    fn parse_record(
        &self,
        record: &csv::StringRecord,
        columns: ColumnIndex,
    ) -> Result<CellRecord, CatalogError> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let number = |index: usize, field: &'static str| -> Result<f64, CatalogError> {
            let raw = record.get(index).unwrap_or("");
            parse_number(raw).ok_or_else(|| CatalogError::MalformedRecord {
                path: self.path.clone(),
                line,
                field,
                value: raw.to_string(),
            })
        };

        let product = record.get(columns.product).unwrap_or("").to_string();
        let thickness = number(columns.thickness, THICKNESS_COLUMN)?;
        let width = number(columns.width, WIDTH_COLUMN)?;
        let length = number(columns.length, LENGTH_COLUMN)?;
        let capacity = number(columns.capacity, CAPACITY_COLUMN)?;

        Ok(CellRecord::new(product, thickness, width, length, capacity).with_line(line))
    }
}

impl<R: Read> Iterator for CellRecords<R> {
    type Item = Result<CellRecord, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (records, columns) = self.inner.as_mut()?;
        let columns = *columns;

        let result = match records.next()? {
            Ok(record) => self.parse_record(&record, columns),
            Err(e) => Err(CatalogError::Csv {
                path: self.path.clone(),
                source: e,
            }),
        };

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

impl<R: Read> std::iter::FusedIterator for CellRecords<R> {}

/// Numeric fields tolerate surrounding whitespace; anything else must be a float literal.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

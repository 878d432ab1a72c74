use crate::core::models::configuration::{EXPORT_HEADER, StackConfiguration};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    /// No destination was chosen; nothing was written.
    NoOutputTarget,
}

pub struct ResultExporter;

impl ResultExporter {
    /// Writes the header and one row per configuration, in the order given.
    pub fn write_to<W: Write>(
        writer: W,
        configurations: &[StackConfiguration],
    ) -> Result<usize, ExportError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        // Written explicitly so an empty result still carries the header.
        csv_writer.write_record(EXPORT_HEADER)?;
        for configuration in configurations {
            csv_writer.serialize(configuration)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;

        Ok(configurations.len())
    }

    pub fn export(
        target: Option<&Path>,
        configurations: &[StackConfiguration],
    ) -> Result<ExportOutcome, ExportError> {
        let Some(path) = target else {
            return Ok(ExportOutcome::NoOutputTarget);
        };

        let file = File::create(path).map_err(|e| ExportError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let rows = Self::write_to(file, configurations)?;

        Ok(ExportOutcome::Written {
            path: path.to_path_buf(),
            rows,
        })
    }
}

//! Dataset loading from delimited files.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use appctx_core::{ContextError, Dataset, Result, Row, REQUIRED_FIELDS};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Where the notebooks keep the app-store export.
pub const DEFAULT_DATA_PATH: &str = "./utils/AppStore_Data.csv";

/// Loads a whole dataset into memory.
pub trait DatasetLoader: Send + Sync {
    /// Fails with [`ContextError::NotFound`] when `path` does not exist.
    fn load(&self, path: &Path) -> Result<Dataset>;
}

/// CSV loader with a header row.
///
/// Every cell is kept as a string; empty cells become nulls. The header must
/// contain all [`REQUIRED_FIELDS`]; other columns are carried along untouched.
#[derive(Debug, Clone)]
pub struct CsvDatasetLoader {
    delimiter: u8,
    require_app_columns: bool,
}

impl Default for CsvDatasetLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            require_app_columns: true,
        }
    }
}

impl CsvDatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field delimiter, e.g. `b'\t'` for TSV exports.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Skips the header check; rows are then validated only when formatted.
    pub fn without_column_check(mut self) -> Self {
        self.require_app_columns = false;
        self
    }

    fn open(path: &Path) -> Result<File> {
        File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ContextError::NotFound(path.to_path_buf()),
            _ => ContextError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })
    }
}

impl DatasetLoader for CsvDatasetLoader {
    /// # Process
    ///
    /// 1. Opens `path` (absent file → `NotFound`, other failures → `Io`)
    /// 2. Reads the header row; with the column check on, the first missing
    ///    required column fails the load with `MissingField`
    /// 3. Reads every record in file order, empty cells as `Value::Null`
    /// 4. Returns the rows together with the header order
    ///
    /// Malformed CSV (ragged records, bad quoting, invalid UTF-8) is `InvalidData`.
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load(&self, path: &Path) -> Result<Dataset> {
        let file = Self::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| invalid(path, e))?
            .iter()
            .map(str::to_string)
            .collect();
        debug!(columns = ?headers, "csv header read");

        if self.require_app_columns {
            if let Some(missing) = REQUIRED_FIELDS
                .iter()
                .find(|field| !headers.iter().any(|h| h == *field))
            {
                warn!(column = *missing, "csv header lacks required column");
                return Err(ContextError::missing_field(*missing));
            }
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| invalid(path, e))?;
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| {
                    let value = if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::String(cell.to_string())
                    };
                    (column.clone(), value)
                })
                .collect();
            rows.push(row);
        }

        info!(rows = rows.len(), columns = headers.len(), "step: dataset loaded");
        Ok(Dataset::with_columns(headers, rows))
    }
}

fn invalid(path: &Path, err: csv::Error) -> ContextError {
    warn!(error = %err, "csv parse failed");
    ContextError::InvalidData(format!("{}: {}", path.display(), err))
}

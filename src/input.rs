use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::Trim;
use serde_json::Value;
use thiserror::Error;

use crate::engine::{RawRecord, Transaction, validate_records};

#[derive(Error, Debug)]
pub enum InputError {
    #[error("File: {0} does not exist")]
    NotFound(PathBuf),

    #[error("Unsupported input format '{0}', expected csv or json")]
    UnsupportedFormat(String),

    #[error("JSON input must be an array of objects")]
    NotAnArray,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Detects the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            _ => Err(InputError::UnsupportedFormat(extension.into())),
        }
    }
}

/// Reads and validates the transactions of a CSV or JSON file.
pub fn read_transactions(path: &Path) -> Result<Vec<Transaction>, InputError> {
    let format = FileFormat::from_path(path)?;
    if !path.is_file() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let file = BufReader::new(File::open(path)?);
    log::debug!("Reading {format:?} records from {path:?}");
    let records = match format {
        FileFormat::Csv => read_csv(file)?,
        FileFormat::Json => read_json(file)?,
    };

    let transactions = validate_records(&records);
    log::debug!(
        "Validated {} of {} records from {path:?}",
        transactions.len(),
        records.len()
    );
    Ok(transactions)
}

/// Reads CSV rows keyed by the header row. Rows that cannot be read are
/// skipped with a warning; I/O failures abort.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, InputError> {
    let mut rdr = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize::<HashMap<String, String>>() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::warn!("Error deserializing record: {e}");
                continue;
            }
        };
        records.push(
            row.into_iter()
                .map(|(field, value)| (field, Value::String(value)))
                .collect(),
        );
    }
    Ok(records)
}

/// Reads a JSON array of objects. Array elements that are not objects are
/// skipped with a warning.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<RawRecord>, InputError> {
    let Value::Array(items) = serde_json::from_reader::<_, Value>(reader)? else {
        return Err(InputError::NotAnArray);
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => records.push(map.into_iter().collect()),
            other => log::warn!("Skipping JSON element #{position}, not an object: {other}"),
        }
    }
    Ok(records)
}

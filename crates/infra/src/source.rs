//! Row source boundary: where raw rows come from.
//!
//! The catalog only needs a *complete* batch of rows per load. Fetching and
//! tokenizing are the source's business; a failed fetch is reported as a
//! [`SourceError`] and never produces a partial batch.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use skulens_products::RawRow;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode row feed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected feed shape: {0}")]
    Shape(String),

    #[error("row source unavailable: {0}")]
    Unavailable(String),
}

/// Supplier of one complete batch of raw rows.
pub trait RowSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<RawRow>, SourceError>;
}

impl<S> RowSource for Arc<S>
where
    S: RowSource + ?Sized,
{
    fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
        (**self).fetch()
    }
}

impl<S> RowSource for &S
where
    S: RowSource + ?Sized,
{
    fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
        (**self).fetch()
    }
}

/// In-memory row source for tests/dev.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRowSource {
    rows: Vec<RawRow>,
}

impl InMemoryRowSource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

impl RowSource for InMemoryRowSource {
    fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
        Ok(self.rows.clone())
    }
}

#[derive(Debug, Clone)]
enum JsonInput {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// Rows from a JSON array of flat objects (`[{"SKU": "A1", "Wert": "red"}, ...]`).
///
/// Numbers and booleans are stringified; `null` cells are dropped. Nested
/// arrays or objects are rejected as a shape error.
#[derive(Debug, Clone)]
pub struct JsonRowSource {
    input: JsonInput,
}

impl JsonRowSource {
    /// Read the file at `path` on every fetch.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: JsonInput::Path(path.into()),
        }
    }

    /// Decode an already-retrieved payload (e.g. an HTTP response body).
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            input: JsonInput::Bytes(bytes.into().into()),
        }
    }

    fn read(&self) -> Result<Arc<[u8]>, SourceError> {
        match &self.input {
            JsonInput::Bytes(bytes) => Ok(bytes.clone()),
            JsonInput::Path(path) => std::fs::read(path)
                .map(Arc::from)
                .map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

impl RowSource for JsonRowSource {
    fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
        let bytes = self.read()?;
        let payload = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
        decode_rows(serde_json::from_slice(payload)?)
    }
}

fn decode_rows(value: JsonValue) -> Result<Vec<RawRow>, SourceError> {
    let JsonValue::Array(items) = value else {
        return Err(SourceError::Shape("expected a top-level array of rows".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| decode_row(idx, item))
        .collect()
}

fn decode_row(idx: usize, item: JsonValue) -> Result<RawRow, SourceError> {
    let JsonValue::Object(fields) = item else {
        return Err(SourceError::Shape(format!("row {idx} is not an object")));
    };

    let mut row = RawRow::new();
    for (label, cell) in fields {
        let text = match cell {
            JsonValue::Null => continue,
            JsonValue::String(s) => s,
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => n.to_string(),
            JsonValue::Array(_) | JsonValue::Object(_) => {
                return Err(SourceError::Shape(format!(
                    "row {idx} column {label:?} is not a scalar"
                )));
            }
        };
        row.insert(label, text);
    }
    Ok(row)
}

//! # Data Source Resolution
//!
//! Reduces "value or file" inputs to a single byte buffer. Variants accept
//! text either as a raw string, as pre-split lines, as raw bytes, or as a
//! file read verbatim; everything lands here.
//!
//! ```rust,no_run
//! use projector_builder::data::{value_or_file, DataValue};
//!
//! # #[tokio::main]
//! # async fn main() -> projector_builder::Result<()> {
//! let lines = DataValue::Lines(vec!["a".into(), "b".into()]);
//! let bytes = value_or_file(Some(&lines), None, Some("\n"), Some("utf8")).await?;
//! assert_eq!(bytes.as_deref(), Some(&b"a\nb"[..]));
//! # Ok(())
//! # }
//! ```

mod encoding;

pub use encoding::TextEncoding;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DataError, Result};

/// Where a buffer comes from, resolved lazily
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Bytes(Vec<u8>),
    File(PathBuf),
    Absent,
}

impl DataSource {
    /// Build a source from an optional buffer and an optional file; the buffer wins
    pub fn from_parts(buffer: Option<&[u8]>, file: Option<&Path>) -> Self {
        match (buffer, file) {
            (Some(bytes), _) => Self::Bytes(bytes.to_vec()),
            (None, Some(path)) => Self::File(path.to_path_buf()),
            (None, None) => Self::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Resolve to bytes, reading the file fully if that is the source
    pub async fn resolve(&self) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Bytes(bytes) => Ok(Some(bytes.clone())),
            Self::File(path) => {
                debug!("Reading data from {:?}", path);
                Ok(Some(tokio::fs::read(path).await?))
            }
            Self::Absent => Ok(None),
        }
    }
}

/// A value that may stand in for a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    /// A single string, encoded as-is
    Text(String),
    /// Lines joined with a caller-supplied joiner before encoding
    Lines(Vec<String>),
    /// Raw bytes, used verbatim
    Bytes(Vec<u8>),
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl From<Vec<String>> for DataValue {
    fn from(value: Vec<String>) -> Self {
        DataValue::Lines(value)
    }
}

impl From<Vec<u8>> for DataValue {
    fn from(value: Vec<u8>) -> Self {
        DataValue::Bytes(value)
    }
}

/// Get data from a buffer or, failing that, a file
///
/// Returns `None` when neither is configured.
pub async fn buffer_or_file(buffer: Option<&[u8]>, file: Option<&Path>) -> Result<Option<Vec<u8>>> {
    DataSource::from_parts(buffer, file).resolve().await
}

/// Get data from a value or, failing that, a file
///
/// Strings need an `encoding`; lists of strings also need a `joiner`.
/// Byte values and absent values defer to [`buffer_or_file`].
pub async fn value_or_file(
    value: Option<&DataValue>,
    file: Option<&Path>,
    joiner: Option<&str>,
    encoding: Option<&str>,
) -> Result<Option<Vec<u8>>> {
    let text = match value {
        Some(DataValue::Text(text)) => text.clone(),
        Some(DataValue::Lines(lines)) => {
            let joiner = joiner.ok_or(DataError::MissingJoiner)?;
            lines.join(joiner)
        }
        Some(DataValue::Bytes(bytes)) => return buffer_or_file(Some(bytes.as_slice()), file).await,
        None => return buffer_or_file(None, file).await,
    };

    let encoding = match encoding {
        Some(name) if !name.is_empty() => name.parse::<TextEncoding>()?,
        _ => return Err(DataError::MissingEncoding.into()),
    };
    Ok(Some(encoding.encode(&text)))
}

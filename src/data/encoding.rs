use std::str::FromStr;

use crate::error::DataError;

/// String encodings accepted by [`value_or_file`](super::value_or_file)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// One byte per code point, keeping the low byte; also used for `ascii` and `binary`
    Latin1,
    Utf16Le,
}

impl TextEncoding {
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Latin1 => text.chars().map(|c| (c as u32 & 0xFF) as u8).collect(),
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = DataError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            "latin1" | "binary" | "ascii" => Ok(TextEncoding::Latin1),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(TextEncoding::Utf16Le),
            _ => Err(DataError::UnsupportedEncoding { encoding: name.to_string() }),
        }
    }
}

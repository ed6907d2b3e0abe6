use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppendError;

/// Marker bytes identifying appended movie metadata
pub const MOVIE_APPEND_MARKER: [u8; 4] = [0x56, 0x34, 0x12, 0xFA];

/// One field of an [`AppendLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutField {
    /// `d`: the movie bytes
    Data,
    /// `m`: [`MOVIE_APPEND_MARKER`]
    Marker,
    /// `s`: 32-bit length, little-endian
    Size32Le,
    /// `S`: 32-bit length, big-endian
    Size32Be,
    /// `l`: 64-bit length, little-endian, only the low word used
    Size64Le,
    /// `L`: 64-bit length, big-endian, only the low word used
    Size64Be,
}

impl LayoutField {
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'd' => Some(LayoutField::Data),
            'm' => Some(LayoutField::Marker),
            's' => Some(LayoutField::Size32Le),
            'S' => Some(LayoutField::Size32Be),
            'l' => Some(LayoutField::Size64Le),
            'L' => Some(LayoutField::Size64Be),
            _ => None,
        }
    }

    pub fn tag(self) -> char {
        match self {
            LayoutField::Data => 'd',
            LayoutField::Marker => 'm',
            LayoutField::Size32Le => 's',
            LayoutField::Size32Be => 'S',
            LayoutField::Size64Le => 'l',
            LayoutField::Size64Be => 'L',
        }
    }

    /// Encoded width in bytes for a payload of `payload_len` bytes
    pub fn width(self, payload_len: usize) -> usize {
        match self {
            LayoutField::Data => payload_len,
            LayoutField::Marker | LayoutField::Size32Le | LayoutField::Size32Be => 4,
            LayoutField::Size64Le | LayoutField::Size64Be => 8,
        }
    }

    fn write_into(self, out: &mut Vec<u8>, payload: &[u8], len: u32) {
        match self {
            LayoutField::Data => out.extend_from_slice(payload),
            LayoutField::Marker => out.extend_from_slice(&MOVIE_APPEND_MARKER),
            LayoutField::Size32Le => out.extend_from_slice(&len.to_le_bytes()),
            LayoutField::Size32Be => out.extend_from_slice(&len.to_be_bytes()),
            LayoutField::Size64Le => {
                out.extend_from_slice(&len.to_le_bytes());
                out.extend_from_slice(&[0; 4]);
            }
            LayoutField::Size64Be => {
                out.extend_from_slice(&[0; 4]);
                out.extend_from_slice(&len.to_be_bytes());
            }
        }
    }

    /// Decode a fixed-width field; `Data` carries no value
    fn read_from(self, bytes: &[u8]) -> Option<FieldValue> {
        match self {
            LayoutField::Data => None,
            LayoutField::Marker => Some(FieldValue::Marker(bytes == &MOVIE_APPEND_MARKER[..])),
            LayoutField::Size32Le => Some(FieldValue::Size(u32::from_le_bytes(bytes.try_into().ok()?) as u64)),
            LayoutField::Size32Be => Some(FieldValue::Size(u32::from_be_bytes(bytes.try_into().ok()?) as u64)),
            LayoutField::Size64Le => Some(FieldValue::Size(u64::from_le_bytes(bytes.try_into().ok()?))),
            LayoutField::Size64Be => Some(FieldValue::Size(u64::from_be_bytes(bytes.try_into().ok()?))),
        }
    }
}

enum FieldValue {
    Marker(bool),
    Size(u64),
}

/// Ordered field layout for appending movie data to a player
///
/// Parsed once from a tag string such as `"dms"` and reused for every append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppendLayout {
    fields: Vec<LayoutField>,
}

impl Default for AppendLayout {
    /// `dms`: data, marker, little-endian 32-bit size
    fn default() -> Self {
        Self {
            fields: vec![LayoutField::Data, LayoutField::Marker, LayoutField::Size32Le],
        }
    }
}

/// Value written by the size fields; lengths past `u32::MAX` cannot be encoded
fn size_field(len: usize) -> Result<u32, AppendError> {
    u32::try_from(len).map_err(|_| AppendError::PayloadTooLarge { len })
}

impl AppendLayout {
    /// Parse a tag string, rejecting the first unknown character
    pub fn parse(format: &str) -> Result<Self, AppendError> {
        let fields = format
            .chars()
            .enumerate()
            .map(|(position, tag)| {
                LayoutField::from_tag(tag).ok_or(AppendError::UnknownFieldTag { tag, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[LayoutField] {
        &self.fields
    }

    /// Total number of bytes appended for a payload of `payload_len` bytes
    pub fn encoded_len(&self, payload_len: usize) -> usize {
        self.fields.iter().map(|f| f.width(payload_len)).sum()
    }

    /// Assemble the full byte sequence for `payload`
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, AppendError> {
        let len = size_field(payload.len())?;

        let mut out = Vec::with_capacity(self.encoded_len(payload.len()));
        for field in &self.fields {
            field.write_into(&mut out, payload, len);
        }
        Ok(out)
    }

    /// Fields after the last `Data` field, all fixed width
    fn trailer(&self) -> &[LayoutField] {
        match self.fields.iter().rposition(|f| *f == LayoutField::Data) {
            Some(index) => &self.fields[index + 1..],
            None => &self.fields,
        }
    }

    /// Width of the fixed trailer following the last `Data` field
    pub fn trailer_len(&self) -> usize {
        self.trailer().iter().map(|f| f.width(0)).sum()
    }

    /// Recover the payload length from the end of a finished artifact
    ///
    /// Every marker in the trailer must match and every length field must
    /// agree; otherwise `None`.
    pub fn payload_len_from_tail(&self, bytes: &[u8]) -> Option<u64> {
        let trailer_len = self.trailer_len();
        if bytes.len() < trailer_len {
            return None;
        }

        let mut offset = bytes.len() - trailer_len;
        let mut size = None;
        for field in self.trailer() {
            let width = field.width(0);
            match field.read_from(&bytes[offset..offset + width])? {
                FieldValue::Marker(true) => {}
                FieldValue::Marker(false) => return None,
                FieldValue::Size(value) => match size {
                    Some(previous) if previous != value => return None,
                    _ => size = Some(value),
                },
            }
            offset += width;
        }
        size
    }
}

impl FromStr for AppendLayout {
    type Err = AppendError;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        Self::parse(format)
    }
}

impl TryFrom<String> for AppendLayout {
    type Error = AppendError;

    fn try_from(format: String) -> Result<Self, Self::Error> {
        Self::parse(&format)
    }
}

impl From<AppendLayout> for String {
    fn from(layout: AppendLayout) -> Self {
        layout.to_string()
    }
}

impl fmt::Display for AppendLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fields.iter().try_for_each(|field| write!(f, "{}", field.tag()))
    }
}

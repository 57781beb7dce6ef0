//! Binary structured-document codec used by mesh asset headers and parts.
//!
//! Every value starts with a one-byte type marker. Multi-byte integers,
//! lengths and reals are big-endian. Containers carry a 32-bit element count
//! and a closing marker:
//!
//! | marker | value |
//! |--------|-------|
//! | `!` | undefined |
//! | `1` / `0` | true / false |
//! | `i` | 32-bit signed integer |
//! | `r` | 64-bit real |
//! | `u` | 16-byte UUID |
//! | `s` | length-prefixed UTF-8 string |
//! | `l` | length-prefixed URI |
//! | `d` | 64-bit little-endian date (seconds since epoch) |
//! | `b` | length-prefixed binary |
//! | `[` ... `]` | array |
//! | `{` ... `}` | map; keys use `k` (or `s`) plus length-prefixed UTF-8 |
//!
//! Documents may be preceded by a textual header line, which the reader skips.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use crate::error::DocumentError;

/// Header lines that may precede a binary document.
const BINARY_HEADERS: [&[u8]; 2] = [b"<? LLSD/Binary ?>\n", b"<?llsd/binary?>\n"];

/// Maximum container nesting accepted by the reader.
pub const MAX_DEPTH: usize = 64;

/// A decoded structured value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Document {
    #[default]
    Undefined,
    Boolean(bool),
    Integer(i32),
    Real(f64),
    String(String),
    Uuid([u8; 16]),
    Date(f64),
    Uri(String),
    Binary(Vec<u8>),
    Array(Vec<Document>),
    Map(BTreeMap<String, Document>),
}

impl Document {
    /// Parses one value from the start of `bytes`, returning it together with
    /// the number of bytes consumed (including any skipped header line).
    pub fn parse_prefix(bytes: &[u8]) -> Result<(Self, usize), DocumentError> {
        let start = BINARY_HEADERS
            .iter()
            .find(|h| bytes.starts_with(h))
            .map_or(0, |h| h.len());
        let mut reader = Reader { bytes, pos: start };
        let value = reader.value(0)?;
        Ok((value, reader.pos))
    }

    /// Parses one value, ignoring any bytes after it.
    pub fn parse(bytes: &[u8]) -> Result<Self, DocumentError> {
        Self::parse_prefix(bytes).map(|(value, _)| value)
    }

    /// Encodes this value without a header line.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Undefined => out.push(b'!'),
            Self::Boolean(true) => out.push(b'1'),
            Self::Boolean(false) => out.push(b'0'),
            Self::Integer(v) => {
                out.push(b'i');
                out.extend_from_slice(&v.to_be_bytes());
            }
            Self::Real(v) => {
                out.push(b'r');
                out.extend_from_slice(&v.to_be_bytes());
            }
            Self::Uuid(id) => {
                out.push(b'u');
                out.extend_from_slice(id);
            }
            Self::String(s) => write_sized(out, b's', s.as_bytes()),
            Self::Uri(s) => write_sized(out, b'l', s.as_bytes()),
            Self::Date(v) => {
                out.push(b'd');
                out.extend_from_slice(&v.to_le_bytes());
            }
            Self::Binary(data) => write_sized(out, b'b', data),
            Self::Array(items) => {
                out.push(b'[');
                out.extend_from_slice(&(items.len() as u32).to_be_bytes());
                for item in items {
                    item.write_to(out);
                }
                out.push(b']');
            }
            Self::Map(entries) => {
                out.push(b'{');
                out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
                for (key, value) in entries {
                    write_sized(out, b'k', key.as_bytes());
                    value.write_to(out);
                }
                out.push(b'}');
            }
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Document>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Uri(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of an integer or real.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            Self::Integer(i) => Some(f64::from(*i)),
            _ => None,
        }
    }

    /// Looks up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Reads an array of at least three numbers.
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self.as_array()? {
            [x, y, z, ..] => Some(Vec3::new(
                x.as_real()? as f32,
                y.as_real()? as f32,
                z.as_real()? as f32,
            )),
            _ => None,
        }
    }

    /// Reads an array of at least two numbers.
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self.as_array()? {
            [x, y, ..] => Some(Vec2::new(x.as_real()? as f32, y.as_real()? as f32)),
            _ => None,
        }
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::Array(v.to_array().map(|c| Self::Real(f64::from(c))).to_vec())
    }

    pub fn from_vec2(v: Vec2) -> Self {
        Self::Array(v.to_array().map(|c| Self::Real(f64::from(c))).to_vec())
    }
}

impl FromIterator<(String, Document)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().collect())
    }
}

fn write_sized(out: &mut Vec<u8>, marker: u8, data: &[u8]) {
    out.push(marker);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DocumentError> {
        if self.remaining() < n {
            return Err(DocumentError::Truncated {
                expected: self.pos.saturating_add(n),
                actual: self.bytes.len(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DocumentError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn byte(&mut self) -> Result<u8, DocumentError> {
        Ok(self.array::<1>()?[0])
    }

    fn count(&mut self) -> Result<usize, DocumentError> {
        Ok(u32::from_be_bytes(self.array()?) as usize)
    }

    fn sized(&mut self) -> Result<&'a [u8], DocumentError> {
        let len = self.count()?;
        self.take(len)
    }

    fn string(&mut self) -> Result<String, DocumentError> {
        let offset = self.pos;
        let data = self.sized()?;
        std::str::from_utf8(data)
            .map(str::to_owned)
            .map_err(|_| DocumentError::InvalidUtf8 { offset })
    }

    fn close(&mut self, terminator: u8) -> Result<(), DocumentError> {
        let offset = self.pos;
        if self.byte()? != terminator {
            return Err(DocumentError::MissingTerminator {
                expected: terminator as char,
                offset,
            });
        }
        Ok(())
    }

    fn value(&mut self, depth: usize) -> Result<Document, DocumentError> {
        let offset = self.pos;
        let marker = self.byte()?;
        let value = match marker {
            b'!' => Document::Undefined,
            b'1' => Document::Boolean(true),
            b'0' => Document::Boolean(false),
            b'i' => Document::Integer(i32::from_be_bytes(self.array()?)),
            b'r' => Document::Real(f64::from_be_bytes(self.array()?)),
            b'u' => Document::Uuid(self.array()?),
            b's' => Document::String(self.string()?),
            b'l' => Document::Uri(self.string()?),
            b'd' => Document::Date(f64::from_le_bytes(self.array()?)),
            b'b' => Document::Binary(self.sized()?.to_vec()),
            b'[' | b'{' if depth >= MAX_DEPTH => return Err(DocumentError::TooDeep(MAX_DEPTH)),
            b'[' => {
                let count = self.count()?;
                // counts are untrusted; every element takes at least one byte
                let mut items = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    items.push(self.value(depth + 1)?);
                }
                self.close(b']')?;
                Document::Array(items)
            }
            b'{' => {
                let count = self.count()?;
                let mut entries = BTreeMap::new();
                for _ in 0..count {
                    let key_offset = self.pos;
                    match self.byte()? {
                        b'k' | b's' => {}
                        other => {
                            return Err(DocumentError::InvalidKey {
                                marker: other,
                                offset: key_offset,
                            });
                        }
                    }
                    let key = self.string()?;
                    let value = self.value(depth + 1)?;
                    entries.insert(key, value);
                }
                self.close(b'}')?;
                Document::Map(entries)
            }
            other => return Err(DocumentError::UnknownMarker { marker: other, offset }),
        };
        Ok(value)
    }
}

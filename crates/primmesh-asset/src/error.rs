//! Errors raised while decoding mesh assets.

/// Errors from the structured-document codec.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The data ended before the value was complete.
    #[error("document truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
    /// A value started with a byte that is not a known type marker.
    #[error("unknown type marker 0x{marker:02X} at offset {offset}")]
    UnknownMarker { marker: u8, offset: usize },
    /// A map key was not introduced by a key or string marker.
    #[error("invalid map key marker 0x{marker:02X} at offset {offset}")]
    InvalidKey { marker: u8, offset: usize },
    /// An array or map was not closed where its count said it would be.
    #[error("expected '{expected}' at offset {offset}")]
    MissingTerminator { expected: char, offset: usize },
    /// A string or key is not valid UTF-8.
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
    /// Containers nest deeper than the decoder accepts.
    #[error("containers nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Errors in a single decoded record of an LOD or convex hull part.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record is not a map.
    #[error("record is not a map")]
    NotAMap,
    /// A required stream is absent.
    #[error("missing {0} stream")]
    MissingStream(&'static str),
    /// A stream's byte length is not a whole number of elements.
    #[error("{stream} length {len} is not a multiple of {stride}")]
    StreamLength {
        stream: &'static str,
        len: usize,
        stride: usize,
    },
    /// A per-vertex stream does not hold one entry per position.
    #[error("{stream} holds {actual} entries for {expected} positions")]
    StreamMismatch {
        stream: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A triangle index points past the position list.
    #[error("index {index} out of range for {positions} positions")]
    IndexOutOfRange { index: u32, positions: usize },
    /// `HullList` and `Positions` disagree on the point count.
    #[error("HullList describes {described} points but Positions holds {bytes} bytes")]
    HullCount { described: usize, bytes: usize },
    /// More positions than 16-bit indices can address.
    #[error("{0} positions exceed the 16-bit index range")]
    TooManyPositions(usize),
}

/// Errors from unpacking a mesh asset and realizing its parts.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssetError {
    /// The header could not be parsed or has the wrong shape.
    #[error("malformed mesh asset header: {0}")]
    MalformedInput(String),
    /// None of the requested parts is present with data.
    #[error("no mesh part present among {tried:?}")]
    MissingPart {
        /// Part names tried, in priority order.
        tried: Vec<String>,
    },
    /// A part's offset and size point outside the trailing data.
    #[error("part '{part}' spans {offset}+{size} bytes but only {available} are available")]
    OutOfRangeSlice {
        part: String,
        offset: u64,
        size: u64,
        available: usize,
    },
    /// A part could not be inflated or its payload has an unexpected shape.
    #[error("part '{part}' failed to decode: {reason}")]
    DecompressionFailure { part: String, reason: String },
    /// A record inside an inflated part is malformed.
    #[error("part '{part}' record {record}: {source}")]
    InvalidRecord {
        part: String,
        /// Index of the record in the part; the convex hull part is record 0.
        record: usize,
        #[source]
        source: RecordError,
    },
}

impl AssetError {
    pub(crate) fn decompression(part: &str, reason: impl Into<String>) -> Self {
        Self::DecompressionFailure {
            part: part.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors from assembling a mesh asset with `MeshAssetBuilder`.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Deflating a part failed.
    #[error("failed to compress part '{part}': {source}")]
    Compress {
        part: String,
        #[source]
        source: std::io::Error,
    },
    /// A submesh cannot be encoded as a record.
    #[error("part '{part}' record {record}: {source}")]
    Record {
        part: String,
        record: usize,
        #[source]
        source: RecordError,
    },
    /// A part offset or size does not fit the header's 32-bit integers.
    #[error("part '{part}' {field} {value} exceeds the header integer range")]
    TooLarge {
        part: String,
        field: &'static str,
        value: usize,
    },
}

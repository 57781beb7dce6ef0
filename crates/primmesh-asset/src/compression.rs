//! zlib framing for mesh asset parts.
//!
//! Every geometry part is a zlib stream wrapping one encoded [`Document`].
//! Inflation is capped so a hostile stream cannot expand without bound.
//!
//! [`Document`]: crate::Document

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::AssetError;

/// Default ceiling for one inflated part.
pub const DEFAULT_MAX_PART_BYTES: usize = 16 * 1024 * 1024;

/// Inflate the bytes of part `name`, failing once output exceeds `max_len`.
pub fn inflate_part(name: &str, data: &[u8], max_len: usize) -> Result<Vec<u8>, AssetError> {
    if data.is_empty() {
        return Err(AssetError::decompression(name, "empty part"));
    }

    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .take(max_len as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| AssetError::decompression(name, e.to_string()))?;
    if out.len() > max_len {
        return Err(AssetError::decompression(
            name,
            format!("inflated size exceeds {max_len} bytes"),
        ));
    }
    Ok(out)
}

/// Deflate a part payload.
pub fn deflate_part(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

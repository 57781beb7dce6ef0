//! Convex hull decomposition stored in the `physics_convex` part.

use glam::Vec3;

use crate::document::Document;
use crate::error::RecordError;
use crate::quantize::{Domain3, write_u16s};

/// Largest point count one hull can carry; stored as count byte `0`.
pub const MAX_HULL_POINTS: usize = 256;

/// A bounding hull plus optional sub-hulls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvexHullSet {
    pub bounding_hull: Vec<Vec3>,
    pub hulls: Vec<Vec<Vec3>>,
}

impl ConvexHullSet {
    pub fn is_empty(&self) -> bool {
        self.bounding_hull.is_empty() && self.hulls.is_empty()
    }

    pub(crate) fn from_document(doc: &Document) -> Result<Self, RecordError> {
        if doc.as_map().is_none() {
            return Err(RecordError::NotAMap);
        }
        let domain = Domain3 {
            min: doc.get("Min").and_then(Document::as_vec3).unwrap_or(Domain3::UNIT.min),
            max: doc.get("Max").and_then(Document::as_vec3).unwrap_or(Domain3::UNIT.max),
        };

        let bounding_hull = match doc.get("BoundingVerts").and_then(Document::as_binary) {
            None => Vec::new(),
            Some(bytes) => domain
                .decode_stream(bytes)
                .ok_or(RecordError::StreamLength {
                    stream: "BoundingVerts",
                    len: bytes.len(),
                    stride: 6,
                })?,
        };

        let Some(counts) = doc.get("HullList").and_then(Document::as_binary) else {
            return Ok(Self {
                bounding_hull,
                hulls: Vec::new(),
            });
        };
        let positions = doc
            .get("Positions")
            .and_then(Document::as_binary)
            .ok_or(RecordError::MissingStream("Positions"))?;

        let counts: Vec<usize> = counts
            .iter()
            .map(|&c| if c == 0 { MAX_HULL_POINTS } else { usize::from(c) })
            .collect();
        let total: usize = counts.iter().sum();
        if total * 6 != positions.len() {
            return Err(RecordError::HullCount {
                described: total,
                bytes: positions.len(),
            });
        }
        let points = domain
            .decode_stream(positions)
            .ok_or(RecordError::StreamLength {
                stream: "Positions",
                len: positions.len(),
                stride: 6,
            })?;

        let mut hulls = Vec::with_capacity(counts.len());
        let mut start = 0;
        for count in counts {
            hulls.push(points[start..start + count].to_vec());
            start += count;
        }
        Ok(Self {
            bounding_hull,
            hulls,
        })
    }

    /// Encodes the set over the bounds of all its points. Hulls larger than
    /// [`MAX_HULL_POINTS`] are truncated and empty hulls are skipped.
    pub fn to_document(&self) -> Document {
        let hulls: Vec<&[Vec3]> = self
            .hulls
            .iter()
            .filter(|h| !h.is_empty())
            .map(|h| &h[..h.len().min(MAX_HULL_POINTS)])
            .collect();
        let all: Vec<Vec3> = self
            .bounding_hull
            .iter()
            .copied()
            .chain(hulls.iter().flat_map(|h| h.iter().copied()))
            .collect();
        let domain = Domain3::bounding(&all);

        let mut doc = std::collections::BTreeMap::new();
        doc.insert("Min".to_string(), Document::from_vec3(domain.min));
        doc.insert("Max".to_string(), Document::from_vec3(domain.max));
        doc.insert(
            "BoundingVerts".to_string(),
            Document::Binary(domain.encode_stream(&self.bounding_hull)),
        );
        if !hulls.is_empty() {
            // a full hull wraps to 0
            let counts = hulls.iter().map(|h| h.len() as u8).collect();
            let positions: Vec<Vec3> = hulls.iter().flat_map(|h| h.iter().copied()).collect();
            doc.insert("HullList".to_string(), Document::Binary(counts));
            doc.insert(
                "Positions".to_string(),
                Document::Binary(write_u16s(positions.iter().flat_map(|&p| domain.encode(p)))),
            );
        }
        Document::Map(doc)
    }
}

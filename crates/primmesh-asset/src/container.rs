//! Mesh asset container: a header document followed by compressed parts.
//!
//! The header is a map. Entries whose value is itself a map with a
//! non-negative integer `offset` and positive integer `size` name a byte range
//! in the data that follows the header; those ranges are the parts. Every
//! other header entry is kept as a plain value.

use std::collections::BTreeMap;

use primmesh_types::LevelOfDetail;
use tracing::{debug, warn};

use crate::compression::{DEFAULT_MAX_PART_BYTES, deflate_part, inflate_part};
use crate::convex::ConvexHullSet;
use crate::document::Document;
use crate::error::{AssetError, BuildError};
use crate::submesh::Submesh;

/// Render LOD parts from finest to coarsest.
pub const LOD_PART_NAMES: [&str; 4] = ["high_lod", "medium_lod", "low_lod", "lowest_lod"];

/// Dedicated physics parts, most specific first.
pub const PHYSICS_PART_NAMES: [&str; 2] = ["physics_mesh", "physics_shape"];

/// Part holding the convex hull decomposition.
pub const CONVEX_PART_NAME: &str = "physics_convex";

/// What the realized geometry is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MeshPurpose {
    #[default]
    Render,
    Physics,
}

/// Knobs for realizing geometry from a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Ceiling for one inflated part.
    pub max_part_bytes: usize,
    /// Whether physics requests try dedicated physics parts first.
    pub prefer_physics_parts: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_part_bytes: DEFAULT_MAX_PART_BYTES,
            prefer_physics_parts: true,
        }
    }
}

/// One header entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Part {
    /// Raw (still compressed) bytes sliced from the data section.
    Bytes(Vec<u8>),
    /// A header value carried through unchanged.
    Value(Document),
}

impl Part {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Value(_) => None,
        }
    }
}

/// Geometry realized from one part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RealizedMesh {
    /// Name of the part the geometry came from.
    pub part: String,
    /// One entry per record that carries geometry, in record order.
    pub submeshes: Vec<Submesh>,
}

/// Part names to try, in priority order.
///
/// Render requests start at the part matching `lod`, walk towards coarser
/// parts, then fall back to finer ones. Physics requests put the dedicated
/// physics parts first when `prefer_physics_parts` is set.
pub fn part_priority(lod: LevelOfDetail, purpose: MeshPurpose, prefer_physics_parts: bool) -> Vec<&'static str> {
    let start = match lod {
        LevelOfDetail::Highest => 0,
        LevelOfDetail::High => 1,
        LevelOfDetail::Medium => 2,
        LevelOfDetail::Low => 3,
    };
    let mut names = Vec::with_capacity(PHYSICS_PART_NAMES.len() + LOD_PART_NAMES.len());
    if purpose == MeshPurpose::Physics && prefer_physics_parts {
        names.extend(PHYSICS_PART_NAMES);
    }
    names.extend(&LOD_PART_NAMES[start..]);
    names.extend(LOD_PART_NAMES[..start].iter().rev());
    names
}

/// A decoded container header with its part bytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshAssetContainer {
    parts: BTreeMap<String, Part>,
}

/// Returns `(offset, size)` when `value` describes a non-empty byte range.
fn part_range(value: &Document) -> Option<(u64, u64)> {
    let offset = value.get("offset")?.as_integer()?;
    let size = value.get("size")?.as_integer()?;
    (offset >= 0 && size > 0).then(|| (offset as u64, size as u64))
}

impl MeshAssetContainer {
    /// Parses the header and slices every part out of the trailing data.
    pub fn unpack(bytes: &[u8]) -> Result<Self, AssetError> {
        let (header, consumed) =
            Document::parse_prefix(bytes).map_err(|e| AssetError::MalformedInput(e.to_string()))?;
        let Document::Map(entries) = header else {
            return Err(AssetError::MalformedInput("header is not a map".to_string()));
        };
        let body = &bytes[consumed..];

        let mut parts = BTreeMap::new();
        for (name, value) in entries {
            let part = match part_range(&value) {
                Some((offset, size)) => {
                    let end = offset.checked_add(size).filter(|&end| end <= body.len() as u64);
                    let Some(end) = end else {
                        return Err(AssetError::OutOfRangeSlice {
                            part: name,
                            offset,
                            size,
                            available: body.len(),
                        });
                    };
                    Part::Bytes(body[offset as usize..end as usize].to_vec())
                }
                None => Part::Value(value),
            };
            parts.insert(name, part);
        }
        debug!(parts = parts.len(), body = body.len(), "unpacked mesh asset");
        Ok(Self { parts })
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    /// Compressed bytes of a part, if it has any.
    pub fn part_bytes(&self, name: &str) -> Option<&[u8]> {
        self.part(name).and_then(Part::as_bytes)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Inflates and decodes part `name` into a document.
    pub fn part_document(&self, name: &str, max_part_bytes: usize) -> Result<Document, AssetError> {
        let bytes = self.part_bytes(name).ok_or_else(|| AssetError::MissingPart {
            tried: vec![name.to_string()],
        })?;
        let inflated = inflate_part(name, bytes, max_part_bytes)?;
        Document::parse(&inflated).map_err(|e| AssetError::decompression(name, e.to_string()))
    }

    /// Realizes the best available part for `lod` and `purpose`.
    pub fn realize_lod(
        &self,
        lod: LevelOfDetail,
        purpose: MeshPurpose,
        options: &DecodeOptions,
    ) -> Result<RealizedMesh, AssetError> {
        let tried = part_priority(lod, purpose, options.prefer_physics_parts);
        let Some(name) = tried.iter().copied().find(|n| self.part_bytes(n).is_some()) else {
            return Err(AssetError::MissingPart {
                tried: tried.into_iter().map(String::from).collect(),
            });
        };

        let doc = self.part_document(name, options.max_part_bytes)?;
        let records = doc
            .as_array()
            .ok_or_else(|| AssetError::decompression(name, "payload is not an array"))?;
        let mut submeshes = Vec::with_capacity(records.len());
        for (face, record) in records.iter().enumerate() {
            let decoded = Submesh::from_record(face as u32, record).map_err(|source| {
                AssetError::InvalidRecord {
                    part: name.to_string(),
                    record: face,
                    source,
                }
            })?;
            if let Some(sub) = decoded {
                submeshes.push(sub);
            }
        }
        debug!(part = name, ?lod, ?purpose, submeshes = submeshes.len(), "realized mesh part");
        Ok(RealizedMesh {
            part: name.to_string(),
            submeshes,
        })
    }

    /// Decodes the convex hull part. Absence yields `None`; a malformed hull
    /// part is logged and also yields `None`.
    pub fn convex_hulls(&self, max_part_bytes: usize) -> Option<ConvexHullSet> {
        self.part_bytes(CONVEX_PART_NAME)?;
        let decoded = self
            .part_document(CONVEX_PART_NAME, max_part_bytes)
            .and_then(|doc| {
                ConvexHullSet::from_document(&doc).map_err(|source| AssetError::InvalidRecord {
                    part: CONVEX_PART_NAME.to_string(),
                    record: 0,
                    source,
                })
            });
        match decoded {
            Ok(set) => Some(set),
            Err(e) => {
                warn!("ignoring convex hulls: {e}");
                None
            }
        }
    }
}

/// Assembles a container from documents and raw parts.
#[derive(Clone, Debug, Default)]
pub struct MeshAssetBuilder {
    header: BTreeMap<String, Document>,
    parts: Vec<(String, Vec<u8>)>,
}

impl MeshAssetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain header value.
    pub fn value(mut self, key: impl Into<String>, value: Document) -> Self {
        self.header.insert(key.into(), value);
        self
    }

    /// Compresses `doc` as part `name`.
    pub fn document(self, name: impl Into<String>, doc: &Document) -> Result<Self, BuildError> {
        let name = name.into();
        let packed = deflate_part(&doc.encode()).map_err(|source| BuildError::Compress {
            part: name.clone(),
            source,
        })?;
        Ok(self.raw_part(name, packed))
    }

    /// Adds the submeshes as an LOD part, one record per submesh.
    pub fn lod(self, name: impl Into<String>, submeshes: &[Submesh]) -> Result<Self, BuildError> {
        let name = name.into();
        let records = submeshes
            .iter()
            .enumerate()
            .map(|(record, sub)| {
                sub.to_record().map_err(|source| BuildError::Record {
                    part: name.clone(),
                    record,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.document(name, &Document::Array(records))
    }

    pub fn convex(self, hulls: &ConvexHullSet) -> Result<Self, BuildError> {
        self.document(CONVEX_PART_NAME, &hulls.to_document())
    }

    /// Adds part bytes as-is.
    pub fn raw_part(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.parts.push((name.into(), bytes));
        self
    }

    /// Writes the header followed by the part bytes in insertion order.
    ///
    /// Fails when a part offset or size does not fit a header integer.
    pub fn build(self) -> Result<Vec<u8>, BuildError> {
        let mut header = self.header;
        let mut offset = 0usize;
        for (name, bytes) in &self.parts {
            header.insert(name.clone(), range_document(name, offset, bytes.len())?);
            offset += bytes.len();
        }

        let mut out = Document::Map(header).encode();
        out.reserve(offset);
        for (_, bytes) in &self.parts {
            out.extend_from_slice(bytes);
        }
        Ok(out)
    }
}

/// The `{offset, size}` header entry of a part.
fn range_document(part: &str, offset: usize, size: usize) -> Result<Document, BuildError> {
    let integer = |field: &'static str, value: usize| {
        i32::try_from(value)
            .map(Document::Integer)
            .map_err(|_| BuildError::TooLarge {
                part: part.to_string(),
                field,
                value,
            })
    };
    Ok([
        ("offset".to_string(), integer("offset", offset)?),
        ("size".to_string(), integer("size", size)?),
    ]
    .into_iter()
    .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use crate::submesh::MAX_RECORD_POSITIONS;
    use glam::{Vec2, Vec3};

    fn quad(face: u32) -> Submesh {
        Submesh {
            face,
            positions: vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            normals: Some(vec![Vec3::Z; 4]),
            uvs: Some(vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y]),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn test_single_record_high_lod() {
        let bytes = MeshAssetBuilder::new()
            .value("version", Document::Integer(1))
            .lod("high_lod", &[quad(0)])
            .unwrap()
            .build()
            .unwrap();
        let container = MeshAssetContainer::unpack(&bytes).unwrap();
        assert_eq!(
            container.part("version"),
            Some(&Part::Value(Document::Integer(1)))
        );
        let realized = container
            .realize_lod(LevelOfDetail::Highest, MeshPurpose::Render, &DecodeOptions::default())
            .unwrap();
        assert_eq!(realized.part, "high_lod");
        assert_eq!(realized.submeshes.len(), 1);
        let mesh = realized.submeshes[0].to_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn test_zero_size_part_is_missing() {
        let bytes = MeshAssetBuilder::new()
            .raw_part("high_lod", Vec::new())
            .build()
            .unwrap();
        let container = MeshAssetContainer::unpack(&bytes).unwrap();
        assert!(matches!(container.part("high_lod"), Some(Part::Value(_))));
        let err = container
            .realize_lod(LevelOfDetail::Highest, MeshPurpose::Render, &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            AssetError::MissingPart {
                tried: vec![
                    "high_lod".into(),
                    "medium_lod".into(),
                    "low_lod".into(),
                    "lowest_lod".into()
                ]
            }
        );
    }

    #[test]
    fn test_out_of_range_slice() {
        let mut bytes = MeshAssetBuilder::new()
            .raw_part("high_lod", vec![1, 2, 3, 4])
            .build()
            .unwrap();
        bytes.truncate(bytes.len() - 2);
        let err = MeshAssetContainer::unpack(&bytes).unwrap_err();
        assert_eq!(
            err,
            AssetError::OutOfRangeSlice {
                part: "high_lod".into(),
                offset: 0,
                size: 4,
                available: 2
            }
        );
    }

    #[test]
    fn test_header_must_be_map() {
        let bytes = Document::Integer(3).encode();
        assert!(matches!(
            MeshAssetContainer::unpack(&bytes),
            Err(AssetError::MalformedInput(_))
        ));
        assert!(matches!(
            MeshAssetContainer::unpack(&[b'{', 0, 0]),
            Err(AssetError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_lod_fallback_order() {
        assert_eq!(
            part_priority(LevelOfDetail::Medium, MeshPurpose::Render, true),
            vec!["low_lod", "lowest_lod", "medium_lod", "high_lod"]
        );
        assert_eq!(
            part_priority(LevelOfDetail::High, MeshPurpose::Physics, true),
            vec!["physics_mesh", "physics_shape", "medium_lod", "low_lod", "lowest_lod", "high_lod"]
        );
        assert_eq!(
            part_priority(LevelOfDetail::Highest, MeshPurpose::Physics, false)[0],
            "high_lod"
        );
    }

    #[test]
    fn test_coarse_request_falls_back_to_finer_part() {
        let bytes = MeshAssetBuilder::new()
            .lod("medium_lod", &[quad(0)])
            .unwrap()
            .build()
            .unwrap();
        let container = MeshAssetContainer::unpack(&bytes).unwrap();
        let realized = container
            .realize_lod(LevelOfDetail::Low, MeshPurpose::Render, &DecodeOptions::default())
            .unwrap();
        assert_eq!(realized.part, "medium_lod");
    }

    #[test]
    fn test_no_geometry_records_keep_face_numbers() {
        let records = Document::Array(vec![Submesh::empty_record(), quad(1).to_record().unwrap()]);
        let bytes = MeshAssetBuilder::new()
            .document("high_lod", &records)
            .unwrap()
            .build()
            .unwrap();
        let realized = MeshAssetContainer::unpack(&bytes)
            .unwrap()
            .realize_lod(LevelOfDetail::Highest, MeshPurpose::Render, &DecodeOptions::default())
            .unwrap();
        assert_eq!(realized.submeshes.len(), 1);
        assert_eq!(realized.submeshes[0].face, 1);
    }

    #[test]
    fn test_corrupt_part_is_decompression_failure() {
        let bytes = MeshAssetBuilder::new()
            .raw_part("high_lod", vec![0xDE, 0xAD, 0xBE, 0xEF])
            .build()
            .unwrap();
        let err = MeshAssetContainer::unpack(&bytes)
            .unwrap()
            .realize_lod(LevelOfDetail::Highest, MeshPurpose::Render, &DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, AssetError::DecompressionFailure { ref part, .. } if part == "high_lod"));
    }

    #[test]
    fn test_non_array_payload_is_rejected() {
        let bytes = MeshAssetBuilder::new()
            .document("high_lod", &Document::Integer(7))
            .unwrap()
            .build()
            .unwrap();
        let err = MeshAssetContainer::unpack(&bytes)
            .unwrap()
            .realize_lod(LevelOfDetail::Highest, MeshPurpose::Render, &DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, AssetError::DecompressionFailure { .. }));
    }

    #[test]
    fn test_convex_hulls_are_best_effort() {
        let hulls = ConvexHullSet {
            bounding_hull: vec![Vec3::splat(-1.0), Vec3::splat(1.0)],
            hulls: Vec::new(),
        };
        let good = MeshAssetBuilder::new()
            .convex(&hulls)
            .unwrap()
            .build()
            .unwrap();
        let container = MeshAssetContainer::unpack(&good).unwrap();
        assert_eq!(container.convex_hulls(DEFAULT_MAX_PART_BYTES), Some(hulls));

        let bad = MeshAssetBuilder::new()
            .raw_part(CONVEX_PART_NAME, vec![1, 2, 3])
            .build()
            .unwrap();
        let container = MeshAssetContainer::unpack(&bad).unwrap();
        assert_eq!(container.convex_hulls(DEFAULT_MAX_PART_BYTES), None);

        let none = MeshAssetContainer::unpack(&MeshAssetBuilder::new().build().unwrap()).unwrap();
        assert_eq!(none.convex_hulls(DEFAULT_MAX_PART_BYTES), None);

        let mismatched = Document::Map(
            [
                ("HullList".to_string(), Document::Binary(vec![2])),
                ("Positions".to_string(), Document::Binary(vec![0; 6])),
            ]
            .into_iter()
            .collect(),
        );
        let bytes = MeshAssetBuilder::new()
            .document(CONVEX_PART_NAME, &mismatched)
            .unwrap()
            .build()
            .unwrap();
        let container = MeshAssetContainer::unpack(&bytes).unwrap();
        assert_eq!(container.convex_hulls(DEFAULT_MAX_PART_BYTES), None);
    }

    #[test]
    fn test_bad_record_reports_part_and_index() {
        let bad = Document::Map(
            [("TriangleList".to_string(), Document::Binary(Vec::new()))]
                .into_iter()
                .collect(),
        );
        let records = Document::Array(vec![quad(0).to_record().unwrap(), bad]);
        let bytes = MeshAssetBuilder::new()
            .document("medium_lod", &records)
            .unwrap()
            .build()
            .unwrap();
        let err = MeshAssetContainer::unpack(&bytes)
            .unwrap()
            .realize_lod(LevelOfDetail::High, MeshPurpose::Render, &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            AssetError::InvalidRecord {
                part: "medium_lod".to_string(),
                record: 1,
                source: RecordError::MissingStream("Position"),
            }
        );
    }

    #[test]
    fn test_builder_rejects_unencodable_submesh() {
        let mut big = quad(0);
        big.positions.resize(MAX_RECORD_POSITIONS + 1, Vec3::ZERO);
        let err = MeshAssetBuilder::new()
            .lod("high_lod", &[quad(0), big])
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Record {
                ref part,
                record: 1,
                source: RecordError::TooManyPositions(_),
            } if part == "high_lod"
        ));
    }

    #[test]
    fn test_header_ranges_must_fit_i32() {
        let max = i32::MAX as usize;
        let doc = range_document("high_lod", max, 1).unwrap();
        assert_eq!(doc.get("offset"), Some(&Document::Integer(i32::MAX)));
        assert_eq!(doc.get("size"), Some(&Document::Integer(1)));

        let err = range_document("high_lod", max + 1, 1).unwrap_err();
        assert!(matches!(
            err,
            BuildError::TooLarge { field: "offset", value, .. } if value == max + 1
        ));
        let err = range_document("low_lod", 0, max + 1).unwrap_err();
        assert!(matches!(err, BuildError::TooLarge { field: "size", .. }));
    }
}

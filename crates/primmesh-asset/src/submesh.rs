//! Per-face geometry records inside an LOD part.

use glam::{Vec2, Vec3};
use primmesh_types::{SimpleMesh, Triangle, Vertex};

use crate::document::Document;
use crate::error::RecordError;
use crate::quantize::{Domain2, Domain3, read_u16s, write_u16s};

/// Geometry of one face decoded from a part record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Submesh {
    /// Record index within the part, which is also the face number.
    pub face: u32,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub uvs: Option<Vec<Vec2>>,
    pub indices: Vec<u32>,
}

fn domain3(record: &Document, key: &str, fallback: Domain3) -> Domain3 {
    let Some(domain) = record.get(key) else {
        return fallback;
    };
    Domain3 {
        min: domain.get("Min").and_then(Document::as_vec3).unwrap_or(fallback.min),
        max: domain.get("Max").and_then(Document::as_vec3).unwrap_or(fallback.max),
    }
}

fn domain2(record: &Document, key: &str) -> Domain2 {
    let Some(domain) = record.get(key) else {
        return Domain2::UNIT;
    };
    Domain2 {
        min: domain.get("Min").and_then(Document::as_vec2).unwrap_or(Domain2::UNIT.min),
        max: domain.get("Max").and_then(Document::as_vec2).unwrap_or(Domain2::UNIT.max),
    }
}

fn check_indices(indices: &[u32], positions: usize) -> Result<(), RecordError> {
    match indices.iter().find(|&&i| i as usize >= positions) {
        Some(&index) => Err(RecordError::IndexOutOfRange { index, positions }),
        None => Ok(()),
    }
}

fn domain_document(min: Document, max: Document) -> Document {
    [("Min".to_string(), min), ("Max".to_string(), max)]
        .into_iter()
        .collect()
}

/// Largest position count a record can index with 16-bit indices.
pub const MAX_RECORD_POSITIONS: usize = u16::MAX as usize + 1;

/// Decodes an optional per-vertex stream that must match `expected` entries.
fn per_vertex<T>(
    stream: &'static str,
    bytes: Option<&[u8]>,
    stride: usize,
    expected: usize,
    decode: impl FnOnce(&[u8]) -> Option<Vec<T>>,
) -> Result<Option<Vec<T>>, RecordError> {
    let Some(bytes) = bytes else {
        return Ok(None);
    };
    let values = decode(bytes).ok_or(RecordError::StreamLength {
        stream,
        len: bytes.len(),
        stride,
    })?;
    if values.len() != expected {
        return Err(RecordError::StreamMismatch {
            stream,
            expected,
            actual: values.len(),
        });
    }
    Ok(Some(values))
}

impl Submesh {
    /// Decodes record `face`. Records flagged `NoGeometry` yield `Ok(None)`.
    pub(crate) fn from_record(face: u32, record: &Document) -> Result<Option<Self>, RecordError> {
        if record.as_map().is_none() {
            return Err(RecordError::NotAMap);
        }
        if record
            .get("NoGeometry")
            .and_then(Document::as_bool)
            .unwrap_or(false)
        {
            return Ok(None);
        }

        let position_bytes = record
            .get("Position")
            .and_then(Document::as_binary)
            .ok_or(RecordError::MissingStream("Position"))?;
        let positions = domain3(record, "PositionDomain", Domain3::UNIT)
            .decode_stream(position_bytes)
            .ok_or(RecordError::StreamLength {
                stream: "Position",
                len: position_bytes.len(),
                stride: 6,
            })?;

        let index_bytes = record
            .get("TriangleList")
            .and_then(Document::as_binary)
            .ok_or(RecordError::MissingStream("TriangleList"))?;
        if index_bytes.len() % 6 != 0 {
            return Err(RecordError::StreamLength {
                stream: "TriangleList",
                len: index_bytes.len(),
                stride: 6,
            });
        }
        let indices: Vec<u32> = read_u16s(index_bytes).map(u32::from).collect();
        check_indices(&indices, positions.len())?;

        let normals = per_vertex(
            "Normal",
            record.get("Normal").and_then(Document::as_binary),
            6,
            positions.len(),
            |bytes| domain3(record, "NormalDomain", Domain3::NORMAL).decode_stream(bytes),
        )?;
        let uvs = per_vertex(
            "TexCoord0",
            record.get("TexCoord0").and_then(Document::as_binary),
            4,
            positions.len(),
            |bytes| domain2(record, "TexCoord0Domain").decode_stream(bytes),
        )?;

        Ok(Some(Self {
            face,
            positions,
            normals,
            uvs,
            indices,
        }))
    }

    /// Encodes this submesh as a part record, quantized over its own bounds.
    ///
    /// Fails when the positions cannot all be addressed by 16-bit indices or
    /// an index points past them.
    pub fn to_record(&self) -> Result<Document, RecordError> {
        if self.positions.len() > MAX_RECORD_POSITIONS {
            return Err(RecordError::TooManyPositions(self.positions.len()));
        }
        check_indices(&self.indices, self.positions.len())?;

        let position_domain = Domain3::bounding(&self.positions);
        let mut record = std::collections::BTreeMap::new();
        record.insert(
            "Position".to_string(),
            Document::Binary(position_domain.encode_stream(&self.positions)),
        );
        record.insert(
            "PositionDomain".to_string(),
            domain_document(
                Document::from_vec3(position_domain.min),
                Document::from_vec3(position_domain.max),
            ),
        );
        // checked above: every index is below MAX_RECORD_POSITIONS
        record.insert(
            "TriangleList".to_string(),
            Document::Binary(write_u16s(self.indices.iter().map(|&i| i as u16))),
        );
        if let Some(normals) = &self.normals {
            record.insert(
                "Normal".to_string(),
                Document::Binary(Domain3::NORMAL.encode_stream(normals)),
            );
        }
        if let Some(uvs) = &self.uvs {
            let uv_domain = Domain2::bounding(uvs);
            record.insert(
                "TexCoord0".to_string(),
                Document::Binary(uv_domain.encode_stream(uvs)),
            );
            record.insert(
                "TexCoord0Domain".to_string(),
                domain_document(
                    Document::from_vec2(uv_domain.min),
                    Document::from_vec2(uv_domain.max),
                ),
            );
        }
        Ok(Document::Map(record))
    }

    /// The record marking a face without geometry.
    pub fn empty_record() -> Document {
        [("NoGeometry".to_string(), Document::Boolean(true))]
            .into_iter()
            .collect()
    }

    /// Builds an indexed mesh. Missing normals are recomputed from the
    /// triangles; missing texture coordinates default to zero, as do entries
    /// past the end of a short stream. Degenerate triangles and triangles
    /// indexing past the positions are dropped.
    pub fn to_mesh(&self) -> SimpleMesh {
        let mut mesh = SimpleMesh::with_capacity(self.positions.len(), self.indices.len() / 3);
        for (i, &position) in self.positions.iter().enumerate() {
            let normal = self
                .normals
                .as_ref()
                .and_then(|n| n.get(i))
                .map_or(Vec3::ZERO, |n| n.normalize_or_zero());
            let uv = self
                .uvs
                .as_ref()
                .and_then(|uv| uv.get(i))
                .copied()
                .unwrap_or(Vec2::ZERO);
            mesh.push_vertex(Vertex::new(position, normal, uv));
        }
        for t in self.indices.chunks_exact(3) {
            mesh.push_triangle(Triangle::new(t[0], t[1], t[2]));
        }
        mesh.drop_degenerate_triangles();

        if self.normals.is_none() {
            let mut sums = vec![Vec3::ZERO; mesh.vertices.len()];
            for t in mesh.triangles() {
                let [a, b, c] = t.0.map(|i| mesh.vertices[i as usize].position());
                let normal = (b - a).cross(c - a);
                for i in t.0 {
                    sums[i as usize] += normal;
                }
            }
            for (vertex, sum) in mesh.vertices.iter_mut().zip(sums) {
                vertex.normal = sum.try_normalize().unwrap_or(Vec3::Z).to_array();
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Submesh {
        Submesh {
            face: 0,
            positions: vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            normals: None,
            uvs: Some(vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y]),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn test_record_decodes_to_same_geometry() {
        let record = quad().to_record().unwrap();
        let decoded = Submesh::from_record(0, &record).unwrap().unwrap();
        assert_eq!(decoded.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(decoded.positions, quad().positions);
        assert_eq!(decoded.uvs, quad().uvs);
        assert!(decoded.normals.is_none());
    }

    #[test]
    fn test_default_position_domain() {
        let record: Document = [
            ("Position".to_string(), Document::Binary(write_u16s([0, 65535, 0]))),
            ("TriangleList".to_string(), Document::Binary(Vec::new())),
        ]
        .into_iter()
        .collect();
        let sub = Submesh::from_record(3, &record).unwrap().unwrap();
        assert_eq!(sub.face, 3);
        assert_eq!(sub.positions, vec![Vec3::new(-0.5, 0.5, -0.5)]);
    }

    #[test]
    fn test_no_geometry_is_skipped() {
        assert_eq!(Submesh::from_record(1, &Submesh::empty_record()), Ok(None));
    }

    #[test]
    fn test_index_out_of_range() {
        let mut record = quad().to_record().unwrap();
        if let Document::Map(map) = &mut record {
            map.insert("TriangleList".to_string(), Document::Binary(write_u16s([0, 1, 4])));
        }
        assert_eq!(
            Submesh::from_record(0, &record),
            Err(RecordError::IndexOutOfRange {
                index: 4,
                positions: 4
            })
        );
    }

    #[test]
    fn test_missing_position_stream() {
        let record: Document = [("TriangleList".to_string(), Document::Binary(Vec::new()))]
            .into_iter()
            .collect();
        assert_eq!(
            Submesh::from_record(0, &record),
            Err(RecordError::MissingStream("Position"))
        );
        assert_eq!(
            Submesh::from_record(0, &Document::Integer(1)),
            Err(RecordError::NotAMap)
        );
    }

    #[test]
    fn test_record_rejects_unaddressable_positions() {
        let mut sub = Submesh {
            positions: vec![Vec3::ZERO; MAX_RECORD_POSITIONS + 1],
            indices: vec![0, 1, MAX_RECORD_POSITIONS as u32],
            ..Default::default()
        };
        assert_eq!(
            sub.to_record(),
            Err(RecordError::TooManyPositions(MAX_RECORD_POSITIONS + 1))
        );

        sub.positions.pop();
        assert_eq!(
            sub.to_record(),
            Err(RecordError::IndexOutOfRange {
                index: MAX_RECORD_POSITIONS as u32,
                positions: MAX_RECORD_POSITIONS
            })
        );

        sub.indices = vec![0, 1, u32::from(u16::MAX)];
        let decoded = Submesh::from_record(0, &sub.to_record().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(decoded.positions.len(), MAX_RECORD_POSITIONS);
        assert_eq!(decoded.indices, vec![0, 1, 65535]);
    }

    #[test]
    fn test_short_streams_fall_back_to_zero() {
        let mut sub = quad();
        sub.normals = Some(vec![Vec3::Z]);
        sub.uvs = Some(vec![Vec2::ONE, Vec2::ONE]);
        sub.indices.extend([0, 2, 9]);
        let mesh = sub.to_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.vertices[0].normal(), Vec3::Z);
        assert_eq!(mesh.vertices[3].normal(), Vec3::ZERO);
        assert_eq!(mesh.vertices[1].uv(), Vec2::ONE);
        assert_eq!(mesh.vertices[2].uv(), Vec2::ZERO);
    }

    #[test]
    fn test_odd_stream_lengths_are_rejected() {
        let record: Document = [
            ("Position".to_string(), Document::Binary(vec![0; 8])),
            ("TriangleList".to_string(), Document::Binary(Vec::new())),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            Submesh::from_record(0, &record),
            Err(RecordError::StreamLength {
                stream: "Position",
                len: 8,
                stride: 6
            })
        );

        let mut record = quad().to_record().unwrap();
        if let Document::Map(map) = &mut record {
            map.insert("Normal".to_string(), Document::Binary(vec![0; 6]));
        }
        assert_eq!(
            Submesh::from_record(0, &record),
            Err(RecordError::StreamMismatch {
                stream: "Normal",
                expected: 4,
                actual: 1
            })
        );
    }

    #[test]
    fn test_missing_normals_are_computed() {
        let mesh = quad().to_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.vertices.iter().all(|v| v.normal() == Vec3::Z));
        assert_eq!(mesh.vertices[2].uv(), Vec2::ONE);
    }
}

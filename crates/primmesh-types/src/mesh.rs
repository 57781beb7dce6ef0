//! Mesh containers produced by the meshers: a unified [`SimpleMesh`] and a
//! per-face [`FacetedMesh`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::texture::TextureFace;
use crate::vertex::{VERTEX_EPSILON, Vertex};

/// Three indices into a vertex list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle(pub [u32; 3]);

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }

    /// True if any two corners resolve to the same position, or any index is
    /// outside `vertices`.
    pub fn is_degenerate(&self, vertices: &[Vertex]) -> bool {
        let [a, b, c] = self.0;
        let (Some(a), Some(b), Some(c)) = (
            vertices.get(a as usize),
            vertices.get(b as usize),
            vertices.get(c as usize),
        ) else {
            return true;
        };
        same_position(a, b) || same_position(b, c) || same_position(a, c)
    }
}

fn same_position(a: &Vertex, b: &Vertex) -> bool {
    a.position
        .iter()
        .zip(&b.position)
        .all(|(x, y)| (x - y).abs() <= VERTEX_EPSILON)
}

/// Vertex/triangle counts and the axis-aligned bounds of a mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// `None` for a mesh without vertices.
    pub bounds: Option<(Vec3, Vec3)>,
}

impl MeshStats {
    fn accumulate(&mut self, mesh: &SimpleMesh) {
        self.vertex_count += mesh.vertex_count();
        self.triangle_count += mesh.triangle_count();
        for v in &mesh.vertices {
            let p = v.position();
            self.bounds = Some(match self.bounds {
                Some((min, max)) => (min.min(p), max.max(p)),
                None => (p, p),
            });
        }
    }
}

/// One vertex list and one triangle index list with no material segmentation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleMesh {
    /// Vertex buffer.
    pub vertices: Vec<Vertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
}

impl SimpleMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, triangle: Triangle) {
        self.indices.extend_from_slice(&triangle.0);
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|c| Triangle([c[0], c[1], c[2]]))
    }

    /// Appends `other`, offsetting its indices past the current vertices.
    pub fn append(&mut self, other: &SimpleMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Removes degenerate triangles and returns how many were dropped.
    pub fn drop_degenerate_triangles(&mut self) -> usize {
        let before = self.triangle_count();
        let kept: Vec<u32> = self
            .triangles()
            .filter(|t| !t.is_degenerate(&self.vertices))
            .flat_map(|t| t.0)
            .collect();
        self.indices = kept;
        before - self.triangle_count()
    }

    /// Drops vertices no triangle references, keeping the survivors in order.
    ///
    /// Out-of-range indices are left untouched; run
    /// [`drop_degenerate_triangles`](Self::drop_degenerate_triangles) first.
    pub fn prune_unused_vertices(&mut self) {
        let mut used = vec![false; self.vertices.len()];
        for &index in &self.indices {
            if let Some(flag) = used.get_mut(index as usize) {
                *flag = true;
            }
        }
        if used.iter().all(|&u| u) {
            return;
        }

        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for (i, vertex) in self.vertices.iter().enumerate() {
            if used[i] {
                remap[i] = vertices.len() as u32;
                vertices.push(*vertex);
            }
        }
        for index in &mut self.indices {
            if let Some(&new) = remap.get(*index as usize) {
                *index = new;
            }
        }
        self.vertices = vertices;
    }

    pub fn stats(&self) -> MeshStats {
        let mut stats = MeshStats::default();
        stats.accumulate(self);
        stats
    }

    /// Raw interleaved vertex bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// One independently materialed sub-mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Prim face number, or record index for mesh assets.
    pub number: u32,
    pub mesh: SimpleMesh,
    pub texture: TextureFace,
}

/// A mesh split into faces, each with its own buffers and texture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetedMesh {
    pub faces: Vec<Face>,
}

impl FacetedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn face(&self, number: u32) -> Option<&Face> {
        self.faces.iter().find(|f| f.number == number)
    }

    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(|f| f.mesh.is_empty())
    }

    pub fn stats(&self) -> MeshStats {
        let mut stats = MeshStats::default();
        for face in &self.faces {
            stats.accumulate(&face.mesh);
        }
        stats
    }

    /// Merges every face into one re-indexed mesh, in face order.
    pub fn flatten(&self) -> SimpleMesh {
        let stats = self.stats();
        let mut mesh = SimpleMesh::with_capacity(stats.vertex_count, stats.triangle_count);
        for face in &self.faces {
            mesh.append(&face.mesh);
        }
        mesh
    }
}

//! Per-face triangle accumulator with vertex welding and smooth normals.

use glam::{Vec2, Vec3};
use primmesh_types::{SimpleMesh, Triangle, VERTEX_EPSILON, Vertex};
use rustc_hash::FxHashMap;

/// A triangle corner before welding.
pub(crate) type Corner = (Vec3, Vec2);

/// Collects triangles for one prim face.
///
/// Corners sharing position and UV are welded into one vertex. Normals are
/// area-weighted sums over every triangle touching the same position, so
/// UV seams do not break shading.
#[derive(Default)]
pub(crate) struct FaceBuilder {
    vertices: Vec<(Vec3, Vec2)>,
    indices: Vec<u32>,
    lookup: FxHashMap<[u32; 5], u32>,
    normals: FxHashMap<[u32; 3], Vec3>,
}

fn bits(v: Vec3) -> [u32; 3] {
    // adding zero folds -0.0 into 0.0
    [(v.x + 0.0).to_bits(), (v.y + 0.0).to_bits(), (v.z + 0.0).to_bits()]
}

fn coincide(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() <= VERTEX_EPSILON
}

impl FaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triangle; degenerate ones are dropped here.
    pub fn push_triangle(&mut self, corners: [Corner; 3]) {
        let [(a, _), (b, _), (c, _)] = corners;
        if coincide(a, b) || coincide(b, c) || coincide(a, c) {
            return;
        }
        let normal = (b - a).cross(c - a);
        for (position, uv) in corners {
            *self.normals.entry(bits(position)).or_insert(Vec3::ZERO) += normal;
            let index = self.vertex(position, uv);
            self.indices.push(index);
        }
    }

    fn vertex(&mut self, position: Vec3, uv: Vec2) -> u32 {
        let [x, y, z] = bits(position);
        let key = [x, y, z, (uv.x + 0.0).to_bits(), (uv.y + 0.0).to_bits()];
        *self.lookup.entry(key).or_insert_with(|| {
            self.vertices.push((position, uv));
            (self.vertices.len() - 1) as u32
        })
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolves normals and produces the face mesh.
    pub fn finish(self) -> SimpleMesh {
        let mut mesh = SimpleMesh::with_capacity(self.vertices.len(), self.indices.len() / 3);
        for (position, uv) in self.vertices {
            let normal = self
                .normals
                .get(&bits(position))
                .and_then(|n| n.try_normalize())
                .unwrap_or(Vec3::Z);
            mesh.push_vertex(Vertex::new(position, normal, uv));
        }
        for t in self.indices.chunks_exact(3) {
            mesh.push_triangle(Triangle::new(t[0], t[1], t[2]));
        }
        mesh
    }
}

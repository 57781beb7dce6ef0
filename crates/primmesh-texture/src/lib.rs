//! Per-vertex texture coordinate transforms.
//!
//! A face's UVs pass through two stages: an optional planar projection that
//! replaces the mesher's coordinates, then the generic rotate/repeat/offset
//! transform described by the face's [`TextureFace`].

use glam::{Vec2, Vec3};
use primmesh_types::{SimpleMesh, TexMapping, TextureFace};

// ---------------------------------------------------------------------------
// Planar projection
// ---------------------------------------------------------------------------

/// Projects `position` (scaled by the prim's `scale`) onto the plane of
/// `normal`.
///
/// Faces mostly facing X use the Y axis as binormal; all others use X. The
/// binormal sign follows the normal so opposite faces read the same way up.
pub fn planar_uv(position: Vec3, normal: Vec3, scale: Vec3) -> Vec2 {
    let binormal = if normal.x.abs() >= 0.5 {
        if normal.x < 0.0 { Vec3::NEG_Y } else { Vec3::Y }
    } else if normal.y > 0.0 {
        Vec3::NEG_X
    } else {
        Vec3::X
    };
    let tangent = binormal.cross(normal);
    let vec = position * scale;
    Vec2::new(
        1.0 + (binormal.dot(vec) * 2.0 - 0.5),
        -(tangent.dot(vec) * 2.0 - 0.5),
    )
}

// ---------------------------------------------------------------------------
// Generic transform
// ---------------------------------------------------------------------------

/// Rotation, repeat and offset of one face, with the trigonometry resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexTransform {
    cos: f32,
    sin: f32,
    repeat: Vec2,
    offset: Vec2,
}

impl Default for TexTransform {
    fn default() -> Self {
        Self::from_face(&TextureFace::default())
    }
}

impl TexTransform {
    pub fn from_face(face: &TextureFace) -> Self {
        let (sin, cos) = face.rotation.sin_cos();
        Self {
            cos,
            sin,
            repeat: Vec2::new(face.repeat_u, face.repeat_v),
            offset: Vec2::new(face.offset_u, face.offset_v),
        }
    }

    /// Rotates about the texture center, scales by the repeats, then offsets.
    pub fn apply(&self, uv: Vec2) -> Vec2 {
        let s = uv.x - 0.5;
        let t = uv.y - 0.5;
        let rotated = Vec2::new(s * self.cos + t * self.sin, -s * self.sin + t * self.cos);
        rotated * self.repeat + self.offset + Vec2::splat(0.5)
    }
}

/// Rewrites the UVs of every vertex in `mesh` according to `face`.
///
/// `scale` is the prim scale used by planar projection.
pub fn apply_texture_face(mesh: &mut SimpleMesh, face: &TextureFace, scale: Vec3) {
    if face.is_identity() {
        return;
    }
    let transform = TexTransform::from_face(face);
    for vertex in &mut mesh.vertices {
        let uv = match face.mapping {
            TexMapping::Planar => planar_uv(vertex.position(), vertex.normal(), scale),
            TexMapping::Default => vertex.uv(),
        };
        vertex.uv = transform.apply(uv).to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primmesh_types::{Triangle, Vertex};
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_planar_on_positive_x_face() {
        let uv = planar_uv(Vec3::splat(0.5), Vec3::X, Vec3::ONE);
        assert!(approx(uv, Vec2::new(1.5, 1.5)), "{uv}");
    }

    #[test]
    fn test_planar_binormal_selection() {
        // -X face flips the binormal to -Y
        let uv = planar_uv(Vec3::new(-0.5, 0.25, 0.0), Vec3::NEG_X, Vec3::ONE);
        assert!(approx(uv, Vec2::new(0.0, 0.5)), "{uv}");
        // +Z face uses X as binormal
        let uv = planar_uv(Vec3::new(0.25, 0.0, 0.5), Vec3::Z, Vec3::ONE);
        assert!(approx(uv, Vec2::new(1.0, 0.5)), "{uv}");
        // +Y face flips it to -X
        let uv = planar_uv(Vec3::new(0.25, 0.5, 0.0), Vec3::Y, Vec3::ONE);
        assert!(approx(uv, Vec2::new(0.0, 0.5)), "{uv}");
    }

    #[test]
    fn test_planar_uses_prim_scale() {
        let unscaled = planar_uv(Vec3::new(0.0, 0.0, 0.25), Vec3::Z, Vec3::ONE);
        let scaled = planar_uv(Vec3::new(0.25, 0.0, 0.0), Vec3::Z, Vec3::new(2.0, 1.0, 1.0));
        assert!(approx(unscaled, Vec2::new(0.5, 0.5)));
        assert!(approx(scaled, Vec2::new(1.5, 0.5)));
    }

    #[test]
    fn test_identity_transform() {
        let t = TexTransform::default();
        let uv = Vec2::new(0.3, 0.8);
        assert!(approx(t.apply(uv), uv));
    }

    #[test]
    fn test_repeat_offset_rotation() {
        let repeat = TexTransform::from_face(&TextureFace {
            repeat_u: 2.0,
            repeat_v: 3.0,
            offset_u: 0.1,
            ..Default::default()
        });
        assert!(approx(repeat.apply(Vec2::new(1.0, 1.0)), Vec2::new(1.6, 2.0)));

        let quarter = TexTransform::from_face(&TextureFace {
            rotation: FRAC_PI_2,
            ..Default::default()
        });
        // (0.5, 0) about the center turns to (0, -0.5)
        assert!(approx(quarter.apply(Vec2::new(1.0, 0.5)), Vec2::new(0.5, 0.0)));
    }

    #[test]
    fn test_apply_to_mesh() {
        let mut mesh = SimpleMesh::new();
        for (p, uv) in [(Vec3::ZERO, Vec2::ZERO), (Vec3::X, Vec2::X), (Vec3::Y, Vec2::Y)] {
            mesh.push_vertex(Vertex::new(p, Vec3::Z, uv));
        }
        mesh.push_triangle(Triangle::new(0, 1, 2));
        let before = mesh.clone();

        apply_texture_face(&mut mesh, &TextureFace::default(), Vec3::ONE);
        assert_eq!(mesh, before);

        let face = TextureFace {
            repeat_u: 2.0,
            ..Default::default()
        };
        apply_texture_face(&mut mesh, &face, Vec3::ONE);
        assert!(approx(mesh.vertices[1].uv(), Vec2::new(1.5, 0.0)));
        assert_eq!(mesh.vertices[0].position, before.vertices[0].position);
    }

    #[test]
    fn test_planar_mapping_replaces_uvs() {
        let mut mesh = SimpleMesh::new();
        mesh.push_vertex(Vertex::new(Vec3::splat(0.5), Vec3::X, Vec2::ZERO));
        let face = TextureFace {
            mapping: TexMapping::Planar,
            ..Default::default()
        };
        apply_texture_face(&mut mesh, &face, Vec3::ONE);
        assert!(approx(mesh.vertices[0].uv(), Vec2::new(1.5, 1.5)));
    }
}

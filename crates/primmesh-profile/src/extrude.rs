//! Sweeps a profile along a path into per-face triangle buffers.

use glam::{Vec2, Vec3};
use primmesh_types::{LevelOfDetail, ShapeParameters, SimpleMesh};
use tracing::debug;

use crate::face_builder::FaceBuilder;
use crate::faces::FaceLayout;
use crate::path::{PathNode, circular_path, linear_path};
use crate::profile::{Profile, ProfileParams, initial_rotation};

/// Extruded prim geometry, one mesh per prim face number.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimGeometry {
    /// Indexed by prim face number. A face may be empty when all of its
    /// triangles were degenerate.
    pub faces: Vec<SimpleMesh>,
}

impl PrimGeometry {
    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(SimpleMesh::is_empty)
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(SimpleMesh::triangle_count).sum()
    }

    pub fn face(&self, number: u32) -> Option<&SimpleMesh> {
        self.faces.get(number as usize)
    }
}

/// Whether a sweep needs top and bottom caps. Linear sweeps always do; a
/// circular sweep only when it does not close on itself.
pub fn needs_end_caps(shape: &ShapeParameters) -> bool {
    if !shape.path_curve.is_circular() {
        return true;
    }
    shape.path_begin != 0.0
        || shape.path_end != 1.0
        || shape.taper_x != 0.0
        || shape.taper_y != 0.0
        || shape.skew != 0.0
        || shape.twist_begin != shape.twist_end
        || shape.radius_offset != 0.0
}

/// Generates the profile, sweeps it and triangulates every prim face.
///
/// Degenerate shapes produce an empty [`PrimGeometry`].
pub fn extrude(shape: &ShapeParameters, lod: LevelOfDetail) -> PrimGeometry {
    let shape = shape.sanitized();
    if shape.is_degenerate() {
        debug!(?lod, "degenerate shape, nothing to extrude");
        return PrimGeometry::default();
    }

    let circular = shape.path_curve.is_circular();
    let params = ProfileParams::for_shape(&shape, lod);
    let mut profile = Profile::new(&params);
    if profile.is_empty() {
        debug!(?lod, "empty profile, nothing to extrude");
        return PrimGeometry::default();
    }
    profile.rotate(initial_rotation(params.sides, circular));

    let nodes = if circular {
        circular_path(&shape, lod.steps_per_revolution())
    } else {
        linear_path(&shape, lod.steps_per_revolution())
    };
    let layout = FaceLayout::new(&profile, needs_end_caps(&shape));
    let mut builders: Vec<FaceBuilder> = (0..layout.count()).map(|_| FaceBuilder::new()).collect();

    let layers: Vec<Vec<Vec3>> = nodes
        .iter()
        .map(|node| profile.coords.iter().map(|&p| node.transform(p)).collect())
        .collect();

    stitch_walls(&profile, &layout, &nodes, &layers, &mut builders);

    if let (Some(top), Some(layer)) = (layout.top(), layers.last()) {
        let builder = &mut builders[top as usize];
        for &[a, b, c] in &profile.cap {
            builder.push_triangle([
                cap_corner(&profile, layer, a, true),
                cap_corner(&profile, layer, b, true),
                cap_corner(&profile, layer, c, true),
            ]);
        }
    }
    if let (Some(bottom), Some(layer)) = (layout.bottom(), layers.first()) {
        let builder = &mut builders[bottom as usize];
        for &[a, b, c] in &profile.cap {
            builder.push_triangle([
                cap_corner(&profile, layer, a, false),
                cap_corner(&profile, layer, c, false),
                cap_corner(&profile, layer, b, false),
            ]);
        }
    }

    let geometry = PrimGeometry {
        faces: builders.into_iter().map(FaceBuilder::finish).collect(),
    };
    debug!(
        ?lod,
        faces = geometry.faces.len(),
        triangles = geometry.triangle_count(),
        "extruded prim"
    );
    geometry
}

/// Joins consecutive layers with two triangles per wall edge.
fn stitch_walls(
    profile: &Profile,
    layout: &FaceLayout,
    nodes: &[PathNode],
    layers: &[Vec<Vec3>],
    builders: &mut [FaceBuilder],
) {
    for (k, pair) in layers.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let v_prev = 1.0 - nodes[k].percent;
        let v_cur = 1.0 - nodes[k + 1].percent;
        for edge in &profile.edges {
            let (s, e) = (edge.start as usize, edge.end as usize);
            let [u_s, u_e] = edge.u;
            let a0 = (prev[s], Vec2::new(u_s, v_prev));
            let b0 = (prev[e], Vec2::new(u_e, v_prev));
            let a1 = (cur[s], Vec2::new(u_s, v_cur));
            let b1 = (cur[e], Vec2::new(u_e, v_cur));
            let builder = &mut builders[layout.wall(edge.face) as usize];
            builder.push_triangle([a1, a0, b1]);
            builder.push_triangle([b1, a0, b0]);
        }
    }
}

/// Cap corners project the unscaled profile; the bottom is mirrored in V so
/// it reads correctly from below.
fn cap_corner(profile: &Profile, layer: &[Vec3], index: u32, top: bool) -> (Vec3, Vec2) {
    let p = profile.coords[index as usize];
    let v = if top { 0.5 - p.y } else { 0.5 + p.y };
    (layer[index as usize], Vec2::new(0.5 + p.x, v))
}

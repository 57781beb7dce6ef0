//! Profile (cross-section) generation.

use glam::Vec2;
use primmesh_types::{HollowShape, LevelOfDetail, ProfileShape, ShapeParameters};

use crate::angles::{Angle, make_angles};

/// How the extruder treats a profile. Resolved once from the profile shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Regular,
    /// Half-circle profile: covers half a turn and is revolved into a sphere.
    Sphere,
}

/// Which prim face a wall edge belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeFace {
    /// Outer wall; the side ordinal for profiles of four sides or fewer, else 0.
    Outer(u32),
    Hollow,
    CutStart,
    CutEnd,
}

/// A boundary edge of the profile, swept into a wall strip by the extruder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileEdge {
    pub start: u32,
    pub end: u32,
    pub face: EdgeFace,
    /// Texture U at `start` and `end`.
    pub u: [f32; 2],
}

/// Inputs of [`Profile::new`], resolved from shape parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileParams {
    pub sides: usize,
    pub hollow_sides: usize,
    /// Turn fractions of the profile cut.
    pub begin: f32,
    pub end: f32,
    pub hollow: f32,
    pub kind: ProfileKind,
}

impl ProfileParams {
    pub fn for_shape(shape: &ShapeParameters, lod: LevelOfDetail) -> Self {
        let sides = profile_sides(shape.profile_shape, lod);
        let hollow_sides = match shape.hollow_shape {
            HollowShape::Same => sides,
            HollowShape::Circle => lod.circle_sides(),
            HollowShape::Square => 4,
            HollowShape::Triangle => 3,
        };
        let (kind, begin, end) = match shape.profile_shape {
            ProfileShape::HalfCircle => (
                ProfileKind::Sphere,
                0.5 * shape.profile_begin + 0.5,
                0.5 * shape.profile_end + 0.5,
            ),
            _ => (ProfileKind::Regular, shape.profile_begin, shape.profile_end),
        };
        let hollow = adjusted_hollow(
            sides,
            hollow_sides,
            shape.hollow,
            shape.path_curve.is_circular(),
        );
        Self {
            sides,
            hollow_sides,
            begin,
            end,
            hollow,
            kind,
        }
    }
}

/// Side count of the outer boundary.
pub fn profile_sides(shape: ProfileShape, lod: LevelOfDetail) -> usize {
    match shape {
        ProfileShape::Circle | ProfileShape::HalfCircle => lod.circle_sides(),
        ProfileShape::EquilateralTriangle => 3,
        ProfileShape::Square | ProfileShape::IsometricTriangle | ProfileShape::RightTriangle => 4,
    }
}

/// Rescales the hollow so the inner boundary stays inside the outer one when
/// the two have different side counts.
pub fn adjusted_hollow(sides: usize, hollow_sides: usize, hollow: f32, circular: bool) -> f32 {
    match sides {
        3 if hollow_sides == 4 => hollow.min(0.7) * 0.707,
        3 => hollow * 0.5,
        4 if hollow_sides != 4 => hollow * 0.707,
        4 => hollow,
        _ if hollow_sides == 4 && circular => hollow.min(0.7) * 1.414,
        _ if hollow_sides == 4 => hollow * 1.414,
        _ => hollow,
    }
}

/// Rotation applied to the profile before extrusion so corners and cuts line
/// up with the prim axes.
pub fn initial_rotation(sides: usize, circular: bool) -> f32 {
    use std::f32::consts::PI;
    match (sides, circular) {
        (4, true) => 0.25 * PI,
        (4, false) => 1.25 * PI,
        (_, true) => PI,
        (_, false) => 0.0,
    }
}

/// A 2-D cross-section ready for extrusion.
///
/// `coords` holds an optional center point, the outer boundary in turn order,
/// then the inner (hollow) boundary in reverse turn order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    pub coords: Vec<Vec2>,
    pub edges: Vec<ProfileEdge>,
    /// Cap triangulation, counter-clockwise seen from +Z.
    pub cap: Vec<[u32; 3]>,
    /// Number of distinct outer faces.
    pub outer_faces: u32,
    pub has_hollow: bool,
    pub has_cut: bool,
}

/// A ring point together with the turn fraction it was generated at.
#[derive(Clone, Copy)]
struct RingPoint {
    index: u32,
    turn: f32,
}

impl Profile {
    pub fn new(params: &ProfileParams) -> Self {
        let ProfileParams {
            sides,
            hollow_sides,
            begin,
            end,
            hollow,
            kind,
        } = *params;

        let span = end - begin;
        let has_cut = match kind {
            ProfileKind::Sphere => span < 0.4999,
            ProfileKind::Regular => span < 0.9999,
        };
        let closed = kind == ProfileKind::Regular && !has_cut;
        let has_hollow = hollow > 0.001;
        let simple = sides < 5 && !has_hollow && !has_cut;
        let scale = if sides == 4 { 0.707_107 } else { 0.5 };

        let outer_angles = make_angles(sides, begin, end);
        if outer_angles.len() < 2 {
            return Self::default();
        }
        let inner_angles = if !has_hollow {
            Vec::new()
        } else if hollow_sides == sides {
            outer_angles.clone()
        } else {
            make_angles(hollow_sides, begin, end)
        };

        let mut coords = Vec::new();
        let center = (!has_hollow && !simple).then(|| {
            coords.push(Vec2::ZERO);
            0u32
        });

        let outer = push_ring(&mut coords, &outer_angles, closed, scale, false);
        let inner = push_ring(&mut coords, &inner_angles, closed, scale * hollow, true);

        let mut profile = Self {
            coords,
            has_hollow,
            has_cut,
            ..Self::default()
        };

        // Outer walls.
        for (ordinal, pair) in outer.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            let face = if sides <= 4 {
                EdgeFace::Outer(ordinal as u32)
            } else {
                EdgeFace::Outer(0)
            };
            profile.edges.push(ProfileEdge {
                start: a.index,
                end: b.index,
                face,
                u: wall_u(a.turn, b.turn, sides, kind),
            });
        }
        profile.outer_faces = if sides <= 4 {
            (outer.len() - 1) as u32
        } else {
            1
        };

        // Hollow walls run against the turn order.
        for pair in inner.windows(2).rev() {
            let (a, b) = (pair[1], pair[0]);
            profile.edges.push(ProfileEdge {
                start: a.index,
                end: b.index,
                face: EdgeFace::Hollow,
                u: wall_u(a.turn, b.turn, hollow_sides, kind),
            });
        }

        // Walls closing an open boundary, through the hollow or the center.
        if !closed {
            let first = outer[0].index;
            let last = outer[outer.len() - 1].index;
            let (to_end, from_start) = match (inner.first(), inner.last(), center) {
                (Some(inner_first), Some(inner_last), _) => (inner_last.index, inner_first.index),
                (_, _, Some(center)) => (center, center),
                _ => (first, last),
            };
            let (end_face, start_face) = if has_cut {
                (EdgeFace::CutEnd, EdgeFace::CutStart)
            } else {
                (EdgeFace::Outer(0), EdgeFace::Outer(0))
            };
            profile.edges.push(ProfileEdge {
                start: last,
                end: to_end,
                face: end_face,
                u: [0.0, 1.0],
            });
            profile.edges.push(ProfileEdge {
                start: from_start,
                end: first,
                face: start_face,
                u: [1.0, 0.0],
            });
        }

        profile.cap = if let Some(center) = center {
            outer
                .windows(2)
                .map(|p| [center, p[0].index, p[1].index])
                .collect()
        } else if has_hollow {
            zip_cap(&outer, &inner)
        } else {
            let anchor = outer[0].index;
            outer[1..]
                .windows(2)
                .filter(|p| p[1].index != anchor)
                .map(|p| [anchor, p[0].index, p[1].index])
                .collect()
        };

        profile
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Rotates every point about the origin.
    pub fn rotate(&mut self, radians: f32) {
        if radians == 0.0 {
            return;
        }
        let rotation = Vec2::from_angle(radians);
        for p in &mut self.coords {
            *p = rotation.rotate(*p);
        }
    }
}

/// Pushes the ring points of `angles` and returns them in turn order. A closed
/// ring maps its final (closing) angle back onto the first point.
fn push_ring(
    coords: &mut Vec<Vec2>,
    angles: &[Angle],
    closed: bool,
    scale: f32,
    reversed: bool,
) -> Vec<RingPoint> {
    if angles.is_empty() {
        return Vec::new();
    }
    let unique = if closed { angles.len() - 1 } else { angles.len() };
    let start = coords.len() as u32;
    let slot = |k: usize| {
        let k = k % unique;
        if reversed { unique - 1 - k } else { k }
    };
    let mut points = vec![Vec2::ZERO; unique];
    for (k, a) in angles.iter().take(unique).enumerate() {
        points[slot(k)] = Vec2::new(a.x, a.y) * scale;
    }
    coords.extend(points);
    angles
        .iter()
        .enumerate()
        .map(|(k, a)| RingPoint {
            index: start + slot(k) as u32,
            turn: a.turn,
        })
        .collect()
}

/// Texture U along a wall edge between two turn fractions.
fn wall_u(from: f32, to: f32, sides: usize, kind: ProfileKind) -> [f32; 2] {
    if sides <= 4 {
        let n = sides as f32;
        let side = ((from + to) * 0.5 * n).floor();
        [from * n - side, to * n - side]
    } else {
        match kind {
            ProfileKind::Regular => [from, to],
            ProfileKind::Sphere => [(from - 0.5) * 2.0, (to - 0.5) * 2.0],
        }
    }
}

/// Triangulates the band between the outer and inner boundaries by walking
/// both in turn order.
fn zip_cap(outer: &[RingPoint], inner: &[RingPoint]) -> Vec<[u32; 3]> {
    let mut cap = Vec::with_capacity(outer.len() + inner.len());
    let (mut i, mut j) = (0, 0);
    while i + 1 < outer.len() || j + 1 < inner.len() {
        let advance_outer = j + 1 >= inner.len()
            || (i + 1 < outer.len() && outer[i + 1].turn <= inner[j + 1].turn);
        if advance_outer {
            cap.push([outer[i].index, outer[i + 1].index, inner[j].index]);
            i += 1;
        } else {
            cap.push([outer[i].index, inner[j + 1].index, inner[j].index]);
            j += 1;
        }
    }
    cap
}

#[cfg(test)]
mod tests {
    use super::*;
    use primmesh_types::PathCurve;

    fn params(sides: usize, begin: f32, end: f32, hollow: f32) -> ProfileParams {
        ProfileParams {
            sides,
            hollow_sides: sides,
            begin,
            end,
            hollow,
            kind: ProfileKind::Regular,
        }
    }

    fn signed_area(profile: &Profile) -> f32 {
        profile
            .cap
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (
                    profile.coords[a as usize],
                    profile.coords[b as usize],
                    profile.coords[c as usize],
                );
                0.5 * (b - a).perp_dot(c - a)
            })
            .sum()
    }

    #[test]
    fn test_simple_square_has_no_center() {
        let profile = Profile::new(&params(4, 0.0, 1.0, 0.0));
        assert_eq!(profile.coords.len(), 4);
        assert_eq!(profile.cap.len(), 2);
        assert_eq!(profile.edges.len(), 4);
        assert_eq!(profile.outer_faces, 4);
        assert!((signed_area(&profile) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_has_center_fan() {
        let profile = Profile::new(&params(24, 0.0, 1.0, 0.0));
        assert_eq!(profile.coords.len(), 25);
        assert_eq!(profile.coords[0], Vec2::ZERO);
        assert_eq!(profile.cap.len(), 24);
        assert_eq!(profile.outer_faces, 1);
        assert!(profile.cap.iter().all(|t| t[0] == 0));
        assert!(signed_area(&profile) > 0.7);
    }

    #[test]
    fn test_hollow_ring_is_reversed_and_capped() {
        let profile = Profile::new(&params(4, 0.0, 1.0, 0.5));
        assert_eq!(profile.coords.len(), 8);
        let hollow_edges = profile
            .edges
            .iter()
            .filter(|e| e.face == EdgeFace::Hollow)
            .count();
        assert_eq!(hollow_edges, 4);
        assert_eq!(profile.cap.len(), 8);
        assert!((signed_area(&profile) - 0.75).abs() < 1e-3);
    }

    #[test]
    fn test_cut_adds_walls_to_center() {
        let profile = Profile::new(&params(24, 0.25, 1.0, 0.0));
        assert!(profile.has_cut);
        let start = profile
            .edges
            .iter()
            .find(|e| e.face == EdgeFace::CutStart)
            .unwrap();
        let end = profile
            .edges
            .iter()
            .find(|e| e.face == EdgeFace::CutEnd)
            .unwrap();
        assert_eq!(start.start, 0);
        assert_eq!(end.end, 0);
    }

    #[test]
    fn test_hollow_cut_walls_join_rings() {
        let profile = Profile::new(&params(4, 0.0, 0.5, 0.3));
        let end = profile
            .edges
            .iter()
            .find(|e| e.face == EdgeFace::CutEnd)
            .unwrap();
        let a = profile.coords[end.start as usize];
        let b = profile.coords[end.end as usize];
        assert!((b.length() / a.length() - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_half_circle_resolves_to_sphere_kind() {
        let shape = ShapeParameters::sphere();
        let params = ProfileParams::for_shape(&shape, LevelOfDetail::Medium);
        assert_eq!(params.kind, ProfileKind::Sphere);
        assert_eq!((params.begin, params.end), (0.5, 1.0));
        let profile = Profile::new(&params);
        assert!(!profile.has_cut);
        assert_eq!(profile.coords.len(), 1 + 7);
    }

    #[test]
    fn test_hollow_adjustment_table() {
        assert!((adjusted_hollow(3, 4, 0.9, false) - 0.7 * 0.707).abs() < 1e-6);
        assert!((adjusted_hollow(3, 3, 0.5, false) - 0.25).abs() < 1e-6);
        assert!((adjusted_hollow(4, 24, 0.5, false) - 0.3535).abs() < 1e-6);
        assert!((adjusted_hollow(24, 4, 0.9, true) - 0.7 * 1.414).abs() < 1e-6);
        assert!((adjusted_hollow(24, 4, 0.5, false) - 0.707).abs() < 1e-6);
        assert_eq!(adjusted_hollow(24, 24, 0.5, false), 0.5);
    }

    #[test]
    fn test_side_counts() {
        let shape = ShapeParameters {
            hollow: 0.5,
            hollow_shape: HollowShape::Circle,
            path_curve: PathCurve::Line,
            ..Default::default()
        };
        let params = ProfileParams::for_shape(&shape, LevelOfDetail::Low);
        assert_eq!(params.sides, 4);
        assert_eq!(params.hollow_sides, 6);
        assert_eq!(profile_sides(ProfileShape::EquilateralTriangle, LevelOfDetail::High), 3);
    }

    #[test]
    fn test_rotation_turns_diamond_into_square() {
        let mut profile = Profile::new(&params(4, 0.0, 1.0, 0.0));
        profile.rotate(initial_rotation(4, false));
        for p in &profile.coords {
            assert!((p.x.abs() - 0.5).abs() < 1e-4);
            assert!((p.y.abs() - 0.5).abs() < 1e-4);
        }
    }
}

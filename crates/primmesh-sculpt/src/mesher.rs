//! Grid triangulation for sculpts and terrain.

use glam::{Vec2, Vec3};
use image::RgbImage;
use primmesh_types::{LevelOfDetail, SimpleMesh, Triangle, Vertex};
use tracing::debug;

use crate::error::SculptError;
use crate::grid::DisplacementGrid;
use crate::sculpt_type::{SculptParams, SculptType};

/// Meshes a decoded sculpt map.
pub fn mesh_sculpt(
    map: &RgbImage,
    params: SculptParams,
    lod: LevelOfDetail,
) -> Result<SimpleMesh, SculptError> {
    let grid = DisplacementGrid::from_image(map, lod, params.mirror)?;
    debug!(
        kind = ?params.kind,
        rows = grid.rows,
        cols = grid.cols,
        "meshing sculpt map"
    );
    Ok(mesh_grid(grid, params.kind, params.effective_invert()))
}

/// Meshes a height field as an open plane spanning `x_range` by `y_range`.
pub fn mesh_terrain(
    heights: &[f32],
    rows: usize,
    cols: usize,
    x_range: (f32, f32),
    y_range: (f32, f32),
) -> Result<SimpleMesh, SculptError> {
    let grid = DisplacementGrid::from_heights(heights, rows, cols, x_range, y_range)?;
    // Terrain rows run along +Y, so the flipped winding faces +Z.
    Ok(mesh_grid(grid, SculptType::Plane, true))
}

/// Stitches a grid into quads following `kind`'s topology.
pub fn mesh_grid(mut grid: DisplacementGrid, kind: SculptType, invert: bool) -> SimpleMesh {
    if kind.closes_seam() {
        grid.close_seam();
    }
    match kind {
        SculptType::Sphere => grid.collapse_poles(),
        SculptType::Torus => grid.close_rows(),
        SculptType::Plane | SculptType::Cylinder => {}
    }

    let (rows, cols) = (grid.rows, grid.cols);
    let u_span = (cols.max(2) - 1) as f32;
    let v_span = (rows.max(2) - 1) as f32;

    let mut mesh = SimpleMesh::with_capacity(rows * cols, 2 * rows * cols);
    for (i, &position) in grid.points.iter().enumerate() {
        let (row, col) = (i / cols, i % cols);
        let uv = Vec2::new(col as f32 / u_span, row as f32 / v_span);
        mesh.push_vertex(Vertex::new(position, Vec3::ZERO, uv));
    }

    for row in 1..rows {
        for col in 1..cols {
            let p4 = (row * cols + col) as u32;
            let p3 = p4 - 1;
            let p2 = p4 - cols as u32;
            let p1 = p3 - cols as u32;
            if invert {
                mesh.push_triangle(Triangle::new(p1, p4, p3));
                mesh.push_triangle(Triangle::new(p1, p2, p4));
            } else {
                mesh.push_triangle(Triangle::new(p1, p3, p4));
                mesh.push_triangle(Triangle::new(p1, p4, p2));
            }
        }
    }

    let dropped = mesh.drop_degenerate_triangles();
    if dropped > 0 {
        debug!(dropped, "dropped degenerate sculpt triangles");
    }
    compute_normals(&mut mesh, kind, rows, cols);
    mesh.prune_unused_vertices();
    mesh
}

/// Sums triangle normals per vertex, blends vertices that share a seam, and
/// normalizes.
fn compute_normals(mesh: &mut SimpleMesh, kind: SculptType, rows: usize, cols: usize) {
    let mut sums = vec![Vec3::ZERO; mesh.vertices.len()];
    for t in mesh.triangles() {
        let [a, b, c] = t.0.map(|i| mesh.vertices[i as usize].position());
        let normal = (b - a).cross(c - a);
        for i in t.0 {
            sums[i as usize] += normal;
        }
    }

    if kind.closes_seam() {
        for row in 0..rows {
            blend(&mut sums, &[row * cols, row * cols + cols - 1]);
        }
    }
    match kind {
        SculptType::Sphere => {
            let top: Vec<usize> = (0..cols).collect();
            let bottom: Vec<usize> = ((rows - 1) * cols..rows * cols).collect();
            blend(&mut sums, &top);
            blend(&mut sums, &bottom);
        }
        SculptType::Torus => {
            for col in 0..cols {
                blend(&mut sums, &[col, (rows - 1) * cols + col]);
            }
        }
        SculptType::Plane | SculptType::Cylinder => {}
    }

    for (vertex, sum) in mesh.vertices.iter_mut().zip(sums) {
        vertex.normal = sum.try_normalize().unwrap_or(Vec3::Z).to_array();
    }
}

/// Gives every listed vertex the summed normal of the group.
fn blend(sums: &mut [Vec3], group: &[usize]) {
    let total: Vec3 = group.iter().map(|&i| sums[i]).sum();
    for &i in group {
        sums[i] = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::f32::consts::TAU;

    /// A map whose pixels lie on a sphere of radius ~0.5 around the origin.
    fn sphere_map(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, y| {
            let u = x as f32 / (size - 1) as f32;
            let v = y as f32 / (size - 1) as f32;
            let (theta, phi) = (u * TAU, v * std::f32::consts::PI);
            let p = Vec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            ) * 0.5;
            let channel = |c: f32| ((c + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8;
            Rgb([channel(p.x), channel(p.y), channel(p.z)])
        })
    }

    #[test]
    fn test_plane_grid_counts() {
        let map = RgbImage::from_fn(4, 4, |x, y| Rgb([(x * 60) as u8, (y * 60) as u8, 128]));
        let mesh = mesh_sculpt(
            &map,
            SculptParams {
                kind: SculptType::Plane,
                ..Default::default()
            },
            LevelOfDetail::High,
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 2 * 3 * 3);
        let last = mesh.vertices[15].uv;
        assert_eq!(last, [1.0, 1.0]);
    }

    #[test]
    fn test_cylinder_closes_seam() {
        let map = RgbImage::from_fn(8, 8, |x, y| {
            let theta = x as f32 / 8.0 * TAU;
            let channel = |c: f32| ((c + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8;
            Rgb([
                channel(0.5 * theta.cos()),
                channel(0.5 * theta.sin()),
                (y * 32) as u8,
            ])
        });
        let mesh = mesh_grid(
            DisplacementGrid::from_image(&map, LevelOfDetail::High, false).unwrap(),
            SculptType::Cylinder,
            false,
        );
        assert_eq!(mesh.triangle_count(), 2 * 7 * 8);
    }

    #[test]
    fn test_sphere_has_no_degenerate_triangles_and_unit_normals() {
        let mesh = mesh_sculpt(&sphere_map(16), SculptParams::default(), LevelOfDetail::Medium).unwrap();
        assert!(!mesh.is_empty());
        assert!(mesh.triangles().all(|t| !t.is_degenerate(&mesh.vertices)));
        assert!(
            mesh.vertices
                .iter()
                .all(|v| (v.normal().length() - 1.0).abs() < 1e-4)
        );
    }

    #[test]
    fn test_invert_flips_winding() {
        let map = RgbImage::from_fn(3, 3, |x, y| Rgb([(x * 100) as u8, (y * 100) as u8, 128]));
        let plain = SculptParams {
            kind: SculptType::Plane,
            ..Default::default()
        };
        let inverted = SculptParams {
            invert: true,
            ..plain
        };
        let a = mesh_sculpt(&map, plain, LevelOfDetail::Low).unwrap();
        let b = mesh_sculpt(&map, inverted, LevelOfDetail::Low).unwrap();
        let na = a.vertices[4].normal();
        let nb = b.vertices[4].normal();
        assert!((na + nb).length() < 1e-5);
    }

    #[test]
    fn test_mirror_keeps_orientation() {
        let map = RgbImage::from_fn(3, 3, |x, y| Rgb([(x * 100) as u8, (y * 100) as u8, 128]));
        let plain = SculptParams {
            kind: SculptType::Plane,
            ..Default::default()
        };
        let mirrored = SculptParams {
            mirror: true,
            ..plain
        };
        let a = mesh_sculpt(&map, plain, LevelOfDetail::Low).unwrap();
        let b = mesh_sculpt(&map, mirrored, LevelOfDetail::Low).unwrap();
        assert!((a.vertices[4].normal().z - b.vertices[4].normal().z).abs() < 1e-5);
    }

    #[test]
    fn test_terrain_faces_up() {
        let heights = vec![0.0; 9];
        let mesh = mesh_terrain(&heights, 3, 3, (0.0, 256.0), (0.0, 256.0)).unwrap();
        assert_eq!(mesh.triangle_count(), 8);
        assert!(mesh.vertices.iter().all(|v| (v.normal() - Vec3::Z).length() < 1e-6));
        assert_eq!(mesh.vertices[8].position, [256.0, 256.0, 0.0]);
    }

    #[test]
    fn test_terrain_rejects_short_array() {
        let err = mesh_terrain(&[1.0, 2.0], 2, 2, (0.0, 1.0), (0.0, 1.0)).unwrap_err();
        assert!(matches!(err, SculptError::InvalidTerrain { len: 2, .. }));
    }
}

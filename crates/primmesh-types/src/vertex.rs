//! Interleaved mesh vertex shared by every mesher.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing vertex attributes.
pub const VERTEX_EPSILON: f32 = 1e-6;

/// A single mesh vertex, laid out for direct upload as an interleaved buffer.
///
/// Layout (32 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..24]` normal `[f32; 3]`, unit length once emitted
///   - `[24..32]` uv `[f32; 2]`
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct Vertex {
    /// Object-local position.
    pub position: [f32; 3],
    /// Vertex normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(Vertex, [u8; 32]);

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }

    /// True when position, normal and UV all match within [`VERTEX_EPSILON`].
    pub fn approx_eq(&self, other: &Self) -> bool {
        fn close<const N: usize>(a: &[f32; N], b: &[f32; N]) -> bool {
            a.iter().zip(b).all(|(x, y)| (x - y).abs() <= VERTEX_EPSILON)
        }
        close(&self.position, &other.position)
            && close(&self.normal, &other.normal)
            && close(&self.uv, &other.uv)
    }
}

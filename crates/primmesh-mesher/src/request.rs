//! Per-call meshing options.

use glam::Vec3;
use primmesh_types::{FaceTextures, LevelOfDetail};

use crate::output::OutputKind;

/// Options shared by every mesher entry point.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshRequest {
    pub lod: LevelOfDetail,
    pub output: OutputKind,
    /// Texture table consulted per face number.
    pub textures: FaceTextures,
    /// Object scale, used by planar texture mapping.
    pub scale: Vec3,
}

impl MeshRequest {
    pub fn new(lod: LevelOfDetail) -> Self {
        Self {
            lod,
            output: OutputKind::default(),
            textures: FaceTextures::default(),
            scale: Vec3::ONE,
        }
    }

    pub fn with_output(mut self, output: OutputKind) -> Self {
        self.output = output;
        self
    }

    pub fn with_textures(mut self, textures: FaceTextures) -> Self {
        self.textures = textures;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for MeshRequest {
    fn default() -> Self {
        Self::new(LevelOfDetail::default())
    }
}

/// A row-major height array laid out over an XY rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heightfield<'a> {
    pub heights: &'a [f32],
    pub rows: usize,
    pub cols: usize,
    pub x_range: (f32, f32),
    pub y_range: (f32, f32),
}

impl<'a> Heightfield<'a> {
    /// A square field spanning `0..size` on both axes.
    pub fn square(heights: &'a [f32], samples: usize, size: f32) -> Self {
        Self {
            heights,
            rows: samples,
            cols: samples,
            x_range: (0.0, size),
            y_range: (0.0, size),
        }
    }
}

//! Per-face texture descriptors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 16-byte texture asset identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub [u8; 16]);

impl TextureId {
    pub const NIL: TextureId = TextureId([0; 16]);
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// How texture coordinates are generated before the generic transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TexMapping {
    /// Use the mesher's UVs.
    #[default]
    Default,
    /// Project positions onto the face plane.
    Planar,
}

/// Texture settings of a single face.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureFace {
    pub texture_id: TextureId,
    pub repeat_u: f32,
    pub repeat_v: f32,
    pub offset_u: f32,
    pub offset_v: f32,
    /// Rotation in radians.
    pub rotation: f32,
    pub mapping: TexMapping,
}

impl Default for TextureFace {
    fn default() -> Self {
        Self {
            texture_id: TextureId::NIL,
            repeat_u: 1.0,
            repeat_v: 1.0,
            offset_u: 0.0,
            offset_v: 0.0,
            rotation: 0.0,
            mapping: TexMapping::Default,
        }
    }
}

impl TextureFace {
    /// True when applying this face leaves UVs unchanged.
    pub fn is_identity(&self) -> bool {
        self.mapping == TexMapping::Default
            && self.repeat_u == 1.0
            && self.repeat_v == 1.0
            && self.offset_u == 0.0
            && self.offset_v == 0.0
            && self.rotation == 0.0
    }
}

/// An object's texture table: a default entry plus sparse per-face overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceTextures {
    pub default: TextureFace,
    pub faces: BTreeMap<u32, TextureFace>,
}

impl FaceTextures {
    pub fn uniform(face: TextureFace) -> Self {
        Self {
            default: face,
            faces: BTreeMap::new(),
        }
    }

    /// Sets the override for face `number`.
    pub fn set(&mut self, number: u32, face: TextureFace) {
        self.faces.insert(number, face);
    }

    /// The override for `number`, else the default entry.
    pub fn for_face(&self, number: u32) -> TextureFace {
        self.faces.get(&number).copied().unwrap_or(self.default)
    }
}

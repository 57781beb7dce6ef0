//! Sculpt topology and flags as carried in the sculpt type byte.

/// How the sample grid is stitched into a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SculptType {
    /// Seam column closed, first and last rows collapsed to poles.
    #[default]
    Sphere,
    /// Seam column closed and last row joined to the first.
    Torus,
    /// Open grid.
    Plane,
    /// Seam column closed, rows left open.
    Cylinder,
}

impl SculptType {
    /// Whether the grid wraps around horizontally.
    pub fn closes_seam(self) -> bool {
        self != Self::Plane
    }
}

/// Topology plus mirror/invert flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SculptParams {
    pub kind: SculptType,
    /// Reflect X.
    pub mirror: bool,
    /// Flip triangle winding.
    pub invert: bool,
}

const INVERT_FLAG: u8 = 0x40;
const MIRROR_FLAG: u8 = 0x80;

impl SculptParams {
    /// Decodes the type byte: topology in the low three bits, `0x40` invert,
    /// `0x80` mirror. Unknown topologies mesh as spheres.
    pub fn from_byte(byte: u8) -> Self {
        let kind = match byte & 0x07 {
            2 => SculptType::Torus,
            3 => SculptType::Plane,
            4 => SculptType::Cylinder,
            _ => SculptType::Sphere,
        };
        Self {
            kind,
            mirror: byte & MIRROR_FLAG != 0,
            invert: byte & INVERT_FLAG != 0,
        }
    }

    pub fn to_byte(self) -> u8 {
        let kind = match self.kind {
            SculptType::Sphere => 1,
            SculptType::Torus => 2,
            SculptType::Plane => 3,
            SculptType::Cylinder => 4,
        };
        let mut byte = kind;
        if self.invert {
            byte |= INVERT_FLAG;
        }
        if self.mirror {
            byte |= MIRROR_FLAG;
        }
        byte
    }

    /// Winding actually used: mirroring reverses handedness, so it toggles invert.
    pub fn effective_invert(self) -> bool {
        self.invert != self.mirror
    }
}

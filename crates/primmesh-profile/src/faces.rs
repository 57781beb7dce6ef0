//! Prim face numbering.

use crate::profile::{EdgeFace, Profile};

/// Maps profile edges and caps to prim face numbers.
///
/// Order: top, outer face(s), hollow, bottom, cut start, cut end. Without end
/// caps every number shifts down by one and no cap faces exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceLayout {
    caps: bool,
    outer: u32,
    hollow: bool,
    cut: bool,
}

impl FaceLayout {
    pub fn new(profile: &Profile, caps: bool) -> Self {
        Self {
            caps,
            outer: profile.outer_faces.max(1),
            hollow: profile.has_hollow,
            cut: profile.has_cut,
        }
    }

    fn first_side(&self) -> u32 {
        u32::from(self.caps)
    }

    pub fn top(&self) -> Option<u32> {
        self.caps.then_some(0)
    }

    pub fn outer(&self, side: u32) -> u32 {
        self.first_side() + side.min(self.outer - 1)
    }

    pub fn hollow(&self) -> Option<u32> {
        self.hollow.then(|| self.first_side() + self.outer)
    }

    pub fn bottom(&self) -> Option<u32> {
        self.caps
            .then(|| self.first_side() + self.outer + u32::from(self.hollow))
    }

    pub fn cut_start(&self) -> Option<u32> {
        self.cut.then(|| {
            self.first_side() + self.outer + u32::from(self.hollow) + u32::from(self.caps)
        })
    }

    pub fn cut_end(&self) -> Option<u32> {
        self.cut_start().map(|n| n + 1)
    }

    /// Total number of faces.
    pub fn count(&self) -> u32 {
        2 * u32::from(self.caps) + self.outer + u32::from(self.hollow) + 2 * u32::from(self.cut)
    }

    /// Face number of a wall edge. Hollow and cut edges only occur when the
    /// profile has them, so the fallbacks are never taken for real profiles.
    pub fn wall(&self, face: EdgeFace) -> u32 {
        match face {
            EdgeFace::Outer(side) => self.outer(side),
            EdgeFace::Hollow => self.hollow().unwrap_or_else(|| self.outer(0)),
            EdgeFace::CutStart => self.cut_start().unwrap_or_else(|| self.outer(0)),
            EdgeFace::CutEnd => self.cut_end().unwrap_or_else(|| self.outer(0)),
        }
    }
}

//! Discrete resolution tiers and the tables they drive.

use serde::{Deserialize, Serialize};

/// Resolution tier for generated geometry, finest first.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LevelOfDetail {
    #[default]
    Highest,
    High,
    Medium,
    Low,
}

impl LevelOfDetail {
    /// All tiers, finest first.
    pub const ALL: [LevelOfDetail; 4] = [Self::Highest, Self::High, Self::Medium, Self::Low];

    /// Number of sides used for circular profiles.
    pub fn circle_sides(self) -> usize {
        match self {
            Self::Highest | Self::High => 24,
            Self::Medium => 12,
            Self::Low => 6,
        }
    }

    /// Path subdivisions per full revolution.
    pub fn steps_per_revolution(self) -> usize {
        match self {
            Self::Highest | Self::High => 24,
            Self::Medium => 12,
            Self::Low => 6,
        }
    }

    /// Sculpt grid resolution along each axis.
    pub fn sculpt_resolution(self) -> usize {
        match self {
            Self::Highest | Self::High => 32,
            Self::Medium => 16,
            Self::Low => 8,
        }
    }

    /// The next coarser tier, if any.
    pub fn coarser(self) -> Option<Self> {
        match self {
            Self::Highest => Some(Self::High),
            Self::High => Some(Self::Medium),
            Self::Medium => Some(Self::Low),
            Self::Low => None,
        }
    }
}

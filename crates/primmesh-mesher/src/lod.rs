//! Distance-based level-of-detail selection.

use primmesh_config::LodConfig;
use primmesh_types::LevelOfDetail;
use tracing::warn;

/// Picks a [`LevelOfDetail`] from how far away an object is relative to its
/// size.
#[derive(Clone, Debug, PartialEq)]
pub struct LodSelector {
    /// `thresholds[i]` is the distance/radius ratio below which tier `i` of
    /// [`LevelOfDetail::ALL`] is used.
    thresholds: [f32; 3],
}

impl Default for LodSelector {
    fn default() -> Self {
        Self {
            thresholds: LodConfig::default().thresholds,
        }
    }
}

impl LodSelector {
    /// Uses `thresholds` when they are positive and strictly increasing;
    /// otherwise logs and falls back to the defaults.
    pub fn new(thresholds: [f32; 3]) -> Self {
        let valid = thresholds.iter().all(|t| t.is_finite() && *t > 0.0)
            && thresholds.windows(2).all(|w| w[0] < w[1]);
        if !valid {
            warn!(?thresholds, "invalid LOD thresholds, using defaults");
            return Self::default();
        }
        Self { thresholds }
    }

    pub fn from_config(config: &LodConfig) -> Self {
        Self::new(config.thresholds)
    }

    pub fn thresholds(&self) -> [f32; 3] {
        self.thresholds
    }

    /// Tier for an object of bounding `radius` seen from `distance`.
    pub fn select(&self, distance: f32, radius: f32) -> LevelOfDetail {
        let ratio = distance.max(0.0) / radius.max(f32::EPSILON);
        for (i, &threshold) in self.thresholds.iter().enumerate() {
            if ratio < threshold {
                return LevelOfDetail::ALL[i];
            }
        }
        LevelOfDetail::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> LodSelector {
        LodSelector::new([10.0, 20.0, 40.0])
    }

    #[test]
    fn test_close_objects_get_full_detail() {
        assert_eq!(selector().select(0.0, 1.0), LevelOfDetail::Highest);
        assert_eq!(selector().select(9.9, 1.0), LevelOfDetail::Highest);
    }

    #[test]
    fn test_threshold_boundaries() {
        let s = selector();
        assert_eq!(s.select(10.0, 1.0), LevelOfDetail::High);
        assert_eq!(s.select(20.0, 1.0), LevelOfDetail::Medium);
        assert_eq!(s.select(40.0, 1.0), LevelOfDetail::Low);
        assert_eq!(s.select(f32::MAX, 1.0), LevelOfDetail::Low);
    }

    #[test]
    fn test_larger_objects_keep_detail_longer() {
        let s = selector();
        assert_eq!(s.select(30.0, 1.0), LevelOfDetail::Medium);
        assert_eq!(s.select(30.0, 4.0), LevelOfDetail::Highest);
    }

    #[test]
    fn test_monotonic_in_distance() {
        let s = selector();
        let tiers: Vec<_> = [0.0, 5.0, 15.0, 25.0, 50.0, 500.0]
            .iter()
            .map(|&d| s.select(d, 1.0))
            .collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_invalid_thresholds_fall_back() {
        assert_eq!(LodSelector::new([5.0, 5.0, 10.0]), LodSelector::default());
        assert_eq!(LodSelector::new([-1.0, 5.0, 10.0]), LodSelector::default());
        assert_eq!(LodSelector::new([1.0, 2.0, f32::NAN]), LodSelector::default());
    }

    #[test]
    fn test_zero_radius_is_far() {
        assert_eq!(selector().select(1.0, 0.0), LevelOfDetail::Low);
    }
}

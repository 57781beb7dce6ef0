//! 16-bit quantized attribute streams.
//!
//! Positions, normals and texture coordinates are stored as little-endian
//! `u16` components spread linearly over a per-record domain.

use glam::{Vec2, Vec3};

const STEPS: f32 = 65535.0;

/// Maps `value` from `0..=65535` linearly onto `min..=max`.
pub fn dequantize(value: u16, min: f32, max: f32) -> f32 {
    min + f32::from(value) / STEPS * (max - min)
}

/// Nearest quantized step for `value` within `min..=max`.
pub fn quantize(value: f32, min: f32, max: f32) -> u16 {
    let range = max - min;
    if range == 0.0 || !value.is_finite() {
        return 0;
    }
    ((value - min) / range * STEPS).round().clamp(0.0, STEPS) as u16
}

/// Decodes little-endian `u16` values. A trailing odd byte is ignored.
pub fn read_u16s(bytes: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
}

pub fn write_u16s(values: impl IntoIterator<Item = u16>) -> Vec<u8> {
    values.into_iter().flat_map(u16::to_le_bytes).collect()
}

/// Axis-aligned range a 3-component stream is spread over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Domain3 {
    /// The default position domain.
    pub const UNIT: Self = Self {
        min: Vec3::splat(-0.5),
        max: Vec3::splat(0.5),
    };

    /// Normals span the full unit cube.
    pub const NORMAL: Self = Self {
        min: Vec3::NEG_ONE,
        max: Vec3::ONE,
    };

    /// Smallest domain holding every point; the unit domain when empty.
    pub fn bounding(points: &[Vec3]) -> Self {
        let Some(&first) = points.first() else {
            return Self::UNIT;
        };
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Self { min, max }
    }

    pub fn decode(&self, q: [u16; 3]) -> Vec3 {
        Vec3::new(
            dequantize(q[0], self.min.x, self.max.x),
            dequantize(q[1], self.min.y, self.max.y),
            dequantize(q[2], self.min.z, self.max.z),
        )
    }

    pub fn encode(&self, v: Vec3) -> [u16; 3] {
        [
            quantize(v.x, self.min.x, self.max.x),
            quantize(v.y, self.min.y, self.max.y),
            quantize(v.z, self.min.z, self.max.z),
        ]
    }

    /// Decodes a packed stream of triplets; `None` when its length is not a
    /// whole number of triplets.
    pub fn decode_stream(&self, bytes: &[u8]) -> Option<Vec<Vec3>> {
        if bytes.len() % 6 != 0 {
            return None;
        }
        let values: Vec<u16> = read_u16s(bytes).collect();
        Some(
            values
                .chunks_exact(3)
                .map(|c| self.decode([c[0], c[1], c[2]]))
                .collect(),
        )
    }

    pub fn encode_stream(&self, points: &[Vec3]) -> Vec<u8> {
        write_u16s(points.iter().flat_map(|&p| self.encode(p)))
    }
}

/// Range a 2-component stream is spread over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Domain2 {
    /// The default texture coordinate domain.
    pub const UNIT: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };

    pub fn bounding(points: &[Vec2]) -> Self {
        let Some(&first) = points.first() else {
            return Self::UNIT;
        };
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Self { min, max }
    }

    pub fn decode_stream(&self, bytes: &[u8]) -> Option<Vec<Vec2>> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        let values: Vec<u16> = read_u16s(bytes).collect();
        Some(
            values
                .chunks_exact(2)
                .map(|c| {
                    Vec2::new(
                        dequantize(c[0], self.min.x, self.max.x),
                        dequantize(c[1], self.min.y, self.max.y),
                    )
                })
                .collect(),
        )
    }

    pub fn encode_stream(&self, points: &[Vec2]) -> Vec<u8> {
        write_u16s(points.iter().flat_map(|p| {
            [
                quantize(p.x, self.min.x, self.max.x),
                quantize(p.y, self.min.y, self.max.y),
            ]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(dequantize(0, -0.5, 0.5), -0.5);
        assert_eq!(dequantize(65535, -0.5, 0.5), 0.5);
        assert_eq!(dequantize(0, 2.0, 4.0), 2.0);
    }

    #[test]
    fn test_midpoint_steps_are_not_zeroed() {
        // 32767/65535 lands a hair below the midpoint
        let below = dequantize(32767, -1.0, 1.0);
        let above = dequantize(32768, -1.0, 1.0);
        assert!(below < 0.0 && below > -2.0e-5);
        assert!(above > 0.0 && above < 2.0e-5);
    }

    #[test]
    fn test_near_zero_within_half_step() {
        let half_step = 0.5 * 2.0 / 65535.0;
        for value in [1.6e-5, -1.6e-5, 7.0e-6, 2.5e-5, -4.0e-5, 0.0] {
            let q = quantize(value, -1.0, 1.0);
            let error = (dequantize(q, -1.0, 1.0) - value).abs();
            assert!(error <= half_step + 1e-7, "{value} decoded {error} away");
        }
    }

    #[test]
    fn test_quantize_is_nearest_step() {
        assert_eq!(quantize(-0.5, -0.5, 0.5), 0);
        assert_eq!(quantize(0.5, -0.5, 0.5), 65535);
        assert_eq!(quantize(9.0, -0.5, 0.5), 65535);
        assert_eq!(quantize(1.0, 1.0, 1.0), 0);
        let q = quantize(0.123, -1.0, 1.0);
        assert!((dequantize(q, -1.0, 1.0) - 0.123).abs() <= 1.0 / 65535.0 + 1e-7);
    }

    #[test]
    fn test_little_endian_stream() {
        let bytes = write_u16s([0x0102, 0xFFFE]);
        assert_eq!(bytes, vec![0x02, 0x01, 0xFE, 0xFF]);
        assert_eq!(read_u16s(&bytes).collect::<Vec<_>>(), vec![0x0102, 0xFFFE]);
    }

    #[test]
    fn test_stream_length_must_be_whole_triplets() {
        assert!(Domain3::UNIT.decode_stream(&[0; 7]).is_none());
        assert_eq!(Domain3::UNIT.decode_stream(&[0; 12]).unwrap().len(), 2);
        assert!(Domain2::UNIT.decode_stream(&[0; 6]).is_none());
    }

    #[test]
    fn test_bounding_domain() {
        let d = Domain3::bounding(&[Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 0.5)]);
        assert_eq!(d.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(d.max, Vec3::new(1.0, 3.0, 0.5));
        assert_eq!(Domain3::bounding(&[]), Domain3::UNIT);
    }
}

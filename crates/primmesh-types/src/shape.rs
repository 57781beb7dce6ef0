//! Parametric prim shape description and conversion from the quantized wire form.

use serde::{Deserialize, Serialize};

/// Cross-section curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileShape {
    Circle,
    #[default]
    Square,
    IsometricTriangle,
    EquilateralTriangle,
    RightTriangle,
    HalfCircle,
}

impl ProfileShape {
    /// Decodes the low bits of the profile curve byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte & 0x07 {
            0 => Some(Self::Circle),
            1 => Some(Self::Square),
            2 => Some(Self::IsometricTriangle),
            3 => Some(Self::EquilateralTriangle),
            4 => Some(Self::RightTriangle),
            5 => Some(Self::HalfCircle),
            _ => None,
        }
    }
}

/// Shape of the hollow cut out of the profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HollowShape {
    /// Follows the profile shape.
    #[default]
    Same,
    Circle,
    Square,
    Triangle,
}

impl HollowShape {
    /// Decodes the high nibble of the profile curve byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte & 0xF0 {
            0x00 => Some(Self::Same),
            0x10 => Some(Self::Circle),
            0x20 => Some(Self::Square),
            0x30 => Some(Self::Triangle),
            _ => None,
        }
    }
}

/// Sweep curve the profile is extruded along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathCurve {
    #[default]
    Line,
    Circle,
    Circle2,
    Test,
    Flexible,
}

impl PathCurve {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x10 => Some(Self::Line),
            0x20 => Some(Self::Circle),
            0x30 => Some(Self::Circle2),
            0x40 => Some(Self::Test),
            0x80 => Some(Self::Flexible),
            _ => None,
        }
    }

    /// Circle, circle2 and test sweep around an axis; line and flexible run straight.
    pub fn is_circular(self) -> bool {
        matches!(self, Self::Circle | Self::Circle2 | Self::Test)
    }
}

/// Normalized shape parameters of a prim.
///
/// Fractions are in `[0, 1]`, twists in fractional turns. See
/// [`ShapeParameters::sanitized`] for the accepted range of every field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParameters {
    pub profile_shape: ProfileShape,
    pub hollow_shape: HollowShape,
    pub profile_begin: f32,
    pub profile_end: f32,
    pub hollow: f32,

    pub path_curve: PathCurve,
    pub path_begin: f32,
    pub path_end: f32,
    /// Top size on linear paths, hole size on circular paths.
    pub scale_x: f32,
    pub scale_y: f32,
    /// Explicit taper, used by circular paths.
    pub taper_x: f32,
    pub taper_y: f32,
    pub twist_begin: f32,
    pub twist_end: f32,
    pub top_shear_x: f32,
    pub top_shear_y: f32,
    pub radius_offset: f32,
    pub revolutions: f32,
    pub skew: f32,
}

impl Default for ShapeParameters {
    /// A unit box.
    fn default() -> Self {
        Self {
            profile_shape: ProfileShape::Square,
            hollow_shape: HollowShape::Same,
            profile_begin: 0.0,
            profile_end: 1.0,
            hollow: 0.0,
            path_curve: PathCurve::Line,
            path_begin: 0.0,
            path_end: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            taper_x: 0.0,
            taper_y: 0.0,
            twist_begin: 0.0,
            twist_end: 0.0,
            top_shear_x: 0.0,
            top_shear_y: 0.0,
            radius_offset: 0.0,
            revolutions: 1.0,
            skew: 0.0,
        }
    }
}

/// Largest accepted hollow fraction.
pub const MAX_HOLLOW: f32 = 0.95;

impl ShapeParameters {
    pub fn cylinder() -> Self {
        Self {
            profile_shape: ProfileShape::Circle,
            ..Self::default()
        }
    }

    pub fn sphere() -> Self {
        Self {
            profile_shape: ProfileShape::HalfCircle,
            path_curve: PathCurve::Circle,
            ..Self::default()
        }
    }

    pub fn torus() -> Self {
        Self {
            profile_shape: ProfileShape::Circle,
            path_curve: PathCurve::Circle,
            scale_y: 0.25,
            ..Self::default()
        }
    }

    /// Converts the quantized fields a prim update carries.
    pub fn from_wire(wire: &WireShape) -> Self {
        const CUT_QUANTA: f32 = 2.0e-5;
        const BYTE_QUANTA: f32 = 0.01;

        Self {
            profile_shape: ProfileShape::from_byte(wire.profile_curve).unwrap_or_default(),
            hollow_shape: HollowShape::from_byte(wire.profile_curve).unwrap_or_default(),
            profile_begin: f32::from(wire.profile_begin) * CUT_QUANTA,
            profile_end: 1.0 - f32::from(wire.profile_end) * CUT_QUANTA,
            hollow: (f32::from(wire.profile_hollow) * CUT_QUANTA).min(MAX_HOLLOW),
            path_curve: PathCurve::from_byte(wire.path_curve).unwrap_or_default(),
            path_begin: f32::from(wire.path_begin) * CUT_QUANTA,
            path_end: 1.0 - f32::from(wire.path_end) * CUT_QUANTA,
            scale_x: (200.0 - f32::from(wire.path_scale_x)) * BYTE_QUANTA,
            scale_y: (200.0 - f32::from(wire.path_scale_y)) * BYTE_QUANTA,
            taper_x: f32::from(wire.path_taper_x) * BYTE_QUANTA,
            taper_y: f32::from(wire.path_taper_y) * BYTE_QUANTA,
            twist_begin: f32::from(wire.path_twist_begin) * BYTE_QUANTA,
            twist_end: f32::from(wire.path_twist) * BYTE_QUANTA,
            top_shear_x: f32::from(wire.path_shear_x) * BYTE_QUANTA,
            top_shear_y: f32::from(wire.path_shear_y) * BYTE_QUANTA,
            radius_offset: f32::from(wire.path_radius_offset) * BYTE_QUANTA,
            revolutions: 1.0 + f32::from(wire.path_revolutions) * 0.015,
            skew: f32::from(wire.path_skew) * BYTE_QUANTA,
        }
    }

    /// Clamps every field into its accepted range. NaN falls back to the
    /// default value of the field.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            profile_begin: clamp_or(self.profile_begin, 0.0, 1.0, d.profile_begin),
            profile_end: clamp_or(self.profile_end, 0.0, 1.0, d.profile_end),
            hollow: clamp_or(self.hollow, 0.0, MAX_HOLLOW, d.hollow),
            path_begin: clamp_or(self.path_begin, 0.0, 1.0, d.path_begin),
            path_end: clamp_or(self.path_end, 0.0, 1.0, d.path_end),
            scale_x: clamp_or(self.scale_x, 0.0, 2.0, d.scale_x),
            scale_y: clamp_or(self.scale_y, 0.0, 2.0, d.scale_y),
            taper_x: clamp_or(self.taper_x, -1.0, 1.0, d.taper_x),
            taper_y: clamp_or(self.taper_y, -1.0, 1.0, d.taper_y),
            twist_begin: clamp_or(self.twist_begin, -1.0, 1.0, d.twist_begin),
            twist_end: clamp_or(self.twist_end, -1.0, 1.0, d.twist_end),
            top_shear_x: clamp_or(self.top_shear_x, -0.5, 0.5, d.top_shear_x),
            top_shear_y: clamp_or(self.top_shear_y, -0.5, 0.5, d.top_shear_y),
            radius_offset: clamp_or(self.radius_offset, -1.0, 1.0, d.radius_offset),
            revolutions: clamp_or(self.revolutions, 1.0, 4.0, d.revolutions),
            skew: clamp_or(self.skew, -1.0, 1.0, d.skew),
            ..*self
        }
    }

    /// True when the shape has zero extent: an empty profile or path cut, or a
    /// circular path whose hole size is zero on both axes.
    pub fn is_degenerate(&self) -> bool {
        self.profile_begin >= self.profile_end
            || self.path_begin >= self.path_end
            || (self.path_curve.is_circular() && self.scale_x <= 0.0 && self.scale_y <= 0.0)
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// The quantized shape block as transmitted by the virtual world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireShape {
    pub path_curve: u8,
    /// Profile shape in the low bits, hollow shape in the high nibble.
    pub profile_curve: u8,
    /// 1/50000ths.
    pub path_begin: u16,
    /// 1/50000ths, measured back from the end.
    pub path_end: u16,
    pub path_scale_x: u8,
    pub path_scale_y: u8,
    pub path_shear_x: i8,
    pub path_shear_y: i8,
    pub path_twist: i8,
    pub path_twist_begin: i8,
    pub path_radius_offset: i8,
    pub path_taper_x: i8,
    pub path_taper_y: i8,
    pub path_revolutions: u8,
    pub path_skew: i8,
    pub profile_begin: u16,
    pub profile_end: u16,
    pub profile_hollow: u16,
}

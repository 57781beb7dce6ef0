//! Path node generation for linear and circular sweeps.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};
use primmesh_types::ShapeParameters;

/// One layer of the sweep: where and how the profile is placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathNode {
    pub position: Vec3,
    pub rotation: Quat,
    /// Profile scale along local X/Y.
    pub scale: Vec2,
    /// Position along the full (uncut) path, `0.0..=1.0`.
    pub percent: f32,
}

impl PathNode {
    /// Places profile points: scale, then rotate, then translate.
    pub fn transform(&self, point: Vec2) -> Vec3 {
        self.position + self.rotation * (point * self.scale).extend(0.0)
    }
}

/// Nodes of a straight sweep from z = -0.5 to z = +0.5.
pub fn linear_path(shape: &ShapeParameters, steps: usize) -> Vec<PathNode> {
    let twist_begin = shape.twist_begin * PI;
    let twist_total = (shape.twist_end - shape.twist_begin) * PI;
    let mut steps = steps.max(1);
    if twist_total.abs() > 0.01 {
        steps += (twist_total.abs() * 3.66) as usize;
    }

    let taper_x = (1.0 - shape.scale_x).clamp(-0.999, 0.999);
    let taper_y = (1.0 - shape.scale_y).clamp(-0.999, 0.999);
    let length = shape.path_end - shape.path_begin;

    (0..=steps)
        .map(|i| {
            let percent = shape.path_begin + length * (i as f32 / steps as f32);
            PathNode {
                position: Vec3::new(
                    shape.top_shear_x * percent,
                    shape.top_shear_y * percent,
                    percent - 0.5,
                ),
                rotation: Quat::from_rotation_z(twist_begin + twist_total * percent),
                scale: Vec2::new(taper_scale(taper_x, percent), taper_scale(taper_y, percent)),
                percent,
            }
        })
        .collect()
}

/// Shrinks toward the top for positive taper and toward the bottom for negative.
fn taper_scale(taper: f32, percent: f32) -> f32 {
    if taper > 0.0 {
        1.0 - percent * taper
    } else if taper < 0.0 {
        1.0 + (1.0 - percent) * taper
    } else {
        1.0
    }
}

/// Nodes of a sweep around the X axis.
pub fn circular_path(shape: &ShapeParameters, steps_per_revolution: usize) -> Vec<PathNode> {
    let twist_begin = shape.twist_begin * TAU;
    let twist_total = (shape.twist_end - shape.twist_begin) * TAU;
    let mut steps = steps_per_revolution.max(3);
    if twist_total.abs() > 0.01 {
        if twist_total.abs() > 1.5 * PI {
            steps *= 2;
        }
        if twist_total.abs() > 3.0 * PI {
            steps *= 2;
        }
    }

    let hole_x = shape.scale_x.clamp(0.0, 1.0);
    let hole_y = shape.scale_y.clamp(0.0, 1.0);
    let revolutions = shape.revolutions;
    let (shear_x, shear_y) = (shape.top_shear_x, shape.top_shear_y);

    let y_path_scale = hole_y * 0.5;
    let path_length = shape.path_end - shape.path_begin;
    let total_skew = shape.skew * 2.0 * path_length;
    let skew_start = shape.path_begin * 2.0 * shape.skew - shape.skew;
    let x_shear_factor = shear_x * (0.25 + 0.5 * (0.5 - hole_y));
    let y_shear_compensation = 1.0 + shear_y.abs() * 0.25;

    let start_angle = TAU * shape.path_begin * revolutions - shear_y * 0.9;
    let end_angle = TAU * shape.path_end * revolutions - shear_y * 0.9;
    let step_size = TAU / steps as f32;
    let angle_span = end_angle - start_angle;

    let mut nodes = Vec::new();
    let mut step = (start_angle / step_size) as i32;
    let mut angle = start_angle;
    loop {
        let percent = angle / (TAU * revolutions);
        let percent_of_angles = if angle_span > 0.0 {
            (angle - start_angle) / angle_span
        } else {
            0.0
        };

        let mut scale = Vec2::new((1.0 - shape.skew.abs()) * hole_x, hole_y);
        if shape.taper_x.abs() > 0.01 {
            scale.x *= taper_scale(shape.taper_x, percent);
        }
        if shape.taper_y.abs() > 0.01 {
            scale.y *= taper_scale(shape.taper_y, percent);
        }

        let radius = shape.radius_offset;
        let radius_scale = if radius > 0.001 {
            1.0 - radius * percent
        } else if radius < -0.001 {
            1.0 + radius * (1.0 - percent)
        } else {
            1.0
        };
        let sweep_radius = (0.5 - y_path_scale) * radius_scale;

        let twist = twist_begin + twist_total * percent;
        let mut rotation = Quat::from_rotation_x(angle + shear_y);
        if twist != 0.0 {
            rotation *= Quat::from_rotation_z(twist);
        }

        nodes.push(PathNode {
            position: Vec3::new(
                0.5 * (skew_start + total_skew * percent_of_angles) + angle.sin() * x_shear_factor,
                y_shear_compensation * angle.cos() * sweep_radius,
                (angle + shear_y).sin() * sweep_radius,
            ),
            rotation,
            scale,
            percent,
        });

        if angle >= end_angle - 0.01 {
            break;
        }
        step += 1;
        angle = (step_size * step as f32).min(end_angle);
    }
    nodes
}

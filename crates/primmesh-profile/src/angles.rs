//! Unit-circle angle lists for profile generation.
//!
//! Angles are expressed as fractions of a full turn. Three, four and
//! twenty-four sides come from exact tables whose cut ends are interpolated
//! linearly; any other side count is stepped around the circle and its cut
//! ends are placed where the cut ray crosses the polygon edge.

use std::f32::consts::TAU;

/// A point on the unit polygon and the turn fraction it sits at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Angle {
    /// Fraction of a full turn, `0.0..=1.0`.
    pub turn: f32,
    pub x: f32,
    pub y: f32,
}

impl Angle {
    const fn new(turn: f32, x: f32, y: f32) -> Self {
        Self { turn, x, y }
    }
}

const ANGLES_3: [Angle; 4] = [
    Angle::new(0.0, 1.0, 0.0),
    Angle::new(1.0 / 3.0, -0.5, 0.866_025_4),
    Angle::new(2.0 / 3.0, -0.5, -0.866_025_4),
    Angle::new(1.0, 1.0, 0.0),
];

const ANGLES_4: [Angle; 5] = [
    Angle::new(0.0, 1.0, 0.0),
    Angle::new(0.25, 0.0, 1.0),
    Angle::new(0.5, -1.0, 0.0),
    Angle::new(0.75, 0.0, -1.0),
    Angle::new(1.0, 1.0, 0.0),
];

/// Turn fractions closer than this are treated as the same corner.
const TURN_EPSILON: f32 = 1e-6;

/// Corner `index` of a regular polygon with `sides` corners. The closing
/// corner (`index == sides`) repeats corner zero exactly.
fn corner(index: usize, sides: usize) -> Angle {
    let wrapped = (index % sides) as f32 / sides as f32;
    Angle::new(
        index as f32 / sides as f32,
        (wrapped * TAU).cos(),
        (wrapped * TAU).sin(),
    )
}

fn exact_table(sides: usize) -> Option<Vec<Angle>> {
    match sides {
        3 => Some(ANGLES_3.to_vec()),
        4 => Some(ANGLES_4.to_vec()),
        24 => Some((0..=24).map(|i| corner(i, 24)).collect()),
        _ => None,
    }
}

/// Builds the polygon corners between `start` and `stop` (turn fractions,
/// `start < stop`). Cut ends are moved onto the cut position.
pub fn make_angles(sides: usize, start: f32, stop: f32) -> Vec<Angle> {
    let sides = sides.max(3);
    let n = sides as f32;
    let first = ((start * n).floor().max(0.0) as usize).min(sides - 1);
    let last = if stop >= 1.0 {
        sides
    } else {
        ((stop * n).ceil() as usize).clamp(first + 1, sides)
    };

    let table = exact_table(sides);
    let mut angles: Vec<Angle> = match &table {
        Some(table) => table[first..=last].to_vec(),
        None => (first..=last).map(|i| corner(i, sides)).collect(),
    };

    let head = (angles[0], angles[1]);
    let tail = (angles[angles.len() - 2], angles[angles.len() - 1]);
    let place = |turn: f32, a: Angle, b: Angle| {
        if table.is_some() {
            interpolate(turn, a, b)
        } else {
            intersect(turn, a, b)
        }
    };
    if start > head.0.turn {
        angles[0] = place(start, head.0, head.1);
    }
    if stop < tail.1.turn {
        let end = angles.len() - 1;
        angles[end] = place(stop, tail.0, tail.1);
    }

    angles.dedup_by(|later, earlier| (later.turn - earlier.turn).abs() < TURN_EPSILON);
    angles
}

/// Linear interpolation along the edge `a..b` by turn fraction.
fn interpolate(turn: f32, a: Angle, b: Angle) -> Angle {
    let span = b.turn - a.turn;
    if span.abs() < TURN_EPSILON {
        return Angle::new(turn, a.x, a.y);
    }
    let m = (turn - a.turn) / span;
    Angle::new(turn, a.x + m * (b.x - a.x), a.y + m * (b.y - a.y))
}

/// Where the ray from the origin at `turn` crosses the edge `a..b`.
fn intersect(turn: f32, a: Angle, b: Angle) -> Angle {
    let (dy, dx) = (turn * TAU).sin_cos();
    let denom = dy * (b.x - a.x) - dx * (b.y - a.y);
    if denom.abs() < f32::EPSILON {
        return Angle::new(turn, a.x, a.y);
    }
    let ua = (dx * a.y - dy * a.x) / denom;
    Angle::new(turn, a.x + ua * (b.x - a.x), a.y + ua * (b.y - a.y))
}

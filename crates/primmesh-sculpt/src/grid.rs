//! Sampling displacement sources into a row-major grid of points.

use glam::Vec3;
use image::RgbImage;
use image::imageops::{self, FilterType};
use primmesh_types::LevelOfDetail;

use crate::error::SculptError;

/// Row-major grid of surface points.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementGrid {
    pub rows: usize,
    pub cols: usize,
    pub points: Vec<Vec3>,
}

impl DisplacementGrid {
    /// Samples a sculpt map. Channels map to axes as `v / 255 - 0.5`.
    ///
    /// Maps larger than the LOD resolution are halved along both axes until
    /// they fit, sampling nearest-neighbour so no new colors are invented.
    pub fn from_image(
        map: &RgbImage,
        lod: LevelOfDetail,
        mirror: bool,
    ) -> Result<Self, SculptError> {
        let (width, height) = map.dimensions();
        if width == 0 || height == 0 {
            return Err(SculptError::EmptySculptMap);
        }

        let budget = (lod.sculpt_resolution() * lod.sculpt_resolution()) as u64;
        let (mut cols, mut rows) = (width, height);
        while u64::from(cols) * u64::from(rows) > budget {
            cols = (cols / 2).max(1);
            rows = (rows / 2).max(1);
        }

        let resized;
        let source = if (cols, rows) == (width, height) {
            map
        } else {
            resized = imageops::resize(map, cols, rows, FilterType::Nearest);
            &resized
        };

        let sign = if mirror { -1.0 } else { 1.0 };
        let points = source
            .rows()
            .flat_map(|row| row.map(|px| px.0))
            .map(|[r, g, b]| {
                Vec3::new(
                    sign * (f32::from(r) / 255.0 - 0.5),
                    f32::from(g) / 255.0 - 0.5,
                    f32::from(b) / 255.0 - 0.5,
                )
            })
            .collect();

        Ok(Self {
            rows: rows as usize,
            cols: cols as usize,
            points,
        })
    }

    /// Places `heights` (row-major, `rows * cols`) on a regular XY lattice
    /// spanning `x_range` and `y_range`.
    pub fn from_heights(
        heights: &[f32],
        rows: usize,
        cols: usize,
        x_range: (f32, f32),
        y_range: (f32, f32),
    ) -> Result<Self, SculptError> {
        let invalid = SculptError::InvalidTerrain {
            rows,
            cols,
            len: heights.len(),
        };
        if rows < 2
            || cols < 2
            || rows.checked_mul(cols) != Some(heights.len())
            || heights.iter().any(|h| !h.is_finite())
        {
            return Err(invalid);
        }

        let x_step = (x_range.1 - x_range.0) / (cols - 1) as f32;
        let y_step = (y_range.1 - y_range.0) / (rows - 1) as f32;
        let points = heights
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let (row, col) = (i / cols, i % cols);
                Vec3::new(
                    x_range.0 + col as f32 * x_step,
                    y_range.0 + row as f32 * y_step,
                    h,
                )
            })
            .collect();

        Ok(Self { rows, cols, points })
    }

    pub fn at(&self, row: usize, col: usize) -> Vec3 {
        self.points[row * self.cols + col]
    }

    /// Appends a copy of the first column to every row.
    pub fn close_seam(&mut self) {
        let cols = self.cols;
        let mut points = Vec::with_capacity(self.rows * (cols + 1));
        for row in self.points.chunks_exact(cols) {
            points.extend_from_slice(row);
            points.push(row[0]);
        }
        self.points = points;
        self.cols += 1;
    }

    /// Appends a copy of the first row.
    pub fn close_rows(&mut self) {
        let first: Vec<Vec3> = self.points[..self.cols].to_vec();
        self.points.extend(first);
        self.rows += 1;
    }

    /// Collapses the first and last rows onto their middle points.
    pub fn collapse_poles(&mut self) {
        let cols = self.cols;
        let top = self.at(0, cols / 2);
        let bottom = self.at(self.rows - 1, cols / 2);
        let last = (self.rows - 1) * cols;
        self.points[..cols].fill(top);
        self.points[last..].fill(bottom);
    }
}

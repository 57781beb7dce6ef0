//! Sculpt map and terrain meshing: turns a grid of displacement samples into a single-face mesh.

mod error;
mod grid;
mod mesher;
mod sculpt_type;

pub use error::SculptError;
pub use grid::DisplacementGrid;
pub use mesher::{mesh_grid, mesh_sculpt, mesh_terrain};
pub use sculpt_type::{SculptParams, SculptType};

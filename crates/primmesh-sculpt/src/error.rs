//! Errors raised while meshing sculpt maps and terrain.

/// Invalid sculpt or terrain input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SculptError {
    /// The sculpt map has no pixels.
    #[error("sculpt map is empty")]
    EmptySculptMap,
    /// The height array does not describe a grid of at least 2x2 finite samples.
    #[error("invalid terrain: {rows}x{cols} grid with {len} heights")]
    InvalidTerrain {
        rows: usize,
        cols: usize,
        len: usize,
    },
}

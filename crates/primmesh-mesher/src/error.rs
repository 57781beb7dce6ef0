//! Errors surfaced by the mesher.

use primmesh_asset::AssetError;
use primmesh_sculpt::SculptError;

/// Why a mesh could not be produced.
///
/// Degenerate parametric shapes are not errors; they produce empty output.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    /// The mesh asset could not be unpacked or realized.
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// The sculpt map or height field was unusable.
    #[error(transparent)]
    Sculpt(#[from] SculptError),
}

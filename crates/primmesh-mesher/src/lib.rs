//! Mesh assembly for PrimMesh.
//!
//! [`Mesher`] is the single entry point: it runs the profile/path extruder,
//! the sculpt and terrain mesher, or the mesh asset decoder, applies per-face
//! texture transforms, and returns either one flattened mesh or one mesh per
//! face.

mod error;
mod lod;
mod mesher;
mod output;
mod request;

pub use error::MeshError;
pub use lod::LodSelector;
pub use mesher::Mesher;
pub use output::{AssetMesh, MeshOutput, OutputKind};
pub use request::{Heightfield, MeshRequest};

pub use primmesh_asset::MeshPurpose;

//! Decoding of mesh assets: the structured-document codec, the container
//! of compressed LOD parts, per-face submesh records and convex hulls.

pub mod compression;
mod container;
mod convex;
pub mod document;
mod error;
pub mod quantize;
mod submesh;

pub use compression::DEFAULT_MAX_PART_BYTES;
pub use container::{
    CONVEX_PART_NAME, DecodeOptions, LOD_PART_NAMES, MeshAssetBuilder, MeshAssetContainer, MeshPurpose,
    PHYSICS_PART_NAMES, Part, RealizedMesh, part_priority,
};
pub use convex::{ConvexHullSet, MAX_HULL_POINTS};
pub use document::Document;
pub use error::{AssetError, BuildError, DocumentError, RecordError};
pub use submesh::{MAX_RECORD_POSITIONS, Submesh};

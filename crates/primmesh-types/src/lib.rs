//! Shared data model for prim mesh generation: vertices, meshes, texture faces, LOD tiers and shape parameters.

mod lod;
mod mesh;
mod shape;
mod texture;
mod vertex;

pub use lod::LevelOfDetail;
pub use mesh::{Face, FacetedMesh, MeshStats, SimpleMesh, Triangle};
pub use shape::{HollowShape, MAX_HOLLOW, PathCurve, ProfileShape, ShapeParameters, WireShape};
pub use texture::{FaceTextures, TexMapping, TextureFace, TextureId};
pub use vertex::{VERTEX_EPSILON, Vertex};

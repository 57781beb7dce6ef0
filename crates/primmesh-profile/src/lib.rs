//! Profile generation and path extrusion for parametric prims.
//!
//! [`extrude`] is the entry point: it resolves the profile for a
//! [`ShapeParameters`](primmesh_types::ShapeParameters) at a given LOD, sweeps
//! it along a linear or circular path and returns one triangle buffer per prim
//! face number.

pub mod angles;
mod extrude;
mod face_builder;
mod faces;
pub mod path;
pub mod profile;

pub use extrude::{PrimGeometry, extrude, needs_end_caps};
pub use faces::FaceLayout;
pub use path::PathNode;
pub use profile::{EdgeFace, Profile, ProfileKind, ProfileParams};

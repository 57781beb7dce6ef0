//! Mesher results.

use primmesh_asset::ConvexHullSet;
use primmesh_types::{FacetedMesh, MeshStats, SimpleMesh};
use serde::{Deserialize, Serialize};

/// Which shape of output a request wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// One vertex and index list for the whole object.
    Simple,
    /// One buffer pair per face, each with its texture entry.
    #[default]
    Faceted,
}

/// Generated geometry in the requested shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MeshOutput {
    Simple(SimpleMesh),
    Faceted(FacetedMesh),
}

impl MeshOutput {
    /// Wraps faceted geometry, flattening it when `kind` asks for a single mesh.
    pub fn from_faceted(faceted: FacetedMesh, kind: OutputKind) -> Self {
        match kind {
            OutputKind::Simple => Self::Simple(faceted.flatten()),
            OutputKind::Faceted => Self::Faceted(faceted),
        }
    }

    pub fn kind(&self) -> OutputKind {
        match self {
            Self::Simple(_) => OutputKind::Simple,
            Self::Faceted(_) => OutputKind::Faceted,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Simple(mesh) => mesh.is_empty(),
            Self::Faceted(mesh) => mesh.is_empty(),
        }
    }

    pub fn stats(&self) -> MeshStats {
        match self {
            Self::Simple(mesh) => mesh.stats(),
            Self::Faceted(mesh) => mesh.stats(),
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleMesh> {
        match self {
            Self::Simple(mesh) => Some(mesh),
            Self::Faceted(_) => None,
        }
    }

    pub fn as_faceted(&self) -> Option<&FacetedMesh> {
        match self {
            Self::Faceted(mesh) => Some(mesh),
            Self::Simple(_) => None,
        }
    }

    /// Collapses either variant into one mesh.
    pub fn into_simple(self) -> SimpleMesh {
        match self {
            Self::Simple(mesh) => mesh,
            Self::Faceted(mesh) => mesh.flatten(),
        }
    }
}

/// Geometry decoded from a mesh asset.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetMesh {
    pub output: MeshOutput,
    /// Convex decomposition, when present, requested and decodable.
    pub convex: Option<ConvexHullSet>,
    /// Name of the part the geometry came from.
    pub lod_part: String,
}

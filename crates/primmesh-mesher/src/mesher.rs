//! Top-level entry points turning shape descriptions into meshes.

use image::RgbImage;
use primmesh_asset::{DecodeOptions, MeshAssetContainer, MeshPurpose};
use primmesh_config::MesherConfig;
use primmesh_profile::extrude;
use primmesh_sculpt::SculptParams;
use primmesh_texture::apply_texture_face;
use primmesh_types::{Face, FacetedMesh, LevelOfDetail, ShapeParameters, SimpleMesh, WireShape};
use tracing::debug;

use crate::error::MeshError;
use crate::lod::LodSelector;
use crate::output::{AssetMesh, MeshOutput};
use crate::request::{Heightfield, MeshRequest};

/// Generates meshes for parametric prims, sculpts, terrain and mesh assets.
///
/// Holds no state beyond its configuration; every call is independent.
#[derive(Clone, Debug, Default)]
pub struct Mesher {
    config: MesherConfig,
    selector: LodSelector,
}

impl Mesher {
    pub fn new(config: MesherConfig) -> Self {
        let selector = LodSelector::from_config(&config.lod);
        Self { config, selector }
    }

    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// A request at the configured default level.
    pub fn default_request(&self) -> MeshRequest {
        MeshRequest::new(self.config.lod.default_level)
    }

    /// Level of detail for an object of bounding `radius` at `distance`.
    pub fn select_lod(&self, distance: f32, radius: f32) -> LevelOfDetail {
        self.selector.select(distance, radius)
    }

    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_part_bytes: self.config.asset.max_part_bytes,
            prefer_physics_parts: self.config.asset.prefer_physics_parts,
        }
    }

    /// Extrudes a parametric prim. Degenerate shapes give empty output.
    pub fn mesh_prim(&self, shape: &ShapeParameters, request: &MeshRequest) -> MeshOutput {
        let geometry = extrude(shape, request.lod);
        let faces = geometry
            .faces
            .into_iter()
            .enumerate()
            .map(|(number, mesh)| (number as u32, mesh));
        self.assemble(faces, request)
    }

    /// Converts the quantized wire fields and extrudes.
    pub fn mesh_wire_prim(&self, wire: &WireShape, request: &MeshRequest) -> MeshOutput {
        self.mesh_prim(&ShapeParameters::from_wire(wire), request)
    }

    /// Meshes a sculpt map as a single face.
    pub fn mesh_sculpt(
        &self,
        map: &RgbImage,
        params: SculptParams,
        request: &MeshRequest,
    ) -> Result<MeshOutput, MeshError> {
        let mesh = primmesh_sculpt::mesh_sculpt(map, params, request.lod)?;
        Ok(self.assemble([(0, mesh)], request))
    }

    /// Meshes a height field as a single face.
    pub fn mesh_terrain(
        &self,
        field: &Heightfield<'_>,
        request: &MeshRequest,
    ) -> Result<MeshOutput, MeshError> {
        let mesh = primmesh_sculpt::mesh_terrain(
            field.heights,
            field.rows,
            field.cols,
            field.x_range,
            field.y_range,
        )?;
        Ok(self.assemble([(0, mesh)], request))
    }

    /// Unpacks a mesh asset and realizes the best part for the request.
    ///
    /// Each record with geometry becomes one face numbered by its record
    /// index. Convex hulls are decoded alongside when enabled; their failure
    /// never fails the call.
    pub fn mesh_asset(
        &self,
        bytes: &[u8],
        purpose: MeshPurpose,
        request: &MeshRequest,
    ) -> Result<AssetMesh, MeshError> {
        let container = MeshAssetContainer::unpack(bytes)?;
        let realized = container.realize_lod(request.lod, purpose, &self.decode_options())?;
        let convex = if self.config.asset.decode_convex {
            container.convex_hulls(self.config.asset.max_part_bytes)
        } else {
            None
        };

        let faces = realized.submeshes.iter().map(|sub| (sub.face, sub.to_mesh()));
        let output = self.assemble(faces, request);
        Ok(AssetMesh {
            output,
            convex,
            lod_part: realized.part,
        })
    }

    /// Attaches textures to non-empty faces and shapes the output.
    fn assemble(
        &self,
        faces: impl IntoIterator<Item = (u32, SimpleMesh)>,
        request: &MeshRequest,
    ) -> MeshOutput {
        let mut faceted = FacetedMesh::new();
        for (number, mut mesh) in faces {
            if mesh.is_empty() {
                debug!(face = number, "dropping empty face");
                continue;
            }
            let texture = request.textures.for_face(number);
            if self.config.texture.apply_transforms {
                apply_texture_face(&mut mesh, &texture, request.scale);
            }
            faceted.push_face(Face {
                number,
                mesh,
                texture,
            });
        }
        MeshOutput::from_faceted(faceted, request.output)
    }
}

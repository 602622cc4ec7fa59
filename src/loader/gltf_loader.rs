use std::{collections::HashMap, path::Path, sync::Arc};

use gltf::Texture;
use ultraviolet::{Vec2, Vec3};

use crate::{
    asset::{
        Asset, ColorSpace, Geometry, GeometryRef, ImageData, ImageFormat, Material, MaterialRef,
        Node, NodeRef, Side, TextureMap, Vertex, Wrapping,
    },
    color::Color,
    transform::Transform,
};

use super::AssetLoadError;

struct SceneLoadingData {
    asset: Asset,
    buffers: Vec<gltf::buffer::Data>,
    images: HashMap<usize, gltf::image::Data>,
    missing_material: Option<MaterialRef>,
    material_ids: HashMap<MaterialKey, MaterialRef>,
    geometry_ids: HashMap<GeometryKey, GeometryRef>,
    image_ids: HashMap<ImageKey, Arc<ImageData>>,
}

impl SceneLoadingData {
    fn new(buffers: Vec<gltf::buffer::Data>, images: Vec<gltf::image::Data>) -> Self {
        Self {
            asset: Asset::new(),
            buffers,
            images: images.into_iter().enumerate().collect(),
            missing_material: None,
            material_ids: HashMap::new(),
            geometry_ids: HashMap::new(),
            image_ids: HashMap::new(),
        }
    }
}

#[derive(Hash, Eq, PartialEq, Debug)]
struct MaterialKey {
    index: usize,
}

#[derive(Hash, Eq, PartialEq, Debug)]
struct GeometryKey {
    mesh_index: usize,
    primitive_index: usize,
}

#[derive(Hash, Eq, PartialEq, Debug)]
struct ImageKey {
    index: usize,
}

/// Turns a glTF file into an [`Asset`].
///
/// Node names follow the usual scene-graph rules: whitespace becomes `_`, the characters
/// `[ ] . : /` are dropped, and duplicates get a numeric suffix. A mesh with several
/// primitives becomes a group with one surface child per primitive.
pub struct GltfAssetLoader {}

impl GltfAssetLoader {
    pub fn new() -> Self {
        Self {}
    }

    pub fn load_asset(&mut self, path: impl AsRef<Path>) -> Result<Asset, AssetLoadError> {
        let path = path.as_ref();
        log::info!("Loading asset {:?}", path);
        let (gltf, buffers, images) = gltf::import(path)?;

        let scene = gltf
            .default_scene()
            .or_else(|| gltf.scenes().next())
            .ok_or(AssetLoadError::NoScene)?;

        let mut loading_data = SceneLoadingData::new(buffers, images);
        for node in scene.nodes() {
            self.load_node(&mut loading_data, &node, None)?;
        }

        let asset = loading_data.asset;
        log::info!(
            "Loaded {} nodes, {} materials and {} geometries",
            asset.node_count(),
            asset.materials.len(),
            asset.geometries.len()
        );
        Ok(asset)
    }

    fn load_node(
        &mut self,
        loading_data: &mut SceneLoadingData,
        node: &gltf::Node<'_>,
        parent: Option<NodeRef>,
    ) -> Result<(), AssetLoadError> {
        let name = node
            .name()
            .map(sanitize_node_name)
            .unwrap_or_else(|| format!("node_{}", node.index()));
        let transform: Transform = node.transform().into();

        let id = match node.mesh() {
            Some(mesh) if mesh.primitives().count() == 1 => {
                let mut surface = self.load_surface(loading_data, &name, &mesh, 0)?;
                surface.transform = transform;
                loading_data.asset.add_node(surface, parent)
            }
            Some(mesh) => {
                let mut group = Node::group(name.clone());
                group.transform = transform;
                let group = loading_data.asset.add_node(group, parent);
                for primitive_index in 0..mesh.primitives().count() {
                    let surface_name = format!("{}_{}", name, primitive_index);
                    let surface =
                        self.load_surface(loading_data, &surface_name, &mesh, primitive_index)?;
                    loading_data.asset.add_node(surface, Some(group));
                }
                group
            }
            None => {
                let mut group = Node::group(name);
                group.transform = transform;
                loading_data.asset.add_node(group, parent)
            }
        };

        if let Some(_light) = node.light() {
            log::debug!("Ignoring light on node {:?}, the studio rig lights the scene", node.name());
        }

        for child in node.children() {
            self.load_node(loading_data, &child, Some(id))?;
        }
        Ok(())
    }

    fn load_surface(
        &mut self,
        loading_data: &mut SceneLoadingData,
        name: &str,
        mesh: &gltf::Mesh<'_>,
        primitive_index: usize,
    ) -> Result<Node, AssetLoadError> {
        let primitive = mesh
            .primitives()
            .nth(primitive_index)
            .ok_or_else(|| AssetLoadError::MissingAttribute {
                node: name.to_string(),
                primitive: primitive_index,
                attribute: "primitive",
            })?;

        let material = self.load_material(loading_data, &primitive.material())?;
        let geometry = self.load_geometry(loading_data, name, mesh, &primitive)?;
        Ok(Node::surface(name, geometry, material))
    }

    fn load_material(
        &mut self,
        loading_data: &mut SceneLoadingData,
        material: &gltf::Material<'_>,
    ) -> Result<MaterialRef, AssetLoadError> {
        // material.index() returns None when the material is the default material
        let Some(index) = material.index() else {
            if let Some(missing) = loading_data.missing_material {
                return Ok(missing);
            }
            let missing = loading_data.asset.materials.add(Material::missing_material());
            loading_data.missing_material = Some(missing);
            return Ok(missing);
        };

        if let Some(id) = loading_data.material_ids.get(&MaterialKey { index }) {
            return Ok(*id);
        }

        let material_pbr = material.pbr_metallic_roughness();
        let emissive_factor = material.emissive_factor();
        let emissive = material
            .emissive_strength()
            .map(|value| emissive_factor.map(|v| v * value))
            .unwrap_or(emissive_factor)
            .into();

        let color = {
            let [r, g, b, _] = material_pbr.base_color_factor();
            Color::from_linear(Vec3::new(r, g, b))
        };

        let base_color_texture = match material_pbr.base_color_texture() {
            Some(info) => Some(self.load_texture(loading_data, info.texture(), ColorSpace::SRGB)?),
            None => None,
        };

        let (normal_map, normal_scale) = match material.normal_texture() {
            Some(normal_texture) => (
                Some(self.load_texture(
                    loading_data,
                    normal_texture.texture(),
                    ColorSpace::Linear,
                )?),
                Vec2::broadcast(normal_texture.scale()),
            ),
            None => (None, Vec2::one()),
        };

        let name = material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("material_{}", index));

        let loaded = Material {
            color,
            base_color_texture,
            metalness: material_pbr.metallic_factor(),
            roughness: material_pbr.roughness_factor(),
            emissive,
            normal_map,
            normal_scale,
            side: if material.double_sided() {
                Side::Double
            } else {
                Side::Front
            },
            ..Material::new(name)
        };

        let id = loading_data.asset.materials.add(loaded);
        loading_data.material_ids.insert(MaterialKey { index }, id);
        Ok(id)
    }

    fn load_geometry(
        &mut self,
        loading_data: &mut SceneLoadingData,
        node: &str,
        mesh: &gltf::Mesh<'_>,
        primitive: &gltf::Primitive<'_>,
    ) -> Result<GeometryRef, AssetLoadError> {
        let geometry_key = GeometryKey {
            mesh_index: mesh.index(),
            primitive_index: primitive.index(),
        };
        if let Some(id) = loading_data.geometry_ids.get(&geometry_key) {
            return Ok(*id);
        }

        let primitive_index = primitive.index();
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            return Err(AssetLoadError::UnsupportedPrimitive {
                node: node.to_string(),
                primitive: primitive_index,
                mode: primitive.mode(),
            });
        }

        let reader =
            primitive.reader(|buffer| loading_data.buffers.get(buffer.index()).map(|v| &v.0[..]));
        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| AssetLoadError::MissingAttribute {
                node: node.to_string(),
                primitive: primitive_index,
                attribute: "POSITION",
            })?
            .collect();

        let check_count = |attribute: &'static str, found: usize| {
            if found == positions.len() {
                Ok(())
            } else {
                Err(AssetLoadError::AttributeCountMismatch {
                    node: node.to_string(),
                    primitive: primitive_index,
                    attribute,
                    expected: positions.len(),
                    found,
                })
            }
        };
        let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
        if let Some(normals) = &normals {
            check_count("NORMAL", normals.len())?;
        }
        let tex_coords: Option<Vec<[f32; 2]>> = reader
            .read_tex_coords(0)
            .map(|tex_coords| tex_coords.into_f32().collect());
        if let Some(tex_coords) = &tex_coords {
            check_count("TEXCOORD_0", tex_coords.len())?;
        }

        let has_normals = normals.is_some();
        let vertices: Vec<Vertex> = positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position: *position,
                normal: normals.as_ref().map_or([0.0; 3], |normals| normals[i]),
                uv: tex_coords.as_ref().map_or([0.0; 2], |tex_coords| tex_coords[i]),
            })
            .collect();

        let indices: Vec<u32> = reader
            .read_indices()
            .map(|indices| indices.into_u32().collect())
            .unwrap_or_else(|| (0..(vertices.len() as u32)).collect());
        if let Some(index) = indices
            .iter()
            .copied()
            .find(|index| *index as usize >= vertices.len())
        {
            return Err(AssetLoadError::IndexOutOfRange {
                node: node.to_string(),
                primitive: primitive_index,
                index,
                vertex_count: vertices.len(),
            });
        }

        let mut geometry = Geometry { vertices, indices };
        if !has_normals {
            log::warn!("{:?} has no normals, computing them", node);
            geometry.compute_vertex_normals();
        }

        let id = loading_data.asset.geometries.add(geometry);
        loading_data.geometry_ids.insert(geometry_key, id);
        Ok(id)
    }

    fn load_texture(
        &mut self,
        loading_data: &mut SceneLoadingData,
        texture: Texture,
        color_space: ColorSpace,
    ) -> Result<TextureMap, AssetLoadError> {
        let image = self.load_image(loading_data, &texture, color_space)?;
        let sampler = texture.sampler();
        Ok(TextureMap {
            wrap: [
                Wrapping::from(sampler.wrap_s()),
                Wrapping::from(sampler.wrap_t()),
            ],
            ..TextureMap::new(image)
        })
    }

    fn load_image(
        &mut self,
        loading_data: &mut SceneLoadingData,
        texture: &Texture,
        color_space: ColorSpace,
    ) -> Result<Arc<ImageData>, AssetLoadError> {
        let index = texture.source().index();
        if let Some(image) = loading_data.image_ids.get(&ImageKey { index }) {
            return Ok(image.clone());
        }

        let image = loading_data
            .images
            .remove(&index)
            .ok_or_else(|| AssetLoadError::MissingAttribute {
                node: format!("image_{}", index),
                primitive: 0,
                attribute: "image data",
            })?;
        let (bytes, format) = gltf_image_format_to_image_format(index, image.pixels, image.format)?;

        let image = Arc::new(ImageData {
            dimensions: (image.width, image.height),
            format,
            color_space,
            bytes,
        });
        loading_data
            .image_ids
            .insert(ImageKey { index }, image.clone());
        Ok(image)
    }
}

impl Default for GltfAssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Same rules as scene-graph property bindings use for node names.
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | '.' | ':' | '/'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn gltf_image_format_to_image_format(
    index: usize,
    image: Vec<u8>,
    format: gltf::image::Format,
) -> Result<(Vec<u8>, ImageFormat), AssetLoadError> {
    match format {
        gltf::image::Format::R8 => Ok((image, ImageFormat::R8_UNORM)),
        gltf::image::Format::R8G8 => Ok((image, ImageFormat::R8G8_UNORM)),
        gltf::image::Format::R8G8B8 => {
            // rarely supported format
            let image_with_alpha = image
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
                .collect();
            Ok((image_with_alpha, ImageFormat::R8G8B8A8_UNORM))
        }
        gltf::image::Format::R8G8B8A8 => Ok((image, ImageFormat::R8G8B8A8_UNORM)),
        gltf::image::Format::R16 => Ok((image, ImageFormat::R16_UNORM)),
        gltf::image::Format::R16G16 => Ok((image, ImageFormat::R16G16_UNORM)),
        gltf::image::Format::R16G16B16A16 => Ok((image, ImageFormat::R16G16B16A16_UNORM)),
        gltf::image::Format::R32G32B32A32FLOAT => Ok((image, ImageFormat::R32G32B32A32_SFLOAT)),
        format @ (gltf::image::Format::R16G16B16 | gltf::image::Format::R32G32B32FLOAT) => {
            Err(AssetLoadError::UnsupportedImageFormat { index, format })
        }
    }
}

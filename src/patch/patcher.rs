use std::sync::Arc;

use ultraviolet::Vec2;

use crate::{
    asset::{Asset, GeometryRef, ImageData, Material, MaterialRef, NodeRef, TextureMap},
    flakes::{flakes_texture, FlakesSettings},
};

use super::{
    MaterialOverrides, NodeAction, NodeMatcher, NormalMapSource, PatchLookupError, PatchRule,
};

/// What a patch run changed, for logging.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub shadowed_surfaces: usize,
    pub recomputed_geometries: usize,
    pub replaced_materials: usize,
    pub scaled_nodes: usize,
    pub overridden_materials: usize,
}

pub struct AssetPatcher<'r> {
    rules: &'r [PatchRule],
    flakes: FlakesSettings,
}

/// A rule with all of its names resolved to handles.
enum Target<'r> {
    EnableShadows(Vec<NodeRef>),
    RecomputeNormals(Vec<NodeRef>),
    SetUniformScale {
        nodes: Vec<NodeRef>,
        scale: f32,
    },
    ReplaceMaterial {
        nodes: Vec<NodeRef>,
        base: MaterialRef,
        overrides: &'r MaterialOverrides,
    },
    Material {
        material: MaterialRef,
        overrides: &'r MaterialOverrides,
    },
}

impl<'r> AssetPatcher<'r> {
    pub fn new(rules: &'r [PatchRule]) -> Self {
        Self {
            rules,
            flakes: FlakesSettings::default(),
        }
    }

    pub fn with_flakes(mut self, flakes: FlakesSettings) -> Self {
        self.flakes = flakes;
        self
    }

    /// Applies every rule once, in order.
    ///
    /// All names are looked up before anything is changed. If one is missing the asset is
    /// returned to the caller exactly as it was passed in.
    pub fn apply(&self, asset: &mut Asset) -> Result<PatchReport, PatchLookupError> {
        let targets = self
            .rules
            .iter()
            .map(|rule| resolve(asset, rule))
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = PatchReport::default();
        let mut flakes: Option<Arc<ImageData>> = None;

        for target in targets {
            match target {
                Target::EnableShadows(nodes) => {
                    for node in nodes {
                        if let Some(surface) = &mut asset.node_mut(node).surface {
                            surface.cast_shadow = true;
                            surface.receive_shadow = true;
                            report.shadowed_surfaces += 1;
                        }
                    }
                }
                Target::RecomputeNormals(nodes) => {
                    // Geometry can be shared, recompute each one once
                    let mut geometries: Vec<GeometryRef> = nodes
                        .iter()
                        .filter_map(|node| asset.node(*node).surface.as_ref())
                        .map(|surface| surface.geometry)
                        .collect();
                    geometries.sort_by_key(|geometry| geometry.index());
                    geometries.dedup();

                    for geometry in &geometries {
                        asset.geometries.get_mut(*geometry).compute_vertex_normals();
                    }
                    report.recomputed_geometries += geometries.len();
                }
                Target::SetUniformScale { nodes, scale } => {
                    for node in nodes {
                        asset.node_mut(node).transform.set_uniform_scale(scale);
                        report.scaled_nodes += 1;
                    }
                }
                Target::ReplaceMaterial {
                    nodes,
                    base,
                    overrides,
                } => {
                    // One copy per node, the nodes stay independent of each other too
                    for node in nodes {
                        let copy = asset.materials.duplicate(base);
                        self.apply_overrides(asset.materials.get_mut(copy), overrides, &mut flakes);
                        if let Some(surface) = &mut asset.node_mut(node).surface {
                            surface.material = copy;
                        }
                        log::debug!(
                            "{:?} now has its own copy of {:?}",
                            asset.node(node).name,
                            asset.materials.get(base).name
                        );
                        report.replaced_materials += 1;
                    }
                }
                Target::Material {
                    material,
                    overrides,
                } => {
                    self.apply_overrides(asset.materials.get_mut(material), overrides, &mut flakes);
                    log::debug!("Patched material {:?}", asset.materials.get(material).name);
                    report.overridden_materials += 1;
                }
            }
        }

        log::info!("Patched asset: {:?}", report);
        Ok(report)
    }

    fn apply_overrides(
        &self,
        material: &mut Material,
        overrides: &MaterialOverrides,
        flakes: &mut Option<Arc<ImageData>>,
    ) {
        if let Some(color) = overrides.color {
            material.color = color;
        }
        if let Some(metalness) = overrides.metalness {
            material.metalness = metalness;
        }
        if let Some(roughness) = overrides.roughness {
            material.roughness = roughness;
        }
        if let Some(env_map_intensity) = overrides.env_map_intensity {
            material.env_map_intensity = env_map_intensity;
        }
        if let Some(normal_map) = &overrides.normal_map {
            let image = match normal_map.source {
                NormalMapSource::Flakes => flakes
                    .get_or_insert_with(|| flakes_texture(&self.flakes))
                    .clone(),
            };
            material.normal_map = Some(TextureMap {
                image,
                wrap: normal_map.wrap,
                repeat: Vec2::from(normal_map.repeat),
            });
        }
        if let Some(normal_scale) = overrides.normal_scale {
            material.normal_scale = Vec2::from(normal_scale);
        }
    }
}

fn resolve<'r>(asset: &Asset, rule: &'r PatchRule) -> Result<Target<'r>, PatchLookupError> {
    match rule {
        PatchRule::Nodes { matcher, action } => {
            let nodes: Vec<NodeRef> = match matcher {
                NodeMatcher::AnySurface => asset
                    .nodes()
                    .filter(|(_, node)| node.is_surface())
                    .map(|(id, _)| id)
                    .collect(),
                NodeMatcher::SurfaceNamePrefix(prefix) => asset
                    .nodes()
                    .filter(|(_, node)| node.is_surface() && node.name.starts_with(*prefix))
                    .map(|(id, _)| id)
                    .collect(),
                NodeMatcher::Part(role) => {
                    let name = role.node_name();
                    let node = asset
                        .node_by_name(name)
                        .ok_or_else(|| PatchLookupError::MissingNode(name.to_string()))?;
                    vec![node]
                }
            };

            match action {
                NodeAction::EnableShadows => Ok(Target::EnableShadows(nodes)),
                NodeAction::RecomputeNormals => Ok(Target::RecomputeNormals(nodes)),
                NodeAction::SetUniformScale(scale) => Ok(Target::SetUniformScale {
                    nodes,
                    scale: *scale,
                }),
                NodeAction::ReplaceMaterial { base, overrides } => {
                    let base = resolve_material(asset, base.material_name())?;
                    if let Some(group) = nodes.iter().find(|node| !asset.node(**node).is_surface()) {
                        return Err(PatchLookupError::NotASurface(asset.node(*group).name.clone()));
                    }
                    Ok(Target::ReplaceMaterial {
                        nodes,
                        base,
                        overrides,
                    })
                }
            }
        }
        PatchRule::Material { role, overrides } => Ok(Target::Material {
            material: resolve_material(asset, role.material_name())?,
            overrides,
        }),
    }
}

fn resolve_material(asset: &Asset, name: &str) -> Result<MaterialRef, PatchLookupError> {
    asset
        .materials
        .by_name(name)
        .ok_or_else(|| PatchLookupError::MissingMaterial(name.to_string()))
}

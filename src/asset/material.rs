use std::collections::HashMap;

use ultraviolet::{Vec2, Vec3};

use crate::color::Color;

use super::TextureMap;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MaterialRef(usize);
impl MaterialRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
    pub base_color_texture: Option<TextureMap>,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: Vec3,
    /// Multiplier for reflections of the environment map
    pub env_map_intensity: f32,
    pub normal_map: Option<TextureMap>,
    pub normal_scale: Vec2,
    pub side: Side,
    pub tone_mapped: bool,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::WHITE,
            base_color_texture: None,
            metalness: 1.0,
            roughness: 1.0,
            emissive: Vec3::zero(),
            env_map_intensity: 1.0,
            normal_map: None,
            normal_scale: Vec2::one(),
            side: Side::Front,
            tone_mapped: true,
        }
    }

    /// Flat, unlit white used by the light emitting panels
    pub fn emitter(name: impl Into<String>) -> Self {
        Self {
            metalness: 0.0,
            tone_mapped: false,
            ..Self::new(name)
        }
    }

    /// What glTF prescribes for primitives without a material
    pub fn missing_material() -> Self {
        Self::new("")
    }
}

/// Materials are shared by every node that references them. Changing one through
/// [`Materials::get_mut`] is visible on all of those nodes; use [`Materials::duplicate`]
/// to get a private copy first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Materials {
    materials: Vec<Material>,
    names: HashMap<String, MaterialRef>,
}

impl Materials {
    pub fn add(&mut self, material: Material) -> MaterialRef {
        let id = MaterialRef::new(self.materials.len());
        // The first material registered under a name wins the lookup
        if !material.name.is_empty() {
            self.names.entry(material.name.clone()).or_insert(id);
        }
        self.materials.push(material);
        id
    }

    pub fn get(&self, id: MaterialRef) -> &Material {
        &self.materials[id.index()]
    }

    pub fn get_mut(&mut self, id: MaterialRef) -> &mut Material {
        &mut self.materials[id.index()]
    }

    pub fn by_name(&self, name: &str) -> Option<MaterialRef> {
        self.names.get(name).copied()
    }

    /// Copies a material into a new slot. The copy keeps the name but is not reachable by it.
    pub fn duplicate(&mut self, id: MaterialRef) -> MaterialRef {
        let copy = self.get(id).clone();
        let copy_id = MaterialRef::new(self.materials.len());
        self.materials.push(copy);
        copy_id
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialRef, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(index, material)| (MaterialRef::new(index), material))
    }
}

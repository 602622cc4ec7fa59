use crate::transform::Transform;

use super::{GeometryRef, MaterialRef};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct NodeRef(usize);
impl NodeRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeRef>,
    pub children: Vec<NodeRef>,
    pub transform: Transform,
    /// Only renderable nodes have a surface
    pub surface: Option<Surface>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub geometry: GeometryRef,
    pub material: MaterialRef,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::default(),
            surface: None,
        }
    }

    pub fn surface(name: impl Into<String>, geometry: GeometryRef, material: MaterialRef) -> Self {
        Self {
            surface: Some(Surface {
                geometry,
                material,
                cast_shadow: false,
                receive_shadow: false,
            }),
            ..Self::group(name)
        }
    }

    pub fn is_surface(&self) -> bool {
        self.surface.is_some()
    }
}

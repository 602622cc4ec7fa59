mod geometry;
mod material;
mod node;
pub mod shapes;
mod texture;

pub use geometry::*;
pub use material::*;
pub use node::*;
pub use texture::*;

use std::collections::HashMap;

use crate::transform::Transform;

/// A loaded model: a node hierarchy plus the materials and geometries the nodes share.
///
/// Nodes and materials are looked up by name, the way the model was authored. Everything
/// else refers to them through the index handles, which stay valid for the asset's lifetime.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Asset {
    pub roots: Vec<NodeRef>,
    pub root_transform: Transform,
    nodes: Vec<Node>,
    node_names: HashMap<String, NodeRef>,
    pub materials: Materials,
    pub geometries: Geometries,
}

impl Asset {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a node under `parent`. The name is made unique by appending `_1`, `_2`, ...
    pub fn add_node(&mut self, mut node: Node, parent: Option<NodeRef>) -> NodeRef {
        let id = NodeRef::new(self.nodes.len());
        node.name = unique_name(&self.node_names, &node.name);
        node.parent = parent;
        node.children.clear();
        self.node_names.insert(node.name.clone(), id);
        self.nodes.push(node);

        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: NodeRef) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeRef) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeRef> {
        self.node_names.get(name).copied()
    }

    /// All nodes in the order they were added.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeRef, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeRef::new(index), node))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Renderable nodes together with their world transform, root transform included.
    pub fn world_surfaces(&self) -> Vec<(Transform, &Node, &Surface)> {
        let mut surfaces = Vec::new();
        let mut stack: Vec<(NodeRef, Transform)> = self
            .roots
            .iter()
            .rev()
            .map(|root| (*root, self.root_transform.clone()))
            .collect();

        while let Some((id, parent_transform)) = stack.pop() {
            let node = self.node(id);
            let global_transform = &parent_transform * node.transform.clone();
            for child in node.children.iter().rev() {
                stack.push((*child, global_transform.clone()));
            }
            if let Some(surface) = &node.surface {
                surfaces.push((global_transform, node, surface));
            }
        }
        surfaces
    }
}

fn unique_name(existing: &HashMap<String, NodeRef>, name: &str) -> String {
    if !existing.contains_key(name) {
        return name.to_string();
    }
    (1..)
        .map(|suffix| format!("{}_{}", name, suffix))
        .find(|candidate| !existing.contains_key(candidate))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec3;

    #[test]
    fn duplicate_node_names_get_suffixes() {
        let mut asset = Asset::new();
        let a = asset.add_node(Node::group("wheel"), None);
        let b = asset.add_node(Node::group("wheel"), None);
        let c = asset.add_node(Node::group("wheel"), None);

        assert_eq!(asset.node(a).name, "wheel");
        assert_eq!(asset.node(b).name, "wheel_1");
        assert_eq!(asset.node(c).name, "wheel_2");
        assert_eq!(asset.node_by_name("wheel_1"), Some(b));
    }

    #[test]
    fn world_surfaces_compose_parent_transforms() {
        let mut asset = Asset::new();
        asset.root_transform = Transform::default().with_uniform_scale(0.5);
        let material = asset.materials.add(Material::new("Paint"));
        let geometry = asset.geometries.add(Geometry::default());

        let mut body = Node::group("body");
        body.transform = Transform::from_position(Vec3::new(2.0, 0.0, 0.0));
        let body = asset.add_node(body, None);
        let mut door = Node::surface("door", geometry, material);
        door.transform = Transform::from_position(Vec3::new(0.0, 4.0, 0.0));
        asset.add_node(door, Some(body));

        let surfaces = asset.world_surfaces();
        assert_eq!(surfaces.len(), 1);
        let (transform, node, _) = &surfaces[0];
        assert_eq!(node.name, "door");
        assert!((transform.position - Vec3::new(1.0, 2.0, 0.0)).mag() < 1e-5);
    }
}

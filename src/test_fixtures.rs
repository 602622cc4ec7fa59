//! Synthetic assets shared by the tests, standing in for the real car model.

use std::path::PathBuf;

use serde_json::{json, Value};

use crate::{
    asset::{Asset, Geometry, Material, MaterialRef, Node, Vertex},
    color::Color,
};

/// A geometry whose authored normals all point along +x although it lies flat
pub(crate) fn bad_normals_quad() -> Geometry {
    let vertex = |position: [f32; 3]| Vertex {
        position,
        normal: [1.0, 0.0, 0.0],
        uv: [0.0; 2],
    };
    Geometry {
        vertices: vec![
            vertex([0.0, 0.0, 0.0]),
            vertex([1.0, 0.0, 0.0]),
            vertex([1.0, 0.0, -1.0]),
            vertex([0.0, 0.0, -1.0]),
        ],
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

pub(crate) fn material(name: &str) -> Material {
    Material {
        color: Color::hex(0xffcc00),
        metalness: 0.9,
        roughness: 0.6,
        ..Material::new(name)
    }
}

const MATERIAL_NAMES: [&str; 7] = [
    "FrameBlack",
    "Chrome",
    "BreakDiscs",
    "TiresGum",
    "GreyElements",
    "WhiteCar",
    "Glass",
];

/// A stand-in for the car with every part the rules mention
pub(crate) fn urus_like_asset() -> Asset {
    let mut asset = Asset::new();
    let materials: Vec<MaterialRef> = MATERIAL_NAMES
        .iter()
        .map(|name| asset.materials.add(material(name)))
        .collect();
    let quad = asset.geometries.add(bad_normals_quad());
    let glass_geometry = asset.geometries.add(bad_normals_quad());
    let window_geometry = asset.geometries.add(bad_normals_quad());

    let root = asset.add_node(Node::group("Sketchfab_model"), None);
    asset.add_node(Node::surface("body_WhiteCar_0", quad, materials[5]), Some(root));
    asset.add_node(Node::surface("frame_FrameBlack_0", quad, materials[0]), Some(root));
    asset.add_node(Node::surface("rim_Chrome_0", quad, materials[1]), Some(root));
    asset.add_node(Node::surface("disc_BreakDiscs_0", quad, materials[2]), Some(root));
    asset.add_node(
        Node::surface("silver_001_BreakDiscs_0", quad, materials[2]),
        Some(root),
    );
    asset.add_node(Node::surface("tire_TiresGum_0", quad, materials[3]), Some(root));
    asset.add_node(Node::surface("trim_GreyElements_0", quad, materials[4]), Some(root));
    asset.add_node(
        Node::surface("glass_001_Glass_0", glass_geometry, materials[6]),
        Some(root),
    );
    let mut window = Node::surface("glass_003", window_geometry, materials[6]);
    window.transform.set_uniform_scale(1.3);
    asset.add_node(window, Some(root));
    asset
}

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// A flat triangle on the floor, wound so that its face normal points up
pub(crate) const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]];

/// Builds small `.gltf` files with an external `.bin` buffer.
#[derive(Default)]
pub(crate) struct GltfFixture {
    bin: Vec<u8>,
    buffer_views: Vec<Value>,
    accessors: Vec<Value>,
}

impl GltfFixture {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn add_accessor(
        &mut self,
        bytes: Vec<u8>,
        count: usize,
        component_type: u32,
        kind: &str,
    ) -> usize {
        self.buffer_views.push(json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
        }));
        self.bin.extend(bytes);
        self.accessors.push(json!({
            "bufferView": self.buffer_views.len() - 1,
            "componentType": component_type,
            "count": count,
            "type": kind,
        }));
        self.accessors.len() - 1
    }

    pub(crate) fn positions(&mut self, positions: &[[f32; 3]]) -> usize {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for position in positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }
        let bytes = positions.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
        let accessor = self.add_accessor(bytes, positions.len(), FLOAT, "VEC3");
        self.accessors[accessor]["min"] = json!(min);
        self.accessors[accessor]["max"] = json!(max);
        accessor
    }

    pub(crate) fn normals(&mut self, normals: &[[f32; 3]]) -> usize {
        let bytes = normals.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
        self.add_accessor(bytes, normals.len(), FLOAT, "VEC3")
    }

    pub(crate) fn tex_coords(&mut self, tex_coords: &[[f32; 2]]) -> usize {
        let bytes = tex_coords.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
        self.add_accessor(bytes, tex_coords.len(), FLOAT, "VEC2")
    }

    pub(crate) fn indices(&mut self, indices: &[u32]) -> usize {
        let bytes = indices.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.add_accessor(bytes, indices.len(), UNSIGNED_INT, "SCALAR")
    }

    /// [`TRIANGLE`] with upwards normals
    pub(crate) fn triangle(&mut self, material: Option<usize>) -> Value {
        let position = self.positions(&TRIANGLE);
        let normal = self.normals(&[[0.0, 1.0, 0.0]; 3]);
        let indices = self.indices(&[0, 1, 2]);
        let mut primitive = json!({
            "attributes": { "POSITION": position, "NORMAL": normal },
            "indices": indices,
        });
        if let Some(material) = material {
            primitive["material"] = json!(material);
        }
        primitive
    }

    /// Writes `document` together with the buffer into a fresh temporary directory.
    pub(crate) fn write(&self, name: &str, mut document: Value) -> PathBuf {
        let directory = std::env::temp_dir().join(format!(
            "urus-showcase-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&directory).unwrap();

        document["asset"] = json!({ "version": "2.0" });
        if !self.bin.is_empty() {
            let bin_name = format!("{}.bin", name);
            std::fs::write(directory.join(&bin_name), &self.bin).unwrap();
            document["buffers"] = json!([{ "uri": bin_name, "byteLength": self.bin.len() }]);
            document["bufferViews"] = json!(self.buffer_views);
            document["accessors"] = json!(self.accessors);
        }

        let path = directory.join(format!("{}.gltf", name));
        std::fs::write(&path, serde_json::to_vec_pretty(&document).unwrap()).unwrap();
        path
    }
}

/// The same parts as [`urus_like_asset`], written as a glTF file. The base colors are
/// stored linear, `0.214` comes out as a mid grey in sRGB.
pub(crate) fn urus_like_gltf(name: &str) -> PathBuf {
    let mut fixture = GltfFixture::new();
    let materials: Vec<Value> = MATERIAL_NAMES
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "pbrMetallicRoughness": {
                    "baseColorFactor": [0.214, 0.214, 0.214, 1.0],
                    "metallicFactor": 0.9,
                    "roughnessFactor": 0.6,
                },
            })
        })
        .collect();
    let meshes: Vec<Value> = (0..MATERIAL_NAMES.len())
        .map(|material| json!({ "primitives": [fixture.triangle(Some(material))] }))
        .collect();

    let parts = [
        ("body_WhiteCar_0", 5),
        ("frame_FrameBlack_0", 0),
        ("rim_Chrome_0", 1),
        ("disc_BreakDiscs_0", 2),
        ("silver_001_BreakDiscs_0", 2),
        ("tire_TiresGum_0", 3),
        ("trim_GreyElements_0", 4),
        ("glass 001_Glass_0", 6),
    ];
    let mut nodes = vec![json!({
        "name": "Sketchfab_model",
        "children": (1..=parts.len() + 1).collect::<Vec<_>>(),
    })];
    nodes.extend(
        parts
            .iter()
            .map(|(name, mesh)| json!({ "name": name, "mesh": mesh })),
    );
    nodes.push(json!({ "name": "glass_003", "mesh": 6, "scale": [1.3, 1.3, 1.3] }));

    fixture.write(
        name,
        json!({
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": nodes,
            "meshes": meshes,
            "materials": materials,
        }),
    )
}

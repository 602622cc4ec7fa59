mod gltf_loader;
mod pending;

pub use gltf_loader::*;
pub use pending::*;

#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("Failed to import glTF file: {0}")]
    Import(#[from] gltf::Error),

    #[error("The glTF file contains no scene")]
    NoScene,

    #[error("Primitive {primitive} of node {node:?} uses {mode:?}, only triangle lists are supported")]
    UnsupportedPrimitive {
        node: String,
        primitive: usize,
        mode: gltf::mesh::Mode,
    },

    #[error("Primitive {primitive} of node {node:?} has no {attribute}")]
    MissingAttribute {
        node: String,
        primitive: usize,
        attribute: &'static str,
    },

    #[error("Primitive {primitive} of node {node:?} has {found} {attribute} values for {expected} positions")]
    AttributeCountMismatch {
        node: String,
        primitive: usize,
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Primitive {primitive} of node {node:?} uses vertex {index}, but only has {vertex_count} vertices")]
    IndexOutOfRange {
        node: String,
        primitive: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Image {index} uses the unsupported format {format:?}")]
    UnsupportedImageFormat {
        index: usize,
        format: gltf::image::Format,
    },

    #[error("The loading thread panicked")]
    WorkerPanicked,
}

//! Fix-ups applied to the car model right after it is loaded.
//!
//! The model comes straight from an online store and has a few authoring problems: broken
//! glass normals, windows that stick out of the body, materials that look wrong under the
//! studio lights. [`URUS_RULES`] lists the corrections and [`AssetPatcher`] applies them.

mod patcher;
mod rules;

pub use patcher::*;
pub use rules::*;

/// A rule names a part of the model that does not exist. This means the rules were written
/// for a different version of the model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchLookupError {
    #[error("The asset has no node named {0:?}")]
    MissingNode(String),

    #[error("The asset has no material named {0:?}")]
    MissingMaterial(String),

    #[error("The node {0:?} is not renderable, so its material cannot be replaced")]
    NotASurface(String),
}

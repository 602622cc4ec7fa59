use std::{fmt, sync::Arc};

use ultraviolet::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub struct TextureMap {
    pub image: Arc<ImageData>,
    pub wrap: [Wrapping; 2],
    pub repeat: Vec2,
}

impl TextureMap {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self {
            image,
            wrap: [Wrapping::ClampToEdge; 2],
            repeat: Vec2::one(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrapping {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl From<gltf::texture::WrappingMode> for Wrapping {
    fn from(wrapping_mode: gltf::texture::WrappingMode) -> Self {
        match wrapping_mode {
            gltf::texture::WrappingMode::ClampToEdge => Wrapping::ClampToEdge,
            gltf::texture::WrappingMode::MirroredRepeat => Wrapping::MirroredRepeat,
            gltf::texture::WrappingMode::Repeat => Wrapping::Repeat,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct ImageData {
    pub dimensions: (u32, u32),
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("dimensions", &self.dimensions)
            .field("format", &self.format)
            .field("color_space", &self.color_space)
            //.field("bytes", &self.bytes) // explicitly omitted
            .finish()
    }
}

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The formats images end up in after loading.
pub enum ImageFormat {
    /// 8 bit texture, 1 channel, normalized color space
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_UNORM,
    R16_UNORM,
    R16G16_UNORM,
    R16G16B16A16_UNORM,
    R32G32B32A32_SFLOAT,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Linear,
    SRGB,
}

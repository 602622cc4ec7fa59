//! Metallic paint flakes as a tangent space normal map.
//!
//! A flat normal map with a few thousand small discs, each tilted in a random direction.
//! Tiled densely over the car body it makes the clear coat sparkle.

use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use ultraviolet::Vec3;

use crate::asset::{ColorSpace, ImageData, ImageFormat};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlakesSettings {
    pub width: u32,
    pub height: u32,
    pub flake_count: u32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub seed: u64,
}

impl Default for FlakesSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            flake_count: 4000,
            min_radius: 3.0,
            max_radius: 6.0,
            seed: 0x5eed_f1a4,
        }
    }
}

impl FlakesSettings {
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

/// The normal pointing straight out of the surface, `(0, 0, 1)`
const FLAT_NORMAL: [u8; 4] = [127, 127, 255, 255];

pub fn flakes_texture(settings: &FlakesSettings) -> Arc<ImageData> {
    let (width, height) = (settings.width, settings.height);
    let mut bytes = FLAT_NORMAL.repeat((width * height) as usize);
    let mut rng = StdRng::seed_from_u64(settings.seed);

    for _ in 0..settings.flake_count {
        let x = rng.gen::<f32>() * width as f32;
        let y = rng.gen::<f32>() * height as f32;
        let radius =
            settings.min_radius + rng.gen::<f32>() * (settings.max_radius - settings.min_radius);

        let normal = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            1.5,
        )
        .normalized();
        let color = [
            ((normal.x * 0.5 + 0.5) * 255.0) as u8,
            ((normal.y * 0.5 + 0.5) * 255.0) as u8,
            (normal.z * 255.0) as u8,
            255,
        ];

        fill_disc(&mut bytes, width, height, x, y, radius, color);
    }

    Arc::new(ImageData {
        dimensions: (width, height),
        format: ImageFormat::R8G8B8A8_UNORM,
        color_space: ColorSpace::Linear,
        bytes,
    })
}

fn fill_disc(
    bytes: &mut [u8],
    width: u32,
    height: u32,
    center_x: f32,
    center_y: f32,
    radius: f32,
    color: [u8; 4],
) {
    let min_x = (center_x - radius).floor().max(0.0) as u32;
    let max_x = ((center_x + radius).ceil() as u32).min(width);
    let min_y = (center_y - radius).floor().max(0.0) as u32;
    let max_y = ((center_y + radius).ceil() as u32).min(height);

    for py in min_y..max_y {
        for px in min_x..max_x {
            // Sample at the pixel center
            let dx = px as f32 + 0.5 - center_x;
            let dy = py as f32 + 0.5 - center_y;
            if dx * dx + dy * dy <= radius * radius {
                let offset = ((py * width + px) * 4) as usize;
                bytes[offset..offset + 4].copy_from_slice(&color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> FlakesSettings {
        FlakesSettings {
            width: 64,
            height: 64,
            flake_count: 40,
            ..Default::default()
        }
    }

    #[test]
    fn same_seed_same_texture() {
        assert_eq!(flakes_texture(&small()), flakes_texture(&small()));
        assert_ne!(
            flakes_texture(&small()),
            flakes_texture(&small().with_seed(7))
        );
    }

    #[test]
    fn flakes_tilt_but_face_outwards() {
        let image = flakes_texture(&small());
        assert_eq!(image.bytes.len(), 64 * 64 * 4);

        let pixels: Vec<&[u8]> = image.bytes.chunks_exact(4).collect();
        assert!(pixels.iter().any(|pixel| pixel[..] != FLAT_NORMAL[..]));
        for pixel in pixels {
            // z = 1.5 / |n| is at least 1.5 / sqrt(1 + 1 + 2.25)
            assert!(pixel[2] >= 185, "{:?}", pixel);
        }
    }

    #[test]
    fn disc_is_clipped_at_the_border() {
        let mut bytes = vec![0u8; 4 * 4 * 4];
        fill_disc(&mut bytes, 4, 4, 0.0, 0.0, 1.5, [9, 9, 9, 9]);
        assert_eq!(&bytes[0..4], &[9, 9, 9, 9]);
        assert_eq!(&bytes[(3 * 4 + 3) * 4..], &[0, 0, 0, 0]);
    }
}

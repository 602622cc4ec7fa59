use ultraviolet::Vec3;

use crate::{asset::Side, color::Color};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlendMode {
    /// Plain alpha blending over the layers below
    Normal,
    Add,
    Multiply,
}

impl BlendMode {
    fn blend(self, below: Color, layer: Color, alpha: f32) -> Color {
        let blended = match self {
            BlendMode::Normal => layer,
            BlendMode::Add => Color::new(below.r + layer.r, below.g + layer.g, below.b + layer.b),
            BlendMode::Multiply => {
                Color::new(below.r * layer.r, below.g * layer.g, below.b * layer.b)
            }
        };
        below.lerp(blended, alpha)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    /// A solid color
    Base {
        color: Color,
        alpha: f32,
        mode: BlendMode,
    },
    /// Fades from `color_a` to `color_b` with the distance to `origin`
    Depth {
        color_a: Color,
        color_b: Color,
        alpha: f32,
        mode: BlendMode,
        near: f32,
        far: f32,
        origin: Vec3,
    },
}

impl Layer {
    fn shade(&self, below: Color, world_position: Vec3) -> Color {
        match self {
            Layer::Base { color, alpha, mode } => mode.blend(below, *color, *alpha),
            Layer::Depth {
                color_a,
                color_b,
                alpha,
                mode,
                near,
                far,
                origin,
            } => {
                let distance = (world_position - *origin).mag();
                let depth = ((distance - near) / (far - near).max(f32::EPSILON)).clamp(0.0, 1.0);
                mode.blend(below, color_a.lerp(*color_b, depth), *alpha)
            }
        }
    }
}

/// An unlit material built from layers that are blended bottom to top.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerMaterial {
    pub layers: Vec<Layer>,
    pub side: Side,
}

impl LayerMaterial {
    pub fn studio_backdrop() -> Self {
        Self {
            layers: vec![
                Layer::Base {
                    color: Color::short_hex(0x444),
                    alpha: 1.0,
                    mode: BlendMode::Normal,
                },
                Layer::Depth {
                    color_a: Color::HOT_PINK,
                    color_b: Color::short_hex(0x447),
                    alpha: 0.5,
                    mode: BlendMode::Normal,
                    near: 0.0,
                    far: 300.0,
                    origin: Vec3::new(100.0, 100.0, 100.0),
                },
            ],
            side: Side::Back,
        }
    }

    pub fn shade(&self, world_position: Vec3) -> Color {
        self.layers
            .iter()
            .fold(Color::BLACK, |below, layer| layer.shade(below, world_position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_base_hides_everything_below() {
        let material = LayerMaterial {
            layers: vec![Layer::Base {
                color: Color::short_hex(0x444),
                alpha: 1.0,
                mode: BlendMode::Normal,
            }],
            side: Side::Front,
        };
        assert_eq!(material.shade(Vec3::zero()), Color::short_hex(0x444));
    }

    #[test]
    fn backdrop_is_pinker_near_the_depth_origin() {
        let material = LayerMaterial::studio_backdrop();
        let origin = Vec3::new(100.0, 100.0, 100.0);

        let at_origin = material.shade(origin);
        let expected = Color::short_hex(0x444).lerp(Color::HOT_PINK, 0.5);
        assert!((at_origin.r - expected.r).abs() < 1e-6);

        let far_away = material.shade(origin - Vec3::broadcast(300.0));
        let expected = Color::short_hex(0x444).lerp(Color::short_hex(0x447), 0.5);
        assert!((far_away.b - expected.b).abs() < 1e-6);
        assert!(at_origin.r > far_away.r);
    }
}

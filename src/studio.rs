//! The photo studio the car stands in: light panels for reflections plus the lights that
//! actually illuminate the model.

use std::f32::consts::FRAC_PI_2;

use ultraviolet::Vec3;

use crate::{
    asset::{shapes, Geometry, Material},
    color::Color,
    transform::Transform,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightShape {
    /// Unit square in the local xy plane, facing +z
    Plane,
    Ring {
        inner_radius: f32,
        outer_radius: f32,
        segments: u32,
    },
}

impl LightShape {
    pub fn geometry(&self) -> Geometry {
        match *self {
            LightShape::Plane => shapes::plane(),
            LightShape::Ring {
                inner_radius,
                outer_radius,
                segments,
            } => shapes::ring(inner_radius, outer_radius, segments),
        }
    }
}

/// A glowing panel. It only shows up in reflections and in the environment background,
/// it does not light the scene by itself.
#[derive(Clone, Debug, PartialEq)]
pub struct LightGeometry {
    pub shape: LightShape,
    pub transform: Transform,
    pub color: Color,
    pub tone_mapped: bool,
}

impl LightGeometry {
    pub fn strip_light(transform: Transform) -> Self {
        Self {
            shape: LightShape::Plane,
            transform,
            color: Color::WHITE,
            tone_mapped: false,
        }
    }

    pub fn ring_light(transform: Transform) -> Self {
        Self {
            shape: LightShape::Ring {
                inner_radius: 1.0,
                outer_radius: 2.0,
                segments: 64,
            },
            ..Self::strip_light(transform)
        }
    }

    /// The direction the visible side faces, in world space
    pub fn front(&self) -> Vec3 {
        self.transform.transform_normal(Vec3::unit_z())
    }

    pub fn material(&self) -> Material {
        Material {
            color: self.color,
            tone_mapped: self.tone_mapped,
            ..Material::emitter("light")
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub target: Vec3,
    /// Cone half angle in radians
    pub angle: f32,
    pub penumbra: f32,
    pub intensity: f32,
    pub color: Color,
    pub cast_shadow: bool,
    pub shadow_bias: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StudioRig {
    pub ceiling: Vec<LightGeometry>,
    pub sides: Vec<LightGeometry>,
    pub key: LightGeometry,
}

impl StudioRig {
    pub const KEY_TARGET: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub fn new() -> Self {
        let ceiling = (-3..=3)
            .map(|i| {
                LightGeometry::strip_light(
                    Transform::from_position(Vec3::new(0.0, 4.0, 2.0 * i as f32))
                        .with_rotation_x(FRAC_PI_2)
                        .with_scale(Vec3::new(10.0, 1.0, 1.0)),
                )
            })
            .collect();

        let sides = [(-10.0, FRAC_PI_2), (10.0, -FRAC_PI_2)]
            .into_iter()
            .map(|(x, rotation)| {
                LightGeometry::strip_light(
                    Transform::from_position(Vec3::new(x, 2.0, 0.0))
                        .with_rotation_y(rotation)
                        .with_scale(Vec3::new(20.0, 1.0, 1.0)),
                )
            })
            .collect();

        let mut key_transform =
            Transform::from_position(Vec3::new(10.0, 5.0, 10.0)).with_uniform_scale(2.0);
        key_transform.look_at(Self::KEY_TARGET);

        Self {
            ceiling,
            sides,
            key: LightGeometry::ring_light(key_transform),
        }
    }

    pub fn emitters(&self) -> impl Iterator<Item = &LightGeometry> {
        self.ceiling
            .iter()
            .chain(self.sides.iter())
            .chain(std::iter::once(&self.key))
    }
}

impl Default for StudioRig {
    fn default() -> Self {
        Self::new()
    }
}

/// The lights that shade the car directly.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyLighting {
    pub spot: SpotLight,
    pub ambient: AmbientLight,
}

impl Default for KeyLighting {
    fn default() -> Self {
        Self {
            spot: SpotLight {
                position: Vec3::new(0.0, 15.0, 0.0),
                target: Vec3::zero(),
                angle: 0.25,
                penumbra: 1.0,
                intensity: 6.0,
                color: Color::WHITE,
                cast_shadow: true,
                shadow_bias: -0.0001,
            },
            ambient: AmbientLight {
                intensity: 0.2,
                color: Color::WHITE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_has_seven_ceiling_two_side_and_one_key_light() {
        let rig = StudioRig::new();
        assert_eq!(rig.ceiling.len(), 7);
        assert_eq!(rig.sides.len(), 2);
        assert_eq!(rig.emitters().count(), 10);

        let depths: Vec<f32> = rig.ceiling.iter().map(|l| l.transform.position.z).collect();
        assert_eq!(depths, vec![-6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn every_panel_faces_the_car() {
        let rig = StudioRig::new();
        for light in rig.emitters() {
            let to_origin = -light.transform.position;
            assert!(
                light.front().dot(to_origin) > 0.0,
                "{:?} faces away",
                light.transform
            );
        }
    }

    #[test]
    fn ceiling_panels_face_straight_down() {
        let rig = StudioRig::new();
        for light in &rig.ceiling {
            assert!((light.front() - Vec3::new(0.0, -1.0, 0.0)).mag() < 1e-5);
        }
    }

    #[test]
    fn panels_glow_past_the_tone_mapper() {
        let rig = StudioRig::new();
        for light in rig.emitters() {
            let material = light.material();
            assert_eq!(material.color, Color::WHITE);
            assert!(!material.tone_mapped);
            assert_eq!(material.metalness, 0.0);
        }
        assert_eq!(rig.key.shape.geometry().triangle_count(), 128);
    }

    #[test]
    fn key_ring_looks_at_origin() {
        let rig = StudioRig::new();
        let expected = (StudioRig::KEY_TARGET - rig.key.transform.position).normalized();
        assert!((rig.key.front() - expected).mag() < 1e-4);
        assert_eq!(rig.key.transform.scale, Vec3::broadcast(2.0));
    }
}

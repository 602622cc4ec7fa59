use ultraviolet::Vec3;

use crate::{
    asset::Side,
    color::Color,
    studio::{LightGeometry, LightShape},
};

use super::{Backdrop, CubeFace, EnvironmentMap, EnvironmentScene, EnvironmentSettings};

/// Films an environment scene into a cube map.
pub trait CubeCamera {
    fn capture(&self, scene: &EnvironmentScene, settings: &EnvironmentSettings)
        -> EnvironmentMap;
}

/// Captures on the CPU by shooting one ray through every texel center.
/// Emitters are single sided and win over the backdrop.
#[derive(Clone, Copy, Debug)]
pub struct RayCastCubeCamera {
    pub position: Vec3,
}

impl Default for RayCastCubeCamera {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
        }
    }
}

impl CubeCamera for RayCastCubeCamera {
    fn capture(
        &self,
        scene: &EnvironmentScene,
        settings: &EnvironmentSettings,
    ) -> EnvironmentMap {
        let resolution = settings.resolution.max(1);
        let to_face_coordinate = |texel: u32| (texel as f32 + 0.5) / resolution as f32 * 2.0 - 1.0;

        let faces = CubeFace::ALL.map(|face| {
            let mut texels = Vec::with_capacity((resolution * resolution) as usize);
            for y in 0..resolution {
                let t = to_face_coordinate(y);
                for x in 0..resolution {
                    let direction = face.direction(to_face_coordinate(x), t);
                    texels.push(self.trace(scene, settings, direction));
                }
            }
            texels
        });

        EnvironmentMap { resolution, faces }
    }
}

impl RayCastCubeCamera {
    pub fn trace(
        &self,
        scene: &EnvironmentScene,
        settings: &EnvironmentSettings,
        direction: Vec3,
    ) -> Color {
        let in_range = |distance: f32| distance >= settings.near && distance <= settings.far;

        let closest_light = scene
            .rig
            .emitters()
            .filter_map(|light| {
                hit_light(light, self.position, direction)
                    .filter(|distance| in_range(*distance))
                    .map(|distance| (distance, light))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((_, light)) = closest_light {
            return light.color;
        }

        match hit_backdrop(&scene.backdrop, self.position, direction) {
            Some(distance) if in_range(distance) => scene
                .backdrop
                .material
                .shade(self.position + direction * distance),
            _ => Color::BLACK,
        }
    }
}

/// Distance along the ray to the lit side of the panel.
fn hit_light(light: &LightGeometry, origin: Vec3, direction: Vec3) -> Option<f32> {
    if direction.dot(light.front()) >= 0.0 {
        return None;
    }

    let local_origin = light.transform.inverse_transform_point(origin);
    let local_direction = light.transform.inverse_transform_vector(direction);
    if local_direction.z.abs() < f32::EPSILON {
        return None;
    }
    // Affine maps keep the ray parameter, so this is also the world distance
    let distance = -local_origin.z / local_direction.z;
    if distance <= 0.0 {
        return None;
    }

    let hit = local_origin + local_direction * distance;
    let inside = match light.shape {
        LightShape::Plane => hit.x.abs() <= 0.5 && hit.y.abs() <= 0.5,
        LightShape::Ring {
            inner_radius,
            outer_radius,
            ..
        } => {
            let radius = (hit.x * hit.x + hit.y * hit.y).sqrt();
            radius >= inner_radius && radius <= outer_radius
        }
    };
    inside.then_some(distance)
}

/// Distance to the visible side of the backdrop sphere.
fn hit_backdrop(backdrop: &Backdrop, origin: Vec3, direction: Vec3) -> Option<f32> {
    let center = backdrop.transform.position;
    // The backdrop is always scaled uniformly
    let radius = backdrop.radius * backdrop.transform.scale.x;

    let offset = origin - center;
    let b = offset.dot(direction);
    let c = offset.mag_sq() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let (near, far) = (-b - root, -b + root);

    let distance = match backdrop.material.side {
        Side::Back => far,
        Side::Front => near,
        Side::Double => {
            if near > 0.0 {
                near
            } else {
                far
            }
        }
    };
    (distance > 0.0).then_some(distance)
}

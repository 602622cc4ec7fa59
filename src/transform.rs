use std::ops::Mul;

use ultraviolet::{Mat3, Mat4, Rotor3, Vec3};

/// Scale is applied first, then the orientation, then the position.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Rotor3,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_arrays(position: [f32; 3], orientation: [f32; 4], scale: [f32; 3]) -> Self {
        Self {
            position: Vec3::from(position),
            orientation: Rotor3::from_quaternion_array(orientation),
            scale: Vec3::from(scale),
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Right-handed rotation around the x axis, applied after the current orientation.
    pub fn with_rotation_x(mut self, angle: f32) -> Self {
        self.orientation = axis_rotation(Vec3::unit_x(), angle) * self.orientation;
        self
    }

    /// Right-handed rotation around the y axis, applied after the current orientation.
    pub fn with_rotation_y(mut self, angle: f32) -> Self {
        self.orientation = axis_rotation(Vec3::unit_y(), angle) * self.orientation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::broadcast(scale))
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec3::broadcast(scale);
    }

    /// Orients the local +Z axis towards `target`, keeping +Y as close to world up as possible.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.mag_sq() < f32::EPSILON {
            return;
        }
        let z = forward.normalized();
        let mut up = Vec3::unit_y();
        if z.cross(up).mag_sq() < f32::EPSILON {
            up = Vec3::unit_z();
        }
        let x = up.cross(z).normalized();
        let y = z.cross(x);
        self.orientation = Mat3::new(x, y, z).into_rotor3();
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + (self.orientation * (point * self.scale))
    }

    /// Transforms a direction, ignoring translation. Non-uniform scale is applied inversely
    /// so that surface normals stay perpendicular.
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        (self.orientation * (normal / self.scale)).normalized()
    }

    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        (self.orientation.reversed() * (point - self.position)) / self.scale
    }

    pub fn inverse_transform_vector(&self, vector: Vec3) -> Vec3 {
        (self.orientation.reversed() * vector) / self.scale
    }
}

/// Same layout as glTF rotations, `[x, y, z, w]`
fn axis_rotation(axis: Vec3, angle: f32) -> Rotor3 {
    let (sin, cos) = (angle * 0.5).sin_cos();
    Rotor3::from_quaternion_array([axis.x * sin, axis.y * sin, axis.z * sin, cos])
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            orientation: Rotor3::identity(),
            scale: Vec3::one(),
        }
    }
}

impl From<Transform> for Mat4 {
    fn from(transform: Transform) -> Self {
        let isometry = ultraviolet::Isometry3::new(transform.position, transform.orientation);
        isometry.into_homogeneous_matrix() * Mat4::from_nonuniform_scale(transform.scale)
    }
}

impl From<gltf::scene::Transform> for Transform {
    fn from(transform: gltf::scene::Transform) -> Self {
        let (translation, rotation, scale) = transform.decomposed();
        Self::from_arrays(translation, rotation, scale)
    }
}

/// Parent times child. Exact as long as the parent is scaled uniformly, a non-uniform
/// parent scale followed by a rotated child would need a shear, which a `Transform`
/// cannot hold. Scales are then only multiplied per axis.
impl Mul<Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Self::Output {
        Transform {
            position: self.transform_point(rhs.position),
            orientation: self.orientation * rhs.orientation,
            scale: self.scale * rhs.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_approx_eq(a: Vec3, b: Vec3) {
        assert!((a - b).mag() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn rotation_x_turns_plane_normal_downwards() {
        let transform = Transform::default().with_rotation_x(FRAC_PI_2);
        assert_vec_approx_eq(transform.orientation * Vec3::unit_z(), -Vec3::unit_y());
        assert_vec_approx_eq(transform.orientation * Vec3::unit_y(), Vec3::unit_z());
    }

    #[test]
    fn rotation_y_turns_plane_normal_sideways() {
        let transform = Transform::default().with_rotation_y(FRAC_PI_2);
        assert_vec_approx_eq(transform.orientation * Vec3::unit_z(), Vec3::unit_x());

        let transform = Transform::default().with_rotation_y(-FRAC_PI_2);
        assert_vec_approx_eq(transform.orientation * Vec3::unit_z(), -Vec3::unit_x());
    }

    #[test]
    fn look_at_points_local_z_to_target() {
        let mut transform = Transform::from_position(Vec3::new(10.0, 5.0, 10.0));
        transform.look_at(Vec3::zero());
        let expected = (-transform.position).normalized();
        assert_vec_approx_eq(transform.orientation * Vec3::unit_z(), expected);
    }

    #[test]
    fn inverse_undoes_forward_transform() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation_x(0.3)
            .with_scale(Vec3::new(2.0, 1.0, 0.5));
        let point = Vec3::new(-4.0, 0.5, 7.0);
        assert_vec_approx_eq(
            transform.inverse_transform_point(transform.transform_point(point)),
            point,
        );
    }

    #[test]
    fn composition_applies_parent_scale_to_child_offset() {
        let parent = Transform::default().with_uniform_scale(0.5);
        let child = Transform::from_position(Vec3::new(2.0, 0.0, 0.0));
        let global = &parent * child;
        assert_vec_approx_eq(global.position, Vec3::new(1.0, 0.0, 0.0));
        assert_vec_approx_eq(global.scale, Vec3::broadcast(0.5));
    }

    #[test]
    fn composition_matches_the_matrix_product() {
        let parent = Transform::from_position(Vec3::new(0.0, 1.0, 0.0))
            .with_rotation_y(0.8)
            .with_uniform_scale(0.015);
        let child = Transform::from_position(Vec3::new(3.0, 0.0, -2.0))
            .with_rotation_x(0.4)
            .with_scale(Vec3::new(2.0, 1.0, 0.5));
        let composed = Mat4::from(&parent * child.clone());
        let expected = Mat4::from(parent) * Mat4::from(child);

        let point = Vec3::new(1.0, -2.0, 4.0);
        assert_vec_approx_eq(
            composed.transform_point3(point),
            expected.transform_point3(point),
        );
    }
}

use std::f32::consts::PI;

use ultraviolet::{Mat3, Rotor3, Vec2, Vec3};

use super::{camera_controller::CameraController, Camera};

/// What the user is allowed to do with the orbit camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitConstraints {
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_rotate: bool,
    /// Angle from the up axis, in radians
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitConstraints {
    fn default() -> Self {
        Self {
            enable_pan: true,
            enable_zoom: true,
            enable_rotate: true,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

impl OrbitConstraints {
    /// The car can only be spun around, always seen from the same height.
    pub fn showcase() -> Self {
        Self {
            enable_pan: false,
            enable_zoom: false,
            min_polar_angle: PI / 2.4,
            max_polar_angle: PI / 2.4,
            ..Default::default()
        }
    }
}

/// Circles around a target, the position is kept in spherical coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitController {
    pub target: Vec3,
    pub distance: f32,
    /// Angle from the up axis
    pub polar: f32,
    /// Angle around the up axis, zero is +z
    pub azimuth: f32,
    pub constraints: OrbitConstraints,
    pub rotate_speed: f32,
    pub pan_speed: f32,
}

impl OrbitController {
    pub fn new(position: Vec3, target: Vec3, constraints: OrbitConstraints) -> Self {
        let offset = position - target;
        let distance = offset.mag();
        let polar = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };
        let mut controller = Self {
            target,
            distance,
            polar,
            azimuth: offset.x.atan2(offset.z),
            constraints,
            rotate_speed: 1.0,
            pan_speed: 1.0,
        };
        controller.apply_constraints();
        controller
    }

    pub fn showcase() -> Self {
        Self::new(
            Vec3::new(-7.5, 0.0, -7.5),
            Vec3::zero(),
            OrbitConstraints::showcase(),
        )
    }

    /// Spins the camera, `delta` is in radians along the azimuth and polar angle.
    pub fn rotate(&mut self, delta: Vec2) {
        if !self.constraints.enable_rotate {
            return;
        }
        self.azimuth += delta.x * self.rotate_speed;
        self.polar += delta.y * self.rotate_speed;
        self.apply_constraints();
    }

    /// Moves the target in the camera plane.
    pub fn pan(&mut self, delta: Vec2) {
        if !self.constraints.enable_pan {
            log::trace!("Panning is disabled");
            return;
        }
        let orientation = self.orientation();
        let right = orientation * Camera::right();
        let up = orientation * Camera::up();
        self.target += (right * delta.x + up * delta.y) * self.pan_speed;
    }

    /// Scales the distance to the target, values below one move closer.
    pub fn zoom(&mut self, factor: f32) {
        if !self.constraints.enable_zoom {
            log::trace!("Zooming is disabled");
            return;
        }
        self.distance *= factor;
        self.apply_constraints();
    }

    fn apply_constraints(&mut self) {
        let constraints = &self.constraints;
        self.polar = self
            .polar
            .clamp(constraints.min_polar_angle, constraints.max_polar_angle)
            .clamp(f32::EPSILON, PI - f32::EPSILON);
        self.distance = self
            .distance
            .clamp(constraints.min_distance, constraints.max_distance);
    }
}

impl CameraController for OrbitController {
    fn position(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target
            + Vec3::new(
                sin_polar * sin_azimuth,
                cos_polar,
                sin_polar * cos_azimuth,
            ) * self.distance
    }

    /// Looks at the target with the camera up staying on the world up side
    fn orientation(&self) -> Rotor3 {
        let backward = self.position() - self.target;
        if backward.mag_sq() < f32::EPSILON {
            return Rotor3::identity();
        }
        let z = backward.normalized();
        let x = Camera::up().cross(z).normalized();
        let y = z.cross(x);
        Mat3::new(x, y, z).into_rotor3()
    }
}

use ultraviolet::{Rotor3, Vec3};

use super::Camera;

/// Drives a [`Camera`] from user input.
pub trait CameraController {
    fn position(&self) -> Vec3;
    fn orientation(&self) -> Rotor3;

    /// in world-space
    fn look_direction(&self) -> Vec3 {
        self.orientation() * Camera::forward()
    }
}

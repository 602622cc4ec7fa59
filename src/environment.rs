//! The environment map: the studio rig and a gradient backdrop, filmed once by a cube
//! camera at the origin. The result lights reflections on the car and doubles as the
//! scene background.

mod capture;
mod layer_material;

pub use capture::*;
pub use layer_material::*;

use std::{cell::OnceCell, sync::Arc};

use ultraviolet::Vec3;

use crate::{
    asset::{shapes, Geometry},
    color::Color,
    studio::StudioRig,
    transform::Transform,
};

/// A huge sphere around everything, seen from the inside.
#[derive(Clone, Debug, PartialEq)]
pub struct Backdrop {
    pub geometry: Geometry,
    /// Radius of the untransformed geometry
    pub radius: f32,
    pub transform: Transform,
    pub material: LayerMaterial,
}

impl Backdrop {
    pub fn studio() -> Self {
        Self {
            geometry: shapes::sphere(1.0, 64, 64),
            radius: 1.0,
            transform: Transform::default().with_uniform_scale(100.0),
            material: LayerMaterial::studio_backdrop(),
        }
    }
}

/// Everything the cube camera sees.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentScene {
    pub rig: StudioRig,
    pub backdrop: Backdrop,
}

impl EnvironmentScene {
    pub fn compose(rig: StudioRig, backdrop: Backdrop) -> Self {
        Self { rig, backdrop }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentSettings {
    /// Also show the map behind the scene, not just in reflections
    pub background: bool,
    /// Edge length of each cube face in texels
    pub resolution: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            background: true,
            resolution: 512,
            near: 1.0,
            far: 1000.0,
        }
    }
}

/// Cube faces in the usual GL order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// `s` and `t` go from -1 to 1, left to right and top to bottom of the face.
    pub fn direction(self, s: f32, t: f32) -> Vec3 {
        let direction = match self {
            CubeFace::PositiveX => Vec3::new(1.0, -t, -s),
            CubeFace::NegativeX => Vec3::new(-1.0, -t, s),
            CubeFace::PositiveY => Vec3::new(s, 1.0, t),
            CubeFace::NegativeY => Vec3::new(s, -1.0, -t),
            CubeFace::PositiveZ => Vec3::new(s, -t, 1.0),
            CubeFace::NegativeZ => Vec3::new(-s, -t, -1.0),
        };
        direction.normalized()
    }

    /// Inverse of [`CubeFace::direction`]
    pub fn from_direction(direction: Vec3) -> (CubeFace, f32, f32) {
        let Vec3 { x, y, z } = direction;
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());
        if ax >= ay && ax >= az {
            if x > 0.0 {
                (CubeFace::PositiveX, -z / ax, -y / ax)
            } else {
                (CubeFace::NegativeX, z / ax, -y / ax)
            }
        } else if ay >= az {
            if y > 0.0 {
                (CubeFace::PositiveY, x / ay, z / ay)
            } else {
                (CubeFace::NegativeY, x / ay, -z / ay)
            }
        } else if z > 0.0 {
            (CubeFace::PositiveZ, x / az, -y / az)
        } else {
            (CubeFace::NegativeZ, -x / az, -y / az)
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Six square faces of colors, indexed like [`CubeFace::ALL`].
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentMap {
    pub resolution: u32,
    pub faces: [Vec<Color>; 6],
}

impl EnvironmentMap {
    pub fn texel(&self, face: CubeFace, x: u32, y: u32) -> Color {
        self.faces[face.index()][(y * self.resolution + x) as usize]
    }

    /// Nearest texel in the given direction.
    pub fn sample(&self, direction: Vec3) -> Color {
        if direction.mag_sq() == 0.0 {
            return Color::BLACK;
        }
        let (face, s, t) = CubeFace::from_direction(direction);
        let to_texel = |coordinate: f32| {
            let texel = ((coordinate + 1.0) * 0.5 * self.resolution as f32).floor() as i64;
            texel.clamp(0, self.resolution as i64 - 1) as u32
        };
        self.texel(face, to_texel(s), to_texel(t))
    }
}

/// The environment of the showcase. The cube map is filmed the first time somebody asks
/// for it and then reused for every frame.
pub struct Environment {
    pub scene: EnvironmentScene,
    pub settings: EnvironmentSettings,
    captured: OnceCell<Arc<EnvironmentMap>>,
}

impl Environment {
    pub fn new(scene: EnvironmentScene, settings: EnvironmentSettings) -> Self {
        Self {
            scene,
            settings,
            captured: OnceCell::new(),
        }
    }

    pub fn studio(settings: EnvironmentSettings) -> Self {
        Self::new(
            EnvironmentScene::compose(StudioRig::new(), Backdrop::studio()),
            settings,
        )
    }

    pub fn map(&self, camera: &impl CubeCamera) -> Arc<EnvironmentMap> {
        self.captured
            .get_or_init(|| {
                log::info!(
                    "Capturing environment at {0}x{0} per face",
                    self.settings.resolution
                );
                Arc::new(camera.capture(&self.scene, &self.settings))
            })
            .clone()
    }

    pub fn is_captured(&self) -> bool {
        self.captured.get().is_some()
    }

    /// The map behind the scene, if the environment is also used as background.
    pub fn background(&self) -> Option<Arc<EnvironmentMap>> {
        if self.settings.background {
            self.captured.get().cloned()
        } else {
            None
        }
    }
}

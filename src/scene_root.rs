use std::sync::Arc;

use thiserror::Error;
use ultraviolet::Vec2;

use crate::{
    asset::Asset,
    camera::{orbit_controller::OrbitController, Camera, CameraSettings},
    config_loader::Config,
    contact_shadows::{ContactShadowSettings, ContactShadows},
    environment::{Environment, EnvironmentMap, EnvironmentSettings, RayCastCubeCamera},
    flakes::FlakesSettings,
    loader::{AssetLoadError, PendingAsset},
    patch::{AssetPatcher, PatchLookupError, PatchReport, URUS_RULES},
    shadow_bake::ShadowBake,
    studio::KeyLighting,
    transform::Transform,
};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    AssetLoad(#[from] AssetLoadError),

    #[error(transparent)]
    PatchLookup(#[from] PatchLookupError),
}

/// Everything on stage: the patched car, the studio around it, and the camera.
pub struct SceneRoot {
    pub asset: Asset,
    pub patch_report: PatchReport,
    pub lighting: KeyLighting,
    pub environment: Environment,
    pub contact_shadows: ContactShadows,
    pub shadow_bake: ShadowBake,
    pub camera: Camera,
    pub orbit: OrbitController,
}

impl SceneRoot {
    /// Loads the car, waits for it and then sets up the scene around it.
    pub fn build(config: &Config) -> Result<Self, SceneError> {
        let pending = PendingAsset::spawn(&config.asset_path);
        log::info!("Loading {}", pending.path().display());
        let asset = pending.wait()?;
        Self::from_asset(asset, config)
    }

    /// Patches an already loaded car and mounts it.
    pub fn from_asset(mut asset: Asset, config: &Config) -> Result<Self, SceneError> {
        let patch_report = AssetPatcher::new(URUS_RULES)
            .with_flakes(FlakesSettings::default().with_seed(config.flakes_seed))
            .apply(&mut asset)?;

        asset.root_transform = Transform::default().with_uniform_scale(config.model_scale);

        let environment = Environment::studio(EnvironmentSettings {
            resolution: config.environment_resolution,
            ..Default::default()
        });

        let mut contact_shadows = ContactShadows::new(ContactShadowSettings {
            resolution: config.contact_shadow_resolution,
            ..Default::default()
        });
        contact_shadows.update(&asset);

        let orbit = OrbitController::showcase();
        let mut camera = Camera::new(CameraSettings::default());
        camera.update_camera(&orbit);

        log::info!(
            "Scene ready with {} nodes and {} materials",
            asset.node_count(),
            asset.materials.len()
        );

        Ok(Self {
            asset,
            patch_report,
            lighting: KeyLighting::default(),
            environment,
            contact_shadows,
            shadow_bake: ShadowBake::new(),
            camera,
            orbit,
        })
    }

    /// The studio environment, captured the first time it is needed.
    pub fn environment_map(&self) -> Arc<EnvironmentMap> {
        self.environment.map(&RayCastCubeCamera::default())
    }

    /// Whether the renderer has to draw shadow maps this frame.
    pub fn begin_frame(&mut self) -> bool {
        self.shadow_bake.begin_frame()
    }

    pub fn rotate_camera(&mut self, delta: Vec2) {
        self.orbit.rotate(delta);
        self.camera.update_camera(&self.orbit);
    }

    /// Panning and zooming are locked, but the input is still passed through.
    pub fn pan_camera(&mut self, delta: Vec2) {
        self.orbit.pan(delta);
        self.camera.update_camera(&self.orbit);
    }

    pub fn zoom_camera(&mut self, factor: f32) {
        self.orbit.zoom(factor);
        self.camera.update_camera(&self.orbit);
    }
}

#[cfg(test)]
mod tests {
    use ultraviolet::Vec3;

    use super::*;
    use crate::{
        camera::camera_controller::CameraController,
        patch::PartRole,
        test_fixtures::{urus_like_asset, urus_like_gltf},
    };

    fn small_config() -> Config {
        Config {
            environment_resolution: 3,
            contact_shadow_resolution: 32,
            ..Default::default()
        }
    }

    #[test]
    fn patched_car_is_mounted_at_model_scale() {
        let scene = SceneRoot::from_asset(urus_like_asset(), &small_config()).unwrap();
        assert_eq!(scene.asset.root_transform.scale, Vec3::broadcast(0.015));
        assert_eq!(scene.patch_report.overridden_materials, 6);

        let (transform, _, _) = scene
            .asset
            .world_surfaces()
            .into_iter()
            .find(|(_, node, _)| node.name == PartRole::InsetWindow.node_name())
            .unwrap();
        assert!((transform.scale - Vec3::broadcast(2.7 * 0.015)).mag() < 1e-6);
    }

    #[test]
    fn patch_failure_stops_the_mount() {
        let mut asset = urus_like_asset();
        asset.materials = Default::default();
        let result = SceneRoot::from_asset(asset, &small_config());
        assert!(matches!(
            result,
            Err(SceneError::PatchLookup(PatchLookupError::MissingMaterial(_)))
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let config = Config {
            asset_path: "does/not/exist.glb".to_string(),
            ..small_config()
        };
        assert!(matches!(
            SceneRoot::build(&config),
            Err(SceneError::AssetLoad(_))
        ));
    }

    #[test]
    fn builds_from_a_gltf_file() {
        let config = Config {
            asset_path: urus_like_gltf("scene-root-car").display().to_string(),
            ..small_config()
        };
        let scene = SceneRoot::build(&config).unwrap();

        assert_eq!(scene.patch_report.shadowed_surfaces, 9);
        assert_eq!(scene.patch_report.recomputed_geometries, 1);
        assert_eq!(scene.patch_report.replaced_materials, 1);
        assert_eq!(scene.patch_report.scaled_nodes, 1);
        assert_eq!(scene.patch_report.overridden_materials, 6);

        let window = scene
            .asset
            .node(scene.asset.node_by_name(PartRole::InsetWindow.node_name()).unwrap());
        assert_eq!(window.transform.scale, Vec3::broadcast(2.7));
        assert!(scene.contact_shadows.is_frozen());
    }

    #[test]
    fn environment_is_captured_lazily_and_once() {
        let scene = SceneRoot::from_asset(urus_like_asset(), &small_config()).unwrap();
        assert!(!scene.environment.is_captured());

        let first = scene.environment_map();
        let second = scene.environment_map();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.resolution, 3);
    }

    #[test]
    fn shadows_are_baked_up_front() {
        let mut scene = SceneRoot::from_asset(urus_like_asset(), &small_config()).unwrap();
        assert!(scene.contact_shadows.is_frozen());
        assert_eq!(scene.contact_shadows.map().map(|map| map.resolution), Some(32));

        assert!(scene.begin_frame());
        assert!(!scene.begin_frame());
    }

    #[test]
    fn camera_only_orbits() {
        let mut scene = SceneRoot::from_asset(urus_like_asset(), &small_config()).unwrap();
        let start = scene.camera.position;

        scene.pan_camera(Vec2::new(2.0, 2.0));
        scene.zoom_camera(0.1);
        assert_eq!(scene.camera.position, start);

        scene.rotate_camera(Vec2::new(1.0, 1.0));
        assert_ne!(scene.camera.position, start);
        assert!((scene.camera.position.y - start.y).abs() < 1e-4);
        assert!((scene.camera.position.mag() - start.mag()).abs() < 1e-4);
        assert_eq!(scene.camera.position, scene.orbit.position());
    }
}

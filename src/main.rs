use anyhow::Context;
use env_logger::Env;
use ultraviolet::Vec3;

use urus_showcase::{config_loader::ConfigFileLoader, scene_root::SceneRoot};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config_loader = ConfigFileLoader::new("showcase.json");
    let config = config_loader
        .load_config()
        .context("Failed to load the showcase config")?
        .clone();

    let mut scene = SceneRoot::build(&config)
        .with_context(|| format!("Failed to set up the scene for {}", config.asset_path))?;

    let environment = scene.environment_map();
    log::info!(
        "Environment captured, {0}x{0} per face, horizon color {1:?}",
        environment.resolution,
        environment.sample(Vec3::unit_x())
    );

    if let Some(shadows) = scene.contact_shadows.map() {
        log::info!(
            "Contact shadows baked at {0}x{0}, darkest texel {1:.2}",
            shadows.resolution,
            shadows.max_opacity()
        );
    }

    // The renderer takes over from here, the first frame renders the shadow maps
    let render_shadows = scene.begin_frame();
    log::info!(
        "Camera at {:?} looking at {:?}, shadow maps on first frame: {}",
        scene.camera.position,
        scene.orbit.target,
        render_shadows
    );
    log::info!("Patch summary: {:?}", scene.patch_report);

    Ok(())
}

pub mod asset;
pub mod camera;
pub mod color;
pub mod config_loader;
pub mod contact_shadows;
pub mod environment;
pub mod flakes;
pub mod loader;
pub mod patch;
pub mod scene_root;
pub mod shadow_bake;
pub mod studio;
pub mod transform;

#[cfg(test)]
mod test_fixtures;

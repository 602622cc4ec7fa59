use std::{
    path::PathBuf,
    thread::{self, JoinHandle},
};

use crate::asset::Asset;

use super::{AssetLoadError, GltfAssetLoader};

/// An asset that is being loaded on a worker thread.
///
/// Nothing can use the asset until [`PendingAsset::wait`] hands it over, so the patching
/// and mounting that follow always see a fully loaded asset.
pub struct PendingAsset {
    path: PathBuf,
    handle: JoinHandle<Result<Asset, AssetLoadError>>,
}

impl PendingAsset {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        Self::spawn_with(path, |path| GltfAssetLoader::new().load_asset(path))
    }

    fn spawn_with<F>(path: impl Into<PathBuf>, load: F) -> Self
    where
        F: FnOnce(PathBuf) -> Result<Asset, AssetLoadError> + Send + 'static,
    {
        let path = path.into();
        let worker_path = path.clone();
        let handle = thread::spawn(move || load(worker_path));
        Self { path, handle }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn is_ready(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the worker is done.
    pub fn wait(self) -> Result<Asset, AssetLoadError> {
        self.handle
            .join()
            .map_err(|_| AssetLoadError::WorkerPanicked)?
    }
}

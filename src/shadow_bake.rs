/// Shadow maps are rendered on the first frame and then reused. Nothing in the scene
/// moves except the camera, so the shadows never change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShadowBake {
    baked: bool,
}

impl ShadowBake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the shadow maps have to be rendered this frame.
    pub fn begin_frame(&mut self) -> bool {
        if self.baked {
            false
        } else {
            log::debug!("Rendering shadow maps once");
            self.baked = true;
            true
        }
    }

    pub fn is_baked(&self) -> bool {
        self.baked
    }
}

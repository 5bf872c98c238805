use crate::core::FrameTick;
use crate::playback::CameraMode;
use crate::scene::SceneState;

/// Optional observer of the playback loop.
///
/// Every hook defaults to doing nothing, so sinks only implement what they
/// care about.
pub trait Diagnostics {
    fn scene_ready(&mut self, _scene: &SceneState) {}

    fn frame_begin(&mut self, _tick: FrameTick) {}

    fn frame_end(&mut self, _tick: FrameTick, _scene: &SceneState) {}

    fn camera_changed(&mut self, _mode: CameraMode) {}
}

/// Diagnostics sink that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {}

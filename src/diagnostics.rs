//! Debug-level reporting of the playback loop

use log::debug;

use crate::core::{Clock, FrameTick};
use crate::playback::CameraMode;
use crate::scene::SceneState;

pub use crate::traits::diagnostics::{Diagnostics, NoDiagnostics};

/// Logs scene and camera events, plus a frame-time summary every
/// `report_interval` ticks
#[derive(Debug)]
pub struct LogDiagnostics {
    clock: Clock,
    report_interval: u32,
    ticks: u32,
    busy: f32,
}

impl LogDiagnostics {
    pub fn new(report_interval: u32) -> Self {
        Self {
            clock: Clock::new(),
            report_interval: report_interval.max(1),
            ticks: 0,
            busy: 0.0,
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}

impl Default for LogDiagnostics {
    fn default() -> Self {
        Self::new(120)
    }
}

impl Diagnostics for LogDiagnostics {
    fn scene_ready(&mut self, scene: &SceneState) {
        debug!(
            "Scene ready: {} objects, ball at {:?}",
            scene.root.len(),
            scene.ball_position()
        );
    }

    fn frame_begin(&mut self, _tick: FrameTick) {
        self.clock.reset();
    }

    fn frame_end(&mut self, tick: FrameTick, scene: &SceneState) {
        self.busy += self.clock.tick();
        self.ticks += 1;

        if self.ticks % self.report_interval == 0 {
            debug!(
                "Frame {}: avg {:.2} ms per tick, camera at {:?}",
                tick.frame,
                self.busy * 1000.0 / self.report_interval as f32,
                scene.camera.position
            );
            self.busy = 0.0;
        }
    }

    fn camera_changed(&mut self, mode: CameraMode) {
        debug!("Camera mode: {:?}", mode);
    }
}

//! Camera state machine: a fixed vantage or a followed player, with the
//! camera aimed at the ball on every frame.

use glam::Vec3;
use log::debug;

use crate::error::CameraError;
use crate::replay::ReplayData;
use crate::scene::SceneState;

/// Preset vantage points, numbered the way the viewer exposes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedView {
    OrangeGoal = 0,
    BlueGoal = 1,
    MidField = 2,
}

impl FixedView {
    pub const HEIGHT: f32 = 750.0;
    pub const GOAL_DEPTH: f32 = 5750.0;

    pub fn position(self) -> Vec3 {
        match self {
            FixedView::OrangeGoal => Vec3::new(0.0, Self::HEIGHT, Self::GOAL_DEPTH),
            FixedView::BlueGoal => Vec3::new(0.0, Self::HEIGHT, -Self::GOAL_DEPTH),
            FixedView::MidField => Vec3::new(0.0, Self::HEIGHT, 0.0),
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for FixedView {
    type Error = CameraError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(FixedView::OrangeGoal),
            1 => Ok(FixedView::BlueGoal),
            2 => Ok(FixedView::MidField),
            other => Err(CameraError::UnknownView(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Fixed(FixedView),
    /// Following the player at this roster index
    Tracking(usize),
}

impl Default for CameraMode {
    fn default() -> Self {
        CameraMode::Fixed(FixedView::OrangeGoal)
    }
}

/// Owns the camera mode and keeps at most one player active.
///
/// A player is active exactly while the mode is `Tracking` at its index;
/// every transition deactivates the current player before anything else.
#[derive(Debug, Default)]
pub struct CameraController {
    mode: CameraMode,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_fixed_view(&mut self, scene: &mut SceneState, view: FixedView) {
        self.deactivate(scene);
        scene.camera.position = view.position();
        self.mode = CameraMode::Fixed(view);
        debug!("Camera moved to fixed view {:?}", view);
    }

    /// Fails before touching any state when `id` is not a known view
    pub fn set_fixed_view_id(&mut self, scene: &mut SceneState, id: u8) -> Result<(), CameraError> {
        let view = FixedView::try_from(id)?;
        self.set_fixed_view(scene, view);
        Ok(())
    }

    /// Track the named player, or fall back to the orange goal view when
    /// the name is absent or not on the roster
    pub fn set_tracked_player(&mut self, scene: &mut SceneState, name: Option<&str>) {
        self.deactivate(scene);

        match name.and_then(|name| scene.player_index(name)) {
            Some(index) => self.track(scene, index),
            None => {
                if let Some(name) = name {
                    debug!("No player named {:?}, using default view", name);
                }
                self.set_fixed_view(scene, FixedView::OrangeGoal);
            }
        }
    }

    /// Move tracking to the next roster entry, wrapping around
    pub fn cycle_tracked_player(&mut self, scene: &mut SceneState) {
        if scene.players.is_empty() {
            return;
        }
        let next = match self.mode {
            CameraMode::Tracking(index) => (index + 1) % scene.players.len(),
            CameraMode::Fixed(_) => 0,
        };
        self.deactivate(scene);
        self.track(scene, next);
    }

    /// Per-tick camera update: aim at the ball and let the tracked player
    /// steer the camera
    pub fn on_frame(&self, scene: &mut SceneState, replay: &ReplayData, frame: usize) {
        let ball = scene.ball_position();
        scene.camera.look_at(ball);

        if let CameraMode::Tracking(index) = self.mode {
            let is_using_boost = replay.player_frame(index, frame).boost_active;
            let car = scene.root.get(scene.players[index].object()).transform;
            scene.players[index].update_camera(&mut scene.camera, &car, ball, is_using_boost);
        }
    }

    fn track(&mut self, scene: &mut SceneState, index: usize) {
        let car = scene.root.get(scene.players[index].object()).transform;
        let ball = scene.ball_position();
        scene.players[index].make_active(&mut scene.camera, &car, ball);
        self.mode = CameraMode::Tracking(index);
        debug!("Camera tracking {}", scene.players[index].name());
    }

    fn deactivate(&mut self, scene: &mut SceneState) {
        if let CameraMode::Tracking(index) = self.mode {
            scene.players[index].make_inactive(&mut scene.camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_ids_round_trip() {
        for id in 0..3u8 {
            assert_eq!(FixedView::try_from(id).unwrap().id(), id);
        }
        assert_eq!(FixedView::try_from(3), Err(CameraError::UnknownView(3)));
        assert_eq!(FixedView::try_from(255), Err(CameraError::UnknownView(255)));
    }

    #[test]
    fn view_positions() {
        assert_eq!(FixedView::OrangeGoal.position(), Vec3::new(0.0, 750.0, 5750.0));
        assert_eq!(FixedView::BlueGoal.position(), Vec3::new(0.0, 750.0, -5750.0));
        assert_eq!(FixedView::MidField.position(), Vec3::new(0.0, 750.0, 0.0));
    }

    #[test]
    fn default_mode_is_orange_goal() {
        assert_eq!(CameraController::new().mode(), CameraMode::Fixed(FixedView::OrangeGoal));
    }
}

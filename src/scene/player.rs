use glam::Vec3;

use super::{ObjectId, Transform};
use crate::camera::{PerspectiveCamera, DEFAULT_FOV};

/// Distance kept behind the car, away from the ball
pub const FOLLOW_DISTANCE: f32 = 350.0;
pub const FOLLOW_HEIGHT: f32 = 150.0;
/// Field of view approached while the tracked car boosts
pub const BOOST_FOV: f32 = 90.0;
/// Fraction of the remaining field-of-view gap closed per tick
pub const FOV_EASING: f32 = 0.2;

/// A roster entry with its car in the scene
#[derive(Debug, Clone)]
pub struct PlayerEntity {
    name: String,
    orange_team: bool,
    object: ObjectId,
    active: bool,
}

impl PlayerEntity {
    pub fn new(name: impl Into<String>, orange_team: bool, object: ObjectId) -> Self {
        Self {
            name: name.into(),
            orange_team,
            object,
            active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_orange_team(&self) -> bool {
        self.orange_team
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Take ownership of the camera and put it behind the car
    pub fn make_active(&mut self, camera: &mut PerspectiveCamera, car: &Transform, ball: Vec3) {
        self.active = true;
        camera.position = follow_position(car.position, ball);
        camera.look_at(ball);
    }

    /// Release the camera and restore its default lens
    pub fn make_inactive(&mut self, camera: &mut PerspectiveCamera) {
        if !self.active {
            return;
        }
        self.active = false;
        camera.fov = DEFAULT_FOV;
        camera.update_projection_matrix();
    }

    /// Follow the car while keeping the ball in view
    pub fn update_camera(
        &self,
        camera: &mut PerspectiveCamera,
        car: &Transform,
        ball: Vec3,
        is_using_boost: bool,
    ) {
        camera.position = follow_position(car.position, ball);
        camera.look_at(ball);

        let target_fov = if is_using_boost { BOOST_FOV } else { DEFAULT_FOV };
        camera.fov += (target_fov - camera.fov) * FOV_EASING;
        camera.update_projection_matrix();
    }
}

/// Behind the car on the ball-to-car line, raised above it
fn follow_position(car: Vec3, ball: Vec3) -> Vec3 {
    let mut away = car - ball;
    away.y = 0.0;
    let away = away.normalize_or(Vec3::Z);
    car + away * FOLLOW_DISTANCE + Vec3::Y * FOLLOW_HEIGHT
}

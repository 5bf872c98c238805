use std::sync::Arc;

use futures::future::LocalBoxFuture;
use futures::TryFutureExt;
use glam::{Quat, Vec3};
use log::info;

use super::{
    Light, Model, ModelPart, PlayerEntity, Scene, SceneObject, SceneState, Transform, BALL_NAME,
};
use crate::camera::{PerspectiveCamera, DEFAULT_FOV, FAR_PLANE, NEAR_PLANE};
use crate::core::WindowDimensions;
use crate::error::{AssetKind, StartupError};
use crate::math::{hex_to_rgb, AABB};
use crate::playback::camera_controller::FixedView;
use crate::playback::mixer::{AnimationClip, MixerBridge};
use crate::replay::ReplayData;

pub const BALL_SCALE: f32 = 90.0;
pub const CAR_SCALE: f32 = 20.0;

pub const ORANGE_TEAM_COLOR: u32 = 0xff9800;
pub const BLUE_TEAM_COLOR: u32 = 0x2196f3;

const AMBIENT_LIGHT: u32 = 0x444444;
const SKY_LIGHT: u32 = 0xffffbb;
const GROUND_LIGHT: u32 = 0x080820;

/// Distance of each goal mouth from midfield along z
pub const GOAL_DISTANCE: f32 = 5120.0;
const GOAL_WIDTH: f32 = 2000.0;
const GOAL_HEIGHT: f32 = 1284.5;

/// Source of the three models a replay scene needs
pub trait AssetLoader {
    fn load_field(&self) -> LocalBoxFuture<'_, anyhow::Result<Model>>;
    fn load_ball(&self) -> LocalBoxFuture<'_, anyhow::Result<Model>>;
    fn load_car(&self) -> LocalBoxFuture<'_, anyhow::Result<Model>>;
}

/// Everything playback needs, published only once complete
#[derive(Debug, Clone)]
pub struct Assembly {
    pub scene: SceneState,
    pub mixers: MixerBridge,
}

/// Loads assets concurrently and builds the replay scene
pub struct SceneAssembler<L> {
    loader: L,
    replay: Arc<ReplayData>,
    viewport: WindowDimensions,
    fallback_fps: f32,
}

impl<L: AssetLoader> SceneAssembler<L> {
    pub fn new(loader: L, replay: Arc<ReplayData>) -> Self {
        Self {
            loader,
            replay,
            viewport: WindowDimensions::default(),
            fallback_fps: 30.0,
        }
    }

    /// Size used for the initial camera aspect
    pub fn with_viewport(mut self, viewport: WindowDimensions) -> Self {
        self.viewport = viewport;
        self
    }

    /// Frame rate used for clips when the replay carries no timeline
    pub fn with_fallback_fps(mut self, fps: f32) -> Self {
        self.fallback_fps = fps;
        self
    }

    pub fn replay(&self) -> &Arc<ReplayData> {
        &self.replay
    }

    pub fn fallback_fps(&self) -> f32 {
        self.fallback_fps
    }

    /// Load field, ball and car together.
    ///
    /// The first load to fail resolves the join and the remaining loads are
    /// dropped; nothing is built in that case.
    pub async fn assemble(&self) -> Result<Assembly, StartupError> {
        self.replay.validate()?;

        let field = self
            .loader
            .load_field()
            .map_err(|e| StartupError::asset_load(AssetKind::Field, e));
        let ball = self
            .loader
            .load_ball()
            .map_err(|e| StartupError::asset_load(AssetKind::Ball, e));
        let car = self
            .loader
            .load_car()
            .map_err(|e| StartupError::asset_load(AssetKind::Car, e));

        let (field, ball, car) = futures::try_join!(field, ball, car)?;

        let builder = SceneBuilder {
            replay: &self.replay,
            viewport: self.viewport,
            fallback_fps: self.fallback_fps,
        };
        Ok(builder.build(field, ball, car))
    }
}

struct SceneBuilder<'a> {
    replay: &'a ReplayData,
    viewport: WindowDimensions,
    fallback_fps: f32,
}

impl SceneBuilder<'_> {
    fn build(&self, field: Model, ball: Model, car: Model) -> Assembly {
        let mut root = Scene::new();
        root.background = [0.0; 3];

        let goal = Arc::new(goal_model());
        root.add(
            SceneObject::new("blue goal", goal.clone())
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -GOAL_DISTANCE)))
                .with_tint(hex_to_rgb(BLUE_TEAM_COLOR)),
        );
        root.add(
            SceneObject::new("orange goal", goal)
                .with_transform(
                    Transform::from_position(Vec3::new(0.0, 0.0, GOAL_DISTANCE))
                        .with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
                )
                .with_tint(hex_to_rgb(ORANGE_TEAM_COLOR)),
        );

        root.add_light(Light::Ambient {
            color: hex_to_rgb(AMBIENT_LIGHT),
        });
        root.add_light(Light::Hemisphere {
            sky: hex_to_rgb(SKY_LIGHT),
            ground: hex_to_rgb(GROUND_LIGHT),
            intensity: 1.0,
        });

        let ground = root.add(SceneObject::new("field", Arc::new(field)));

        let frame_times = self.replay.frame_times(self.fallback_fps);
        let mut mixers = MixerBridge::new();

        let ball_clip = AnimationClip::from_ball_track(self.replay, &frame_times);
        let ball_id = root.add(
            SceneObject::new(BALL_NAME, Arc::new(ball))
                .with_transform(initial_transform(&ball_clip, BALL_SCALE)),
        );
        let ball_mixer = mixers.add_mixer(ball_id);
        if !ball_clip.is_empty() {
            mixers.add_clip(ball_mixer, ball_clip);
        }

        let car = Arc::new(car);
        let mut players = Vec::with_capacity(self.replay.player_count());
        for (index, (name, &orange_team)) in
            self.replay.names.iter().zip(&self.replay.colors).enumerate()
        {
            let clip = AnimationClip::from_player_track(self.replay, index, &frame_times);
            let team_color = if orange_team { ORANGE_TEAM_COLOR } else { BLUE_TEAM_COLOR };

            let object = root.add(
                SceneObject::new(name.clone(), car.clone())
                    .with_transform(initial_transform(&clip, CAR_SCALE))
                    .with_tint(hex_to_rgb(team_color)),
            );
            let mixer = mixers.add_mixer(object);
            if !clip.is_empty() {
                mixers.add_clip(mixer, clip);
            }
            players.push(PlayerEntity::new(name.clone(), orange_team, object));
        }

        let mut camera =
            PerspectiveCamera::new(DEFAULT_FOV, self.viewport.aspect(), NEAR_PLANE, FAR_PLANE);
        camera.position = FixedView::OrangeGoal.position();
        camera.look_at(root.get(ball_id).transform.position);

        info!(
            "Assembled replay scene: {} objects, {} players, {} frames",
            root.len(),
            players.len(),
            frame_times.len()
        );

        Assembly {
            scene: SceneState {
                root,
                camera,
                ball: ball_id,
                ground,
                players,
            },
            mixers,
        }
    }
}

/// Upright goal mouth plane, centered on its origin
fn goal_model() -> Model {
    let half = Vec3::new(GOAL_WIDTH / 2.0, GOAL_HEIGHT / 2.0, 0.0);
    Model::new("goal", vec![ModelPart::new(AABB::new(-half, half), [1.0; 3])])
}

fn initial_transform(clip: &AnimationClip, scale: f32) -> Transform {
    let transform = Transform::default().with_scale(scale);
    match clip.sample(0.0) {
        Some((position, rotation)) => Transform {
            position,
            rotation,
            ..transform
        },
        None => transform,
    }
}

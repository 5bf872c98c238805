use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::replay::ReplayData;
use crate::scene::{ObjectId, Scene};

/// Pose of an object at a point in clip time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Keyframed transform track, sampled with linear interpolation
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    keyframes: Vec<Keyframe>,
}

impl AnimationClip {
    /// Keyframes must be sorted by time
    pub fn new(name: impl Into<String>, keyframes: Vec<Keyframe>) -> Self {
        Self {
            name: name.into(),
            keyframes,
        }
    }

    pub fn from_ball_track(replay: &ReplayData, frame_times: &[f32]) -> Self {
        let keyframes = replay
            .ball
            .iter()
            .zip(frame_times)
            .map(|(frame, &time)| Keyframe {
                time,
                position: frame.position,
                rotation: frame.orientation(),
            })
            .collect();
        Self::new("ball", keyframes)
    }

    pub fn from_player_track(replay: &ReplayData, player: usize, frame_times: &[f32]) -> Self {
        let keyframes = replay.players[player]
            .iter()
            .zip(frame_times)
            .map(|(frame, &time)| Keyframe {
                time,
                position: frame.position,
                rotation: frame.orientation(),
            })
            .collect();
        Self::new(replay.names[player].clone(), keyframes)
    }

    pub fn duration(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Pose at `time`, clamped to the first and last keyframes
    pub fn sample(&self, time: f32) -> Option<(Vec3, Quat)> {
        let first = self.keyframes.first()?;
        let next = self.keyframes.partition_point(|k| k.time <= time);

        if next == 0 {
            return Some((first.position, first.rotation));
        }
        let a = &self.keyframes[next - 1];
        let Some(b) = self.keyframes.get(next) else {
            return Some((a.position, a.rotation));
        };

        let span = b.time - a.time;
        let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };
        Some((a.position.lerp(b.position, t), a.rotation.slerp(b.rotation, t)))
    }
}

/// A clip bound to a mixer, with its own playhead
#[derive(Debug, Clone)]
struct ClipAction {
    clip: Arc<AnimationClip>,
    time: f32,
    playing: bool,
}

#[derive(Debug, Clone)]
struct AnimationMixer {
    target: ObjectId,
    action: Option<ClipAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixerId(usize);

/// Advances every animated object by elapsed time
#[derive(Debug, Clone, Default)]
pub struct MixerBridge {
    mixers: Vec<AnimationMixer>,
}

impl MixerBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mixer(&mut self, target: ObjectId) -> MixerId {
        self.mixers.push(AnimationMixer {
            target,
            action: None,
        });
        MixerId(self.mixers.len() - 1)
    }

    /// Attach a clip; it stays pending until `play_clips`
    pub fn add_clip(&mut self, mixer: MixerId, clip: AnimationClip) {
        self.mixers[mixer.0].action = Some(ClipAction {
            clip: Arc::new(clip),
            time: 0.0,
            playing: false,
        });
    }

    /// Begin every pending clip, returns how many started
    pub fn play_clips(&mut self) -> usize {
        let mut started = 0;
        for action in self.mixers.iter_mut().filter_map(|m| m.action.as_mut()) {
            if !action.playing {
                action.playing = true;
                started += 1;
            }
        }
        started
    }

    /// Advance playing clips and write their poses into the scene
    pub fn update(&mut self, delta: f32, scene: &mut Scene) {
        let delta = delta.max(0.0);

        for mixer in &mut self.mixers {
            let Some(action) = mixer.action.as_mut().filter(|a| a.playing) else {
                continue;
            };
            action.time += delta;

            if let Some((position, rotation)) = action.clip.sample(action.time) {
                let transform = &mut scene.get_mut(mixer.target).transform;
                transform.position = position;
                transform.rotation = rotation;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.mixers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mixers.is_empty()
    }

    pub fn target(&self, mixer: MixerId) -> ObjectId {
        self.mixers[mixer.0].target
    }

    /// Playhead of the mixer's clip, None without one
    pub fn time(&self, mixer: MixerId) -> Option<f32> {
        self.mixers[mixer.0].action.as_ref().map(|a| a.time)
    }

    pub fn is_playing(&self, mixer: MixerId) -> bool {
        self.mixers[mixer.0].action.as_ref().is_some_and(|a| a.playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Model, SceneObject};

    fn linear_clip() -> AnimationClip {
        AnimationClip::new(
            "line",
            vec![
                Keyframe { time: 0.0, position: Vec3::ZERO, rotation: Quat::IDENTITY },
                Keyframe { time: 1.0, position: Vec3::new(10.0, 0.0, 0.0), rotation: Quat::IDENTITY },
                Keyframe { time: 2.0, position: Vec3::new(10.0, 20.0, 0.0), rotation: Quat::IDENTITY },
            ],
        )
    }

    fn scene_with_object() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let id = scene.add(SceneObject::new("ball", Arc::new(Model::new("ball", vec![]))));
        (scene, id)
    }

    #[test]
    fn sample_interpolates_between_keyframes() {
        let clip = linear_clip();
        assert_eq!(clip.sample(0.5).unwrap().0, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(clip.sample(1.5).unwrap().0, Vec3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn sample_clamps_outside_range() {
        let clip = linear_clip();
        assert_eq!(clip.sample(-1.0).unwrap().0, Vec3::ZERO);
        assert_eq!(clip.sample(9.0).unwrap().0, Vec3::new(10.0, 20.0, 0.0));
        assert_eq!(clip.duration(), 2.0);
    }

    #[test]
    fn empty_clip_has_no_pose() {
        let clip = AnimationClip::new("empty", vec![]);
        assert!(clip.sample(0.0).is_none());
        assert_eq!(clip.duration(), 0.0);
    }

    #[test]
    fn pending_clip_does_not_advance() {
        let (mut scene, id) = scene_with_object();
        let mut bridge = MixerBridge::new();
        let mixer = bridge.add_mixer(id);
        bridge.add_clip(mixer, linear_clip());

        bridge.update(0.5, &mut scene);
        assert_eq!(bridge.time(mixer), Some(0.0));
        assert_eq!(scene.get(id).transform.position, Vec3::ZERO);
        assert!(!bridge.is_playing(mixer));
    }

    #[test]
    fn playing_clip_moves_target() {
        let (mut scene, id) = scene_with_object();
        let mut bridge = MixerBridge::new();
        let mixer = bridge.add_mixer(id);
        bridge.add_clip(mixer, linear_clip());

        assert_eq!(bridge.play_clips(), 1);
        assert_eq!(bridge.play_clips(), 0);

        bridge.update(0.5, &mut scene);
        bridge.update(0.5, &mut scene);
        assert_eq!(bridge.time(mixer), Some(1.0));
        assert_eq!(scene.get(id).transform.position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn update_preserves_scale() {
        let (mut scene, id) = scene_with_object();
        scene.get_mut(id).transform.scale = Vec3::splat(90.0);
        let mut bridge = MixerBridge::new();
        let mixer = bridge.add_mixer(id);
        bridge.add_clip(mixer, linear_clip());
        bridge.play_clips();

        bridge.update(0.25, &mut scene);
        assert_eq!(scene.get(id).transform.scale, Vec3::splat(90.0));
    }

    #[test]
    fn negative_delta_is_ignored() {
        let (mut scene, id) = scene_with_object();
        let mut bridge = MixerBridge::new();
        let mixer = bridge.add_mixer(id);
        bridge.add_clip(mixer, linear_clip());
        bridge.play_clips();

        bridge.update(0.5, &mut scene);
        bridge.update(-3.0, &mut scene);
        assert_eq!(bridge.time(mixer), Some(0.5));
    }

    #[test]
    fn mixer_without_clip_is_inert() {
        let (mut scene, id) = scene_with_object();
        let mut bridge = MixerBridge::new();
        let mixer = bridge.add_mixer(id);

        assert_eq!(bridge.play_clips(), 0);
        bridge.update(1.0, &mut scene);
        assert_eq!(bridge.time(mixer), None);
        assert_eq!(bridge.target(mixer), id);
        assert_eq!(bridge.len(), 1);
    }
}

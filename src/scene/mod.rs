//! Scene graph owned by the viewer: an arena of objects plus the handles the
//! playback engine animates and the camera it drives.

pub mod assembler;
pub mod player;

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::camera::PerspectiveCamera;
use crate::math::AABB;

pub use assembler::{AssetLoader, Assembly, SceneAssembler};
pub use player::PlayerEntity;

/// Name given to the ball object
pub const BALL_NAME: &str = "ball";

/// Colored box making up part of a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPart {
    pub bounds: AABB,
    pub color: [f32; 3],
    /// Whether an object tint repaints this part
    pub tintable: bool,
}

impl ModelPart {
    pub fn new(bounds: AABB, color: [f32; 3]) -> Self {
        Self {
            bounds,
            color,
            tintable: true,
        }
    }

    /// Part that keeps its own color under any tint
    pub fn fixed(bounds: AABB, color: [f32; 3]) -> Self {
        Self {
            tintable: false,
            ..Self::new(bounds, color)
        }
    }
}

/// Scene lighting, applied uniformly by the wireframe raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: [f32; 3] },
    /// Sky color from above, ground color from below
    Hemisphere {
        sky: [f32; 3],
        ground: [f32; 3],
        intensity: f32,
    },
}

impl Light {
    /// Average contribution over all surface orientations
    pub fn contribution(&self) -> Vec3 {
        match *self {
            Light::Ambient { color } => Vec3::from_array(color),
            Light::Hemisphere {
                sky,
                ground,
                intensity,
            } => (Vec3::from_array(sky) + Vec3::from_array(ground)) * 0.5 * intensity,
        }
    }
}

/// Loaded visual geometry, shared between clones
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub parts: Vec<ModelPart>,
}

impl Model {
    pub fn new(name: impl Into<String>, parts: Vec<ModelPart>) -> Self {
        Self {
            name: name.into(),
            parts,
        }
    }

    pub fn bounds(&self) -> Option<AABB> {
        self.parts
            .iter()
            .map(|p| p.bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Index of an object in its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub transform: Transform,
    pub model: Option<Arc<Model>>,
    /// Overrides the color of tintable parts when set
    pub tint: Option<[f32; 3]>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, model: Arc<Model>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            model: Some(model),
            tint: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_tint(mut self, tint: [f32; 3]) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn part_color(&self, part: &ModelPart) -> [f32; 3] {
        match self.tint {
            Some(tint) if part.tintable => tint,
            _ => part.color,
        }
    }
}

/// Scene root
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
    pub background: [f32; 3],
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn get(&self, id: ObjectId) -> &SceneObject {
        &self.objects[id.0]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut SceneObject {
        &mut self.objects[id.0]
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects.iter().position(|o| o.name == name).map(ObjectId)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Combined light level per channel; an unlit scene shows raw colors
    pub fn illumination(&self) -> Vec3 {
        if self.lights.is_empty() {
            return Vec3::ONE;
        }
        self.lights
            .iter()
            .map(Light::contribution)
            .sum::<Vec3>()
            .min(Vec3::ONE)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Fully assembled scene: only ever constructed complete
#[derive(Debug, Clone)]
pub struct SceneState {
    pub root: Scene,
    pub camera: PerspectiveCamera,
    pub ball: ObjectId,
    pub ground: ObjectId,
    pub players: Vec<PlayerEntity>,
}

impl SceneState {
    pub fn ball_position(&self) -> Vec3 {
        self.root.get(self.ball).transform.position
    }

    pub fn player_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name() == name)
    }

    pub fn player(&self, name: &str) -> Option<&PlayerEntity> {
        self.players.iter().find(|p| p.name() == name)
    }

    pub fn active_player(&self) -> Option<&PlayerEntity> {
        self.players.iter().find(|p| p.is_active())
    }

    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Arc<Model> {
        Arc::new(Model::new(
            "cube",
            vec![ModelPart::new(AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0)), [1.0; 3])],
        ))
    }

    #[test]
    fn scene_add_and_find() {
        let mut scene = Scene::new();
        let a = scene.add(SceneObject::new("a", cube()));
        let b = scene.add(SceneObject::new(BALL_NAME, cube()));

        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.find(BALL_NAME), Some(b));
        assert_eq!(scene.find("missing"), None);
    }

    #[test]
    fn clones_share_geometry() {
        let model = cube();
        let mut scene = Scene::new();
        let a = scene.add(SceneObject::new("a", model.clone()));
        let b = scene.add(SceneObject::new("b", model.clone()).with_tint([1.0, 0.0, 0.0]));

        assert_eq!(Arc::strong_count(&model), 3);
        assert_eq!(scene.get(a).tint, None);
        assert_eq!(scene.get(b).tint, Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn tint_skips_fixed_parts() {
        let bounds = AABB::new(Vec3::ZERO, Vec3::ONE);
        let body = ModelPart::new(bounds, [0.5; 3]);
        let chassis = ModelPart::fixed(bounds, [0.2; 3]);
        let object = SceneObject::new("car", cube()).with_tint([1.0, 0.0, 0.0]);

        assert_eq!(object.part_color(&body), [1.0, 0.0, 0.0]);
        assert_eq!(object.part_color(&chassis), [0.2; 3]);
        assert_eq!(SceneObject::new("car", cube()).part_color(&body), [0.5; 3]);
    }

    #[test]
    fn illumination_sums_lights_and_saturates() {
        let mut scene = Scene::new();
        assert_eq!(scene.illumination(), Vec3::ONE);

        scene.add_light(Light::Ambient { color: [0.25; 3] });
        scene.add_light(Light::Hemisphere {
            sky: [1.0, 1.0, 0.5],
            ground: [0.0, 0.0, 0.5],
            intensity: 1.0,
        });
        assert_eq!(scene.illumination(), Vec3::new(0.75, 0.75, 0.75));

        scene.add_light(Light::Ambient { color: [1.0; 3] });
        assert_eq!(scene.illumination(), Vec3::ONE);
    }

    #[test]
    fn transform_matrix_applies_scale_then_translation() {
        let transform = Transform::from_position(Vec3::new(0.0, 10.0, 0.0)).with_scale(90.0);
        let p = transform.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Vec3::new(90.0, 10.0, 0.0));
    }

    #[test]
    fn model_bounds_union_parts() {
        let model = Model::new(
            "car",
            vec![
                ModelPart::new(AABB::new(Vec3::ZERO, Vec3::ONE), [0.0; 3]),
                ModelPart::new(AABB::new(Vec3::splat(-2.0), Vec3::ZERO), [0.0; 3]),
            ],
        );
        let bounds = model.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::splat(-2.0));
        assert_eq!(bounds.max, Vec3::ONE);
        assert!(Model::new("empty", vec![]).bounds().is_none());
    }
}

//! Built-in box models for when no glTF assets are supplied.
//!
//! Field dimensions are in world units; ball and car are unit-scale and
//! rely on the scene scale applied at assembly.

use futures::future::LocalBoxFuture;
use glam::Vec3;

use crate::math::{hex_to_rgb, AABB};
use crate::scene::{AssetLoader, Model, ModelPart};

const FIELD_HALF_WIDTH: f32 = 4096.0;
const FIELD_HALF_LENGTH: f32 = 5120.0;
const CEILING_HEIGHT: f32 = 2044.0;

const GRASS_COLOR: u32 = 0x4caf50;
const WALL_COLOR: u32 = 0x9e9e9e;
const CHASSIS_COLOR: u32 = 0x555555;
const CABIN_COLOR: u32 = 0xffffff;

pub fn field_model() -> Model {
    Model::new(
        "field",
        vec![
            ModelPart::new(
                AABB::new(
                    Vec3::new(-FIELD_HALF_WIDTH, -1.0, -FIELD_HALF_LENGTH),
                    Vec3::new(FIELD_HALF_WIDTH, 0.0, FIELD_HALF_LENGTH),
                ),
                hex_to_rgb(GRASS_COLOR),
            ),
            ModelPart::new(
                AABB::new(
                    Vec3::new(-FIELD_HALF_WIDTH, 0.0, -FIELD_HALF_LENGTH),
                    Vec3::new(FIELD_HALF_WIDTH, CEILING_HEIGHT, FIELD_HALF_LENGTH),
                ),
                hex_to_rgb(WALL_COLOR),
            ),
        ],
    )
}

/// Unit ball: radius 1 before scaling
pub fn ball_model() -> Model {
    Model::new(
        "ball",
        vec![ModelPart::new(AABB::new(Vec3::splat(-1.0), Vec3::ONE), [1.0; 3])],
    )
}

/// Grey chassis under a cabin that takes the team color, nose along +z
pub fn car_model() -> Model {
    Model::new(
        "car",
        vec![
            ModelPart::fixed(
                AABB::from_arrays([-2.1, 0.0, -2.95], [2.1, 1.0, 2.95]),
                hex_to_rgb(CHASSIS_COLOR),
            ),
            ModelPart::new(
                AABB::from_arrays([-1.6, 1.0, -1.4], [1.6, 1.8, 0.9]),
                hex_to_rgb(CABIN_COLOR),
            ),
        ],
    )
}

/// Loader that never touches the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralAssetLoader;

impl AssetLoader for ProceduralAssetLoader {
    fn load_field(&self) -> LocalBoxFuture<'_, anyhow::Result<Model>> {
        Box::pin(async { Ok(field_model()) })
    }

    fn load_ball(&self) -> LocalBoxFuture<'_, anyhow::Result<Model>> {
        Box::pin(async { Ok(ball_model()) })
    }

    fn load_car(&self) -> LocalBoxFuture<'_, anyhow::Result<Model>> {
        Box::pin(async { Ok(car_model()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_spans_both_goals() {
        let bounds = field_model().bounds().unwrap();
        assert_eq!(bounds.min.z, -FIELD_HALF_LENGTH);
        assert_eq!(bounds.max.z, FIELD_HALF_LENGTH);
        assert_eq!(bounds.max.y, CEILING_HEIGHT);
    }

    #[test]
    fn ball_is_unit_radius() {
        assert_eq!(ball_model().bounds().unwrap().size(), Vec3::splat(2.0));
    }

    #[test]
    fn procedural_loader_always_succeeds() {
        let loader = ProceduralAssetLoader;
        assert_eq!(pollster::block_on(loader.load_field()).unwrap().name, "field");
        assert_eq!(pollster::block_on(loader.load_ball()).unwrap().name, "ball");
        assert_eq!(pollster::block_on(loader.load_car()).unwrap().parts.len(), 2);
    }
}

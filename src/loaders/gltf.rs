use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use glam::{Mat4, Vec3};
use log::{debug, info, warn};

use super::procedural;
use crate::math::AABB;
use crate::scene::{AssetLoader, Model, ModelPart};

/// Loads a glTF file as a model with one box per mesh primitive
pub fn load_model(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    info!("Loading glTF file: {:?}", path);

    let (gltf, buffers, _images) =
        gltf::import(path).context(format!("Failed to load glTF file: {:?}", path))?;

    debug!(
        "glTF loaded: {} scenes, {} nodes, {} meshes",
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count()
    );

    let mut parts = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut parts)?;
        }
    }

    if parts.is_empty() {
        warn!("No geometry found in glTF file {:?}", path);
        // Magenta marks a model with nothing to draw
        parts.push(ModelPart::new(
            AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
            [1.0, 0.0, 1.0],
        ));
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    debug!("Extracted {} parts from {:?}", parts.len(), path);
    Ok(Model::new(name, parts))
}

fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    parts: &mut Vec<ModelPart>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, parts)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, parts)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    parts: &mut Vec<ModelPart>,
) -> Result<()> {
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions = reader
            .read_positions()
            .context("Mesh primitive has no positions")?;

        let vertices = positions.map(|pos| transform.transform_point3(Vec3::from_array(pos)));
        let Some(bounds) = AABB::from_points(vertices) else {
            continue;
        };

        let base_color = primitive.material().pbr_metallic_roughness().base_color_factor();
        parts.push(ModelPart::new(bounds, [base_color[0], base_color[1], base_color[2]]));
    }

    Ok(())
}

/// Import a file on a worker thread; the returned future resolves when the
/// import finishes
fn load_in_background(path: PathBuf) -> LocalBoxFuture<'static, Result<Model>> {
    let (sender, receiver) = oneshot::channel();

    let spawned = std::thread::Builder::new()
        .name("gltf-loader".to_string())
        .spawn(move || {
            // The receiver is gone when the join already failed elsewhere
            let _ = sender.send(load_model(&path));
        });

    Box::pin(async move {
        spawned.context("Failed to spawn glTF loader thread")?;
        receiver
            .await
            .context("glTF loader thread exited without a result")?
    })
}

/// glTF-backed loader; any model without a path uses the built-in one
#[derive(Debug, Clone, Default)]
pub struct GltfAssetLoader {
    pub field: Option<PathBuf>,
    pub ball: Option<PathBuf>,
    pub car: Option<PathBuf>,
}

impl GltfAssetLoader {
    fn load(path: Option<&PathBuf>, fallback: fn() -> Model) -> LocalBoxFuture<'static, Result<Model>> {
        match path {
            Some(path) => load_in_background(path.clone()),
            None => Box::pin(async move { Ok(fallback()) }),
        }
    }
}

impl AssetLoader for GltfAssetLoader {
    fn load_field(&self) -> LocalBoxFuture<'_, Result<Model>> {
        Self::load(self.field.as_ref(), procedural::field_model)
    }

    fn load_ball(&self) -> LocalBoxFuture<'_, Result<Model>> {
        Self::load(self.ball.as_ref(), procedural::ball_model)
    }

    fn load_car(&self) -> LocalBoxFuture<'_, Result<Model>> {
        Self::load(self.car.as_ref(), procedural::car_model)
    }
}

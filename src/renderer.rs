//! CPU wireframe renderer: every model part is drawn as the twelve edges of
//! its box, projected through the scene camera into an RGBA canvas.

use glam::{Mat4, Vec3, Vec4};

use crate::core::{Canvas, DrawOp, Rgba};
use crate::error::RenderError;
use crate::math::{rgb_to_rgba8, BOX_EDGES};
use crate::scene::SceneState;
use crate::traits::SceneRenderer;

/// Smallest clip-space w kept when clipping edges against the eye
const MIN_CLIP_W: f32 = 1e-3;

const BALL_MARKER: Rgba = [255, 255, 255, 255];
const MIN_MARKER_RADIUS: f32 = 2.0;
const MAX_MARKER_RADIUS: f32 = 256.0;

pub struct SoftwareRenderer {
    canvas: Canvas,
    frames: u64,
    detached: bool,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            frames: 0,
            detached: false,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Frames drawn since creation
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    fn rasterize(&mut self, scene: &SceneState) {
        let (width, height) = self.canvas.dimensions();
        let view_projection = scene.camera.view_projection_matrix();
        let screen = ScreenMapping::new(width, height);
        let illumination = scene.root.illumination();

        self.canvas.push(DrawOp::Clear(rgb_to_rgba8(scene.root.background)));

        for object in scene.root.objects() {
            let Some(model) = object.model.as_ref() else {
                continue;
            };
            let model_view_projection = view_projection * object.transform.matrix();

            for part in &model.parts {
                let lit = Vec3::from_array(object.part_color(part)) * illumination;
                let color = rgb_to_rgba8(lit.to_array());
                let corners = part
                    .bounds
                    .corners()
                    .map(|corner| model_view_projection * corner.extend(1.0));

                for (a, b) in BOX_EDGES {
                    if let Some((x1, y1, x2, y2)) = screen.segment(corners[a], corners[b]) {
                        self.canvas.push(DrawOp::Line { x1, y1, x2, y2, color });
                    }
                }
            }
        }

        if let Some(marker) = ball_marker(scene, &view_projection, &screen) {
            self.canvas.push(marker);
        }

        self.canvas.flush();
    }
}

impl SceneRenderer for SoftwareRenderer {
    fn render(&mut self, scene: &SceneState) -> Result<(), RenderError> {
        if self.detached {
            return Ok(());
        }
        self.rasterize(scene);
        self.frames += 1;
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if (width, height) != self.canvas.dimensions() {
            self.canvas.resize(width, height);
        }
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}

/// Clip space to pixel coordinates, y down
struct ScreenMapping {
    half_width: f32,
    half_height: f32,
}

impl ScreenMapping {
    fn new(width: u32, height: u32) -> Self {
        Self {
            half_width: width as f32 * 0.5,
            half_height: height as f32 * 0.5,
        }
    }

    fn point(&self, clip: Vec4) -> (f32, f32) {
        let ndc = clip / clip.w;
        (
            (ndc.x + 1.0) * self.half_width,
            (1.0 - ndc.y) * self.half_height,
        )
    }

    /// Edge clipped to the part in front of the eye
    fn segment(&self, mut a: Vec4, mut b: Vec4) -> Option<(f32, f32, f32, f32)> {
        if a.w < MIN_CLIP_W && b.w < MIN_CLIP_W {
            return None;
        }
        if a.w < MIN_CLIP_W {
            a = a.lerp(b, (MIN_CLIP_W - a.w) / (b.w - a.w));
        } else if b.w < MIN_CLIP_W {
            b = b.lerp(a, (MIN_CLIP_W - b.w) / (a.w - b.w));
        }

        let (x1, y1) = self.point(a);
        let (x2, y2) = self.point(b);
        Some((x1, y1, x2, y2))
    }
}

/// Filled disc over the ball so it stays visible at a distance
fn ball_marker(scene: &SceneState, view_projection: &Mat4, screen: &ScreenMapping) -> Option<DrawOp> {
    let ball = scene.root.get(scene.ball);
    let clip = *view_projection * ball.transform.position.extend(1.0);
    if clip.w < MIN_CLIP_W {
        return None;
    }

    let model_radius = ball
        .model
        .as_ref()
        .and_then(|model| model.bounds())
        .map_or(0.5, |bounds| bounds.size().max_element() * 0.5);
    let world_radius = model_radius * ball.transform.scale.max_element();

    let focal = scene.camera.projection_matrix().y_axis.y;
    let radius = (world_radius * focal * screen.half_height / clip.w)
        .clamp(MIN_MARKER_RADIUS, MAX_MARKER_RADIUS);

    let (x, y) = screen.point(clip);
    Some(DrawOp::FilledCircle {
        cx: x.round() as i32,
        cy: y.round() as i32,
        radius: radius.round() as u32,
        color: BALL_MARKER,
    })
}

/// World position to pixel coordinates, None when behind the camera
pub fn project_to_screen(scene: &SceneState, point: Vec3, width: u32, height: u32) -> Option<(f32, f32)> {
    let clip = scene.camera.project(point);
    if clip.w < MIN_CLIP_W {
        return None;
    }
    Some(ScreenMapping::new(width, height).point(clip))
}

use std::sync::Arc;

use winit::window::Window;

use crate::core::SurfaceRenderer;
use crate::error::RenderError;
use crate::renderer::SoftwareRenderer;
use crate::scene::SceneState;
use crate::traits::SceneRenderer;

/// Software raster presented on a window surface
pub struct WindowRenderer {
    raster: SoftwareRenderer,
    surface: Option<SurfaceRenderer>,
}

impl WindowRenderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let surface = SurfaceRenderer::new(window).await?;

        Ok(Self {
            raster: SoftwareRenderer::new(size.width.max(1), size.height.max(1)),
            surface: Some(surface),
        })
    }

    pub fn frames_rendered(&self) -> u64 {
        self.raster.frames_rendered()
    }
}

impl SceneRenderer for WindowRenderer {
    /// Full render cycle: rasterize the scene, then present the pixels
    fn render(&mut self, scene: &SceneState) -> Result<(), RenderError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };

        self.raster.render(scene)?;
        let canvas = self.raster.canvas();
        let (width, height) = canvas.dimensions();
        surface.render_pixels(canvas.pixels(), width, height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.raster.set_size(width, height);
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
    }

    fn detach(&mut self) {
        self.raster.detach();
        self.surface = None;
    }
}

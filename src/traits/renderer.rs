use crate::error::RenderError;
use crate::scene::SceneState;

/// Draws a scene into whatever surface the host provides
pub trait SceneRenderer {
    /// Draw one frame from the scene's camera
    fn render(&mut self, scene: &SceneState) -> Result<(), RenderError>;

    /// Resize the output in physical pixels
    fn set_size(&mut self, width: u32, height: u32);

    /// Release the output surface; later renders are no-ops
    fn detach(&mut self);
}

use std::sync::Arc;

use crate::camera::PerspectiveCamera;
use crate::core::{Viewport, WindowDimensions};
use crate::traits::SceneRenderer;

/// Keeps camera aspect and renderer size in step with the host container
#[derive(Clone, Default)]
pub struct ResizeCoordinator {
    container: Option<Arc<dyn Viewport>>,
}

impl ResizeCoordinator {
    pub fn new(container: Option<Arc<dyn Viewport>>) -> Self {
        Self { container }
    }

    pub fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    /// Forget the container; later sizes fall back to the default
    pub fn detach(&mut self) {
        self.container = None;
    }

    /// Container size, or 640x480 when detached or collapsed
    pub fn dimensions(&self) -> WindowDimensions {
        self.container
            .as_ref()
            .and_then(|container| container.dimensions())
            .filter(|dimensions| !dimensions.is_empty())
            .unwrap_or_default()
    }

    /// Push the current size into the camera and the renderer
    pub fn apply(
        &self,
        camera: &mut PerspectiveCamera,
        renderer: &mut dyn SceneRenderer,
    ) -> WindowDimensions {
        let dimensions = self.dimensions();
        camera.aspect = dimensions.aspect();
        camera.update_projection_matrix();
        renderer.set_size(dimensions.width, dimensions.height);
        dimensions
    }
}

impl std::fmt::Debug for ResizeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeCoordinator")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedViewport;
    use crate::error::RenderError;
    use crate::scene::SceneState;

    #[derive(Default)]
    struct SizeRecorder {
        size: Option<(u32, u32)>,
    }

    impl SceneRenderer for SizeRecorder {
        fn render(&mut self, _scene: &SceneState) -> Result<(), RenderError> {
            Ok(())
        }

        fn set_size(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }

        fn detach(&mut self) {}
    }

    fn coordinator(width: u32, height: u32) -> ResizeCoordinator {
        ResizeCoordinator::new(Some(Arc::new(FixedViewport(WindowDimensions::new(width, height)))))
    }

    #[test]
    fn apply_sets_aspect_and_renderer_size() {
        let mut camera = PerspectiveCamera::default();
        let mut renderer = SizeRecorder::default();

        let dimensions = coordinator(1000, 500).apply(&mut camera, &mut renderer);

        assert_eq!(dimensions, WindowDimensions::new(1000, 500));
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(renderer.size, Some((1000, 500)));
    }

    #[test]
    fn missing_container_uses_default_size() {
        let mut camera = PerspectiveCamera::default();
        let mut renderer = SizeRecorder::default();

        let dimensions = ResizeCoordinator::default().apply(&mut camera, &mut renderer);

        assert_eq!(dimensions, WindowDimensions::new(640, 480));
        assert_eq!(camera.aspect, 640.0 / 480.0);
    }

    #[test]
    fn collapsed_container_uses_default_size() {
        assert_eq!(coordinator(0, 300).dimensions(), WindowDimensions::default());
        assert_eq!(coordinator(300, 0).dimensions(), WindowDimensions::default());
    }

    #[test]
    fn detach_drops_container() {
        let mut coordinator = coordinator(800, 600);
        assert!(coordinator.is_attached());
        coordinator.detach();
        assert!(!coordinator.is_attached());
        assert_eq!(coordinator.dimensions(), WindowDimensions::default());
    }
}

/// Fallback size used when no container is attached
pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for WindowDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// Host container the render surface is attached to
pub trait Viewport {
    /// Current size in physical pixels, None when detached from the host
    fn dimensions(&self) -> Option<WindowDimensions>;
}

/// Fixed-size container, for headless playback and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport(pub WindowDimensions);

impl Viewport for FixedViewport {
    fn dimensions(&self) -> Option<WindowDimensions> {
        Some(self.0)
    }
}

impl Viewport for winit::window::Window {
    fn dimensions(&self) -> Option<WindowDimensions> {
        let size = self.inner_size();
        Some(WindowDimensions::new(size.width, size.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_window_dimensions_new() {
        let dims = WindowDimensions::new(1920, 1080);
        assert_eq!(dims.width, 1920);
        assert_eq!(dims.height, 1080);
    }

    #[test]
    fn test_default_dimensions() {
        let dims = WindowDimensions::default();
        assert_eq!((dims.width, dims.height), (640, 480));
    }

    #[test]
    fn test_aspect() {
        let test_cases = [(640, 480), (1280, 720), (1920, 1080), (1000, 600)];

        for (width, height) in test_cases {
            let dims = WindowDimensions::new(width, height);
            assert_eq!(dims.aspect(), width as f32 / height as f32);
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(WindowDimensions::new(0, 480).is_empty());
        assert!(WindowDimensions::new(640, 0).is_empty());
        assert!(!WindowDimensions::new(1, 1).is_empty());
    }

    // Mock container whose size can change between calls
    struct MockViewport {
        dims: Cell<Option<WindowDimensions>>,
    }

    impl Viewport for MockViewport {
        fn dimensions(&self) -> Option<WindowDimensions> {
            self.dims.get()
        }
    }

    #[test]
    fn test_viewport_reports_current_size() {
        let viewport = MockViewport {
            dims: Cell::new(Some(WindowDimensions::new(800, 600))),
        };
        assert_eq!(viewport.dimensions(), Some(WindowDimensions::new(800, 600)));

        viewport.dims.set(Some(WindowDimensions::new(1024, 768)));
        assert_eq!(viewport.dimensions(), Some(WindowDimensions::new(1024, 768)));

        viewport.dims.set(None);
        assert_eq!(viewport.dimensions(), None);
    }

    #[test]
    fn test_fixed_viewport() {
        let viewport = FixedViewport(WindowDimensions::new(320, 200));
        assert_eq!(viewport.dimensions(), Some(WindowDimensions::new(320, 200)));
    }
}

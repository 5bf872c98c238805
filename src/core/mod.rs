pub mod canvas;
pub mod clock;
pub mod gpu_context;
pub mod input_adapter;
pub mod surface_renderer;
pub mod window;

pub use canvas::{Canvas, DrawOp, Rgba};
pub use clock::{CallbackId, Clock, FrameClock, FrameTick, PlaybackClock, TickHandler};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use surface_renderer::SurfaceRenderer;
pub use window::{FixedViewport, Viewport, WindowDimensions, DEFAULT_HEIGHT, DEFAULT_WIDTH};

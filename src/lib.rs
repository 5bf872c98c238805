pub mod camera;
pub mod cli;
pub mod core;
pub mod diagnostics;
pub mod display;
pub mod error;
pub mod loaders;
pub mod math;
pub mod playback;
pub mod renderer;
pub mod replay;
pub mod scene;
pub mod traits;

pub use error::{CameraError, RenderError, ReplayError, StartupError};
pub use playback::{CameraMode, FixedView, PlaybackDriver};
pub use replay::ReplayData;

//! Playback engine: clip mixing, camera control, resize handling and the
//! driver that ties them to the clock.

pub mod camera_controller;
pub mod driver;
pub mod mixer;
pub mod resize;

pub use camera_controller::{CameraController, CameraMode, FixedView};
pub use driver::{ClockRegistration, DriverOptions, PlaybackDriver, SharedClock};
pub use mixer::{AnimationClip, Keyframe, MixerBridge, MixerId};
pub use resize::ResizeCoordinator;

pub mod controller;
pub mod diagnostics;
pub mod renderer;

pub use controller::*;
pub use diagnostics::{Diagnostics, NoDiagnostics};
pub use renderer::SceneRenderer;

//! Lifecycle owner of a replay session.
//!
//! The driver holds the assembled scene behind `Rc<RefCell<_>>` and registers
//! a tick handler with the shared clock that only keeps a `Weak` to it. The
//! registration is an RAII guard, so dropping the driver (or calling
//! `shutdown`) always unregisters the handler.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use log::{info, warn};

use super::camera_controller::{CameraController, CameraMode, FixedView};
use super::mixer::MixerBridge;
use super::resize::ResizeCoordinator;
use crate::core::{CallbackId, FrameTick, PlaybackClock, TickHandler, Viewport, WindowDimensions};
use crate::diagnostics::{Diagnostics, NoDiagnostics};
use crate::error::{CameraError, RenderError, StartupError};
use crate::replay::ReplayData;
use crate::scene::{AssetLoader, Assembly, SceneAssembler, SceneState};
use crate::traits::SceneRenderer;

/// Clock shared between the host loop and the driver
pub type SharedClock = Rc<RefCell<dyn PlaybackClock>>;

/// Host-side collaborators for a driver
pub struct DriverOptions {
    /// Container whose size the output follows
    pub viewport: Option<Arc<dyn Viewport>>,
    /// Receives scene, frame and camera events
    pub diagnostics: Box<dyn Diagnostics>,
}

impl DriverOptions {
    pub fn with_viewport(mut self, viewport: Arc<dyn Viewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            viewport: None,
            diagnostics: Box::new(NoDiagnostics),
        }
    }
}

/// Keeps a tick handler registered for as long as it lives
pub struct ClockRegistration {
    clock: Weak<RefCell<dyn PlaybackClock>>,
    id: CallbackId,
}

impl ClockRegistration {
    pub fn register(clock: &SharedClock, handler: TickHandler) -> Self {
        let id = clock.borrow_mut().add_callback(handler);
        Self {
            clock: Rc::downgrade(clock),
            id,
        }
    }

    pub fn id(&self) -> CallbackId {
        self.id
    }
}

impl Drop for ClockRegistration {
    fn drop(&mut self) {
        let Some(clock) = self.clock.upgrade() else {
            return;
        };
        let borrowed = clock.try_borrow_mut();
        match borrowed {
            Ok(mut clock) => {
                clock.remove_callback(self.id);
            }
            Err(_) => warn!("Clock busy while unregistering tick handler {:?}", self.id),
        }
    }
}

struct PlaybackState {
    scene: SceneState,
    mixers: MixerBridge,
    camera: CameraController,
    replay: Arc<ReplayData>,
    renderer: Box<dyn SceneRenderer>,
    resize: ResizeCoordinator,
    diagnostics: Box<dyn Diagnostics>,
    started: bool,
    shut_down: bool,
    frame: usize,
}

impl PlaybackState {
    /// One tick: advance clips, point the camera, draw
    fn animate(&mut self, tick: FrameTick) -> Result<(), RenderError> {
        if self.shut_down {
            return Ok(());
        }
        self.diagnostics.frame_begin(tick);
        self.frame = tick.frame;

        self.mixers.update(tick.delta, &mut self.scene.root);
        self.camera.on_frame(&mut self.scene, &self.replay, tick.frame);
        self.renderer.render(&self.scene)?;

        self.diagnostics.frame_end(tick, &self.scene);
        Ok(())
    }

    fn render(&mut self) -> Result<(), RenderError> {
        if self.shut_down {
            return Ok(());
        }
        self.renderer.render(&self.scene)
    }

    fn render_or_warn(&mut self) {
        if let Err(e) = self.render() {
            warn!("Render failed: {}", e);
        }
    }
}

pub struct PlaybackDriver {
    state: Rc<RefCell<PlaybackState>>,
    clock: SharedClock,
    registration: Option<ClockRegistration>,
}

impl PlaybackDriver {
    /// Assemble the scene, then build and start a driver for it.
    ///
    /// On failure the error is logged and returned; no handler has been
    /// registered with the clock and nothing has been rendered.
    pub async fn launch<L: AssetLoader>(
        assembler: &SceneAssembler<L>,
        clock: SharedClock,
        renderer: Box<dyn SceneRenderer>,
        options: DriverOptions,
    ) -> Result<Self, StartupError> {
        let assembly = match assembler.assemble().await {
            Ok(assembly) => assembly,
            Err(e) => {
                warn!("There was an error building the replay scene: {}", e);
                return Err(e);
            }
        };

        let mut driver = Self::new(assembly, assembler.replay().clone(), clock, renderer, options);
        driver.start()?;
        Ok(driver)
    }

    /// Wrap an assembled scene; sizes the camera and renderer but does not
    /// register with the clock until `start`
    pub fn new(
        assembly: Assembly,
        replay: Arc<ReplayData>,
        clock: SharedClock,
        mut renderer: Box<dyn SceneRenderer>,
        options: DriverOptions,
    ) -> Self {
        let Assembly { mut scene, mixers } = assembly;
        let DriverOptions {
            viewport,
            mut diagnostics,
        } = options;

        let resize = ResizeCoordinator::new(viewport);
        resize.apply(&mut scene.camera, renderer.as_mut());
        diagnostics.scene_ready(&scene);

        let state = PlaybackState {
            scene,
            mixers,
            camera: CameraController::new(),
            replay,
            renderer,
            resize,
            diagnostics,
            started: false,
            shut_down: false,
            frame: 0,
        };

        Self {
            state: Rc::new(RefCell::new(state)),
            clock,
            registration: None,
        }
    }

    /// First call plays the clips and hooks into the clock; every call
    /// renders the current frame
    pub fn start(&mut self) -> Result<(), RenderError> {
        let mut state = self.state.borrow_mut();
        if state.shut_down {
            return Ok(());
        }

        if !state.started {
            state.started = true;
            let clips = state.mixers.play_clips();

            let weak = Rc::downgrade(&self.state);
            let handler: TickHandler = Box::new(move |tick| {
                if let Some(state) = weak.upgrade() {
                    state.borrow_mut().animate(tick)?;
                }
                Ok(())
            });
            self.registration = Some(ClockRegistration::register(&self.clock, handler));
            info!("Playback started with {} animation clips", clips);
        }

        if state.replay.frame_count() == 0 {
            return state.render();
        }
        let tick = FrameTick {
            frame: state.frame,
            delta: 0.0,
        };
        state.animate(tick)
    }

    /// Pause the clock; the handler stays registered
    pub fn stop(&self) {
        self.clock.borrow_mut().pause();
        info!("Playback paused");
    }

    /// Unregister from the clock and release the output. Safe to call more
    /// than once; runs on drop.
    pub fn shutdown(&mut self) {
        {
            let mut state = self.state.borrow_mut();
            if state.shut_down {
                return;
            }
            state.shut_down = true;
            state.resize.detach();
            state.renderer.detach();
        }

        self.registration = None;
        if let Ok(mut clock) = self.clock.try_borrow_mut() {
            clock.pause();
        }
        info!("Playback driver shut down");
    }

    /// Draw the current state without advancing anything
    pub fn render_now(&self) -> Result<(), RenderError> {
        self.state.borrow_mut().render()
    }

    /// Follow a container size change; does nothing after shutdown
    pub fn handle_resize(&self) -> Option<WindowDimensions> {
        let mut state = self.state.borrow_mut();
        if state.shut_down {
            return None;
        }
        let state = &mut *state;
        let dimensions = state.resize.apply(&mut state.scene.camera, state.renderer.as_mut());
        state.render_or_warn();
        Some(dimensions)
    }

    pub fn set_fixed_view(&self, view: FixedView) {
        self.change_camera(|camera, scene| camera.set_fixed_view(scene, view));
    }

    pub fn set_fixed_view_id(&self, id: u8) -> Result<(), CameraError> {
        let view = FixedView::try_from(id)?;
        self.set_fixed_view(view);
        Ok(())
    }

    pub fn set_tracked_player(&self, name: Option<&str>) {
        self.change_camera(|camera, scene| camera.set_tracked_player(scene, name));
    }

    pub fn cycle_tracked_player(&self) {
        self.change_camera(|camera, scene| camera.cycle_tracked_player(scene));
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.state.borrow().camera.mode()
    }

    pub fn is_started(&self) -> bool {
        self.state.borrow().started
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.borrow().shut_down
    }

    /// Frame index of the most recent tick
    pub fn frame(&self) -> usize {
        self.state.borrow().frame
    }

    pub fn with_scene<R>(&self, f: impl FnOnce(&SceneState) -> R) -> R {
        f(&self.state.borrow().scene)
    }

    fn change_camera(&self, change: impl FnOnce(&mut CameraController, &mut SceneState)) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        change(&mut state.camera, &mut state.scene);
        state.diagnostics.camera_changed(state.camera.mode());
        state.render_or_warn();
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

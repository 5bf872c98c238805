use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use replay_viewer::cli::Cli;
use replay_viewer::core::{
    Clock, FixedViewport, FrameClock, PlaybackClock, Viewport, WindowDimensions, WinitController,
};
use replay_viewer::diagnostics::LogDiagnostics;
use replay_viewer::display::WindowRenderer;
use replay_viewer::loaders::GltfAssetLoader;
use replay_viewer::playback::{CameraMode, DriverOptions, FixedView, PlaybackDriver};
use replay_viewer::renderer::SoftwareRenderer;
use replay_viewer::replay::ReplayData;
use replay_viewer::scene::SceneAssembler;
use replay_viewer::traits::Button;

/// Wall time fed to the clock per step in headless mode
const HEADLESS_STEP: f32 = 1.0 / 60.0;

struct App {
    cli: Cli,
    replay: Arc<ReplayData>,
    clock: Rc<RefCell<FrameClock>>,
    wall_clock: Clock,
    controller: WinitController,
    window: Option<Arc<Window>>,
    driver: Option<PlaybackDriver>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, replay: Arc<ReplayData>) -> Self {
        let clock = FrameClock::from_replay(&replay, cli.fps);
        Self {
            cli,
            replay,
            clock: Rc::new(RefCell::new(clock)),
            wall_clock: Clock::new(),
            controller: WinitController::new(),
            window: None,
            driver: None,
            failure: None,
        }
    }

    fn launch(&self, window: Arc<Window>) -> Result<PlaybackDriver> {
        let renderer = pollster::block_on(WindowRenderer::new(window.clone()))
            .context("Failed to initialize window renderer")?;

        let viewport = window.dimensions().unwrap_or_default();
        let assembler = SceneAssembler::new(asset_loader(&self.cli), self.replay.clone())
            .with_viewport(viewport)
            .with_fallback_fps(self.cli.fps);

        let options = DriverOptions::default()
            .with_viewport(window)
            .with_diagnostics(LogDiagnostics::default());

        let driver = pollster::block_on(PlaybackDriver::launch(
            &assembler,
            self.clock.clone(),
            Box::new(renderer),
            options,
        ))?;
        apply_initial_camera(&driver, &self.cli)?;
        Ok(driver)
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.shutdown();
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{:#}", e);
        self.failure = Some(e);
        self.exit(event_loop);
    }

    fn toggle_pause(&mut self) {
        let Some(driver) = &self.driver else {
            return;
        };
        if self.clock.borrow().is_paused() {
            self.clock.borrow_mut().play();
            self.wall_clock.reset();
            info!("Playback resumed");
        } else {
            driver.stop();
        }
    }

    fn handle_button(&mut self, event_loop: &ActiveEventLoop, button: Button) {
        match button {
            Button::Space => return self.toggle_pause(),
            Button::Escape => return self.exit(event_loop),
            _ => {}
        }

        let Some(driver) = &self.driver else {
            return;
        };
        match button {
            Button::Digit1 => driver.set_fixed_view(FixedView::OrangeGoal),
            Button::Digit2 => driver.set_fixed_view(FixedView::MidField),
            Button::Digit3 => driver.set_fixed_view(FixedView::BlueGoal),
            Button::Tab => driver.cycle_tracked_player(),
            Button::Space | Button::Escape => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Replay Viewer")
                .with_inner_size(winit::dpi::PhysicalSize::new(self.cli.width, self.cli.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, anyhow::anyhow!("Failed to create window: {}", e));
                return;
            }
        };

        match self.launch(window.clone()) {
            Ok(driver) => {
                self.window = Some(window);
                self.driver = Some(driver);
                self.wall_clock.reset();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(button) = self.controller.process_event(&event) {
            self.handle_button(event_loop, button);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.exit(event_loop),
            WindowEvent::Resized(_) => {
                if let Some(driver) = &self.driver {
                    driver.handle_resize();
                }
            }
            WindowEvent::RedrawRequested => {
                let delta = self.wall_clock.tick();
                let result = self.clock.borrow_mut().advance(delta);
                if let Err(e) = result {
                    self.fail(event_loop, e.context("Playback tick failed"));
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn asset_loader(cli: &Cli) -> GltfAssetLoader {
    GltfAssetLoader {
        field: cli.field.clone(),
        ball: cli.ball.clone(),
        car: cli.car.clone(),
    }
}

fn apply_initial_camera(driver: &PlaybackDriver, cli: &Cli) -> Result<()> {
    match cli.track.as_deref() {
        Some(name) => {
            driver.set_tracked_player(Some(name));
            if let CameraMode::Fixed(_) = driver.camera_mode() {
                warn!("No player named {:?} in replay, using default view", name);
            }
        }
        None => driver.set_fixed_view_id(cli.view)?,
    }
    Ok(())
}

/// Play the replay to its end through the software renderer
fn run_headless(cli: &Cli, replay: Arc<ReplayData>) -> Result<()> {
    let clock = Rc::new(RefCell::new(FrameClock::from_replay(&replay, cli.fps)));
    let dimensions = WindowDimensions::new(cli.width, cli.height);
    let viewport: Arc<dyn Viewport> = Arc::new(FixedViewport(dimensions));

    let assembler = SceneAssembler::new(asset_loader(cli), replay)
        .with_viewport(dimensions)
        .with_fallback_fps(cli.fps);
    let options = DriverOptions::default()
        .with_viewport(viewport)
        .with_diagnostics(LogDiagnostics::default());

    let mut driver = pollster::block_on(PlaybackDriver::launch(
        &assembler,
        clock.clone(),
        Box::new(SoftwareRenderer::new(cli.width, cli.height)),
        options,
    ))?;
    apply_initial_camera(&driver, cli)?;

    if clock.borrow().frame_count() == 0 {
        warn!("Replay has no frames to play");
    }

    let mut ticks = 0u64;
    while clock.borrow().frame_count() > 0 && !clock.borrow().is_paused() {
        clock.borrow_mut().advance(HEADLESS_STEP)?;
        ticks += 1;
    }

    info!(
        "Headless playback finished: {} ticks, final frame {}",
        ticks,
        clock.borrow().frame()
    );
    driver.shutdown();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let replay = Arc::new(ReplayData::load(&cli.replay)?);
    info!(
        "Loaded replay {:?}: {} players, {} frames",
        cli.replay,
        replay.player_count(),
        replay.frame_count()
    );

    if cli.headless {
        return run_headless(&cli, replay);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, replay);

    println!("Replay Viewer - Controls: 1/2/3 views, Tab follow player, Space pause, Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

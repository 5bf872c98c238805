use std::time::Instant;

use log::info;

/// Minimal wall clock - just tracks delta time
/// The host loop feeds these deltas into the playback clock
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Get delta time since last tick and advance clock
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// One dispatch from the playback clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Replay frame index for this tick
    pub frame: usize,
    /// Seconds of playback since the previous tick
    pub delta: f32,
}

/// Handle returned by `add_callback`, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Frame consumer; an error aborts the current dispatch
pub type TickHandler = Box<dyn FnMut(FrameTick) -> anyhow::Result<()>>;

/// Source of ticks, invoked once per display refresh
pub trait PlaybackClock {
    /// Register a frame consumer
    fn add_callback(&mut self, handler: TickHandler) -> CallbackId;

    /// Unregister a frame consumer, returns false if it was not registered
    fn remove_callback(&mut self, id: CallbackId) -> bool;

    /// Delta reported with the most recent tick, in seconds
    fn delta(&self) -> f32;

    /// Stop dispatching; registered handlers stay registered
    fn pause(&mut self);

    /// Resume dispatching
    fn play(&mut self);

    fn is_paused(&self) -> bool;

    fn callback_count(&self) -> usize;
}

/// Playback clock driven by the replay's frame timeline.
///
/// Time only accrues while playing: a paused clock ignores `advance`, so the
/// first delta after `play` covers just the refresh that follows it.
pub struct FrameClock {
    frame_times: Vec<f32>,
    elapsed: f32,
    frame: usize,
    delta: f32,
    paused: bool,
    handlers: Vec<(CallbackId, TickHandler)>,
    next_id: u64,
}

impl FrameClock {
    /// Clock over frames starting at the given times (seconds, ascending)
    pub fn new(frame_times: Vec<f32>) -> Self {
        Self {
            frame_times,
            elapsed: 0.0,
            frame: 0,
            delta: 0.0,
            paused: false,
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn from_replay(replay: &crate::replay::ReplayData, fallback_fps: f32) -> Self {
        Self::new(replay.frame_times(fallback_fps))
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        !self.frame_times.is_empty() && self.frame + 1 >= self.frame_times.len()
    }

    /// Advance playback by a wall-clock delta and dispatch one tick.
    /// Returns the dispatched tick, or None while paused.
    pub fn advance(&mut self, wall_delta: f32) -> anyhow::Result<Option<FrameTick>> {
        if self.paused || self.frame_times.is_empty() {
            self.delta = 0.0;
            return Ok(None);
        }

        let delta = wall_delta.max(0.0);
        self.elapsed += delta;
        self.delta = delta;

        // Last frame whose start time has been reached; never moves backwards
        let reached = self.frame_times.partition_point(|&t| t <= self.elapsed);
        self.frame = self.frame.max(reached.saturating_sub(1));

        let tick = FrameTick {
            frame: self.frame,
            delta,
        };

        for (_, handler) in self.handlers.iter_mut() {
            handler(tick)?;
        }

        if self.is_finished() {
            info!("Playback reached final frame {}", self.frame);
            self.paused = true;
        }

        Ok(Some(tick))
    }
}

impl PlaybackClock for FrameClock {
    fn add_callback(&mut self, handler: TickHandler) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    fn remove_callback(&mut self, id: CallbackId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    fn delta(&self) -> f32 {
        self.delta
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn callback_count(&self) -> usize {
        self.handlers.len()
    }
}

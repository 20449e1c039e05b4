//! Frame-driven game loop.
//!
//! A display calls [`GameLoop::frame`] with monotonically increasing
//! timestamps. The loop turns timestamp gaps into clamped simulation
//! deltas, advances the session while it runs, and hands a snapshot to the
//! renderer every frame, paused or not.

use std::convert::Infallible;

use crate::game::{Millis, RunState, Session, Snapshot, TickReport};

/// Consumer of snapshots, one per frame.
pub trait Renderer {
    /// Error raised by the output device.
    type Error;

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the output device fails.
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;
}

/// Renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    type Error = Infallible;

    fn render(&mut self, _snapshot: &Snapshot) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Renderer that keeps the latest snapshot.
#[derive(Debug, Clone, Default)]
pub struct LatestSnapshot {
    /// Most recent frame.
    pub snapshot: Option<Snapshot>,
}

impl Renderer for LatestSnapshot {
    type Error = Infallible;

    fn render(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}

/// Turns display timestamps into simulation deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last: Option<Millis>,
    speed: f64,
    max_delta: Millis,
}

impl FrameClock {
    /// Create a clock. `speed` scales real time; `max_delta` caps one frame.
    #[must_use]
    pub fn new(max_delta: Millis, speed: f64) -> Self {
        Self {
            last: None,
            speed,
            max_delta,
        }
    }

    /// Delta since the previous frame, clamped to `[0, max_delta]`.
    ///
    /// The first frame after a reset yields zero.
    pub fn tick(&mut self, timestamp: Millis) -> Millis {
        let delta = match self.last {
            Some(last) => ((timestamp - last) * self.speed).clamp(0.0, self.max_delta),
            None => 0.0,
        };
        self.last = Some(timestamp);
        if delta.is_nan() { 0.0 } else { delta }
    }

    /// Treat `timestamp` as the previous frame.
    pub fn rebaseline(&mut self, timestamp: Millis) {
        self.last = Some(timestamp);
    }

    /// Forget the previous frame.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Time scale.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }
}

/// What the loop did on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    /// The session advanced.
    Advanced,
    /// The session is not running; only a render happened.
    Idle,
    /// The loop was stopped; nothing happened.
    Stopped,
}

/// Result of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// What the loop did.
    pub status: LoopStatus,
    /// Simulation time applied.
    pub delta: Millis,
    /// Tick counters (empty unless advanced).
    pub tick: TickReport,
}

impl FrameReport {
    fn idle(status: LoopStatus) -> Self {
        Self {
            status,
            delta: 0.0,
            tick: TickReport::default(),
        }
    }
}

/// Drives a session from display frames.
#[derive(Debug)]
pub struct GameLoop {
    session: Session,
    clock: FrameClock,
    stopped: bool,
}

impl GameLoop {
    /// Wrap a session at normal speed.
    #[must_use]
    pub fn new(session: Session) -> Self {
        let max_delta = session.rules().max_frame_delta_ms;
        Self {
            session,
            clock: FrameClock::new(max_delta, 1.0),
            stopped: false,
        }
    }

    /// Scale real time by `speed`.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.clock = FrameClock::new(self.session.rules().max_frame_delta_ms, speed);
        self
    }

    /// Process one display frame at `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error; the simulation step has already
    /// happened by then.
    pub fn frame<R: Renderer>(&mut self, timestamp: Millis, renderer: &mut R) -> Result<FrameReport, R::Error> {
        if self.stopped {
            return Ok(FrameReport::idle(LoopStatus::Stopped));
        }

        let delta = self.clock.tick(timestamp);
        let report = if self.session.state() == RunState::Running {
            FrameReport {
                status: LoopStatus::Advanced,
                delta,
                tick: self.session.advance(delta),
            }
        } else {
            FrameReport::idle(LoopStatus::Idle)
        };

        renderer.render(&self.session.snapshot(timestamp))?;
        Ok(report)
    }

    /// Start the session, treating `timestamp` as the previous frame.
    pub fn start(&mut self, timestamp: Millis) -> bool {
        let started = self.session.start();
        if started {
            self.clock.rebaseline(timestamp);
        }
        started
    }

    /// Pause or resume. Resuming re-baselines the clock so the pause does
    /// not count as elapsed time.
    pub fn toggle_pause(&mut self, timestamp: Millis) -> bool {
        let toggled = self.session.toggle_pause();
        if toggled && self.session.state() == RunState::Running {
            self.clock.rebaseline(timestamp);
        }
        toggled
    }

    /// Make every further frame inert.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Check if the loop was stopped.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Reset the session to its level's start and revive the loop.
    pub fn restart(&mut self) {
        self.session.reset();
        self.clock.reset();
        self.stopped = false;
    }

    /// The driven session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The driven session, for input handlers.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Give the session back.
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Rules;
    use crate::level::LevelSet;

    fn game_loop() -> GameLoop {
        let level = LevelSet::builtin().get(1).unwrap().clone();
        GameLoop::new(Session::new(level, Rules::default(), 11).unwrap())
    }

    #[test]
    fn test_clock_clamps() {
        let mut clock = FrameClock::new(50.0, 1.0);
        assert!(clock.tick(1000.0).abs() < f64::EPSILON);
        assert!((clock.tick(1016.0) - 16.0).abs() < f64::EPSILON);
        assert!((clock.tick(5000.0) - 50.0).abs() < f64::EPSILON);
        // Backwards timestamps never produce negative time
        assert!(clock.tick(4000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clock_speed() {
        let mut clock = FrameClock::new(50.0, 2.0);
        clock.tick(0.0);
        assert!((clock.tick(10.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_renders_while_idle() {
        let mut game = game_loop();
        let mut sink = LatestSnapshot::default();

        let report = game.frame(0.0, &mut sink).unwrap();
        assert_eq!(report.status, LoopStatus::Idle);
        assert_eq!(sink.snapshot.as_ref().unwrap().state, RunState::Ready);
    }

    #[test]
    fn test_start_rebaselines() {
        let mut game = game_loop();
        let mut sink = NullRenderer;
        game.frame(0.0, &mut sink).unwrap();

        assert!(game.start(10_000.0));
        let report = game.frame(10_016.0, &mut sink).unwrap();
        assert_eq!(report.status, LoopStatus::Advanced);
        assert!((report.delta - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pause_excludes_time() {
        let mut game = game_loop();
        let mut sink = NullRenderer;
        game.start(0.0);
        game.frame(16.0, &mut sink).unwrap();

        game.toggle_pause(20.0);
        let report = game.frame(1000.0, &mut sink).unwrap();
        assert_eq!(report.status, LoopStatus::Idle);

        game.toggle_pause(60_000.0);
        let report = game.frame(60_010.0, &mut sink).unwrap();
        assert!((report.delta - 10.0).abs() < f64::EPSILON);
        assert!((game.session().elapsed_ms() - 26.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stop_and_restart() {
        let mut game = game_loop();
        let mut sink = LatestSnapshot::default();
        game.start(0.0);
        game.frame(16.0, &mut sink).unwrap();
        game.stop();

        sink.snapshot = None;
        let report = game.frame(32.0, &mut sink).unwrap();
        assert_eq!(report.status, LoopStatus::Stopped);
        assert!(sink.snapshot.is_none());

        game.restart();
        assert!(!game.is_stopped());
        assert_eq!(game.session().state(), RunState::Ready);
        assert!(game.session().lawn().zombies.is_empty());
    }
}

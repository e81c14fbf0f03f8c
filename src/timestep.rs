//! Fixed timestep scheduling.
//!
//! State updates ("ticks") run at a constant rate that is independent of how
//! often frames are drawn. Wall clock time that has not been consumed by a
//! tick yet is carried over as lag into the next frame.

use std::time::Instant;

pub const DEFAULT_TICKS_PER_SECOND: u32 = 20;

/// Source of the current time in milliseconds.
pub trait Clock {
    fn now_ms(&mut self) -> f64;
}

/// Monotonic clock, measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.
    }
}

/// Callbacks the scheduler drives every frame.
pub trait Stage {
    /// Called once per frame before any tick.
    fn process_input(&mut self) {}

    /// Advances the simulation by exactly `dt_ms`.
    fn tick(&mut self, dt_ms: f64);

    /// Called exactly once per frame, after all ticks of that frame.
    fn render(&mut self);
}

/// The outer side of the loop: showing the finished frame and deciding when to stop.
pub trait Presenter {
    fn present(&mut self);
    fn should_close(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestepConfig {
    pub ticks_per_second: u32,
    /// Upper bound of ticks run in a single frame. `None` catches up on any
    /// amount of lag, however long the stall was.
    pub max_ticks_per_frame: Option<u32>,
}

impl TimestepConfig {
    pub fn ms_per_tick(&self) -> f64 {
        1000. / self.ticks_per_second as f64
    }
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            max_ticks_per_frame: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimestepError {
    #[error("ticks per second must be greater than zero")]
    InvalidTickRate,
    #[error("the per frame tick limit must be greater than zero")]
    InvalidTickLimit,
}

/// What happened during a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub ticks: u32,
    /// Ticks dropped because of `max_ticks_per_frame`.
    pub skipped: u32,
    /// Lag left over after the frame.
    pub lag_ms: f64,
}

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    ms_per_tick: f64,
    max_ticks: Option<u32>,
    previous: f64,
    lag: f64,
}

impl FixedTimestep {
    pub fn new(config: TimestepConfig, now_ms: f64) -> Result<Self, TimestepError> {
        if config.ticks_per_second == 0 {
            return Err(TimestepError::InvalidTickRate);
        }
        if config.max_ticks_per_frame == Some(0) {
            return Err(TimestepError::InvalidTickLimit);
        }
        log::debug!(
            "Fixed timestep: {} ticks/s ({:.2}ms per tick), limit {:?}",
            config.ticks_per_second,
            config.ms_per_tick(),
            config.max_ticks_per_frame,
        );
        Ok(Self {
            ms_per_tick: config.ms_per_tick(),
            max_ticks: config.max_ticks_per_frame,
            previous: now_ms,
            lag: 0.,
        })
    }

    /// Restarts time keeping at `now_ms` with no lag.
    pub fn reset(&mut self, now_ms: f64) {
        self.previous = now_ms;
        self.lag = 0.;
    }

    pub fn ms_per_tick(&self) -> f64 {
        self.ms_per_tick
    }

    pub fn lag_ms(&self) -> f64 {
        self.lag
    }

    /// Runs one frame: input, as many ticks as the accumulated lag allows,
    /// then a single render.
    pub fn frame<S: Stage + ?Sized>(&mut self, now_ms: f64, stage: &mut S) -> FrameReport {
        let elapsed = now_ms - self.previous;
        self.previous = now_ms;
        self.lag += elapsed;

        stage.process_input();

        let mut ticks = 0;
        let mut skipped = 0;
        while self.lag >= self.ms_per_tick {
            if self.max_ticks == Some(ticks) {
                skipped = (self.lag / self.ms_per_tick).floor() as u32;
                self.lag -= skipped as f64 * self.ms_per_tick;
                log::warn!("Falling behind, dropped {skipped} ticks");
                break;
            }
            stage.tick(self.ms_per_tick);
            self.lag -= self.ms_per_tick;
            ticks += 1;
        }
        if ticks > 1 {
            log::debug!("Caught up {ticks} ticks in one frame");
        }

        stage.render();
        log::trace!("Frame done: {ticks} ticks, {:.3}ms lag", self.lag);

        FrameReport { ticks, skipped, lag_ms: self.lag }
    }

    /// Drives frames until `presenter` asks to close. Returns the number of frames run.
    pub fn run<C, S, P>(&mut self, clock: &mut C, stage: &mut S, presenter: &mut P) -> u64
    where
        C: Clock + ?Sized,
        S: Stage + ?Sized,
        P: Presenter + ?Sized,
    {
        self.reset(clock.now_ms());
        let mut frames = 0;
        while !presenter.should_close() {
            self.frame(clock.now_ms(), stage);
            presenter.present();
            frames += 1;
        }
        log::debug!("Loop finished after {frames} frames");
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        ticks: u32,
        dts: Vec<f64>,
    }

    impl Stage for Recorder {
        fn process_input(&mut self) {
            self.calls.push("input");
        }

        fn tick(&mut self, dt_ms: f64) {
            self.calls.push("tick");
            self.ticks += 1;
            self.dts.push(dt_ms);
        }

        fn render(&mut self) {
            self.calls.push("render");
        }
    }

    struct ScriptedClock {
        times: Vec<f64>,
        next: usize,
    }

    impl Clock for ScriptedClock {
        fn now_ms(&mut self) -> f64 {
            let now = self.times[self.next.min(self.times.len() - 1)];
            self.next += 1;
            now
        }
    }

    struct CloseAfter {
        remaining: u32,
        presented: u32,
    }

    impl Presenter for CloseAfter {
        fn present(&mut self) {
            self.presented += 1;
            self.remaining = self.remaining.saturating_sub(1);
        }

        fn should_close(&self) -> bool {
            self.remaining == 0
        }
    }

    fn timestep(ticks_per_second: u32) -> FixedTimestep {
        let config = TimestepConfig { ticks_per_second, max_ticks_per_frame: None };
        FixedTimestep::new(config, 0.).unwrap()
    }

    #[test]
    fn default_config() {
        let config = TimestepConfig::default();
        assert_eq!(config.ticks_per_second, 20);
        assert_eq!(config.ms_per_tick(), 50.);
        assert_eq!(config.max_ticks_per_frame, None);
    }

    #[test]
    fn rejects_bad_config() {
        let zero = TimestepConfig { ticks_per_second: 0, ..Default::default() };
        assert_eq!(FixedTimestep::new(zero, 0.).unwrap_err(), TimestepError::InvalidTickRate);
        let no_ticks = TimestepConfig { max_ticks_per_frame: Some(0), ..Default::default() };
        assert_eq!(FixedTimestep::new(no_ticks, 0.).unwrap_err(), TimestepError::InvalidTickLimit);
    }

    #[test]
    fn lag_accumulates_across_frames() {
        let mut step = timestep(20);
        let mut stage = Recorder::default();
        let reports: Vec<_> = [30., 60., 90.]
            .into_iter()
            .map(|now| step.frame(now, &mut stage))
            .collect();
        let ticks: Vec<_> = reports.iter().map(|r| r.ticks).collect();
        let lag: Vec<_> = reports.iter().map(|r| r.lag_ms).collect();
        assert_eq!(ticks, [0, 1, 0]);
        assert_eq!(lag, [30., 10., 40.]);
        assert_eq!(step.lag_ms(), 40.);
    }

    #[test]
    fn ticks_have_fixed_duration() {
        let mut step = timestep(30);
        let mut stage = Recorder::default();
        step.frame(17., &mut stage);
        step.frame(140., &mut stage);
        assert!(stage.dts.iter().all(|&dt| dt == 1000. / 30.));
        assert_eq!(stage.ticks, 4);
    }

    #[test]
    fn one_render_per_frame() {
        let mut step = timestep(20);
        let mut stage = Recorder::default();
        step.frame(120., &mut stage);
        assert_eq!(stage.calls, ["input", "tick", "tick", "render"]);
        stage.calls.clear();
        step.frame(121., &mut stage);
        assert_eq!(stage.calls, ["input", "render"]);
    }

    #[test]
    fn stall_catches_up_unbounded() {
        let mut step = timestep(20);
        let mut stage = Recorder::default();
        let report = step.frame(10_000., &mut stage);
        assert_eq!(report, FrameReport { ticks: 200, skipped: 0, lag_ms: 0. });
    }

    #[test]
    fn stall_with_limit_drops_ticks() {
        let config = TimestepConfig { ticks_per_second: 20, max_ticks_per_frame: Some(5) };
        let mut step = FixedTimestep::new(config, 0.).unwrap();
        let mut stage = Recorder::default();
        let report = step.frame(1030., &mut stage);
        assert_eq!(report, FrameReport { ticks: 5, skipped: 15, lag_ms: 30. });
        assert_eq!(stage.ticks, 5);
        let report = step.frame(1060., &mut stage);
        assert_eq!(report, FrameReport { ticks: 1, skipped: 0, lag_ms: 10. });
    }

    #[test]
    fn reset_clears_lag() {
        let mut step = timestep(20);
        let mut stage = Recorder::default();
        step.frame(40., &mut stage);
        step.reset(1000.);
        assert_eq!(step.lag_ms(), 0.);
        let report = step.frame(1020., &mut stage);
        assert_eq!(report.lag_ms, 20.);
        assert_eq!(stage.ticks, 0);
    }

    #[test]
    fn run_until_closed() {
        let mut step = timestep(20);
        let mut clock = ScriptedClock { times: vec![500., 530., 560., 590., 620.], next: 0 };
        let mut stage = Recorder::default();
        let mut presenter = CloseAfter { remaining: 3, presented: 0 };
        let frames = step.run(&mut clock, &mut stage, &mut presenter);
        assert_eq!(frames, 3);
        assert_eq!(presenter.presented, 3);
        assert_eq!(stage.ticks, 1);
        assert_eq!(step.lag_ms(), 40.);
    }

    #[test]
    fn run_closed_from_start() {
        let mut step = timestep(20);
        let mut clock = SystemClock::new();
        let mut stage = Recorder::default();
        let mut presenter = CloseAfter { remaining: 0, presented: 0 };
        assert_eq!(step.run(&mut clock, &mut stage, &mut presenter), 0);
        assert!(stage.calls.is_empty());
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::default();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0. && b >= a);
    }
}

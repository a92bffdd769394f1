//! Fixed-rate tick loop.
//!
//! Simulation runs at a fixed tick rate regardless of how often the host
//! calls [`GameLoop::tick`]. Leftover time is carried in an accumulator and
//! exposed as an interpolation alpha for whoever presents the result.

use std::time::{Duration, Instant};

use tracing::warn;

/// Tick rate used when none is configured.
pub const DEFAULT_TICK_RATE_HZ: u32 = 20;

/// Longest frame the loop will account for. Anything longer is clamped and
/// the simulation falls behind wall time instead of running a burst of ticks.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Fixed-rate loop state.
pub struct GameLoop {
    fixed_dt: f64,
    previous_time: Instant,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    /// A loop ticking `tick_rate_hz` times per second. A rate of zero falls
    /// back to [`DEFAULT_TICK_RATE_HZ`].
    pub fn new(tick_rate_hz: u32) -> Self {
        let hz = if tick_rate_hz == 0 {
            DEFAULT_TICK_RATE_HZ
        } else {
            tick_rate_hz
        };
        Self {
            fixed_dt: 1.0 / f64::from(hz),
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Seconds per tick.
    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// Measure the wall time since the previous call and run one frame.
    ///
    /// - `update_fn(state, fixed_dt, total_sim_time)` runs zero or more times.
    /// - `render_fn(state, alpha)` runs exactly once afterwards, with alpha in
    ///   `[0.0, 1.0)`.
    pub fn tick<S>(
        &mut self,
        state: &mut S,
        update_fn: impl FnMut(&mut S, f64, f64),
        render_fn: impl FnMut(&mut S, f64),
    ) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.run_frame(frame_time, state, update_fn, render_fn);
    }

    /// Run one frame that took `frame_time` seconds.
    pub fn run_frame<S>(
        &mut self,
        frame_time: f64,
        state: &mut S,
        mut update_fn: impl FnMut(&mut S, f64, f64),
        mut render_fn: impl FnMut(&mut S, f64),
    ) {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= self.fixed_dt {
            update_fn(state, self.fixed_dt, self.total_sim_time);
            self.total_sim_time += self.fixed_dt;
            self.accumulator -= self.fixed_dt;
            self.update_count += 1;
        }

        render_fn(state, self.alpha());
        self.frame_count += 1;
    }

    /// Fraction of a tick carried in the accumulator.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / self.fixed_dt
        } else {
            0.0
        }
    }

    /// Wall time left before the next tick is due. Hosts without vsync sleep
    /// this long between frames.
    pub fn time_until_next_tick(&self) -> Duration {
        let elapsed = self.previous_time.elapsed().as_secs_f64();
        Duration::from_secs_f64((self.fixed_dt - self.accumulator - elapsed).max(0.0))
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Ticks run so far.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds so far.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / DEFAULT_TICK_RATE_HZ as f64;

    fn count_updates(loop_: &mut GameLoop, frame_time: f64) -> u32 {
        let mut updates = 0u32;
        loop_.run_frame(frame_time, &mut updates, |n, _, _| *n += 1, |_, _| {});
        updates
    }

    #[test]
    fn test_fixed_dt_from_rate() {
        assert!((GameLoop::new(60).fixed_dt() - 1.0 / 60.0).abs() < 1e-12);
        assert!((GameLoop::new(0).fixed_dt() - DT).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_runs_whole_ticks() {
        let mut loop_ = GameLoop::default();
        assert_eq!(count_updates(&mut loop_, 3.0 * DT + 1e-9), 3);
        assert_eq!(loop_.update_count(), 3);
        assert!((loop_.total_sim_time() - 3.0 * DT).abs() < 1e-12);
    }

    #[test]
    fn test_partial_frame_renders_without_update() {
        let mut loop_ = GameLoop::default();
        let mut rendered = None;
        loop_.run_frame(
            0.5 * DT,
            &mut rendered,
            |_, _, _| panic!("no tick is due"),
            |r, alpha| *r = Some(alpha),
        );
        let alpha = rendered.unwrap();
        assert!((alpha - 0.5).abs() < 1e-10, "alpha should be ~0.5, got {alpha}");
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut loop_ = GameLoop::default();
        let updates = count_updates(&mut loop_, 10.0);
        let max_updates = (MAX_FRAME_TIME / DT).ceil() as u32;
        assert!(updates > 0);
        assert!(updates <= max_updates, "expected at most {max_updates}, got {updates}");
    }

    #[test]
    fn test_negative_frame_time_is_ignored() {
        let mut loop_ = GameLoop::default();
        assert_eq!(count_updates(&mut loop_, -1.0), 0);
        assert_eq!(loop_.alpha(), 0.0);
        assert_eq!(loop_.frame_count(), 1);
    }

    #[test]
    fn test_update_sees_shared_state_before_render() {
        let mut loop_ = GameLoop::default();
        let mut log = Vec::new();
        loop_.run_frame(
            2.0 * DT + 1e-9,
            &mut log,
            |log, _, sim_time| log.push(format!("update {:.2}", sim_time)),
            |log, _| log.push("render".to_string()),
        );
        assert_eq!(log, vec!["update 0.00", "update 0.05", "render"]);
    }

    #[test]
    fn test_deterministic_sequence() {
        let frame_times = [0.051, 0.049, 0.020, 0.016, 0.133, 0.008, 0.058];
        let mut a = GameLoop::default();
        let mut b = GameLoop::default();
        for &ft in &frame_times {
            count_updates(&mut a, ft);
            count_updates(&mut b, ft);
            assert!((a.alpha() - b.alpha()).abs() < 1e-15);
        }
        assert_eq!(a.update_count(), b.update_count());
        assert_eq!(a.frame_count(), frame_times.len() as u64);
    }

    #[test]
    fn test_time_until_next_tick_is_bounded() {
        let loop_ = GameLoop::default();
        assert!(loop_.time_until_next_tick() <= Duration::from_secs_f64(DT));
    }
}

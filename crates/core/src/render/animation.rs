//! Time-driven animation primitives.
//!
//! Renderers never schedule frames themselves. The host calls each
//! renderer's `tick(now)` from its frame callback, and keeps requesting
//! frames while `is_animating(now)` is true. Every animated value is owned
//! by exactly one [`AnimationDriver`]; restarting a driver discards the
//! previous run, so a stale timeline can never keep writing state.

use std::f64::consts::PI;
use std::time::Duration;

/// Monotonic frame timestamp, measured from an arbitrary host epoch.
pub type FrameTime = Duration;

/// Easing curves used by the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseInOutCubic,
    EaseOutCubic,
    /// Ease-out with a slight overshoot past 1 before settling.
    EaseOutBack,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutBack => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    started_at: FrameTime,
    duration: Duration,
    easing: Easing,
}

/// Drives one animated value from 0 to 1 over a fixed duration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationDriver {
    run: Option<Run>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new run at `now`, replacing any run in flight.
    pub fn start(&mut self, now: FrameTime, duration: Duration, easing: Easing) {
        self.run = Some(Run {
            started_at: now,
            duration,
            easing,
        });
    }

    /// Stop the current run. Idempotent.
    pub fn cancel(&mut self) {
        self.run = None;
    }

    /// Whether a run has been started and not cancelled (finished runs count).
    pub fn is_started(&self) -> bool {
        self.run.is_some()
    }

    /// Linear progress of the current run, `None` when idle.
    pub fn raw_progress(&self, now: FrameTime) -> Option<f64> {
        let run = self.run?;
        if run.duration.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_sub(run.started_at);
        Some((elapsed.as_secs_f64() / run.duration.as_secs_f64()).min(1.0))
    }

    /// Eased progress of the current run, `None` when idle.
    pub fn sample(&self, now: FrameTime) -> Option<f64> {
        let run = self.run?;
        self.raw_progress(now).map(|t| run.easing.apply(t))
    }

    /// Time elapsed since the run started, `None` when idle.
    pub fn elapsed(&self, now: FrameTime) -> Option<Duration> {
        self.run.map(|run| now.saturating_sub(run.started_at))
    }

    pub fn is_finished(&self, now: FrameTime) -> bool {
        self.raw_progress(now).is_some_and(|t| t >= 1.0)
    }

    /// Still producing new values at `now`.
    pub fn is_running(&self, now: FrameTime) -> bool {
        self.raw_progress(now).is_some_and(|t| t < 1.0)
    }
}

/// Animates a number from one value to another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    driver: AnimationDriver,
}

impl Tween {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value at `now`. Holds `to` once finished or when idle.
    pub fn value(&self, now: FrameTime) -> f64 {
        match self.driver.sample(now) {
            Some(p) => self.from + (self.to - self.from) * p,
            None => self.to,
        }
    }

    /// Retarget from the currently displayed value so changes mid-flight
    /// continue smoothly.
    pub fn animate_to(&mut self, now: FrameTime, target: f64, duration: Duration, easing: Easing) {
        self.from = self.value(now);
        self.to = target;
        self.driver.start(now, duration, easing);
    }

    /// Jump straight to `value` with no animation.
    pub fn set(&mut self, value: f64) {
        self.driver.cancel();
        self.from = value;
        self.to = value;
    }

    pub fn is_running(&self, now: FrameTime) -> bool {
        self.driver.is_running(now)
    }

    pub fn cancel(&mut self) {
        let to = self.to;
        self.set(to);
    }
}

/// A continuous sinusoidal pulse, restarted on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pulse {
    started_at: Option<FrameTime>,
}

impl Pulse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restart(&mut self, now: FrameTime) {
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Phase in `[0, 1]` at `now` for a pulse of `hz` cycles per second;
    /// 0 while stopped.
    pub fn phase(&self, now: FrameTime, hz: f64) -> f64 {
        match self.started_at {
            Some(start) => {
                let elapsed = now.saturating_sub(start).as_secs_f64();
                ((elapsed * hz * PI * 2.0).sin() + 1.0) / 2.0
            }
            None => 0.0,
        }
    }
}

//! Window open/close animations (§4.4). Runs its own tick independent of
//! the compositor bridge's frame-setting, so the Core can fire-and-forget
//! an animation and move on; `Animator` owns the only mutable timer state.

use std::time::{Duration, Instant};

use crate::actor::app::WindowId;
use crate::geometry::Frame;

pub const TICK_INTERVAL: Duration = Duration::from_millis(8);

const POPIN_SETTLE_DELAY: Duration = Duration::from_millis(80);
const POPIN_DURATION: Duration = Duration::from_millis(500);
const POPIN_BEZIER: (f64, f64, f64, f64) = (0.25, 1.0, 0.5, 1.0);
const POPIN_START_SCALE: f64 = 0.80;

const POPOUT_DURATION: Duration = Duration::from_millis(200);
const POPOUT_BEZIER: (f64, f64, f64, f64) = (0.5, 0.5, 0.75, 1.0);
const POPOUT_END_SCALE: f64 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Settling,
    Running,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    PopIn,
    PopOut,
}

struct Anim {
    kind: Kind,
    phase: Phase,
    frame: Frame,
    started_at: Instant,
}

/// Cubic bezier with fixed endpoints `(0,0)` and `(1,1)`, sampled by
/// bisection on `t` for the given `x` (progress fraction along the time
/// axis), returning `y` (progress fraction along the animated value).
fn bezier_ease(p1x: f64, p1y: f64, p2x: f64, p2y: f64, x: f64) -> f64 {
    let curve = |t: f64, a: f64, b: f64| {
        let mt = 1.0 - t;
        3.0 * mt * mt * t * a + 3.0 * mt * t * t * b + t * t * t
    };

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    let mut t = x;
    for _ in 0..20 {
        let cx = curve(t, p1x, p2x);
        if (cx - x).abs() < 1e-4 {
            break;
        }
        if cx < x { lo = t } else { hi = t }
        t = (lo + hi) / 2.0;
    }
    curve(t, p1y, p2y)
}

/// Per-window animation state. `now` is passed in rather than read from
/// the clock so progression is deterministic and testable.
pub struct Animator {
    active: std::collections::HashMap<WindowId, Anim>,
}

impl Default for Animator {
    fn default() -> Self { Self { active: std::collections::HashMap::new() } }
}

/// What the Core should apply to the compositor bridge on a given tick.
#[derive(Debug, Clone, Copy)]
pub struct AnimationSample {
    pub scale: f64,
    pub alpha: f64,
    pub anchor: Frame,
    pub finished: bool,
}

impl Animator {
    pub fn start_popin(&mut self, window: WindowId, frame: Frame, now: Instant) {
        self.active.insert(window, Anim { kind: Kind::PopIn, phase: Phase::Settling, frame, started_at: now });
    }

    pub fn start_popout(&mut self, window: WindowId, frame: Frame, now: Instant) {
        self.active.insert(window, Anim { kind: Kind::PopOut, phase: Phase::Running, frame, started_at: now });
    }

    pub fn cancel(&mut self, window: WindowId) { self.active.remove(&window); }

    pub fn cancel_all(&mut self) { self.active.clear(); }

    pub fn is_animating(&self, window: WindowId) -> bool { self.active.contains_key(&window) }

    /// Advances every active animation to `now` and returns the windows
    /// whose animation just finished this tick, each with its final
    /// (settled) sample so the caller can apply it once more before
    /// dropping the entry.
    pub fn sample(&mut self, now: Instant) -> Vec<(WindowId, AnimationSample)> {
        let mut results = Vec::new();
        let mut finished = Vec::new();

        for (&window, anim) in self.active.iter_mut() {
            if anim.phase == Phase::Settling {
                if now.duration_since(anim.started_at) >= POPIN_SETTLE_DELAY {
                    anim.phase = Phase::Running;
                    anim.started_at = now;
                } else {
                    continue;
                }
            }

            let (duration, bezier, start_scale, end_scale, start_alpha, end_alpha) = match anim.kind {
                Kind::PopIn => (POPIN_DURATION, POPIN_BEZIER, POPIN_START_SCALE, 1.0, 0.0, 1.0),
                Kind::PopOut => (POPOUT_DURATION, POPOUT_BEZIER, 1.0, POPOUT_END_SCALE, 1.0, 0.0),
            };

            let elapsed = now.duration_since(anim.started_at).as_secs_f64();
            let t = (elapsed / duration.as_secs_f64()).clamp(0.0, 1.0);
            let eased = bezier_ease(bezier.0, bezier.1, bezier.2, bezier.3, t);

            let scale = start_scale + (end_scale - start_scale) * eased;
            let alpha = start_alpha + (end_alpha - start_alpha) * eased;
            let finished_now = t >= 1.0;

            results.push((window, AnimationSample { scale, alpha, anchor: anim.frame, finished: finished_now }));
            if finished_now {
                finished.push(window);
            }
        }

        for window in finished {
            self.active.remove(&window);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use objc2_core_foundation::{CGPoint, CGRect, CGSize};

    use super::*;

    fn wid(n: u32) -> WindowId { WindowId::new(1, n) }
    fn frame() -> Frame { CGRect::new(CGPoint::new(0.0, 0.0), CGSize::new(800.0, 600.0)) }

    #[test]
    fn popin_stays_settling_before_the_delay_elapses() {
        let mut anim = Animator::default();
        let t0 = Instant::now();
        anim.start_popin(wid(1), frame(), t0);
        let samples = anim.sample(t0 + Duration::from_millis(10));
        assert!(samples.is_empty());
        assert!(anim.is_animating(wid(1)));
    }

    #[test]
    fn popin_reaches_full_scale_and_alpha_at_completion() {
        let mut anim = Animator::default();
        let t0 = Instant::now();
        anim.start_popin(wid(1), frame(), t0);
        let _ = anim.sample(t0 + POPIN_SETTLE_DELAY);
        let samples = anim.sample(t0 + POPIN_SETTLE_DELAY + POPIN_DURATION);
        let (_, sample) = samples.into_iter().find(|(w, _)| *w == wid(1)).unwrap();
        assert!(sample.finished);
        assert!((sample.scale - 1.0).abs() < 1e-6);
        assert!((sample.alpha - 1.0).abs() < 1e-6);
        assert!(!anim.is_animating(wid(1)));
    }

    #[test]
    fn popout_shrinks_and_fades_to_zero() {
        let mut anim = Animator::default();
        let t0 = Instant::now();
        anim.start_popout(wid(1), frame(), t0);
        let samples = anim.sample(t0 + POPOUT_DURATION);
        let (_, sample) = samples.into_iter().find(|(w, _)| *w == wid(1)).unwrap();
        assert!(sample.finished);
        assert!((sample.alpha - 0.0).abs() < 1e-6);
    }

    #[test]
    fn cancel_all_clears_every_active_animation() {
        let mut anim = Animator::default();
        let t0 = Instant::now();
        anim.start_popin(wid(1), frame(), t0);
        anim.start_popout(wid(2), frame(), t0);
        anim.cancel_all();
        assert!(!anim.is_animating(wid(1)));
        assert!(!anim.is_animating(wid(2)));
    }
}

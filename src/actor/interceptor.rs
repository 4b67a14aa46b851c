//! The interceptor (§5, §9 "Interceptor"): a high-priority background
//! thread that pre-hides windows the Core has not yet classified, so a
//! newly created window never flashes at the app's default position
//! before `core::classify::on_window_created` runs (§4.3 "Create").
//!
//! It never mutates Core state. It polls the bridge for each watched
//! process's windows, hides any it has not already hidden and the Core
//! has not already acknowledged as known, and keeps its own private
//! "already hidden" set. The `known`/`pids` sets are the only state
//! shared with the Core, and both are behind a `parking_lot::Mutex` (§5
//! "Shared-resource policy").

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::actor::app::{WindowId, pid_t};
use crate::actor::bridge::CompositorBridge;

/// Matches the compositor's vsync-scale tick used for animation (§4.4).
pub const TICK: Duration = Duration::from_millis(8);

/// Window ids the Core has already classified; the interceptor leaves
/// these alone entirely.
pub type KnownWindows = Arc<Mutex<HashSet<WindowId>>>;

/// Process ids the interceptor polls via `bridge.enumerate_windows`. The
/// Core adds a pid when it first observes a launch and removes it on
/// termination.
pub type WatchedPids = Arc<Mutex<HashSet<pid_t>>>;

/// Runs one poll: for every watched pid, enumerates its windows and hides
/// (alpha 0) any id neither `known` nor already in `hidden`. `hidden` is
/// pruned down to whatever was actually seen this tick, so a destroyed
/// window's id doesn't linger forever.
///
/// Pure with respect to everything but `bridge` and `hidden`, so it can be
/// driven synchronously in tests without a real thread or timer.
pub fn tick(bridge: &mut dyn CompositorBridge, known: &HashSet<WindowId>, hidden: &mut HashSet<WindowId>, pids: &[pid_t]) {
    let mut seen = HashSet::new();
    for &pid in pids {
        let Ok(windows) = bridge.enumerate_windows(pid) else { continue };
        for window in windows {
            seen.insert(window);
            if known.contains(&window) || hidden.contains(&window) {
                continue;
            }
            if bridge.set_alpha(window, 0.0).is_ok() {
                hidden.insert(window);
            }
        }
    }
    hidden.retain(|w| seen.contains(w));
}

/// Owns the background thread; dropping it stops the loop and joins it.
pub struct Interceptor {
    stop: crossbeam_channel::Sender<()>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl Interceptor {
    /// `bridge` is `Mutex<Box<dyn CompositorBridge>>` rather than `Mutex<dyn
    /// CompositorBridge>`: unsizing a boxed trait object is a native `Box`
    /// coercion, while unsizing through a third-party `Mutex` wrapper is not.
    pub fn spawn(bridge: Arc<Mutex<Box<dyn CompositorBridge>>>, known: KnownWindows, pids: WatchedPids) -> Self {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(0);
        let ticker = crossbeam_channel::tick(TICK);
        let handle = std::thread::Builder::new()
            .name("interceptor".into())
            .spawn(move || {
                let mut hidden = HashSet::new();
                loop {
                    crossbeam_channel::select! {
                        recv(ticker) -> _ => {
                            let watched: Vec<pid_t> = pids.lock().iter().copied().collect();
                            let known_snapshot = known.lock().clone();
                            tick(&mut **bridge.lock(), &known_snapshot, &mut hidden, &watched);
                        }
                        recv(stop_rx) -> _ => break,
                    }
                }
            })
            .expect("failed to spawn interceptor thread");
        Self { stop: stop_tx, handle: Some(handle) }
    }
}

impl Drop for Interceptor {
    fn drop(&mut self) {
        let _ = self.stop.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::bridge::RecordingBridge;

    fn wid(pid: pid_t, idx: u32) -> WindowId { WindowId::new(pid, idx) }

    struct FakeBridge {
        inner: RecordingBridge,
        windows_by_pid: std::collections::HashMap<pid_t, Vec<WindowId>>,
    }

    impl CompositorBridge for FakeBridge {
        fn set_frames(&mut self, updates: &[crate::actor::bridge::FrameUpdate]) -> crate::common::error::Result<()> {
            self.inner.set_frames(updates)
        }
        fn set_alpha(&mut self, window: WindowId, alpha: f64) -> crate::common::error::Result<()> {
            self.inner.set_alpha(window, alpha)
        }
        fn set_scale_transform(&mut self, window: WindowId, scale: f64, anchor: crate::geometry::Frame) -> crate::common::error::Result<()> {
            self.inner.set_scale_transform(window, scale, anchor)
        }
        fn focus_window(&mut self, window: WindowId) -> crate::common::error::Result<()> { self.inner.focus_window(window) }
        fn focus_desktop(&mut self) -> crate::common::error::Result<()> { self.inner.focus_desktop() }
        fn invoke_close_button(&mut self, window: WindowId) -> crate::common::error::Result<()> { self.inner.invoke_close_button(window) }
        fn minimize(&mut self, window: WindowId) -> crate::common::error::Result<()> { self.inner.minimize(window) }
        fn restore(&mut self, window: WindowId) -> crate::common::error::Result<()> { self.inner.restore(window) }
        fn set_brightness_offset(&mut self, window: WindowId, offset: f64) -> crate::common::error::Result<()> {
            self.inner.set_brightness_offset(window, offset)
        }
        fn enumerate_windows(&mut self, pid: pid_t) -> crate::common::error::Result<Vec<WindowId>> {
            Ok(self.windows_by_pid.get(&pid).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn hides_a_newly_enumerated_unknown_window_exactly_once() {
        let mut bridge =
            FakeBridge { inner: RecordingBridge::default(), windows_by_pid: [(42, vec![wid(42, 1)])].into() };
        let known = HashSet::new();
        let mut hidden = HashSet::new();

        tick(&mut bridge, &known, &mut hidden, &[42]);
        tick(&mut bridge, &known, &mut hidden, &[42]);

        assert_eq!(bridge.inner.alpha_calls, vec![(wid(42, 1), 0.0)]);
        assert!(hidden.contains(&wid(42, 1)));
    }

    #[test]
    fn never_touches_a_window_the_core_already_knows() {
        let mut bridge =
            FakeBridge { inner: RecordingBridge::default(), windows_by_pid: [(42, vec![wid(42, 1)])].into() };
        let known: HashSet<WindowId> = [wid(42, 1)].into();
        let mut hidden = HashSet::new();

        tick(&mut bridge, &known, &mut hidden, &[42]);

        assert!(bridge.inner.alpha_calls.is_empty());
        assert!(hidden.is_empty());
    }

    #[test]
    fn prunes_hidden_set_once_a_window_stops_being_enumerated() {
        let mut bridge =
            FakeBridge { inner: RecordingBridge::default(), windows_by_pid: [(42, vec![wid(42, 1)])].into() };
        let known = HashSet::new();
        let mut hidden = HashSet::new();
        tick(&mut bridge, &known, &mut hidden, &[42]);
        assert!(hidden.contains(&wid(42, 1)));

        bridge.windows_by_pid.get_mut(&42).unwrap().clear();
        tick(&mut bridge, &known, &mut hidden, &[42]);

        assert!(hidden.is_empty());
    }
}

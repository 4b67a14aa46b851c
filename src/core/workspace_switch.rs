//! `switch_workspace`/`move_to_workspace` (§4.3).

use crate::actor::app::WindowId;
use crate::actor::bridge::FrameUpdate;
use crate::core::retile::retile_workspace;
use crate::core::Core;
use crate::model::workspace_store::{MonitorId, WorkspaceNumber, is_valid_workspace};

/// Steps 1-10 of §4.3. Workspace numbers outside `[1,9]` are ignored (§8
/// boundary law).
pub fn switch_workspace(core: &mut Core, monitor: &MonitorId, n: WorkspaceNumber) {
    if !is_valid_workspace(n) {
        tracing::warn!(n, "workspace number out of range, ignoring");
        return;
    }
    let current = core.store.active_workspace_number(monitor);
    if n == current {
        return;
    }

    core.observer.pause();

    let region = core.region_for(monitor);
    for (window, offset) in core.dimmer.reset_all() {
        if let Err(e) = core.bridge.set_brightness_offset(window, offset) {
            tracing::warn!(?e, "bridge call failed clearing dim on workspace switch");
        }
    }

    let sticky_names = core.config.rules.sticky.clone();
    let sticky_windows: Vec<WindowId> = core
        .store
        .workspace(monitor, current)
        .map(|ws| {
            ws.tracked
                .values()
                .filter(|t| crate::common::config::Rules::matches(&sticky_names, t.app_name.as_deref(), t.bundle_id.as_deref()))
                .map(|t| t.window_id)
                .collect()
        })
        .unwrap_or_default();

    let mut hide_updates = Vec::new();
    if let Some(old_ws) = core.store.workspace(monitor, current) {
        for (&wid, tracked) in &old_ws.tracked {
            if !sticky_windows.contains(&wid) {
                hide_updates.push(FrameUpdate {
                    window: wid,
                    frame: crate::geometry::hidden_position_frame(region, tracked.last_frame.size),
                });
            }
        }
    }
    if let Err(e) = core.bridge.set_frames(&hide_updates) {
        tracing::warn!(?e, "bridge call failed hiding outgoing workspace");
    }

    core.store.active_workspace.insert(monitor.clone(), n);

    {
        let new_ws = core.store.workspace_mut(monitor, n);
        for &wid in &sticky_windows {
            if !new_ws.tracked.contains_key(&wid) {
                new_ws.tiled.push(wid);
            }
        }
    }

    retile_workspace(core, monitor);

    restore_floating_and_fullscreen(core, monitor, n);

    let empty = core.store.workspace(monitor, n).map(|w| w.is_empty()).unwrap_or(true);
    if empty {
        if let Err(e) = core.bridge.focus_desktop() {
            tracing::warn!(?e, "bridge call failed focusing desktop on empty workspace");
        }
    } else {
        let target = core.store.workspace(monitor, n).and_then(|w| w.focused).or_else(|| {
            core.store.workspace(monitor, n).and_then(|w| w.tiled.first().copied())
        });
        if let Some(target) = target {
            if let Err(e) = core.bridge.focus_window(target) {
                tracing::warn!(?e, "bridge call failed focusing window after workspace switch");
            }
            core.store.workspace_mut(monitor, n).focused = Some(target);
        }
    }

    core.observer.resume();
}

fn restore_floating_and_fullscreen(core: &mut Core, monitor: &MonitorId, n: WorkspaceNumber) {
    let Some(ws) = core.store.workspace(monitor, n) else { return };
    let updates: Vec<FrameUpdate> = ws
        .floating
        .iter()
        .chain(ws.fullscreen.iter())
        .filter_map(|w| ws.tracked.get(w).map(|t| FrameUpdate { window: *w, frame: t.last_frame }))
        .collect();
    if let Err(e) = core.bridge.set_frames(&updates) {
        tracing::warn!(?e, "bridge call failed restoring floating/fullscreen frames");
    }
}

/// Symmetric single-window move (§4.3). Forbidden for sticky windows.
pub fn move_to_workspace(core: &mut Core, monitor: &MonitorId, n: WorkspaceNumber) {
    if !is_valid_workspace(n) {
        tracing::warn!(n, "workspace number out of range, ignoring");
        return;
    }
    let current = core.store.active_workspace_number(monitor);
    if n == current {
        return;
    }

    let Some(focused) = core.store.active_workspace(monitor).and_then(|w| w.focused) else { return };
    let is_sticky = core
        .store
        .active_workspace(monitor)
        .and_then(|w| w.tracked.get(&focused))
        .map(|t| {
            crate::common::config::Rules::matches(&core.config.rules.sticky, t.app_name.as_deref(), t.bundle_id.as_deref())
        })
        .unwrap_or(false);
    if is_sticky {
        tracing::debug!(?focused, "sticky window cannot be moved between workspaces");
        return;
    }

    let region = core.region_for(monitor);
    let (subset, tracked) = {
        let ws = core.store.active_workspace_mut(monitor);
        let subset = if ws.fullscreen.contains(&focused) {
            ws.fullscreen.retain(|w| *w != focused);
            Subset::Fullscreen
        } else if ws.floating.contains(&focused) {
            ws.floating.retain(|w| *w != focused);
            Subset::Floating
        } else {
            ws.tiled.retain(|w| *w != focused);
            Subset::Tiled
        };
        if ws.focused == Some(focused) {
            ws.focused = None;
        }
        let tracked = ws.tracked.remove(&focused);
        (subset, tracked)
    };

    if let Some(tracked) = tracked {
        let target_ws = core.store.workspace_mut(monitor, n);
        match subset {
            Subset::Tiled => target_ws.tiled.push(focused),
            Subset::Floating => target_ws.floating.push(focused),
            Subset::Fullscreen => target_ws.fullscreen.push(focused),
        }
        target_ws.tracked.insert(focused, tracked);
    }

    if let Err(e) = core.bridge.set_frames(&[FrameUpdate {
        window: focused,
        frame: crate::geometry::hidden_position_frame(region, region.size),
    }]) {
        tracing::warn!(?e, "bridge call failed hiding moved window");
    }

    retile_workspace(core, monitor);
}

enum Subset {
    Tiled,
    Floating,
    Fullscreen,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::actor::app::WindowId;
    use crate::actor::bridge::RecordingBridge;
    use crate::actor::observer::WindowObserver;
    use crate::core::Core;
    use crate::model::workspace_store::{MonitorId, TrackedWindow};

    fn monitor() -> MonitorId { MonitorId("main".into()) }

    #[derive(Clone, Default)]
    struct SpyCounts {
        pauses: u32,
        resumes: u32,
    }

    /// Holds the shared counter handle so the test can read call counts
    /// after the `SpyObserver` half has been moved into `Box<dyn
    /// WindowObserver>` (the trait object supports no downcasting).
    struct SpyObserver {
        counts: Arc<Mutex<SpyCounts>>,
    }

    impl WindowObserver for SpyObserver {
        fn pause(&mut self) { self.counts.lock().unwrap().pauses += 1; }
        fn resume(&mut self) { self.counts.lock().unwrap().resumes += 1; }
    }

    fn core_with_one_tile() -> Core {
        let mut core =
            Core::new(crate::common::config::Config::default(), None, Box::new(RecordingBridge::default()), vec![monitor()]);
        let w = WindowId::new(1, 1);
        let ws = core.store.active_workspace_mut(&monitor());
        ws.tiled = vec![w];
        ws.tracked.insert(w, TrackedWindow::new(w, 1, Default::default()));
        ws.focused = Some(w);
        core
    }

    #[test]
    fn switch_pauses_then_resumes_the_observer_exactly_once() {
        let mut core = core_with_one_tile();
        let counts = Arc::new(Mutex::new(SpyCounts::default()));
        core.set_observer(Box::new(SpyObserver { counts: counts.clone() }));

        super::switch_workspace(&mut core, &monitor(), 2);

        let counts = counts.lock().unwrap();
        assert_eq!(counts.pauses, 1);
        assert_eq!(counts.resumes, 1);
    }

    #[test]
    fn switch_applies_dim_reset_before_retiling() {
        let mut core = core_with_one_tile();
        core.dimmer.set_config(true, 0.3);
        let tiled = core.store.active_workspace(&monitor()).unwrap().tiled.clone();
        core.dimmer.diff(&tiled, None);

        super::switch_workspace(&mut core, &monitor(), 2);

        // dimmer state was cleared by switch_workspace, so a further
        // reset has nothing left to report.
        assert!(core.dimmer.reset_all().is_empty());
    }
}

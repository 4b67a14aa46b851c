//! Directional/relative focus, monitor focus, and focus-follows-app /
//! focus-follows-mouse (§4.3).

use std::time::{Duration, Instant};

use crate::actor::app::{pid_t, WindowId};
use crate::core::retile::{refresh_border, refresh_dimming};
use crate::core::workspace_switch::switch_workspace;
use crate::core::{Core, MonitorDirection};
use crate::geometry::CGRectExt;
use crate::layout_engine::Direction;
use crate::model::workspace_store::MonitorId;

const FOCUS_FOLLOWS_MOUSE_INTERVAL: Duration = Duration::from_millis(100);

fn focus_and_refresh(core: &mut Core, monitor: &MonitorId, window: WindowId) {
    core.store.active_workspace_mut(monitor).focused = Some(window);
    if let Err(e) = core.bridge.focus_window(window) {
        tracing::warn!(?e, "bridge call failed focusing window");
    }
    refresh_dimming(core, monitor);
    refresh_border(core, monitor);
}

pub fn focus_direction(core: &mut Core, monitor: &MonitorId, direction: Direction) {
    let Some(ws) = core.store.active_workspace(monitor) else { return };
    let Some(focused) = ws.focused else { return };
    let Some(current_frame) = ws.tracked.get(&focused).map(|t| t.last_frame) else { return };

    let candidates: Vec<(WindowId, crate::geometry::Frame)> = ws
        .tiled
        .iter()
        .filter(|w| **w != focused)
        .filter_map(|w| ws.tracked.get(w).map(|t| (*w, t.last_frame)))
        .collect();

    if let Some(target) = crate::layout_engine::neighbor_in_direction(current_frame, &candidates, direction) {
        focus_and_refresh(core, monitor, target);
    }
}

pub fn focus_relative(core: &mut Core, monitor: &MonitorId, delta: i32) {
    let Some(ws) = core.store.active_workspace(monitor) else { return };
    if ws.tiled.is_empty() {
        return;
    }
    let current_index = ws.focused.and_then(|f| ws.tiled.iter().position(|w| *w == f)).unwrap_or(0) as i32;
    let len = ws.tiled.len() as i32;
    let new_index = (current_index + delta).rem_euclid(len) as usize;
    let target = ws.tiled[new_index];
    focus_and_refresh(core, monitor, target);
}

pub fn focus_monitor(core: &mut Core, current: &MonitorId, direction: MonitorDirection) {
    if let Some(target) = neighbor_monitor(core, current, direction) {
        if let Some(focused) = core.store.active_workspace(&target).and_then(|w| w.focused) {
            if let Err(e) = core.bridge.focus_window(focused) {
                tracing::warn!(?e, "bridge call failed focusing window on adjacent monitor");
            }
        }
    }
}

pub fn move_to_monitor(core: &mut Core, current: &MonitorId, direction: MonitorDirection) {
    let Some(target) = neighbor_monitor(core, current, direction) else { return };
    let Some(focused) = core.store.active_workspace(current).and_then(|w| w.focused) else { return };

    let tracked = {
        let ws = core.store.active_workspace_mut(current);
        ws.tiled.retain(|w| *w != focused);
        if ws.focused == Some(focused) {
            ws.focused = ws.tiled.first().copied();
        }
        ws.tracked.remove(&focused)
    };

    if let Some(tracked) = tracked {
        let target_ws = core.store.active_workspace_mut(&target);
        target_ws.tiled.push(focused);
        target_ws.tracked.insert(focused, tracked);
        target_ws.focused = Some(focused);
    }

    crate::core::retile::retile_workspace(core, current);
    crate::core::retile::retile_workspace(core, &target);
}

fn neighbor_monitor(core: &Core, current: &MonitorId, direction: MonitorDirection) -> Option<MonitorId> {
    let index = core.monitors.iter().position(|m| m == current)?;
    let len = core.monitors.len() as i32;
    if len < 2 {
        return None;
    }
    let delta = match direction {
        MonitorDirection::Left => -1,
        MonitorDirection::Right => 1,
    };
    let target_index = (index as i32 + delta).rem_euclid(len) as usize;
    core.monitors.get(target_index).cloned()
}

/// On app-activated: switches to the activated app's workspace only when
/// the active workspace is non-empty and has no window of that app (§4.3
/// "Focus-follows-app" — the non-empty guard avoids bouncing away right
/// after the user closes the last window on a workspace).
pub fn on_app_activated(core: &mut Core, monitor: &MonitorId, pid: pid_t) {
    if !core.config.layout.focus_follows_app || core.auto_switch_in_progress {
        return;
    }

    let active_n = core.store.active_workspace_number(monitor);
    let Some(active_ws) = core.store.workspace(monitor, active_n) else { return };
    if active_ws.is_empty() {
        return;
    }
    if active_ws.tracked.values().any(|t| t.owner_pid == pid) {
        return;
    }

    let Some(workspaces) = core.store.per_monitor.get(monitor) else { return };
    let target = workspaces
        .iter()
        .filter(|(&n, _)| n != active_n)
        .find(|(_, ws)| ws.tracked.values().any(|t| t.owner_pid == pid))
        .map(|(&n, _)| n);

    if let Some(n) = target {
        core.auto_switch_in_progress = true;
        switch_workspace(core, monitor, n);
        core.auto_switch_in_progress = false;
    }
}

/// Throttled to 10 Hz (§4.3 "Focus-follows-mouse").
pub fn on_mouse_moved(core: &mut Core, monitor: &MonitorId, x: f64, y: f64, now: Instant) {
    if !core.config.layout.focus_follows_mouse {
        return;
    }
    if let Some(last) = core.last_focus_follows_mouse_at {
        if now.duration_since(last) < FOCUS_FOLLOWS_MOUSE_INTERVAL {
            return;
        }
    }
    core.last_focus_follows_mouse_at = Some(now);

    let Some(ws) = core.store.active_workspace(monitor) else { return };
    let point = objc2_core_foundation::CGPoint::new(x, y);
    let target = ws.tiled.iter().find(|w| ws.tracked.get(w).map(|t| t.last_frame.contains(point)).unwrap_or(false)).copied();

    if let Some(target) = target {
        if ws.focused != Some(target) {
            focus_and_refresh(core, monitor, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::bridge::RecordingBridge;
    use crate::core::Core;
    use crate::model::workspace_store::MonitorId;

    fn monitor(name: &str) -> MonitorId { MonitorId(name.into()) }

    #[test]
    fn neighbor_monitor_wraps_around() {
        let core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor("a"), monitor("b")],
        );
        assert_eq!(super::neighbor_monitor(&core, &monitor("b"), super::MonitorDirection::Right), Some(monitor("a")));
        assert_eq!(super::neighbor_monitor(&core, &monitor("a"), super::MonitorDirection::Left), Some(monitor("b")));
    }

    #[test]
    fn single_monitor_has_no_neighbor() {
        let core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor("a")],
        );
        assert_eq!(super::neighbor_monitor(&core, &monitor("a"), super::MonitorDirection::Right), None);
    }
}

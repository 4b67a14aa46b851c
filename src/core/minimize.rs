//! Minimize/restore (§4.3).

use crate::actor::app::WindowId;
use crate::actor::bridge::FrameUpdate;
use crate::core::retile::{restore_frame, retile_workspace};
use crate::core::Core;
use crate::model::workspace_store::MonitorId;

/// Windows minimized via `minimize`; restore reinserts them as tiled
/// (unless they were floating) at the §4.3 centered-quarter frame.
pub fn toggle_minimize(core: &mut Core, monitor: &MonitorId) {
    let Some(focused) = core.store.active_workspace(monitor).and_then(|w| w.focused) else { return };
    minimize_window(core, monitor, focused);
}

fn minimize_window(core: &mut Core, monitor: &MonitorId, window: WindowId) {
    {
        let ws = core.store.active_workspace_mut(monitor);
        ws.tiled.retain(|w| *w != window);
        if ws.focused == Some(window) {
            ws.focused = ws.tiled.first().copied();
        }
    }

    let region = core.region_for(monitor);
    let hidden = crate::geometry::hidden_position_frame(region, region.size);
    if let Err(e) = core.bridge.set_frames(&[FrameUpdate { window, frame: hidden }]) {
        tracing::warn!(?e, "bridge call failed hiding minimized window");
    }
    if let Err(e) = core.bridge.minimize(window) {
        tracing::warn!(?e, "bridge call failed minimizing window");
    }

    let empty = core.store.active_workspace(monitor).map(|w| w.focused.is_none() && w.tiled.is_empty()).unwrap_or(true);
    if empty {
        if let Err(e) = core.bridge.focus_desktop() {
            tracing::warn!(?e, "bridge call failed focusing desktop after minimize");
        }
    }

    retile_workspace(core, monitor);
}

pub fn on_minimized_externally(core: &mut Core, window: WindowId) {
    let Some((monitor, _)) = core.store.find_workspace_of(window) else { return };
    minimize_window(core, &monitor, window);
}

pub fn on_restored_externally(core: &mut Core, window: WindowId) {
    let Some((monitor, n)) = core.store.find_workspace_of(window) else { return };
    let region = core.region_for(&monitor);
    let was_floating = core.store.workspace(&monitor, n).and_then(|w| w.tracked.get(&window)).map(|t| t.is_floating).unwrap_or(false);

    let frame = restore_frame(region);
    if let Err(e) = core.bridge.set_frames(&[FrameUpdate { window, frame }]) {
        tracing::warn!(?e, "bridge call failed placing restored window");
    }
    if let Err(e) = core.bridge.restore(window) {
        tracing::warn!(?e, "bridge call failed restoring window");
    }

    {
        let ws = core.store.workspace_mut(&monitor, n);
        if was_floating {
            if !ws.floating.contains(&window) {
                ws.floating.push(window);
            }
        } else if !ws.tiled.contains(&window) {
            ws.tiled.push(window);
        }
        ws.focused = Some(window);
    }

    if core.store.active_workspace_number(&monitor) == n {
        retile_workspace(core, &monitor);
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::app::WindowId;
    use crate::actor::bridge::RecordingBridge;
    use crate::core::Core;
    use crate::model::workspace_store::{MonitorId, TrackedWindow};

    fn wid(n: u32) -> WindowId { WindowId::new(1, n) }
    fn monitor() -> MonitorId { MonitorId("main".into()) }

    fn core_with_one_window() -> Core {
        let mut core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor()],
        );
        let ws = core.store.active_workspace_mut(&monitor());
        ws.tiled.push(wid(1));
        ws.tracked.insert(wid(1), TrackedWindow::new(wid(1), 1, Default::default()));
        ws.focused = Some(wid(1));
        core
    }

    #[test]
    fn minimize_removes_from_tiled_and_clears_focus() {
        let mut core = core_with_one_window();
        super::toggle_minimize(&mut core, &monitor());
        let ws = core.store.active_workspace(&monitor()).unwrap();
        assert!(ws.tiled.is_empty());
        assert_eq!(ws.focused, None);
    }

    #[test]
    fn restore_reinserts_as_tiled_and_focuses() {
        let mut core = core_with_one_window();
        super::toggle_minimize(&mut core, &monitor());
        super::on_restored_externally(&mut core, wid(1));
        let ws = core.store.active_workspace(&monitor()).unwrap();
        assert_eq!(ws.tiled, vec![wid(1)]);
        assert_eq!(ws.focused, Some(wid(1)));
    }
}

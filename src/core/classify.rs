//! Window-creation classification (§4.3 "Classification on window
//! creation") and the destroy/focus/frame-change/terminate event handlers.

use std::time::Instant;

use crate::actor::app::{WindowId, WindowInfo, pid_t};
use crate::common::config::AppRule;
use crate::core::retile::retile_workspace;
use crate::core::{Core, ProcessInfo};
use crate::geometry::Frame;
use crate::model::workspace_store::{Column, MonitorId, TrackedWindow};

const AUTO_FLOAT_MIN_WIDTH: f64 = 500.0;
const AUTO_FLOAT_MIN_HEIGHT: f64 = 400.0;
const SAME_APP_MIN_FRACTION: f64 = 0.7;
const SWALLOW_MAX_ANCESTOR_DEPTH: usize = 5;

/// Walks `pid`'s parent chain up to `SWALLOW_MAX_ANCESTOR_DEPTH` levels,
/// using whatever ancestry the Core has recorded from prior process-info
/// lookups (§4.3 "Swallow attempt").
fn ancestor_pids(core: &Core, pid: pid_t) -> Vec<pid_t> {
    let mut result = Vec::new();
    let mut current = pid;
    for _ in 0..SWALLOW_MAX_ANCESTOR_DEPTH {
        let Some(info) = core.processes.get(&current) else { break };
        let Some(parent) = info.parent_pid else { break };
        result.push(parent);
        current = parent;
    }
    result
}

fn app_identity<'a>(core: &'a Core, pid: pid_t) -> (Option<&'a str>, Option<&'a str>) {
    core.processes
        .get(&pid)
        .map(|p| (p.app_name.as_deref(), p.bundle_id.as_deref()))
        .unwrap_or((None, None))
}

fn should_float(core: &Core, monitor: &MonitorId, pid: pid_t, info: &WindowInfo) -> bool {
    let (name, bundle) = app_identity(core, pid);

    if crate::common::config::Rules::matches(&core.config.rules.float, name, bundle) {
        return true;
    }

    if core.config.layout.auto_float_dialogs {
        if info.subrole.forces_float() {
            return true;
        }
        if info.frame.size.width < AUTO_FLOAT_MIN_WIDTH || info.frame.size.height < AUTO_FLOAT_MIN_HEIGHT {
            return true;
        }
    }

    if let Some(ws) = core.store.active_workspace(monitor) {
        let region = core.region_for(monitor);
        let owner_already_tiled = ws.tiled.iter().any(|w| ws.tracked.get(w).map(|t| t.owner_pid) == Some(pid));
        if owner_already_tiled {
            if info.title.is_empty() {
                return true;
            }
            if info.frame.size.width < region.size.width * SAME_APP_MIN_FRACTION
                || info.frame.size.height < region.size.height * SAME_APP_MIN_FRACTION
            {
                return true;
            }
        }
    }

    false
}

struct SwallowMatch {
    terminal: WindowId,
    index: usize,
}

fn find_swallow_target(core: &Core, monitor: &MonitorId, pid: pid_t) -> Option<SwallowMatch> {
    let ws = core.store.active_workspace(monitor)?;
    for ancestor in ancestor_pids(core, pid) {
        let (name, bundle) = app_identity(core, ancestor);
        let matches_rule = core.config.rules.swallow_all
            || crate::common::config::Rules::matches(&core.config.rules.swallow, name, bundle);
        if !matches_rule {
            continue;
        }
        if let Some(index) = ws.tiled.iter().position(|w| {
            ws.tracked.get(w).map(|t| t.owner_pid == ancestor && t.swallowed_by.is_none()).unwrap_or(false)
        }) {
            return Some(SwallowMatch { terminal: ws.tiled[index], index });
        }
    }
    None
}

#[tracing::instrument(skip(core, info))]
pub fn on_window_created(core: &mut Core, monitor: &MonitorId, wid: WindowId, info: WindowInfo) {
    // Tell the interceptor this window is ours to manage the moment
    // classification starts, so it stops pre-hiding it even if one of the
    // early-return branches below keeps it off-screen for another reason.
    core.known_windows.lock().insert(wid);

    let pid = wid.pid;
    let (name, bundle) = app_identity(core, pid);
    let name = name.map(str::to_string);
    let bundle = bundle.map(str::to_string);

    if crate::common::config::Rules::matches(&core.config.rules.exclude, name.as_deref(), bundle.as_deref()) {
        if let Err(e) = core.bridge.set_alpha(wid, 1.0) {
            tracing::warn!(?e, "bridge call failed restoring excluded window alpha");
        }
        return;
    }

    let floating = should_float(core, monitor, pid, &info);
    let sticky = crate::common::config::Rules::matches(&core.config.rules.sticky, name.as_deref(), bundle.as_deref());

    let home_monitor = monitor.clone();

    // Workspace-restore match (§4.9): a window reopened after a crash or
    // relaunch goes back to the workspace it was on when the snapshot was
    // written, taking priority over a static app rule.
    let restored_workspace = if core.pending_restore.is_empty() {
        None
    } else {
        let open = [crate::actor::persistence::OpenWindow {
            id: wid,
            app_name: name.clone(),
            bundle_id: bundle.clone(),
            title: info.title.clone(),
        }];
        crate::actor::persistence::match_entries(&core.pending_restore, &open)
            .first()
            .map(|&(index, _)| core.pending_restore.remove(index).workspace)
    };

    let home_workspace = match restored_workspace {
        Some(n) if n != core.store.active_workspace_number(&home_monitor) => Some(n),
        Some(_) => None,
        None => match core.config.app_rules.get(name.as_deref(), bundle.as_deref()) {
            Some(AppRule::Workspace(n)) if n != core.store.active_workspace_number(&home_monitor) => Some(n),
            _ => None,
        },
    };

    let tracked = TrackedWindow {
        window_id: wid,
        owner_pid: pid,
        app_name: name.clone(),
        bundle_id: bundle.clone(),
        title: info.title.clone(),
        is_floating: floating,
        last_frame: info.frame,
        swallowed_from: None,
        swallowed_by: None,
    };

    if let Some(target_ws) = home_workspace {
        let ws = core.store.workspace_mut(&home_monitor, target_ws);
        ws.tracked.insert(wid, tracked);
        if floating {
            ws.floating.push(wid);
        } else {
            ws.tiled.push(wid);
        }
        let hidden = crate::geometry::hidden_position_frame(core.region_for(&home_monitor), info.frame.size);
        if let Err(e) = core.bridge.set_frames(&[crate::actor::bridge::FrameUpdate { window: wid, frame: hidden }]) {
            tracing::warn!(?e, "bridge call failed hiding window pinned to another workspace");
        }
        return;
    }

    if !floating {
        if sticky {
            // still goes through active workspace's tiled set; stickiness is
            // enforced by workspace_switch re-merging it onto every switch.
        }

        if let Some(swallow) = find_swallow_target(core, monitor, pid) {
            let region = core.region_for(monitor);
            let ws = core.store.active_workspace_mut(monitor);
            ws.tiled[swallow.index] = wid;
            if let Some(t) = ws.tracked.get_mut(&swallow.terminal) {
                t.swallowed_by = Some(wid);
            }
            ws.tracked.insert(wid, TrackedWindow { swallowed_from: Some(swallow.terminal), ..tracked });
            ws.focused = Some(wid);
            if let Err(e) = core.bridge.set_alpha(swallow.terminal, 0.0) {
                tracing::warn!(?e, "bridge call failed hiding swallowed terminal");
            }
            let hidden = crate::geometry::hidden_position_frame(region, info.frame.size);
            if let Err(e) =
                core.bridge.set_frames(&[crate::actor::bridge::FrameUpdate { window: swallow.terminal, frame: hidden }])
            {
                tracing::warn!(?e, "bridge call failed positioning swallowed terminal off-screen");
            }
            if core.config.layout.animations {
                core.animator.start_popin(wid, info.frame, Instant::now());
            }
            retile_workspace(core, monitor);
            return;
        }

        let app_rule = core.config.app_rules.get(name.as_deref(), bundle.as_deref());
        let ws = core.store.active_workspace_mut(monitor);
        let insert_at = ws.focused.and_then(|f| ws.tiled.iter().position(|w| *w == f)).map(|i| i + 1).unwrap_or(ws.tiled.len());
        ws.tiled.insert(insert_at, wid);
        match app_rule {
            Some(AppRule::Left) => {
                let idx = ws.tiled.iter().position(|w| *w == wid).unwrap();
                let w = ws.tiled.remove(idx);
                ws.tiled.insert(0, w);
            }
            Some(AppRule::Right) => {
                let idx = ws.tiled.iter().position(|w| *w == wid).unwrap();
                let w = ws.tiled.remove(idx);
                ws.tiled.push(w);
            }
            _ => {}
        }
        ws.tracked.insert(wid, tracked);
        ws.focused = Some(wid);

        if !ws.scrolling_columns.is_empty() {
            let at = ws.active_column_index + 1;
            ws.scrolling_columns.insert(at.min(ws.scrolling_columns.len()), Column::single(wid));
            ws.active_column_index = at.min(ws.scrolling_columns.len() - 1);
        }
    } else {
        let ws = core.store.active_workspace_mut(monitor);
        ws.tracked.insert(wid, tracked);
        ws.floating.push(wid);
        ws.focused = Some(wid);
    }

    if let Err(e) = core.bridge.set_alpha(wid, 0.0) {
        tracing::warn!(?e, "bridge call failed pre-hiding new window");
    }
    if core.config.layout.animations {
        core.animator.start_popin(wid, info.frame, Instant::now());
    }
    retile_workspace(core, monitor);
}

pub fn on_window_destroyed(core: &mut Core, wid: WindowId) {
    core.known_windows.lock().remove(&wid);

    let Some((monitor, n)) = core.store.find_workspace_of(wid) else { return };

    let swallowed_from =
        core.store.workspace(&monitor, n).and_then(|ws| ws.tracked.get(&wid)).and_then(|t| t.swallowed_from);

    let former_index = {
        let ws = core.store.workspace_mut(&monitor, n);
        let index = ws.tiled.iter().position(|w| *w == wid);
        if ws.focused == Some(wid) {
            ws.focused = None;
        }
        ws.remove_window(wid);
        index
    };

    if let Some(terminal) = swallowed_from {
        let ws = core.store.workspace_mut(&monitor, n);
        if let Some(t) = ws.tracked.get_mut(&terminal) {
            t.swallowed_by = None;
        }
        let restore_index = former_index.unwrap_or(ws.tiled.len()).min(ws.tiled.len());
        ws.tiled.insert(restore_index, terminal);
        ws.focused = Some(terminal);
        if let Err(e) = core.bridge.set_alpha(terminal, 1.0) {
            tracing::warn!(?e, "bridge call failed restoring unswallowed terminal alpha");
        }
    }

    if core.store.active_workspace_number(&monitor) == n {
        retile_workspace(core, &monitor);
    }
}

pub fn on_window_focused(core: &mut Core, wid: WindowId) {
    let Some((monitor, n)) = core.store.find_workspace_of(wid) else { return };
    let is_active = core.store.active_workspace_number(&monitor) == n;
    let ws = core.store.workspace_mut(&monitor, n);
    if ws.contains(wid) {
        ws.focused = Some(wid);
    }
    if is_active {
        crate::core::retile::refresh_dimming(core, &monitor);
        crate::core::retile::refresh_border(core, &monitor);
    }
}

pub fn on_window_frame_changed(core: &mut Core, wid: WindowId, frame: Frame) {
    if let Some((monitor, n)) = core.store.find_workspace_of(wid) {
        if let Some(ws) = core.store.per_monitor.get_mut(&monitor).and_then(|m| m.get_mut(&n)) {
            if let Some(t) = ws.tracked.get_mut(&wid) {
                t.last_frame = frame;
            }
        }
    }
}

pub fn on_app_terminated(core: &mut Core, pid: pid_t) {
    core.processes.remove(&pid);
    core.watched_pids.lock().remove(&pid);
    let dead: Vec<WindowId> = core
        .store
        .per_monitor
        .values()
        .flat_map(|workspaces| workspaces.values())
        .flat_map(|ws| ws.tracked.values())
        .filter(|t| t.owner_pid == pid)
        .map(|t| t.window_id)
        .collect();
    for wid in dead {
        on_window_destroyed(core, wid);
    }
}

pub fn register_process(core: &mut Core, info: ProcessInfo) {
    core.watched_pids.lock().insert(info.pid);
    core.processes.insert(info.pid, info);
}

#[cfg(test)]
mod tests {
    use crate::actor::app::{Subrole, WindowId, WindowInfo};
    use crate::actor::bridge::RecordingBridge;
    use crate::actor::persistence::SnapshotEntry;
    use crate::core::Core;
    use crate::model::workspace_store::{MonitorId, TrackedWindow};

    fn wid(pid: i32, idx: u32) -> WindowId { WindowId::new(pid, idx) }
    fn monitor() -> MonitorId { MonitorId("main".into()) }

    fn core() -> Core {
        Core::new(crate::common::config::Config::default(), None, Box::new(RecordingBridge::default()), vec![monitor()])
    }

    fn window_info(title: &str) -> WindowInfo {
        WindowInfo { title: title.into(), frame: Default::default(), subrole: Subrole::Standard, is_standard: true, is_minimized: false }
    }

    #[test]
    fn destroying_the_swallowing_child_restores_the_terminal_at_its_former_index() {
        let mut core = core();
        let terminal = wid(1, 1);
        let other_a = wid(2, 1);
        let gui_child = wid(1, 2);
        let other_b = wid(3, 1);

        let ws = core.store.active_workspace_mut(&monitor());
        ws.tiled = vec![other_a, gui_child, other_b];
        ws.tracked.insert(other_a, TrackedWindow::new(other_a, 2, Default::default()));
        ws.tracked.insert(other_b, TrackedWindow::new(other_b, 3, Default::default()));
        let mut child_tracked = TrackedWindow::new(gui_child, 1, Default::default());
        child_tracked.swallowed_from = Some(terminal);
        ws.tracked.insert(gui_child, child_tracked);
        let mut terminal_tracked = TrackedWindow::new(terminal, 1, Default::default());
        terminal_tracked.swallowed_by = Some(gui_child);
        ws.tracked.insert(terminal, terminal_tracked);
        ws.focused = Some(gui_child);

        super::on_window_destroyed(&mut core, gui_child);

        let ws = core.store.active_workspace(&monitor()).unwrap();
        assert_eq!(ws.tiled, vec![other_a, terminal, other_b]);
        assert_eq!(ws.focused, Some(terminal));
        assert!(ws.tracked.get(&terminal).unwrap().swallowed_by.is_none());
    }

    #[test]
    fn pending_restore_entry_routes_a_recreated_window_to_its_saved_workspace() {
        let mut core = core();
        core.pending_restore.push(SnapshotEntry {
            app_name: Some("Editor".into()),
            bundle_id: Some("com.editor".into()),
            window_title: "notes.txt".into(),
            workspace: 3,
            monitor: monitor(),
            is_floating: false,
            is_fullscreen: false,
        });
        core.processes.insert(
            42,
            crate::core::ProcessInfo { pid: 42, parent_pid: None, app_name: Some("Editor".into()), bundle_id: Some("com.editor".into()) },
        );

        super::on_window_created(&mut core, &monitor(), wid(42, 1), window_info("notes.txt"));

        assert!(core.pending_restore.is_empty());
        assert!(core.store.workspace(&monitor(), 3).unwrap().tracked.contains_key(&wid(42, 1)));
        assert!(!core.store.active_workspace(&monitor()).unwrap().tracked.contains_key(&wid(42, 1)));
    }
}

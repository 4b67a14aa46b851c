//! Startup recovery (§4.3 "Failure model", §4.4): windows left at the
//! hidden position by a prior crash are restored, and every window's
//! transform/alpha is reset unconditionally before the Core starts acting
//! on new events.

use crate::actor::app::WindowId;
use crate::actor::bridge::FrameUpdate;
use crate::core::retile::retile_workspace;
use crate::core::Core;
use crate::geometry::{centered_quarter_frame, is_near_hidden_position};

/// Restores any tracked window sitting at or near the hidden position
/// (≤3 px visible) to the centered quarter-screen frame, on every monitor's
/// every workspace. Run once, before the observer starts delivering events.
pub fn restore_orphans(core: &mut Core) {
    let monitors = core.monitors.clone();
    for monitor in &monitors {
        let region = core.region_for(monitor);
        let Some(workspaces) = core.store.per_monitor.get(monitor) else { continue };
        let numbers: Vec<_> = workspaces.keys().copied().collect();

        for n in numbers {
            let orphans: Vec<WindowId> = core
                .store
                .workspace(monitor, n)
                .map(|ws| {
                    ws.tracked
                        .values()
                        .filter(|t| is_near_hidden_position(t.last_frame, region))
                        .map(|t| t.window_id)
                        .collect()
                })
                .unwrap_or_default();

            if orphans.is_empty() {
                continue;
            }

            let restored = centered_quarter_frame(region);
            let updates: Vec<FrameUpdate> = orphans.iter().map(|&window| FrameUpdate { window, frame: restored }).collect();
            if let Err(e) = core.bridge.set_frames(&updates) {
                tracing::warn!(?e, "bridge call failed restoring orphaned windows on startup");
            }

            let ws = core.store.workspace_mut(monitor, n);
            for &window in &orphans {
                if let Some(t) = ws.tracked.get_mut(&window) {
                    t.last_frame = restored;
                }
            }

            if core.store.active_workspace_number(monitor) == n {
                retile_workspace(core, monitor);
            }
        }
    }
}

/// Unconditionally resets every tracked window's scale transform to
/// identity and alpha to 1, and discards any in-flight animation state
/// (§4.4) — a prior process's crash may have left either mid-flight.
pub fn reset_transforms(core: &mut Core) {
    core.animator.cancel_all();

    let windows: Vec<WindowId> = core
        .store
        .per_monitor
        .values()
        .flat_map(|workspaces| workspaces.values())
        .flat_map(|ws| ws.tracked.values())
        .map(|t| t.window_id)
        .collect();

    for window in windows {
        let frame = core
            .store
            .per_monitor
            .values()
            .flat_map(|workspaces| workspaces.values())
            .find_map(|ws| ws.tracked.get(&window).map(|t| t.last_frame));
        let Some(frame) = frame else { continue };
        if let Err(e) = core.bridge.set_scale_transform(window, 1.0, frame) {
            tracing::warn!(?e, "bridge call failed resetting transform on startup");
        }
        if let Err(e) = core.bridge.set_alpha(window, 1.0) {
            tracing::warn!(?e, "bridge call failed resetting alpha on startup");
        }
    }
}

/// Full startup sequence: reset stale animation/transform state, then
/// restore anything left at the hidden position by a prior crash.
pub fn on_startup(core: &mut Core) {
    reset_transforms(core);
    restore_orphans(core);
}

#[cfg(test)]
mod tests {
    use objc2_core_foundation::{CGPoint, CGRect, CGSize};

    use crate::actor::app::WindowId;
    use crate::actor::bridge::RecordingBridge;
    use crate::core::Core;
    use crate::model::workspace_store::{MonitorId, TrackedWindow};

    fn wid(n: u32) -> WindowId { WindowId::new(1, n) }
    fn monitor() -> MonitorId { MonitorId("main".into()) }

    #[test]
    fn restores_window_left_at_hidden_position() {
        let mut core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor()],
        );
        let region = CGRect::new(CGPoint::new(0.0, 0.0), CGSize::new(1920.0, 1080.0));
        core.regions.insert(monitor(), region);

        let hidden = crate::geometry::hidden_position_frame(region, CGSize::new(800.0, 600.0));
        let ws = core.store.active_workspace_mut(&monitor());
        let mut t = TrackedWindow::new(wid(1), 1, hidden);
        t.last_frame = hidden;
        ws.tracked.insert(wid(1), t);
        ws.tiled.push(wid(1));

        super::restore_orphans(&mut core);

        let ws = core.store.active_workspace(&monitor()).unwrap();
        let restored = ws.tracked.get(&wid(1)).unwrap().last_frame;
        assert_eq!(restored.size.width, 960.0);
        assert_eq!(restored.size.height, 540.0);
    }

    #[test]
    fn reset_transforms_touches_every_tracked_window() {
        let mut core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor()],
        );
        let ws = core.store.active_workspace_mut(&monitor());
        ws.tracked.insert(wid(1), TrackedWindow::new(wid(1), 1, Default::default()));
        super::reset_transforms(&mut core);
        // RecordingBridge is behind a trait object; assert indirectly via
        // no panic and animator having no active entries.
        assert!(!core.animator.is_animating(wid(1)));
    }
}

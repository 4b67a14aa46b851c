//! Marks (§4.3, §8 "set_mark(k); jump_mark(k) returns focus to the
//! original window").

use crate::core::workspace_switch::switch_workspace;
use crate::core::Core;
use crate::model::workspace_store::MonitorId;

pub fn set_mark(core: &mut Core, monitor: &MonitorId, key: String) {
    if let Some(focused) = core.store.active_workspace(monitor).and_then(|w| w.focused) {
        core.marks.insert(key, focused);
    }
}

/// If the mark's window is gone (no workspace contains it), the mark is
/// stale and removed.
pub fn jump_mark(core: &mut Core, key: String) {
    let Some(&window) = core.marks.get(&key) else { return };

    let Some((monitor, n)) = core.store.find_workspace_of(window) else {
        core.marks.remove(&key);
        return;
    };

    if core.store.active_workspace_number(&monitor) != n {
        switch_workspace(core, &monitor, n);
    }

    core.store.workspace_mut(&monitor, n).focused = Some(window);
    if let Err(e) = core.bridge.focus_window(window) {
        tracing::warn!(?e, "bridge call failed focusing marked window");
    }
    crate::core::retile::refresh_dimming(core, &monitor);
    crate::core::retile::refresh_border(core, &monitor);
}

#[cfg(test)]
mod tests {
    use crate::actor::app::WindowId;
    use crate::actor::bridge::RecordingBridge;
    use crate::core::Core;
    use crate::model::workspace_store::MonitorId;

    fn wid(n: u32) -> WindowId { WindowId::new(1, n) }
    fn monitor() -> MonitorId { MonitorId("main".into()) }

    #[test]
    fn stale_mark_is_removed_on_jump() {
        let mut core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor()],
        );
        core.marks.insert("a".to_string(), wid(99));
        super::jump_mark(&mut core, "a".to_string());
        assert!(!core.marks.contains_key("a"));
    }

    #[test]
    fn mark_and_jump_restores_focus() {
        let mut core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor()],
        );
        let ws = core.store.active_workspace_mut(&monitor());
        ws.tiled.push(wid(1));
        ws.tracked.insert(wid(1), crate::model::workspace_store::TrackedWindow::new(wid(1), 1, Default::default()));
        ws.focused = Some(wid(1));
        super::set_mark(&mut core, &monitor(), "a".to_string());

        core.store.active_workspace_mut(&monitor()).focused = None;
        super::jump_mark(&mut core, "a".to_string());
        assert_eq!(core.store.active_workspace(&monitor()).unwrap().focused, Some(wid(1)));
    }
}

//! Drag-to-resize and drag-to-reorder (§4.3 "Drag-to-resize and
//! drag-to-reorder"). Resize updates `split_ratio` live, without animation,
//! for the duration of the drag; reorder swaps two tiles' positions only
//! once the drag ends.

use crate::actor::app::WindowId;
use crate::actor::event_tap::DragKind;
use crate::core::retile::retile_workspace;
use crate::core::Core;
use crate::geometry::CGRectExt;
use crate::model::workspace_store::MonitorId;

pub struct DragState {
    monitor: MonitorId,
    kind: DragKind,
    origin_window: Option<WindowId>,
}

fn window_at(core: &Core, monitor: &MonitorId, x: f64, y: f64) -> Option<WindowId> {
    let ws = core.store.active_workspace(monitor)?;
    let point = objc2_core_foundation::CGPoint::new(x, y);
    ws.tiled.iter().find(|w| ws.tracked.get(w).map(|t| t.last_frame.contains(point)).unwrap_or(false)).copied()
}

pub fn on_drag_started(core: &mut Core, monitor: &MonitorId, x: f64, y: f64, kind: DragKind) -> DragState {
    let origin_window = match kind {
        DragKind::Resize => None,
        DragKind::Reorder => window_at(core, monitor, x, y),
    };
    DragState { monitor: monitor.clone(), kind, origin_window }
}

/// Updates `split_ratio` live as the cursor moves; no-op for a reorder drag
/// (that only takes effect on drop, per §4.3).
pub fn on_drag_moved(core: &mut Core, drag: &DragState, x: f64, _y: f64) {
    if !matches!(drag.kind, DragKind::Resize) {
        return;
    }
    let region = core.region_for(&drag.monitor);
    let ratio = (x - region.origin.x) / region.size.width.max(1.0);
    let ws = core.store.active_workspace_mut(&drag.monitor);
    ws.split_ratio = crate::layout_engine::clamp_split_ratio(ratio);
    retile_workspace(core, &drag.monitor);
}

/// Commits a reorder drag by swapping the two windows' positions in
/// `tiled`; a resize drag has already committed its `split_ratio` live and
/// does nothing further here.
pub fn on_drag_ended(core: &mut Core, drag: DragState, x: f64, y: f64) {
    let DragKind::Reorder = drag.kind else { return };
    let Some(origin) = drag.origin_window else { return };
    let Some(target) = window_at(core, &drag.monitor, x, y) else { return };
    if origin == target {
        return;
    }

    let ws = core.store.active_workspace_mut(&drag.monitor);
    let (Some(a), Some(b)) =
        (ws.tiled.iter().position(|w| *w == origin), ws.tiled.iter().position(|w| *w == target))
    else {
        return;
    };
    ws.tiled.swap(a, b);

    retile_workspace(core, &drag.monitor);
}

#[cfg(test)]
mod tests {
    use crate::actor::bridge::RecordingBridge;
    use crate::actor::event_tap::DragKind;
    use crate::core::Core;
    use crate::model::workspace_store::{MonitorId, TrackedWindow};

    fn monitor() -> MonitorId { MonitorId("main".into()) }

    fn core_with_two_tiles() -> Core {
        use crate::actor::app::WindowId;
        use objc2_core_foundation::{CGPoint, CGRect, CGSize};

        let mut core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor()],
        );
        let w1 = WindowId::new(1, 1);
        let w2 = WindowId::new(1, 2);
        let ws = core.store.active_workspace_mut(&monitor());
        ws.tiled = vec![w1, w2];
        let mut t1 = TrackedWindow::new(w1, 1, Default::default());
        t1.last_frame = CGRect::new(CGPoint::new(0.0, 0.0), CGSize::new(100.0, 100.0));
        let mut t2 = TrackedWindow::new(w2, 1, Default::default());
        t2.last_frame = CGRect::new(CGPoint::new(200.0, 0.0), CGSize::new(100.0, 100.0));
        ws.tracked.insert(w1, t1);
        ws.tracked.insert(w2, t2);
        core
    }

    #[test]
    fn reorder_drag_swaps_tiles() {
        let mut core = core_with_two_tiles();
        let w1 = crate::actor::app::WindowId::new(1, 1);
        let w2 = crate::actor::app::WindowId::new(1, 2);
        let drag = super::on_drag_started(&mut core, &monitor(), 50.0, 50.0, DragKind::Reorder);
        super::on_drag_ended(&mut core, drag, 250.0, 50.0);
        let ws = core.store.active_workspace(&monitor()).unwrap();
        assert_eq!(ws.tiled, vec![w2, w1]);
    }

    #[test]
    fn resize_drag_updates_split_ratio_live() {
        let mut core = core_with_two_tiles();
        core.regions.insert(
            monitor(),
            objc2_core_foundation::CGRect::new(
                objc2_core_foundation::CGPoint::new(0.0, 0.0),
                objc2_core_foundation::CGSize::new(1000.0, 1000.0),
            ),
        );
        let drag = super::on_drag_started(&mut core, &monitor(), 0.0, 0.0, DragKind::Resize);
        super::on_drag_moved(&mut core, &drag, 700.0, 0.0);
        assert_eq!(core.store.active_workspace(&monitor()).unwrap().split_ratio, 0.7);
    }
}

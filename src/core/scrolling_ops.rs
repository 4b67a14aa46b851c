//! Scrolling-mode operations (§4.3 "Scrolling-mode specifics", §8 scenario
//! 5). `consume`/`expel` are deliberately not inverses of each other when
//! the active-column index differs afterwards.

use crate::core::retile::retile_workspace;
use crate::core::Core;
use crate::model::workspace_store::{Column, MonitorId};

pub fn scroll_to_column(core: &mut Core, monitor: &MonitorId, index: usize) {
    let ws = core.store.active_workspace_mut(monitor);
    if ws.scrolling_columns.is_empty() {
        return;
    }
    ws.active_column_index = index.min(ws.scrolling_columns.len() - 1);
    retile_workspace(core, monitor);
}

pub fn vertical_focus(core: &mut Core, monitor: &MonitorId, delta: i32) {
    let ws = core.store.active_workspace_mut(monitor);
    let Some(col) = ws.scrolling_columns.get_mut(ws.active_column_index) else { return };
    if col.windows.is_empty() {
        return;
    }
    let new_index = (col.focused_row_index as i32 + delta).clamp(0, col.windows.len() as i32 - 1);
    col.focused_row_index = new_index as usize;
    let focused = col.windows[col.focused_row_index];
    ws.focused = Some(focused);
    crate::core::retile::refresh_dimming(core, monitor);
    crate::core::retile::refresh_border(core, monitor);
}

/// `C_a → C_{a+1}`: the first window of the column to the right joins the
/// end of the active column. The donor column is removed if left empty.
pub fn consume(core: &mut Core, monitor: &MonitorId) {
    let ws = core.store.active_workspace_mut(monitor);
    let donor_index = ws.active_column_index + 1;
    let Some(donor) = ws.scrolling_columns.get(donor_index) else { return };
    if donor.windows.is_empty() {
        return;
    }

    let consumed = ws.scrolling_columns[donor_index].windows.remove(0);
    ws.scrolling_columns[ws.active_column_index].windows.push(consumed);

    if ws.scrolling_columns[donor_index].is_empty() {
        ws.scrolling_columns.remove(donor_index);
    }

    ws.focused = Some(consumed);
    ws.sync_tiled_from_columns();
    retile_workspace(core, monitor);
}

/// Removes the focused window from a multi-window active column and
/// inserts it as a new single-window column immediately to the right,
/// making that the new active column.
pub fn expel(core: &mut Core, monitor: &MonitorId) {
    let ws = core.store.active_workspace_mut(monitor);
    let active = ws.active_column_index;
    let Some(col) = ws.scrolling_columns.get(active) else { return };
    if col.windows.len() < 2 {
        return;
    }
    let Some(focused) = ws.focused else { return };
    let Some(row) = col.windows.iter().position(|w| *w == focused) else { return };

    ws.scrolling_columns[active].windows.remove(row);
    if ws.scrolling_columns[active].focused_row_index >= ws.scrolling_columns[active].windows.len() {
        ws.scrolling_columns[active].focused_row_index = ws.scrolling_columns[active].windows.len().saturating_sub(1);
    }
    ws.scrolling_columns.insert(active + 1, Column::single(focused));
    ws.active_column_index = active + 1;
    ws.focused = Some(focused);
    ws.sync_tiled_from_columns();

    retile_workspace(core, monitor);
}

#[cfg(test)]
mod tests {
    use crate::actor::app::WindowId;
    use crate::actor::bridge::RecordingBridge;
    use crate::core::Core;
    use crate::model::workspace_store::{Column, MonitorId};

    fn wid(n: u32) -> WindowId { WindowId::new(1, n) }
    fn monitor() -> MonitorId { MonitorId("main".into()) }

    fn core_with_columns(cols: Vec<Vec<WindowId>>, active: usize) -> Core {
        let mut core = Core::new(
            crate::common::config::Config::default(),
            None,
            Box::new(RecordingBridge::default()),
            vec![monitor()],
        );
        let ws = core.store.active_workspace_mut(&monitor());
        ws.scrolling_columns = cols.into_iter().map(|w| Column { windows: w, width_override: None, focused_row_index: 0 }).collect();
        ws.active_column_index = active;
        ws.sync_tiled_from_columns();
        core
    }

    #[test]
    fn consume_and_expel_are_not_inverses_across_active_index() {
        let mut core = core_with_columns(vec![vec![wid(1)], vec![wid(2)], vec![wid(3)]], 0);
        super::consume(&mut core, &monitor());
        let ws = core.store.active_workspace(&monitor()).unwrap();
        assert_eq!(ws.scrolling_columns.len(), 2);
        assert_eq!(ws.scrolling_columns[0].windows, vec![wid(1), wid(2)]);
        assert_eq!(ws.active_column_index, 0);

        core.store.active_workspace_mut(&monitor()).focused = Some(wid(2));
        super::expel(&mut core, &monitor());
        let ws = core.store.active_workspace(&monitor()).unwrap();
        assert_eq!(ws.scrolling_columns.len(), 3);
        assert_eq!(ws.active_column_index, 1);
    }

    #[test]
    fn consume_is_noop_with_no_column_to_the_right() {
        let mut core = core_with_columns(vec![vec![wid(1)]], 0);
        super::consume(&mut core, &monitor());
        assert_eq!(core.store.active_workspace(&monitor()).unwrap().scrolling_columns.len(), 1);
    }
}

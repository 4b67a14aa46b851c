//! The passive data model (§3, §4.2). `WorkspaceStore` is a plain
//! container: it offers lookup/insert/remove/snapshot/replace operations
//! and enforces none of the global invariants itself. The Core is the only
//! writer and is responsible for keeping the invariants in §3 true between
//! actions.

use serde::{Deserialize, Serialize};

use crate::actor::app::WindowId;
use crate::common::collections::HashMap;
use crate::geometry::Frame;
use crate::layout_engine::LayoutVariant;

/// Stable identifier for a display, derived from its hardware id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitorId(pub String);

/// Workspace numbers live in `[1, 9]` (§3).
pub type WorkspaceNumber = u8;

pub const MIN_WORKSPACE: WorkspaceNumber = 1;
pub const MAX_WORKSPACE: WorkspaceNumber = 9;

pub fn is_valid_workspace(n: WorkspaceNumber) -> bool { (MIN_WORKSPACE..=MAX_WORKSPACE).contains(&n) }

#[derive(Debug, Clone)]
pub struct TrackedWindow {
    pub window_id: WindowId,
    pub owner_pid: crate::actor::app::pid_t,
    pub app_name: Option<String>,
    pub bundle_id: Option<String>,
    /// Last known title, kept only for workspace-restore matching (§4.9) —
    /// not otherwise read by the Core.
    pub title: String,
    pub is_floating: bool,
    pub last_frame: Frame,
    pub swallowed_from: Option<WindowId>,
    pub swallowed_by: Option<WindowId>,
}

impl TrackedWindow {
    pub fn new(window_id: WindowId, owner_pid: crate::actor::app::pid_t, last_frame: Frame) -> Self {
        Self {
            window_id,
            owner_pid,
            app_name: None,
            bundle_id: None,
            title: String::new(),
            is_floating: false,
            last_frame,
            swallowed_from: None,
            swallowed_by: None,
        }
    }
}

/// A column in scrolling mode (§3, §4.1).
#[derive(Debug, Clone, Default)]
pub struct Column {
    pub windows: Vec<WindowId>,
    /// Fraction of region width, in `[0.1, 3.0]`, overriding the
    /// workspace's default column width.
    pub width_override: Option<f64>,
    pub focused_row_index: usize,
}

impl Column {
    pub fn single(window_id: WindowId) -> Self {
        Self {
            windows: vec![window_id],
            width_override: None,
            focused_row_index: 0,
        }
    }

    pub fn is_empty(&self) -> bool { self.windows.is_empty() }
}

#[derive(Debug, Clone)]
pub struct VirtualWorkspace {
    pub tiled: Vec<WindowId>,
    pub floating: Vec<WindowId>,
    pub fullscreen: Vec<WindowId>,
    pub tracked: HashMap<WindowId, TrackedWindow>,
    pub focused: Option<WindowId>,
    pub layout_variant: LayoutVariant,
    pub split_ratio: f64,
    pub scrolling_columns: Vec<Column>,
    pub active_column_index: usize,
}

impl Default for VirtualWorkspace {
    fn default() -> Self {
        Self {
            tiled: Vec::new(),
            floating: Vec::new(),
            fullscreen: Vec::new(),
            tracked: HashMap::default(),
            focused: None,
            layout_variant: LayoutVariant::SideBySide,
            split_ratio: 0.5,
            scrolling_columns: Vec::new(),
            active_column_index: 0,
        }
    }
}

impl VirtualWorkspace {
    pub fn is_empty(&self) -> bool {
        self.tiled.is_empty() && self.floating.is_empty() && self.fullscreen.is_empty()
    }

    pub fn window_count(&self) -> usize { self.tiled.len() + self.floating.len() + self.fullscreen.len() }

    pub fn contains(&self, wid: WindowId) -> bool { self.tracked.contains_key(&wid) }

    /// Rebuilds `tiled` from `scrolling_columns` by flattening left-to-right,
    /// top-to-bottom (§3 invariant 5, §9 "Scrolling columns").
    pub fn sync_tiled_from_columns(&mut self) {
        self.tiled = self.scrolling_columns.iter().flat_map(|c| c.windows.iter().copied()).collect();
    }

    /// Rebuilds `scrolling_columns` as one window per column, from `tiled`,
    /// used when switching from master-stack into scrolling mode (§9 "Mode
    /// switch rebuilds one from the other").
    pub fn rebuild_columns_from_tiled(&mut self) {
        self.scrolling_columns = self.tiled.iter().copied().map(Column::single).collect();
        self.active_column_index = 0;
    }

    pub fn remove_window(&mut self, wid: WindowId) {
        self.tiled.retain(|id| *id != wid);
        self.floating.retain(|id| *id != wid);
        self.fullscreen.retain(|id| *id != wid);
        for column in &mut self.scrolling_columns {
            column.windows.retain(|id| *id != wid);
        }
        self.scrolling_columns.retain(|c| !c.is_empty());
        if self.active_column_index >= self.scrolling_columns.len() && !self.scrolling_columns.is_empty() {
            self.active_column_index = self.scrolling_columns.len() - 1;
        }
        if self.focused == Some(wid) {
            self.focused = None;
        }
        self.tracked.remove(&wid);
    }
}

#[derive(Debug, Default)]
pub struct WorkspaceStore {
    pub per_monitor: HashMap<MonitorId, HashMap<WorkspaceNumber, VirtualWorkspace>>,
    pub active_workspace: HashMap<MonitorId, WorkspaceNumber>,
}

impl WorkspaceStore {
    pub fn workspace(&self, monitor: &MonitorId, ws: WorkspaceNumber) -> Option<&VirtualWorkspace> {
        self.per_monitor.get(monitor)?.get(&ws)
    }

    pub fn workspace_mut(&mut self, monitor: &MonitorId, ws: WorkspaceNumber) -> &mut VirtualWorkspace {
        self.per_monitor.entry(monitor.clone()).or_default().entry(ws).or_default()
    }

    pub fn active_workspace_number(&self, monitor: &MonitorId) -> WorkspaceNumber {
        self.active_workspace.get(monitor).copied().unwrap_or(MIN_WORKSPACE)
    }

    pub fn active_workspace_mut(&mut self, monitor: &MonitorId) -> &mut VirtualWorkspace {
        let ws = self.active_workspace_number(monitor);
        self.workspace_mut(monitor, ws)
    }

    pub fn active_workspace(&self, monitor: &MonitorId) -> Option<&VirtualWorkspace> {
        let ws = self.active_workspace_number(monitor);
        self.workspace(monitor, ws)
    }

    /// Workspaces with at least one window, for the CLI's `--list-workspaces`
    /// and the "focus other workspace" search used by focus-follows-app.
    pub fn workspaces_with_windows(&self, monitor: &MonitorId) -> Vec<(WorkspaceNumber, usize)> {
        let Some(workspaces) = self.per_monitor.get(monitor) else { return Vec::new() };
        let mut result: Vec<_> = workspaces
            .iter()
            .filter(|(_, ws)| !ws.is_empty())
            .map(|(&n, ws)| (n, ws.window_count()))
            .collect();
        result.sort_by_key(|(n, _)| *n);
        result
    }

    pub fn window_count(&self, monitor: &MonitorId, ws: WorkspaceNumber) -> usize {
        self.workspace(monitor, ws).map(|w| w.window_count()).unwrap_or(0)
    }

    /// Finds the `(monitor, workspace)` currently holding `wid`, if any.
    pub fn find_workspace_of(&self, wid: WindowId) -> Option<(MonitorId, WorkspaceNumber)> {
        for (monitor, workspaces) in &self.per_monitor {
            for (&n, ws) in workspaces {
                if ws.contains(wid) {
                    return Some((monitor.clone(), n));
                }
            }
        }
        None
    }

    pub fn all_hidden_window_ids(&self) -> Vec<WindowId> {
        let mut result = Vec::new();
        for (monitor, workspaces) in &self.per_monitor {
            let active = self.active_workspace_number(monitor);
            for (&n, ws) in workspaces {
                if n != active {
                    result.extend(ws.tracked.keys().copied());
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wid(n: u32) -> WindowId { WindowId::new(1, n) }
    fn monitor() -> MonitorId { MonitorId("main".into()) }

    #[test]
    fn workspace_numbers_outside_one_to_nine_are_invalid() {
        assert!(!is_valid_workspace(0));
        assert!(!is_valid_workspace(10));
        assert!(is_valid_workspace(1));
        assert!(is_valid_workspace(9));
    }

    #[test]
    fn columns_flatten_to_tiled_permutation() {
        let mut ws = VirtualWorkspace::default();
        ws.scrolling_columns = vec![
            Column { windows: vec![wid(1), wid(2)], ..Default::default() },
            Column { windows: vec![wid(3)], ..Default::default() },
        ];
        ws.sync_tiled_from_columns();
        assert_eq!(ws.tiled, vec![wid(1), wid(2), wid(3)]);
    }

    #[test]
    fn store_tracks_active_workspace_per_monitor() {
        let mut store = WorkspaceStore::default();
        store.active_workspace.insert(monitor(), 3);
        assert_eq!(store.active_workspace_number(&monitor()), 3);
        store.workspace_mut(&monitor(), 3).tiled.push(wid(1));
        assert_eq!(store.window_count(&monitor(), 3), 1);
    }

    #[test]
    fn find_workspace_of_locates_a_tracked_window() {
        let mut store = WorkspaceStore::default();
        let ws = store.workspace_mut(&monitor(), 5);
        ws.tiled.push(wid(7));
        ws.tracked.insert(wid(7), TrackedWindow::new(wid(7), 1, Default::default()));
        assert_eq!(store.find_workspace_of(wid(7)), Some((monitor(), 5)));
        assert_eq!(store.find_workspace_of(wid(8)), None);
    }

    #[test]
    fn remove_window_clears_empty_columns_and_focus() {
        let mut ws = VirtualWorkspace::default();
        ws.scrolling_columns = vec![Column::single(wid(1)), Column::single(wid(2))];
        ws.sync_tiled_from_columns();
        ws.focused = Some(wid(1));
        ws.tracked.insert(wid(1), TrackedWindow::new(wid(1), 1, Default::default()));
        ws.remove_window(wid(1));
        assert_eq!(ws.scrolling_columns.len(), 1);
        assert_eq!(ws.focused, None);
        assert!(!ws.tracked.contains_key(&wid(1)));
    }
}

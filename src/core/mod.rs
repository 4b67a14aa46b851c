//! The Core: the only mutator of `WorkspaceStore`, the only caller of
//! `LayoutEngine`, and the single entry point (`handle`) every keybinding,
//! menu item, and CLI invocation funnels through (§4.3, §9).

pub mod classify;
pub mod drag;
pub mod focus;
pub mod marks;
pub mod minimize;
pub mod retile;
pub mod scrolling_ops;
pub mod startup;
pub mod workspace_switch;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::actor::animator::Animator;
use crate::actor::app::{WindowId, pid_t};
use crate::actor::border::BorderRenderer;
use crate::actor::bridge::CompositorBridge;
use crate::actor::dimmer::Dimmer;
use crate::actor::event_tap::InputEvent;
use crate::actor::interceptor::{KnownWindows, WatchedPids};
use crate::actor::observer::{NullObserver, ObserverEvent, WindowObserver};
use crate::actor::persistence::SnapshotEntry;
use crate::common::config::Config;
use crate::core::drag::DragState;
use crate::layout_engine::Direction;
use crate::model::workspace_store::{MonitorId, WorkspaceNumber, WorkspaceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionTarget {
    Left,
    Right,
    Up,
    Down,
    Fill,
    Center,
}

/// The full set of user-triggerable operations (§9 "Action as a sum type").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    FocusDirection(Direction),
    FocusNext,
    FocusPrev,
    SwapMaster,
    RotateNext,
    RotatePrev,
    CycleLayout,
    ToggleFloat,
    ToggleFullscreen,
    Close,
    Retile,
    ReloadConfig,
    FocusMonitor(MonitorDirection),
    MoveToMonitor(MonitorDirection),
    Position(PositionTarget),
    IncreaseGap,
    DecreaseGap,
    GrowFocused,
    ShrinkFocused,
    SwitchWorkspace(WorkspaceNumber),
    MoveToWorkspace(WorkspaceNumber),
    Minimize,
    SetMark(String),
    JumpMark(String),
    NiriConsume,
    NiriExpel,
}

/// A live accessibility/process record for an app the Core has seen at
/// least one window from; used by swallow's parent-chain walk.
#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub pid: pid_t,
    pub parent_pid: Option<pid_t>,
    pub app_name: Option<String>,
    pub bundle_id: Option<String>,
}

pub struct Core {
    pub store: WorkspaceStore,
    pub config: Config,
    pub config_path: Option<std::path::PathBuf>,
    pub bridge: Box<dyn CompositorBridge>,
    pub observer: Box<dyn WindowObserver>,
    pub animator: Animator,
    pub border: BorderRenderer,
    pub dimmer: Dimmer,
    pub marks: crate::common::collections::HashMap<String, WindowId>,
    pub monitors: Vec<MonitorId>,
    pub regions: crate::common::collections::HashMap<MonitorId, crate::geometry::Frame>,
    pub processes: crate::common::collections::HashMap<pid_t, ProcessInfo>,
    pub auto_switch_in_progress: bool,
    pub last_focus_follows_mouse_at: Option<Instant>,
    pub drag: Option<DragState>,
    /// Shared with the `Interceptor` background thread (§5, §9). Every
    /// window the Core has classified is added here so the interceptor
    /// stops pre-hiding it.
    pub known_windows: KnownWindows,
    /// Shared with the `Interceptor` background thread. The Core adds a
    /// pid on launch and removes it on termination so the interceptor only
    /// polls processes it still cares about.
    pub watched_pids: WatchedPids,
    /// Unmatched entries from the workspace-restore snapshot, loaded once
    /// at startup. `classify::on_window_created` consumes one entry per
    /// match so each is applied to at most one newly created window (§4.9).
    pub pending_restore: Vec<SnapshotEntry>,
}

/// Used only until a real display query reports the monitor's frame.
fn fallback_region() -> crate::geometry::Frame {
    use objc2_core_foundation::{CGPoint, CGRect, CGSize};
    CGRect::new(CGPoint::new(0.0, 0.0), CGSize::new(1920.0, 1080.0))
}

impl Core {
    pub fn new(
        config: Config,
        config_path: Option<std::path::PathBuf>,
        bridge: Box<dyn CompositorBridge>,
        monitors: Vec<MonitorId>,
    ) -> Self {
        let dimmer = Dimmer::new(config.layout.dim_unfocused > 0.0, config.layout.dim_unfocused);
        let border = BorderRenderer::new(crate::actor::border::BorderStyle {
            enabled: config.border.enabled,
            width: config.border.width,
            radius: config.border.radius,
        });
        Self {
            store: WorkspaceStore::default(),
            config,
            config_path,
            bridge,
            observer: Box::new(NullObserver),
            animator: Animator::default(),
            border,
            dimmer,
            marks: Default::default(),
            monitors,
            regions: Default::default(),
            processes: Default::default(),
            auto_switch_in_progress: false,
            last_focus_follows_mouse_at: None,
            drag: None,
            known_windows: Default::default(),
            watched_pids: Default::default(),
            pending_restore: Vec::new(),
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn WindowObserver>) { self.observer = observer; }

    pub fn primary_monitor(&self) -> MonitorId {
        self.monitors.first().cloned().unwrap_or_else(|| MonitorId("main".to_string()))
    }

    pub fn region_for(&self, monitor: &MonitorId) -> crate::geometry::Frame {
        self.regions.get(monitor).copied().unwrap_or_else(fallback_region)
    }

    /// Single entry point for every keybinding, menu item, and CLI command
    /// (§9). Never panics: every branch that can fail contains the failure
    /// within itself per §7.
    #[instrument(skip(self))]
    pub fn handle(&mut self, monitor: MonitorId, action: Action) {
        match action {
            Action::FocusDirection(dir) => focus::focus_direction(self, &monitor, dir),
            Action::FocusNext => focus::focus_relative(self, &monitor, 1),
            Action::FocusPrev => focus::focus_relative(self, &monitor, -1),
            Action::SwapMaster => {
                let ws = self.store.active_workspace_mut(&monitor);
                if let Some(focused) = ws.focused {
                    crate::layout_engine::swap_with_first(&mut ws.tiled, focused);
                }
                retile::retile_workspace(self, &monitor);
            }
            Action::RotateNext => {
                crate::layout_engine::rotate_next(&mut self.store.active_workspace_mut(&monitor).tiled);
                retile::retile_workspace(self, &monitor);
            }
            Action::RotatePrev => {
                crate::layout_engine::rotate_prev(&mut self.store.active_workspace_mut(&monitor).tiled);
                retile::retile_workspace(self, &monitor);
            }
            Action::CycleLayout => {
                let ws = self.store.active_workspace_mut(&monitor);
                ws.layout_variant = ws.layout_variant.cycle();
                retile::retile_workspace(self, &monitor);
            }
            Action::ToggleFloat => retile::toggle_float(self, &monitor),
            Action::ToggleFullscreen => retile::toggle_fullscreen(self, &monitor),
            Action::Close => retile::close_focused(self, &monitor),
            Action::Retile => retile::retile_workspace(self, &monitor),
            Action::ReloadConfig => {
                if let Some(path) = self.config_path.clone() {
                    match Config::load(&path) {
                        Ok(new_config) => self.reload_config(new_config),
                        Err(e) => tracing::warn!(?e, "config reload failed, keeping current config"),
                    }
                }
            }
            Action::FocusMonitor(dir) => focus::focus_monitor(self, &monitor, dir),
            Action::MoveToMonitor(dir) => focus::move_to_monitor(self, &monitor, dir),
            Action::Position(target) => retile::position_focused(self, &monitor, target),
            Action::IncreaseGap => {
                self.config.layout.inner_gap += 2.0;
                retile::retile_workspace(self, &monitor);
            }
            Action::DecreaseGap => {
                self.config.layout.inner_gap = (self.config.layout.inner_gap - 2.0).max(0.0);
                retile::retile_workspace(self, &monitor);
            }
            Action::GrowFocused => retile::adjust_split_ratio(self, &monitor, 0.05),
            Action::ShrinkFocused => retile::adjust_split_ratio(self, &monitor, -0.05),
            Action::SwitchWorkspace(n) => workspace_switch::switch_workspace(self, &monitor, n),
            Action::MoveToWorkspace(n) => workspace_switch::move_to_workspace(self, &monitor, n),
            Action::Minimize => minimize::toggle_minimize(self, &monitor),
            Action::SetMark(key) => marks::set_mark(self, &monitor, key),
            Action::JumpMark(key) => marks::jump_mark(self, key),
            Action::NiriConsume => scrolling_ops::consume(self, &monitor),
            Action::NiriExpel => scrolling_ops::expel(self, &monitor),
        }
    }

    #[instrument(skip(self, event))]
    pub fn on_window_event(&mut self, monitor: MonitorId, event: ObserverEvent) {
        match event {
            ObserverEvent::WindowCreated(wid, info) => classify::on_window_created(self, &monitor, wid, info),
            ObserverEvent::WindowDestroyed(wid) => classify::on_window_destroyed(self, wid),
            ObserverEvent::WindowFocused(wid) => classify::on_window_focused(self, wid),
            ObserverEvent::WindowFrameChanged(wid, frame) => classify::on_window_frame_changed(self, wid, frame),
            ObserverEvent::WindowMinimized(wid) => minimize::on_minimized_externally(self, wid),
            ObserverEvent::WindowDeminiaturized(wid) => minimize::on_restored_externally(self, wid),
            ObserverEvent::ApplicationActivated(pid) => focus::on_app_activated(self, &monitor, pid),
            ObserverEvent::ApplicationTerminated(pid) => classify::on_app_terminated(self, pid),
            ObserverEvent::ApplicationLaunched(_) | ObserverEvent::WindowTitleChanged(_, _) => {}
        }
    }

    /// Mouse/drag input not covered by a keybinding (§4.3 "Drag-to-resize
    /// and drag-to-reorder", "Focus-follows-mouse"). Key chords are resolved
    /// to an `Action` by the caller via `Bindings::resolve` before reaching
    /// `handle`.
    #[instrument(skip(self, event))]
    pub fn on_input_event(&mut self, monitor: MonitorId, event: InputEvent) {
        match event {
            InputEvent::KeyDown(_) => {}
            InputEvent::MouseMoved { x, y } => focus::on_mouse_moved(self, &monitor, x, y, Instant::now()),
            InputEvent::DragStarted { x, y, kind } => {
                self.drag = Some(drag::on_drag_started(self, &monitor, x, y, kind));
            }
            InputEvent::DragMoved { x, y } => {
                if let Some(drag) = self.drag.take() {
                    drag::on_drag_moved(self, &drag, x, y);
                    self.drag = Some(drag);
                }
            }
            InputEvent::DragEnded { x, y } => {
                if let Some(drag) = self.drag.take() {
                    drag::on_drag_ended(self, drag, x, y);
                }
            }
        }
    }

    /// Advances every active open/close animation to `now` and applies the
    /// resulting scale/alpha to the bridge (§4.4). The only caller of
    /// `Animator::sample`; the daemon loop drives this on its own tick
    /// independent of every other event source.
    pub fn sample_animations(&mut self, now: Instant) {
        for (window, sample) in self.animator.sample(now) {
            if let Err(e) = self.bridge.set_scale_transform(window, sample.scale, sample.anchor) {
                tracing::warn!(?e, ?window, "bridge call failed applying animation scale");
            }
            if let Err(e) = self.bridge.set_alpha(window, sample.alpha) {
                tracing::warn!(?e, ?window, "bridge call failed applying animation alpha");
            }
        }
    }

    /// Applies `Event::ConfigUpdated` exactly once; callers are responsible
    /// for not double-firing it (§9 "Decisions on open questions").
    #[instrument(skip(self, new_config))]
    pub fn reload_config(&mut self, new_config: Config) {
        self.dimmer.set_config(new_config.layout.dim_unfocused > 0.0, new_config.layout.dim_unfocused);
        if new_config.layout.dim_unfocused <= 0.0 {
            for (window, offset) in self.dimmer.reset_all() {
                if let Err(e) = self.bridge.set_brightness_offset(window, offset) {
                    tracing::warn!(?e, "bridge call failed resetting dim on reload");
                }
            }
        }
        self.border.set_style(crate::actor::border::BorderStyle {
            enabled: new_config.border.enabled,
            width: new_config.border.width,
            radius: new_config.border.radius,
        });
        self.config = new_config;
    }
}

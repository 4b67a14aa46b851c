//! Retile, close, float/fullscreen toggles, and the positional/gap/split
//! keybindings (§4.3 "Retile semantics", "Close semantics").

use std::time::Instant;

use crate::actor::bridge::FrameUpdate;
use crate::core::Core;
use crate::geometry::{CGRectExt, Frame};
use crate::layout_engine::{master_stack, scrolling};
use crate::model::workspace_store::MonitorId;

/// Computes and applies the active workspace's tiled frames as a single
/// atomic batch, per the layout variant/mode currently in effect.
pub fn retile_workspace(core: &mut Core, monitor: &MonitorId) {
    let region = core.region_for(monitor);
    let gap = core.config.layout.inner_gap;
    let padding = core.config.layout.single_window_padding;
    let ws = core.store.active_workspace_mut(monitor);

    let mut updates = Vec::new();

    if !ws.scrolling_columns.is_empty() {
        let inputs: Vec<scrolling::ColumnLayoutInput> = ws
            .scrolling_columns
            .iter()
            .map(|c| scrolling::ColumnLayoutInput { window_count: c.windows.len(), width_override: c.width_override })
            .collect();
        let column_frames = scrolling::frames_for_columns(
            &inputs,
            ws.active_column_index,
            region,
            gap,
            core.config.layout.niri_column_width,
        );
        for (col, result) in ws.scrolling_columns.iter().zip(column_frames.iter()) {
            for (window, frame) in col.windows.iter().zip(result.frames.iter()) {
                let target = if result.is_visible {
                    *frame
                } else {
                    crate::geometry::hidden_position_frame(region, frame.size)
                };
                updates.push(FrameUpdate { window: *window, frame: target });
            }
        }
    } else {
        let frames = master_stack::frames(ws.tiled.len(), region, gap, padding, ws.split_ratio, ws.layout_variant);
        for (window, frame) in ws.tiled.iter().zip(frames.iter()) {
            updates.push(FrameUpdate { window: *window, frame: *frame });
        }
    }

    if let Err(e) = core.bridge.set_frames(&updates) {
        tracing::warn!(?e, "bridge call failed during retile");
    }

    for update in &updates {
        if let Some(tracked) = ws.tracked.get_mut(&update.window) {
            tracked.last_frame = update.frame;
        }
    }

    refresh_dimming(core, monitor);
    refresh_border(core, monitor);
}

pub fn refresh_dimming(core: &mut Core, monitor: &MonitorId) {
    let ws = core.store.active_workspace(monitor);
    let Some(ws) = ws else { return };
    let changes = core.dimmer.diff(&ws.tiled, ws.focused);
    for (window, offset) in changes {
        if let Err(e) = core.bridge.set_brightness_offset(window, offset) {
            tracing::warn!(?e, "bridge call failed setting dim");
        }
    }
}

pub fn refresh_border(core: &mut Core, monitor: &MonitorId) {
    let Some(ws) = core.store.active_workspace(monitor) else { return };
    let focused = ws.focused.and_then(|w| ws.tracked.get(&w).map(|t| (w, t.last_frame)));
    core.border.set_focused(focused);
}

/// Toggles `focused` between `tiled` and `floating` (§8 "toggle_float
/// twice returns a window to its original subset").
pub fn toggle_float(core: &mut Core, monitor: &MonitorId) {
    let ws = core.store.active_workspace_mut(monitor);
    let Some(focused) = ws.focused else { return };

    if let Some(pos) = ws.tiled.iter().position(|w| *w == focused) {
        ws.tiled.remove(pos);
        ws.floating.push(focused);
        if let Some(t) = ws.tracked.get_mut(&focused) {
            t.is_floating = true;
        }
    } else if let Some(pos) = ws.floating.iter().position(|w| *w == focused) {
        ws.floating.remove(pos);
        ws.tiled.push(focused);
        if let Some(t) = ws.tracked.get_mut(&focused) {
            t.is_floating = false;
        }
    }

    retile_workspace(core, monitor);
}

pub fn toggle_fullscreen(core: &mut Core, monitor: &MonitorId) {
    let region = core.region_for(monitor);
    let ws = core.store.active_workspace_mut(monitor);
    let Some(focused) = ws.focused else { return };

    if let Some(pos) = ws.fullscreen.iter().position(|w| *w == focused) {
        ws.fullscreen.remove(pos);
        ws.tiled.push(focused);
    } else {
        ws.tiled.retain(|w| *w != focused);
        ws.floating.retain(|w| *w != focused);
        ws.fullscreen.push(focused);
        if let Err(e) = core.bridge.set_frames(&[FrameUpdate { window: focused, frame: region }]) {
            tracing::warn!(?e, "bridge call failed setting fullscreen frame");
        }
    }

    retile_workspace(core, monitor);
}

/// Close semantics (§4.3): plays the popout on the target while
/// simultaneously redistributing the remaining tiled windows, then invokes
/// the compositor close action.
pub fn close_focused(core: &mut Core, monitor: &MonitorId) {
    let region = core.region_for(monitor);
    let Some(focused) = core.store.active_workspace(monitor).and_then(|w| w.focused) else { return };
    let frame = core
        .store
        .active_workspace(monitor)
        .and_then(|w| w.tracked.get(&focused))
        .map(|t| t.last_frame)
        .unwrap_or(region);

    if core.config.layout.animations {
        core.animator.start_popout(focused, frame, Instant::now());
    }

    {
        let ws = core.store.active_workspace_mut(monitor);
        ws.tiled.retain(|w| *w != focused);
        ws.floating.retain(|w| *w != focused);
        ws.fullscreen.retain(|w| *w != focused);
        if ws.focused == Some(focused) {
            ws.focused = ws.tiled.first().copied();
        }
    }

    retile_workspace(core, monitor);

    if let Err(e) = core.bridge.invoke_close_button(focused) {
        tracing::warn!(?e, "bridge call failed invoking close button");
    }
}

/// Positional keybindings (§6 `position_*`): reassigns the focused window
/// among the four master-stack quadrants, or fills/centers it as a float.
pub fn position_focused(core: &mut Core, monitor: &MonitorId, target: crate::core::PositionTarget) {
    use crate::core::PositionTarget;
    use crate::layout_engine::TilePosition;

    match target {
        PositionTarget::Left | PositionTarget::Up => {
            let ws = core.store.active_workspace_mut(monitor);
            if let Some(focused) = ws.focused {
                crate::layout_engine::move_position(&mut ws.tiled, focused, TilePosition::First);
            }
            retile_workspace(core, monitor);
        }
        PositionTarget::Right | PositionTarget::Down => {
            let ws = core.store.active_workspace_mut(monitor);
            if let Some(focused) = ws.focused {
                crate::layout_engine::move_position(&mut ws.tiled, focused, TilePosition::Last);
            }
            retile_workspace(core, monitor);
        }
        PositionTarget::Fill => {
            let region = core.region_for(monitor);
            if let Some(focused) = core.store.active_workspace(monitor).and_then(|w| w.focused) {
                if let Err(e) = core.bridge.set_frames(&[FrameUpdate { window: focused, frame: region }]) {
                    tracing::warn!(?e, "bridge call failed filling focused window");
                }
            }
        }
        PositionTarget::Center => {
            let region = core.region_for(monitor);
            if let Some(focused) = core.store.active_workspace(monitor).and_then(|w| w.focused) {
                let frame = crate::geometry::centered_quarter_frame(region);
                if let Err(e) = core.bridge.set_frames(&[FrameUpdate { window: focused, frame }]) {
                    tracing::warn!(?e, "bridge call failed centering focused window");
                }
            }
        }
    }
}

pub fn adjust_split_ratio(core: &mut Core, monitor: &MonitorId, delta: f64) {
    let ws = core.store.active_workspace_mut(monitor);
    ws.split_ratio = crate::layout_engine::clamp_split_ratio(ws.split_ratio + delta);
    retile_workspace(core, monitor);
}

/// Centered-quarter restore frame used by `minimize::restore` (§4.3).
pub fn restore_frame(region: Frame) -> Frame { crate::geometry::centered_quarter_frame(region) }

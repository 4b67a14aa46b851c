//! `CompositorBridge`: the seam between the Core's pure decisions and the
//! accessibility layer that actually moves windows. Production code talks
//! to AXUIElement through `objc2`/`objc2-app-kit`/`objc2-core-foundation`;
//! tests use `RecordingBridge` instead so layout/focus logic can be
//! checked without a window server.

use crate::actor::app::{WindowId, pid_t};
use crate::common::error::Result;
use crate::geometry::Frame;

/// One atomic frame change within a batch (§4.1 "Retiling").
#[derive(Debug, Clone, Copy)]
pub struct FrameUpdate {
    pub window: WindowId,
    pub frame: Frame,
}

pub trait CompositorBridge: Send {
    /// Applies every update in `updates` as a single batch; a transient
    /// failure on one window (§7 `BridgeTransient`) must not abort the rest.
    fn set_frames(&mut self, updates: &[FrameUpdate]) -> Result<()>;

    fn set_alpha(&mut self, window: WindowId, alpha: f64) -> Result<()>;

    fn set_scale_transform(&mut self, window: WindowId, scale: f64, anchor: Frame) -> Result<()>;

    /// Focuses `window` without raising its owning app over other spaces
    /// (§4.3 "focus without space activation").
    fn focus_window(&mut self, window: WindowId) -> Result<()>;

    /// Focuses the desktop/file-manager app, used when a workspace switch
    /// lands on an empty workspace so the OS doesn't keep an unrelated app
    /// focused (§4.3 "Focus policy").
    fn focus_desktop(&mut self) -> Result<()>;

    fn invoke_close_button(&mut self, window: WindowId) -> Result<()>;

    fn minimize(&mut self, window: WindowId) -> Result<()>;

    fn restore(&mut self, window: WindowId) -> Result<()>;

    fn set_brightness_offset(&mut self, window: WindowId, offset: f64) -> Result<()>;

    fn enumerate_windows(&mut self, pid: pid_t) -> Result<Vec<WindowId>>;
}

/// A `CompositorBridge` that records every call instead of touching a real
/// window server; grounds unit tests for `core::retile`/`core::drag`/etc.
/// against observable call sequences.
#[derive(Debug, Default)]
pub struct RecordingBridge {
    pub frame_calls: Vec<Vec<FrameUpdate>>,
    pub alpha_calls: Vec<(WindowId, f64)>,
    pub transform_calls: Vec<(WindowId, f64, Frame)>,
    pub focus_calls: Vec<WindowId>,
    pub focus_desktop_calls: u32,
    pub close_calls: Vec<WindowId>,
    pub minimize_calls: Vec<WindowId>,
    pub restore_calls: Vec<WindowId>,
    pub brightness_calls: Vec<(WindowId, f64)>,
}

impl CompositorBridge for RecordingBridge {
    fn set_frames(&mut self, updates: &[FrameUpdate]) -> Result<()> {
        self.frame_calls.push(updates.to_vec());
        Ok(())
    }

    fn set_alpha(&mut self, window: WindowId, alpha: f64) -> Result<()> {
        self.alpha_calls.push((window, alpha));
        Ok(())
    }

    fn set_scale_transform(&mut self, window: WindowId, scale: f64, anchor: Frame) -> Result<()> {
        self.transform_calls.push((window, scale, anchor));
        Ok(())
    }

    fn focus_window(&mut self, window: WindowId) -> Result<()> {
        self.focus_calls.push(window);
        Ok(())
    }

    fn focus_desktop(&mut self) -> Result<()> {
        self.focus_desktop_calls += 1;
        Ok(())
    }

    fn invoke_close_button(&mut self, window: WindowId) -> Result<()> {
        self.close_calls.push(window);
        Ok(())
    }

    fn minimize(&mut self, window: WindowId) -> Result<()> {
        self.minimize_calls.push(window);
        Ok(())
    }

    fn restore(&mut self, window: WindowId) -> Result<()> {
        self.restore_calls.push(window);
        Ok(())
    }

    fn set_brightness_offset(&mut self, window: WindowId, offset: f64) -> Result<()> {
        self.brightness_calls.push((window, offset));
        Ok(())
    }

    fn enumerate_windows(&mut self, _pid: pid_t) -> Result<Vec<WindowId>> { Ok(Vec::new()) }
}

/// Stands in for the AXUIElement-backed bridge until platform integration
/// is wired in (the compositor bridge is a deliberately out-of-scope
/// external collaborator). Every call is logged and acknowledged as a
/// success so the Core's own logic can run unmodified ahead of that wiring.
#[derive(Debug, Default)]
pub struct NullBridge;

impl CompositorBridge for NullBridge {
    fn set_frames(&mut self, updates: &[FrameUpdate]) -> Result<()> {
        tracing::debug!(count = updates.len(), "NullBridge::set_frames");
        Ok(())
    }

    fn set_alpha(&mut self, window: WindowId, alpha: f64) -> Result<()> {
        tracing::debug!(?window, alpha, "NullBridge::set_alpha");
        Ok(())
    }

    fn set_scale_transform(&mut self, window: WindowId, scale: f64, _anchor: Frame) -> Result<()> {
        tracing::debug!(?window, scale, "NullBridge::set_scale_transform");
        Ok(())
    }

    fn focus_window(&mut self, window: WindowId) -> Result<()> {
        tracing::debug!(?window, "NullBridge::focus_window");
        Ok(())
    }

    fn focus_desktop(&mut self) -> Result<()> {
        tracing::debug!("NullBridge::focus_desktop");
        Ok(())
    }

    fn invoke_close_button(&mut self, window: WindowId) -> Result<()> {
        tracing::debug!(?window, "NullBridge::invoke_close_button");
        Ok(())
    }

    fn minimize(&mut self, window: WindowId) -> Result<()> {
        tracing::debug!(?window, "NullBridge::minimize");
        Ok(())
    }

    fn restore(&mut self, window: WindowId) -> Result<()> {
        tracing::debug!(?window, "NullBridge::restore");
        Ok(())
    }

    fn set_brightness_offset(&mut self, window: WindowId, offset: f64) -> Result<()> {
        tracing::debug!(?window, offset, "NullBridge::set_brightness_offset");
        Ok(())
    }

    fn enumerate_windows(&mut self, _pid: pid_t) -> Result<Vec<WindowId>> { Ok(Vec::new()) }
}

//! Identity types shared between the Core and every collaborator actor.
//!
//! `WindowId` pairs the owning process id with a per-process window index
//! instead of reusing the raw accessibility element pointer as an identity,
//! because AX element references are invalidated by the OS out from under
//! us; the `(pid, idx)` pair stays stable for the lifetime of the window.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::geometry::Frame;

pub type pid_t = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId {
    pub pid: pid_t,
    pub idx: NonZeroU32,
}

impl WindowId {
    pub fn new(pid: pid_t, idx: u32) -> Self {
        Self {
            pid,
            idx: NonZeroU32::new(idx).expect("window index must be nonzero"),
        }
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.pid, self.idx)
    }
}

/// Accessibility-layer subrole, queried only for auto-float classification
/// (§4.3 step 2b). Not every subrole is meaningful here; the rest are
/// treated as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subrole {
    Standard,
    Dialog,
    Sheet,
    FloatingWindow,
    SystemDialog,
    SystemFloatingWindow,
    Other,
}

impl Subrole {
    pub fn forces_float(self) -> bool {
        matches!(
            self,
            Subrole::Dialog
                | Subrole::Sheet
                | Subrole::FloatingWindow
                | Subrole::SystemDialog
                | Subrole::SystemFloatingWindow
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppInfo {
    pub pid: pid_t,
    pub localized_name: Option<String>,
    pub bundle_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub title: String,
    pub frame: Frame,
    pub subrole: Subrole,
    pub is_standard: bool,
    pub is_minimized: bool,
}

/// Marker distinguishing a window-created event the user directly caused
/// (e.g. Cmd+N) from one discovered incidentally; both are handled the
/// same way by the Core today but the distinction is kept for callers that
/// want to suppress sounds/animations on discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quiet(pub bool);

/// Requests the Core can send to a per-application collaborator thread.
#[derive(Debug)]
pub enum Request {
    GetVisibleWindows,
    Terminate,
}

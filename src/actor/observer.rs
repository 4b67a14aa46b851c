//! `WindowObserver`: the seam the accessibility notification center sits
//! behind. Real window/app lifecycle notifications arrive on a background
//! thread and are translated into `Event`s pushed onto the Core's channel;
//! this trait exists so that translation can be exercised without a
//! running window server.

use crate::actor::app::{AppInfo, WindowId, WindowInfo, pid_t};

#[derive(Debug, Clone)]
pub enum ObserverEvent {
    ApplicationLaunched(AppInfo),
    ApplicationTerminated(pid_t),
    ApplicationActivated(pid_t),
    WindowCreated(WindowId, WindowInfo),
    WindowDestroyed(WindowId),
    WindowTitleChanged(WindowId, String),
    WindowFrameChanged(WindowId, crate::geometry::Frame),
    WindowFocused(WindowId),
    WindowMinimized(WindowId),
    WindowDeminiaturized(WindowId),
}

/// Pause/resume exist so the Core can silence the observer while it is
/// about to move windows itself (e.g. a workspace switch's off-screen
/// batch), avoiding a feedback loop where our own frame write is reported
/// back to us as a user resize (§4.3 "Workspace switch" steps 2 and 10).
pub trait WindowObserver: Send {
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Stands in for the accessibility notification center until platform
/// integration is wired in (the window observer is a deliberately
/// out-of-scope external collaborator); pause/resume are logged no-ops.
#[derive(Debug, Default)]
pub struct NullObserver;

impl WindowObserver for NullObserver {
    fn pause(&mut self) { tracing::debug!("NullObserver::pause"); }
    fn resume(&mut self) { tracing::debug!("NullObserver::resume"); }
}

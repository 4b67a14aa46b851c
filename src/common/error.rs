//! Error taxonomy (§7). None of these are fatal: every site that produces
//! one is expected to log it and continue rather than propagate a panic.

use thiserror::Error;

use crate::actor::app::WindowId;

#[derive(Debug, Error)]
pub enum Error {
    /// A single compositor/accessibility call failed for one window. The
    /// affected window is skipped for this action; later retiles may
    /// succeed once the underlying condition clears.
    #[error("bridge call failed for {window:?}: {reason}")]
    BridgeTransient { window: WindowId, reason: String },

    /// The accessibility element for a tracked window can no longer be
    /// resolved. The window is dropped from `tiled` but stays in `tracked`
    /// until the observer reports its destruction.
    #[error("accessibility element for {window:?} is no longer resolvable")]
    IdentityLost { window: WindowId },

    /// An internal consistency check failed (e.g. column flatten != tiled).
    /// The Core re-derives the authoritative side and continues.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),

    /// Event-tap creation failed, or accessibility trust has not been
    /// granted. The action loop does not start until this clears.
    #[error("required system permission is missing: {0}")]
    PermissionMissing(String),

    /// A line in the config file could not be parsed. The line is skipped
    /// and defaults fill the corresponding key.
    #[error("could not parse config line {line}: {reason}")]
    ConfigParse { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

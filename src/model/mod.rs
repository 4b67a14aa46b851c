//! Passive data types: plain structs and the containers that hold them.
//! Nothing in this module mutates itself in response to the outside world —
//! see `crate::core` for the only code allowed to do that.

pub mod workspace_store;

pub use workspace_store::{Column, MonitorId, TrackedWindow, VirtualWorkspace, WorkspaceNumber, WorkspaceStore};

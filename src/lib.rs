//! latticewm: a tiling window manager core.
//!
//! The crate is split the way the production daemon it is modeled on is
//! split: a pure [`layout_engine`] with no side effects, a passive
//! [`model::workspace_store`], and a single-threaded [`core`] state machine
//! that reconciles the two against an observable, asynchronously-changing
//! OS window set. Everything under [`actor`] that talks to the compositor,
//! the accessibility layer, or the event tap is a thin collaborator boundary
//! — those systems are out of scope; only the trait shape they present to
//! the core is specified here.

pub mod common;
pub mod core;
pub mod geometry;
pub mod layout_engine;
pub mod model;

pub mod actor;

pub use crate::actor::app::{WindowId, pid_t};
pub use crate::core::{Action, Core};
pub use crate::model::workspace_store::{MonitorId, WorkspaceNumber};

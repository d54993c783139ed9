//! Application-level orchestration.
//!
//! Owns the command loop that turns UI commands into remote calls and feeds
//! completion events back to the presentation layer.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};

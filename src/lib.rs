//! Client-side cache of a remote restaurant menu.
//!
//! The menu collection lives on a REST+JSON store under `/foods`; this crate
//! keeps a local copy of it and reconciles that copy after every remote call.

pub mod api;
pub mod form;
pub mod menu;
pub mod model;

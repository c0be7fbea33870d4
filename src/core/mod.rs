// ZipDrop - core/mod.rs
//
// Core upload logic: candidate model, selection filter, transfer unit
// state machine, batch summary, and the transport seam.
// Must NOT depend on: ui, platform, app, or any I/O crate directly.

pub mod model;
pub mod selection;
pub mod summary;
pub mod transfer;
pub mod unit;

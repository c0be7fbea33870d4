// ZipDrop - app/mod.rs
//
// Application layer: batch orchestration and presentation state.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod orchestrator;
pub mod state;

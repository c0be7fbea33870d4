// ZipDrop - lib.rs
//
// Library entry point, exposing all non-GUI modules for integration testing
// and programmatic use.
//
// The window (`gui`) and console (`headless`) adapters live in `main.rs`
// and are not part of the library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;

// ZipDrop - ui/panels/mod.rs

pub mod drop_zone;
pub mod pending;
pub mod progress;
pub mod summary;

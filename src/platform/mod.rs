// ZipDrop - platform/mod.rs
//
// Platform layer: config files, filesystem access, and the HTTP transport.
// Dependencies: core types, directories, walkdir, ureq.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
pub mod http;
pub mod multipart;

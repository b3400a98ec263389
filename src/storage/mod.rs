//! Local persistence of widget settings as a JSON file.
//!
//! Queued files are never persisted; they live for one session only.

pub mod settings;

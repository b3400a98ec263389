//! Host-facing handlers.
//!
//! `files` turns dropped or picked paths into loaded files; `upload` holds the
//! page-level controller that submits the queue. Business logic stays in
//! `services`.

pub mod files;
pub mod upload;

//! Data models for the uploader.
//!
//! This module contains shared data structure definitions: raw files, queue
//! entries, upload requests and widget settings.

pub mod file;
pub mod queued;
pub mod settings;
pub mod upload;

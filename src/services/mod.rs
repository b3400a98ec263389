//! Business logic layer.
//!
//! This module contains the queue manager, its validation rules and event
//! plumbing, upload request construction and thumbnail generation. HTTP goes
//! through the `api` layer; nothing here talks to the network directly.

pub mod events;
pub mod queue;
pub mod size;
pub mod thumbnail;
pub mod upload;
pub mod validation;

//! Layered, per-entity audio sources.
//!
//! An entity registers a source with a fixed number of layers and plays clips
//! from an [`AudioCollection`](collection::AudioCollection) into individual
//! layers; playing into an occupied layer replaces what was there. The
//! [`LayeredSourceRegistry`](registry::LayeredSourceRegistry) can be driven
//! directly once per tick, or owned by an [`AudioEngine`](engine::AudioEngine)
//! on the audio thread and fed through its controller.

pub mod clip;
pub mod collection;
pub mod config;
pub mod constants;
pub mod device_manager;
pub mod engine;
pub mod error;
pub mod handle;
pub mod layer;
pub mod registry;

pub use error::{AudioError, ErrorKind, Result};

//! Platform abstraction layer
//!
//! Browser bindings for storage and drawing live in [`web`]. Native runs use
//! [`crate::persistence::MemoryStore`] and [`crate::renderer::PixelSurface`]
//! instead.

#[cfg(target_arch = "wasm32")]
pub mod web;

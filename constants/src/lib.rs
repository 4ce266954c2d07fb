//! Shared scene configuration defaults.
//!
//! Plain values only, so the renderer and any tooling can agree on asset
//! locations, palette and layout without pulling in the engine.

pub mod class;
pub mod coordinate_system;
pub mod fireflies;
pub mod procedural_shader;
pub mod render_settings;
pub mod texture;

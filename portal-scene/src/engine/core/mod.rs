//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, scene settings and
//! plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
pub mod app_setup;

/// Scene state machine and its panel notifications.
pub mod app_state;

/// Scene configuration resource with defaults from the `constants` crate.
pub mod settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;

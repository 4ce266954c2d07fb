//! Asset requests and load-state polling.
//!
//! The model and the baked texture are requested at startup. Polling systems
//! turn the asset server's load state into progress flags and a single
//! `ModelLoaded` outcome for the scene composer.

/// glTF request, node flattening and the load outcome event.
pub mod model_loader;

/// Loading progress flags used to stop polling once assets settle.
pub mod progress;

/// Baked texture request (sRGB) and its load monitoring.
pub mod texture_loader;

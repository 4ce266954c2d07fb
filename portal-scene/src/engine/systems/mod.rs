//! Runtime systems for the debug panel and diagnostics.

/// Debug panel commands (background colour, orbit controls) and the state
/// snapshot reported back to the panel.
pub mod debug_panel;

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the panel via RPC and updates the native overlay.
pub mod fps_tracking;

//! JSON-RPC 2.0 channel between the scene and its debug panel.
//!
//! The panel lives in the page hosting the canvas and talks to the scene via
//! `window.postMessage`. Requests are parsed into typed commands
//! (`SetUniform`, `DebugPanelCommand`) and applied by ordinary ECS systems, so
//! the panel never touches render state directly.
//!
//! ## Message Flow
//!
//! ```text
//! Panel (parent window)  <──postMessage──>  Scene (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Queue typed command
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Methods
//!
//! - `set_uniform {material, name, value}`: `value` is a number or `"#rrggbb"`
//! - `set_background_color {color}`
//! - `stop_controls`: disable orbiting and log the camera position
//! - `set_controls_enabled {enabled}`
//! - `get_debug_state`: colours, firefly size, pixel ratio, clock, background
//! - `get_fps`
//!
//! ## Notifications
//!
//! - `fps_update {fps}`: twice a second
//! - `scene_state {state}`: once the model is composed or has failed
//!
//! ## Error Handling
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (bad colour, unknown material or uniform, wrong
//!   value kind, read-only uniform, wrong shape)
//! - `-32603`: Internal error

/// JSON-RPC 2.0 request handling, notifications and the WASM message listener.
pub mod web_rpc;

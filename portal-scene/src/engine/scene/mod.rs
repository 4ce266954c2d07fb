//! Scene composition.
//!
//! Turns a loaded model into the diorama subtree, assigning the material
//! bank's materials to the named nodes.

/// Node resolution, material assignment and attachment.
pub mod composer;

/// Baked lighting texture applied to the diorama mesh.
pub const BAKED_TEXTURE_PATH: &str = "baked.jpg";

/// Portal diorama model. Must be exported without Draco mesh compression.
pub const PORTAL_MODEL_PATH: &str = "portal.glb";

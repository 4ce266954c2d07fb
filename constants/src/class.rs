/// Mesh node carrying the baked diorama geometry.
pub const BAKED_NODE: &str = "baked";

/// Lamp heads on the two poles either side of the portal.
pub const POLE_LIGHT_A_NODE: &str = "poleLightA";
pub const POLE_LIGHT_B_NODE: &str = "poleLightB";

/// Disc inside the portal frame that receives the glow shader.
pub const PORTAL_LIGHT_NODE: &str = "portalLight";

/// Every node the scene composer must find before attaching the model.
pub const REQUIRED_NODES: &[&str] = &[
    BAKED_NODE,
    POLE_LIGHT_A_NODE,
    POLE_LIGHT_B_NODE,
    PORTAL_LIGHT_NODE,
];

/// Portal glow shader, relative to the asset root.
pub const PORTAL_SHADER_PATH: &str = "shaders/portal.wgsl";

/// Firefly point sprite shader, relative to the asset root.
pub const FIREFLIES_SHADER_PATH: &str = "shaders/fireflies.wgsl";

/// Portal colour at the rim (#0ad8eb).
pub const PORTAL_COLOR_START: [u8; 3] = [0x0a, 0xd8, 0xeb];

/// Portal colour at the core (white).
pub const PORTAL_COLOR_END: [u8; 3] = [0xff, 0xff, 0xff];

/// Flat emissive colour of the pole lamps (#0bebff).
pub const POLE_LIGHT_COLOR: [u8; 3] = [0x0b, 0xeb, 0xff];

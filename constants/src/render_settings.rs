/// Clear colour behind the diorama (#132025).
pub const BACKGROUND_COLOR: [u8; 3] = [0x13, 0x20, 0x25];

/// Device pixel ratios above this are clamped before reaching shaders.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

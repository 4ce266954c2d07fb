/// Number of fireflies scattered around the portal.
pub const FIREFLY_COUNT: usize = 30;

/// Fireflies spawn within [-HALF_EXTENT, HALF_EXTENT) on X and Z.
pub const FIREFLY_HALF_EXTENT: f32 = 2.0;

/// Fireflies spawn within [0, HEIGHT) on Y.
pub const FIREFLY_HEIGHT: f32 = 1.5;

/// Default point size before per-particle scale and pixel ratio.
pub const FIREFLY_SIZE: f32 = 100.0;

/// Range the debug panel may set the point size to.
pub const FIREFLY_SIZE_MIN: f32 = 0.0;
pub const FIREFLY_SIZE_MAX: f32 = 500.0;

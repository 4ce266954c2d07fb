/// Initial camera position, framed on the portal from the front-right.
pub const CAMERA_POSITION: [f32; 3] = [3.036_323_2, 2.816_136, 5.203_16];

/// Point the camera and orbit controls look at.
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 45.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

/// Orbit control easing applied per tick while damping is on.
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;

use bevy::prelude::*;
use constants::{
    class::REQUIRED_NODES,
    coordinate_system::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_POSITION, CAMERA_TARGET},
    fireflies::{FIREFLY_COUNT, FIREFLY_HALF_EXTENT, FIREFLY_HEIGHT, FIREFLY_SIZE},
    procedural_shader::{PORTAL_COLOR_END, PORTAL_COLOR_START, POLE_LIGHT_COLOR},
    render_settings::BACKGROUND_COLOR,
    texture::{BAKED_TEXTURE_PATH, PORTAL_MODEL_PATH},
};

use crate::engine::fireflies::field::FireflyFootprint;

/// Scene configuration resolved once at startup.
///
/// Defaults come from the shared `constants` crate. Insert a modified copy
/// before the app runs to point at different assets or retune the palette.
#[derive(Resource, Debug, Clone)]
pub struct SceneSettings {
    pub model_path: String,
    pub baked_texture_path: String,
    pub required_nodes: Vec<String>,
    pub firefly_count: usize,
    pub firefly_footprint: FireflyFootprint,
    pub firefly_size: f32,
    pub portal_color_start: Color,
    pub portal_color_end: Color,
    pub pole_light_color: Color,
    pub background_color: Color,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub camera_fov_degrees: f32,
    pub camera_near: f32,
    pub camera_far: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            model_path: PORTAL_MODEL_PATH.to_string(),
            baked_texture_path: BAKED_TEXTURE_PATH.to_string(),
            required_nodes: REQUIRED_NODES.iter().map(|name| name.to_string()).collect(),
            firefly_count: FIREFLY_COUNT,
            firefly_footprint: FireflyFootprint {
                half_extent: FIREFLY_HALF_EXTENT,
                height: FIREFLY_HEIGHT,
            },
            firefly_size: FIREFLY_SIZE,
            portal_color_start: rgb(PORTAL_COLOR_START),
            portal_color_end: rgb(PORTAL_COLOR_END),
            pole_light_color: rgb(POLE_LIGHT_COLOR),
            background_color: rgb(BACKGROUND_COLOR),
            camera_position: Vec3::from_array(CAMERA_POSITION),
            camera_target: Vec3::from_array(CAMERA_TARGET),
            camera_fov_degrees: CAMERA_FOV_DEGREES,
            camera_near: CAMERA_NEAR,
            camera_far: CAMERA_FAR,
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::srgb_u8(r, g, b)
}

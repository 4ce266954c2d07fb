use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};
use bevy::{prelude::*, reflect::TypePath};
use constants::procedural_shader::PORTAL_SHADER_PATH;

use super::TimeDriven;

#[derive(Debug, Clone, Copy, ShaderType)]
pub struct PortalUniforms {
    pub color_start: Vec4, // linear rgba
    pub color_end: Vec4,   // linear rgba
    pub time: f32,
}

/// Animated noise glow for the portal disc.
///
/// Only the fragment stage is custom; geometry goes through the standard
/// mesh vertex shader so the disc keeps its uvs from the model.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct PortalMaterial {
    #[uniform(0)]
    pub uniforms: PortalUniforms,
}

impl PortalMaterial {
    pub fn new(color_start: Color, color_end: Color) -> Self {
        Self {
            uniforms: PortalUniforms {
                color_start: to_linear_vec4(color_start),
                color_end: to_linear_vec4(color_end),
                time: 0.0,
            },
        }
    }

    pub fn color_start(&self) -> Color {
        from_linear_vec4(self.uniforms.color_start)
    }

    pub fn set_color_start(&mut self, color: Color) {
        self.uniforms.color_start = to_linear_vec4(color);
    }

    pub fn color_end(&self) -> Color {
        from_linear_vec4(self.uniforms.color_end)
    }

    pub fn set_color_end(&mut self, color: Color) {
        self.uniforms.color_end = to_linear_vec4(color);
    }
}

impl TimeDriven for PortalMaterial {
    fn time(&self) -> f32 {
        self.uniforms.time
    }

    fn set_time(&mut self, secs: f32) {
        self.uniforms.time = secs;
    }
}

impl Material for PortalMaterial {
    fn fragment_shader() -> ShaderRef {
        PORTAL_SHADER_PATH.into()
    }
}

fn to_linear_vec4(color: Color) -> Vec4 {
    let linear = color.to_linear();
    Vec4::new(linear.red, linear.green, linear.blue, linear.alpha)
}

fn from_linear_vec4(v: Vec4) -> Color {
    Color::LinearRgba(LinearRgba::new(v.x, v.y, v.z, v.w))
}

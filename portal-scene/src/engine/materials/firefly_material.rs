use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::render::mesh::{MeshVertexAttribute, MeshVertexBufferLayoutRef};
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderRef, ShaderType, SpecializedMeshPipelineError,
    VertexFormat,
};
use bevy::{prelude::*, reflect::TypePath};
use constants::fireflies::{FIREFLY_SIZE_MAX, FIREFLY_SIZE_MIN};
use constants::procedural_shader::FIREFLIES_SHADER_PATH;

use super::TimeDriven;

/// Per-particle size multiplier in [0, 1).
pub const ATTRIBUTE_FIREFLY_SCALE: MeshVertexAttribute =
    MeshVertexAttribute::new("Firefly_Scale", 988_540_917, VertexFormat::Float32);

#[derive(Debug, Clone, Copy, ShaderType)]
pub struct FireflyUniforms {
    pub time: f32,
    pub size: f32,
    pub pixel_ratio: f32,
}

/// Additive point-sprite material for the firefly field.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct FireflyMaterial {
    #[uniform(0)]
    pub uniforms: FireflyUniforms,
}

impl FireflyMaterial {
    pub fn new(size: f32, pixel_ratio: f32) -> Self {
        Self {
            uniforms: FireflyUniforms {
                time: 0.0,
                size: clamp_size(size),
                pixel_ratio,
            },
        }
    }

    pub fn size(&self) -> f32 {
        self.uniforms.size
    }

    /// Returns the value actually stored after clamping.
    pub fn set_size(&mut self, size: f32) -> f32 {
        self.uniforms.size = clamp_size(size);
        self.uniforms.size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.uniforms.pixel_ratio
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.uniforms.pixel_ratio = pixel_ratio;
    }
}

fn clamp_size(size: f32) -> f32 {
    if size.is_nan() {
        return FIREFLY_SIZE_MIN;
    }
    size.clamp(FIREFLY_SIZE_MIN, FIREFLY_SIZE_MAX)
}

impl TimeDriven for FireflyMaterial {
    fn time(&self) -> f32 {
        self.uniforms.time
    }

    fn set_time(&mut self, secs: f32) {
        self.uniforms.time = secs;
    }
}

impl Material for FireflyMaterial {
    fn vertex_shader() -> ShaderRef {
        FIREFLIES_SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        FIREFLIES_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // Each quad corner carries the particle centre, its corner uv and the particle scale.
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            ATTRIBUTE_FIREFLY_SCALE.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        // Quads are built in screen space; winding says nothing about facing.
        descriptor.primitive.cull_mode = None;

        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_clamped_to_panel_range() {
        let mut material = FireflyMaterial::new(100.0, 1.0);
        assert_eq!(material.size(), 100.0);

        assert_eq!(material.set_size(750.0), 500.0);
        assert_eq!(material.set_size(-3.0), 0.0);
        assert_eq!(material.set_size(f32::NAN), 0.0);
        assert_eq!(material.set_size(250.0), 250.0);
    }

    #[test]
    fn construction_clamps_size() {
        assert_eq!(FireflyMaterial::new(9000.0, 2.0).size(), 500.0);
    }
}

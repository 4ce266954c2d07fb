use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use super::field::ParticleField;
use crate::engine::materials::firefly_material::ATTRIBUTE_FIREFLY_SCALE;

const QUAD_CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Build a point-sprite mesh: one quad per particle.
///
/// All four corners of a quad share the particle centre and scale; the
/// vertex shader pushes each corner outwards in screen space using its uv.
pub fn create_firefly_mesh(field: &ParticleField) -> Mesh {
    let vertex_count = field.len() * QUAD_CORNERS.len();
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(vertex_count);
    let mut scales: Vec<f32> = Vec::with_capacity(vertex_count);
    let mut indices: Vec<u32> = Vec::with_capacity(field.len() * QUAD_INDICES.len());

    for (i, (position, scale)) in field.particles().enumerate() {
        let base = (i * QUAD_CORNERS.len()) as u32;
        for corner in QUAD_CORNERS {
            positions.push(position);
            uvs.push(corner);
            scales.push(scale);
        }
        indices.extend(QUAD_INDICES.iter().map(|offset| base + offset));
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_attribute(ATTRIBUTE_FIREFLY_SCALE, scales);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fireflies::field::FireflyFootprint;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn one_quad_per_particle() {
        let field = ParticleField::generate(
            30,
            FireflyFootprint {
                half_extent: 2.0,
                height: 1.5,
            },
            &mut StdRng::seed_from_u64(3),
        );
        let mesh = create_firefly_mesh(&field);

        assert_eq!(mesh.count_vertices(), 120);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(180));
        assert!(mesh.attribute(ATTRIBUTE_FIREFLY_SCALE).is_some());

        // Every corner of the first quad sits on the first particle.
        let (first, _) = field.particles().next().unwrap();
        let Some(bevy::render::mesh::VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        assert!(positions[..4].iter().all(|p| *p == first));
    }
}

//! Firefly particle field.
//!
//! Generates the randomly scattered points once at startup and spawns them
//! as a single point-sprite mesh using the firefly material.

/// Random particle placement inside a footprint.
pub mod field;

/// Quad-per-particle mesh construction.
pub mod mesh;

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;

use crate::engine::core::settings::SceneSettings;
use crate::engine::materials::MaterialBank;
use field::ParticleField;
use mesh::create_firefly_mesh;

#[derive(Component)]
pub struct Fireflies;

/// Startup system: scatter the fireflies and attach them to the scene.
pub fn spawn_fireflies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    settings: Res<SceneSettings>,
    bank: Res<MaterialBank>,
) {
    let field = ParticleField::generate(
        settings.firefly_count,
        settings.firefly_footprint,
        &mut rand::thread_rng(),
    );

    commands.spawn((
        Name::new("fireflies"),
        Fireflies,
        Mesh3d(meshes.add(create_firefly_mesh(&field))),
        MeshMaterial3d(bank.firefly.clone()),
        Transform::default(),
        // Quads are expanded in the vertex shader, so mesh bounds are meaningless.
        NoFrustumCulling,
        NotShadowCaster,
    ));

    info!("Spawned {} fireflies", field.len());
}

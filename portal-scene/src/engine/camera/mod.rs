//! Scene camera, orbit controls and viewport tracking.

/// Damped orbit controls, disabled by default.
pub mod orbit_controls;

/// Resize handling: aspect ratio, output size and pixel-ratio uniforms.
pub mod viewport;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;

use crate::engine::core::settings::SceneSettings;
use orbit_controls::OrbitControls;
use viewport::ViewportState;

#[derive(Component)]
pub struct PortalCamera;

/// Startup system: place the perspective camera framing the diorama.
pub fn setup_camera(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    viewport: Res<ViewportState>,
) {
    let projection = PerspectiveProjection {
        fov: settings.camera_fov_degrees.to_radians(),
        near: settings.camera_near,
        far: settings.camera_far,
        aspect_ratio: viewport.aspect_ratio().unwrap_or(1.0),
    };

    commands.spawn((
        Name::new("camera"),
        PortalCamera,
        Camera3d::default(),
        Projection::Perspective(projection),
        // Baked colours are already final; keep them out of tone mapping.
        Tonemapping::None,
        Msaa::Sample4,
        Transform::from_translation(settings.camera_position)
            .looking_at(settings.camera_target, Vec3::Y),
        OrbitControls::with_target(settings.camera_target),
    ));
}

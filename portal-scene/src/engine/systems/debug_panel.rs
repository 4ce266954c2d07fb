use bevy::prelude::*;
use serde::Serialize;

use crate::engine::camera::PortalCamera;
use crate::engine::camera::orbit_controls::OrbitControls;
use crate::engine::camera::viewport::ViewportState;
use crate::engine::core::app_state::SceneState;
use crate::engine::materials::MaterialBank;
use crate::engine::materials::firefly_material::FireflyMaterial;
use crate::engine::materials::portal_material::PortalMaterial;
use crate::engine::render_loop::clock::FrameClock;

/// Panel actions that are not material uniforms.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum DebugPanelCommand {
    SetBackgroundColor(Color),
    StopControls,
    SetControlsEnabled(bool),
}

pub fn apply_debug_panel_commands(
    mut commands: EventReader<DebugPanelCommand>,
    mut clear_color: ResMut<ClearColor>,
    mut cameras: Query<(&mut OrbitControls, &Transform), With<PortalCamera>>,
) {
    for command in commands.read() {
        match command {
            DebugPanelCommand::SetBackgroundColor(color) => {
                clear_color.0 = *color;
                info!("Background colour set to {}", hex(*color));
            }
            DebugPanelCommand::StopControls => {
                for (mut controls, transform) in &mut cameras {
                    controls.stop();
                    // Logged so a framing found by orbiting can be copied into the defaults.
                    info!(
                        "Controls stopped, camera at ({:.4}, {:.4}, {:.4})",
                        transform.translation.x, transform.translation.y, transform.translation.z
                    );
                }
            }
            DebugPanelCommand::SetControlsEnabled(enabled) => {
                for (mut controls, _) in &mut cameras {
                    if *enabled {
                        controls.enabled = true;
                    } else {
                        controls.stop();
                    }
                }
                info!("Orbit controls {}", if *enabled { "enabled" } else { "disabled" });
            }
        }
    }
}

/// What the panel shows: current tunables and runtime readouts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub portal_color_start: Option<String>,
    pub portal_color_end: Option<String>,
    pub firefly_size: Option<f32>,
    pub pixel_ratio: f32,
    pub elapsed: f32,
    pub background_color: String,
    pub controls_enabled: bool,
    pub scene: &'static str,
}

impl DebugSnapshot {
    pub fn capture(world: &World) -> Self {
        let bank = world.get_resource::<MaterialBank>();
        let portal = bank.and_then(|bank| {
            world
                .get_resource::<Assets<PortalMaterial>>()?
                .get(&bank.portal)
        });
        let firefly = bank.and_then(|bank| {
            world
                .get_resource::<Assets<FireflyMaterial>>()?
                .get(&bank.firefly)
        });

        let controls_enabled = world
            .try_query_filtered::<&OrbitControls, With<PortalCamera>>()
            .and_then(|mut query| query.iter(world).next().map(|controls| controls.enabled))
            .unwrap_or(false);

        Self {
            portal_color_start: portal.map(|m| hex(m.color_start())),
            portal_color_end: portal.map(|m| hex(m.color_end())),
            firefly_size: firefly.map(FireflyMaterial::size),
            pixel_ratio: world
                .get_resource::<ViewportState>()
                .map_or(1.0, |viewport| viewport.pixel_ratio),
            elapsed: world
                .get_resource::<FrameClock>()
                .map_or(0.0, FrameClock::elapsed_secs),
            background_color: world
                .get_resource::<ClearColor>()
                .map_or_else(|| hex(Color::BLACK), |clear| hex(clear.0)),
            controls_enabled,
            scene: world
                .get_resource::<State<SceneState>>()
                .map_or("loading", |state| state.get().as_str()),
        }
    }
}

fn hex(color: Color) -> String {
    color.to_srgba().to_hex().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<DebugPanelCommand>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(Update, apply_debug_panel_commands);

        let camera = app
            .world_mut()
            .spawn((
                PortalCamera,
                Transform::from_xyz(3.0, 2.0, 5.0),
                OrbitControls {
                    enabled: true,
                    ..default()
                },
            ))
            .id();
        (app, camera)
    }

    #[test]
    fn background_colour_applies_immediately() {
        let (mut app, _) = app();
        let color = Color::srgb_u8(0x20, 0x10, 0x30);
        app.world_mut()
            .send_event(DebugPanelCommand::SetBackgroundColor(color));
        app.update();

        assert_eq!(app.world().resource::<ClearColor>().0, color);
    }

    #[test]
    fn stop_then_enable_controls() {
        let (mut app, camera) = app();

        app.world_mut().send_event(DebugPanelCommand::StopControls);
        app.update();
        assert!(!app.world().get::<OrbitControls>(camera).unwrap().enabled);

        app.world_mut()
            .send_event(DebugPanelCommand::SetControlsEnabled(true));
        app.update();
        assert!(app.world().get::<OrbitControls>(camera).unwrap().enabled);
    }

    #[test]
    fn snapshot_without_materials_still_reports_runtime_state() {
        let (mut app, _) = app();
        app.insert_resource(FrameClock::synthetic());
        app.world_mut().resource_mut::<FrameClock>().advance(2.5);
        app.update();

        let snapshot = DebugSnapshot::capture(app.world());
        assert_eq!(snapshot.portal_color_start, None);
        assert_eq!(snapshot.firefly_size, None);
        assert_eq!(snapshot.background_color, "#000000");
        assert!(snapshot.controls_enabled);
        assert_eq!(snapshot.scene, "loading");
    }
}

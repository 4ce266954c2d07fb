//! Per-frame animation loop.
//!
//! The engine's runner calls the main schedule once per display refresh
//! (winit on native, `requestAnimationFrame` on the web) and renders after
//! it returns, so ticks never overlap. This module orders the per-tick work
//! inside that schedule: clock, time uniforms, then camera controls.

/// Cloneable stop flag that turns into `AppExit`.
pub mod cancellation;

/// Monotonic frame clock with host and synthetic sources.
pub mod clock;

use bevy::prelude::*;

use crate::engine::materials::TimeDriven;
use crate::engine::materials::firefly_material::FireflyMaterial;
use crate::engine::materials::portal_material::PortalMaterial;
use cancellation::{CancellationToken, exit_on_cancel};
use clock::{FrameClock, advance_frame_clock};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum RenderLoopState {
    #[default]
    Idle,
    Running,
}

/// Ordered stages of one tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RenderTickSet {
    Clock,
    Uniforms,
    Controls,
}

pub struct RenderLoopPlugin;

impl Plugin for RenderLoopPlugin {
    fn build(&self, app: &mut App) {
        // Keeps a clock or token inserted before the plugin.
        app.init_resource::<FrameClock>()
            .init_resource::<CancellationToken>()
            .init_state::<RenderLoopState>()
            .configure_sets(
                Update,
                (
                    RenderTickSet::Clock,
                    RenderTickSet::Uniforms,
                    RenderTickSet::Controls,
                )
                    .chain()
                    .run_if(in_state(RenderLoopState::Running)),
            )
            .add_systems(Startup, start_render_loop)
            .add_systems(OnEnter(RenderLoopState::Running), log_render_loop_start)
            .add_systems(
                Update,
                (
                    exit_on_cancel.before(RenderTickSet::Clock),
                    advance_frame_clock.in_set(RenderTickSet::Clock),
                    (
                        push_time_uniforms::<PortalMaterial>,
                        push_time_uniforms::<FireflyMaterial>,
                    )
                        .in_set(RenderTickSet::Uniforms),
                ),
            );
    }
}

fn start_render_loop(mut next_state: ResMut<NextState<RenderLoopState>>) {
    next_state.set(RenderLoopState::Running);
}

fn log_render_loop_start(clock: Res<FrameClock>) {
    info!("Render loop running ({:?} clock)", clock.source());
}

/// Write the current elapsed time into every material of type `M`.
pub fn push_time_uniforms<M: Asset + TimeDriven>(
    clock: Res<FrameClock>,
    mut materials: ResMut<Assets<M>>,
) {
    let elapsed = clock.elapsed_secs();
    for (_, material) in materials.iter_mut() {
        material.set_time(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin))
            .init_asset::<PortalMaterial>()
            .init_asset::<FireflyMaterial>()
            .insert_resource(FrameClock::synthetic())
            .add_plugins(RenderLoopPlugin);
        app
    }

    #[test]
    fn starts_idle_then_runs() {
        let mut app = test_app();
        assert_eq!(
            *app.world().resource::<State<RenderLoopState>>().get(),
            RenderLoopState::Idle
        );

        app.update();
        assert_eq!(
            *app.world().resource::<State<RenderLoopState>>().get(),
            RenderLoopState::Running
        );
    }

    #[test]
    fn tick_pushes_synthetic_time_into_both_materials() {
        let mut app = test_app();
        let portal = app
            .world_mut()
            .resource_mut::<Assets<PortalMaterial>>()
            .add(PortalMaterial::new(Color::BLACK, Color::WHITE));
        let fireflies = app
            .world_mut()
            .resource_mut::<Assets<FireflyMaterial>>()
            .add(FireflyMaterial::new(100.0, 1.0));

        app.update();
        app.world_mut().resource_mut::<FrameClock>().advance(5.0);
        app.update();

        let world = app.world();
        assert_eq!(world.resource::<FrameClock>().elapsed_secs(), 5.0);
        assert_eq!(
            world.resource::<Assets<PortalMaterial>>().get(&portal).unwrap().time(),
            5.0
        );
        assert_eq!(
            world
                .resource::<Assets<FireflyMaterial>>()
                .get(&fireflies)
                .unwrap()
                .time(),
            5.0
        );
    }

    #[test]
    fn elapsed_time_is_monotonic_across_ticks() {
        let mut app = test_app();
        let mut readings = Vec::new();
        for step in [0.1, 0.0, 0.5, 0.016, 0.0] {
            app.world_mut().resource_mut::<FrameClock>().advance(step);
            app.update();
            readings.push(app.world().resource::<FrameClock>().elapsed_secs());
        }
        assert!(readings.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn cancelled_token_requests_exit() {
        let mut app = test_app();
        let token = app.world().resource::<CancellationToken>().clone();

        app.update();
        assert!(app.should_exit().is_none());

        token.cancel();
        app.update();
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }
}

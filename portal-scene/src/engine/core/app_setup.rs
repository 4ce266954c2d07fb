use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

// Crate engine modules
use crate::engine::camera::orbit_controls::update_orbit_controls;
use crate::engine::camera::setup_camera;
use crate::engine::camera::viewport::{ViewportState, handle_viewport_resize, init_viewport};
use crate::engine::core::app_state::{SceneState, notify_scene_state};
use crate::engine::core::settings::SceneSettings;
use crate::engine::core::window_config::create_window_config;
use crate::engine::fireflies::spawn_fireflies;
use crate::engine::loading::model_loader::{
    ModelLoaded, ModelLoader, check_model_loading, start_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::texture_loader::check_texture_loading;
use crate::engine::materials::firefly_material::FireflyMaterial;
use crate::engine::materials::portal_material::PortalMaterial;
use crate::engine::materials::uniforms::apply_uniform_commands;
use crate::engine::materials::build_material_bank;
use crate::engine::render_loop::{RenderLoopPlugin, RenderTickSet};
use crate::engine::scene::composer::compose_on_load;
use crate::engine::systems::debug_panel::apply_debug_panel_commands;
use crate::engine::systems::fps_tracking::fps_notification_system;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};

pub fn create_app() -> App {
    create_app_with(SceneSettings::default())
}

/// Build the app around the given settings. Nothing is loaded until `run`.
pub fn create_app_with(settings: SceneSettings) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(MaterialPlugin::<PortalMaterial>::default())
        .add_plugins(MaterialPlugin::<FireflyMaterial>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(RenderLoopPlugin)
        .add_plugins(WebRpcPlugin)
        .init_state::<SceneState>();

    // Initialise resources early
    app.insert_resource(ClearColor(settings.background_color))
        .insert_resource(settings)
        .init_resource::<ViewportState>()
        .init_resource::<LoadingProgress>()
        .init_resource::<ModelLoader>()
        .add_event::<ModelLoaded>();

    // Materials exist before anything loads; fireflies need them, the model
    // request comes last.
    app.add_systems(
        Startup,
        (
            init_viewport,
            setup_camera,
            build_material_bank,
            spawn_fireflies,
            start_loading,
        )
            .chain(),
    )
    .add_systems(
        Update,
        (check_model_loading, compose_on_load)
            .chain()
            .run_if(in_state(SceneState::Loading)),
    )
    .add_systems(
        Update,
        (
            check_texture_loading,
            handle_viewport_resize,
            apply_uniform_commands,
            apply_debug_panel_commands,
            fps_notification_system,
        ),
    )
    .add_systems(
        Update,
        update_orbit_controls.in_set(RenderTickSet::Controls),
    )
    .add_systems(OnEnter(SceneState::Composed), notify_scene_state)
    .add_systems(OnEnter(SceneState::Failed), notify_scene_state);

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_fps_overlay)
            .add_systems(Update, fps_text_update_system);
    }

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

use bevy::prelude::*;
use bevy::window::PresentMode;

const CANVAS_SELECTOR: &str = "#portal";

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Portal".into(),
            name: Some(CANVAS_SELECTOR.trim_start_matches('#').into()),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

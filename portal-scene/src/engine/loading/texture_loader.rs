use bevy::asset::LoadState;
use bevy::image::ImageLoaderSettings;
use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

/// Handle to the baked lighting texture, kept so its load state can be polled.
#[derive(Resource, Debug, Default)]
pub struct BakedTexture {
    pub handle: Handle<Image>,
}

/// Request the baked texture as sRGB. Images load top-down already, so no
/// vertical flip is applied.
pub fn load_baked_texture(asset_server: &AssetServer, path: &str) -> Handle<Image> {
    asset_server.load_with_settings(path.to_string(), |settings: &mut ImageLoaderSettings| {
        settings.is_srgb = true;
    })
}

// Report when the baked texture arrives or fails. Meshes still draw while it loads.
pub fn check_texture_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    texture: Option<Res<BakedTexture>>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.texture_settled() {
        return;
    }
    let Some(texture) = texture else {
        return;
    };

    match asset_server.get_load_state(&texture.handle) {
        Some(LoadState::Loaded) => {
            println!("✓ Baked texture loaded");
            loading_progress.texture_loaded = true;
        }
        Some(LoadState::Failed(err)) => {
            error!("Baked texture failed to load: {err}");
            loading_progress.texture_failed = true;
        }
        _ => {}
    }
}

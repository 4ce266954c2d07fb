//! Materials shared by the portal scene.
//!
//! Builds the fixed set of surface materials at startup and applies
//! externally requested uniform changes.

/// Additive point-sprite material and its per-vertex scale attribute.
pub mod firefly_material;

/// Noise-driven glow material for the portal disc.
pub mod portal_material;

/// `SetUniform` commands and their validation.
pub mod uniforms;

use bevy::prelude::*;

use crate::engine::camera::viewport::ViewportState;
use crate::engine::core::settings::SceneSettings;
use crate::engine::loading::texture_loader::{BakedTexture, load_baked_texture};
use firefly_material::FireflyMaterial;
use portal_material::PortalMaterial;

/// Materials whose `time` uniform follows the frame clock.
pub trait TimeDriven {
    fn time(&self) -> f32;
    fn set_time(&mut self, secs: f32);
}

/// Handles to every material the scene uses.
#[derive(Resource, Debug, Clone)]
pub struct MaterialBank {
    /// Unlit, baked lighting texture.
    pub baked: Handle<StandardMaterial>,
    /// Unlit flat colour shared by both pole lamps.
    pub pole_light: Handle<StandardMaterial>,
    pub portal: Handle<PortalMaterial>,
    pub firefly: Handle<FireflyMaterial>,
}

impl MaterialBank {
    pub fn build(
        settings: &SceneSettings,
        baked_texture: Handle<Image>,
        pixel_ratio: f32,
        standard_materials: &mut Assets<StandardMaterial>,
        portal_materials: &mut Assets<PortalMaterial>,
        firefly_materials: &mut Assets<FireflyMaterial>,
    ) -> Self {
        let baked = standard_materials.add(StandardMaterial {
            base_color_texture: Some(baked_texture),
            unlit: true,
            ..default()
        });

        let pole_light = standard_materials.add(StandardMaterial {
            base_color: settings.pole_light_color,
            unlit: true,
            ..default()
        });

        let portal = portal_materials.add(PortalMaterial::new(
            settings.portal_color_start,
            settings.portal_color_end,
        ));

        let firefly = firefly_materials.add(FireflyMaterial::new(settings.firefly_size, pixel_ratio));

        Self {
            baked,
            pole_light,
            portal,
            firefly,
        }
    }
}

/// Startup system: request the baked texture and construct all materials
/// before any asset has finished loading.
pub fn build_material_bank(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
    viewport: Res<ViewportState>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut portal_materials: ResMut<Assets<PortalMaterial>>,
    mut firefly_materials: ResMut<Assets<FireflyMaterial>>,
) {
    let texture = load_baked_texture(&asset_server, &settings.baked_texture_path);

    let bank = MaterialBank::build(
        &settings,
        texture.clone(),
        viewport.pixel_ratio,
        &mut standard_materials,
        &mut portal_materials,
        &mut firefly_materials,
    );

    info!(
        "Material bank ready (baked texture: {})",
        settings.baked_texture_path
    );
    commands.insert_resource(BakedTexture { handle: texture });
    commands.insert_resource(bank);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_builds_four_materials_from_settings() {
        let settings = SceneSettings::default();
        let mut standard = Assets::<StandardMaterial>::default();
        let mut portals = Assets::<PortalMaterial>::default();
        let mut fireflies = Assets::<FireflyMaterial>::default();

        let bank = MaterialBank::build(
            &settings,
            Handle::default(),
            1.5,
            &mut standard,
            &mut portals,
            &mut fireflies,
        );

        assert_eq!(standard.len(), 2);
        assert_ne!(bank.baked.id(), bank.pole_light.id());

        let baked = standard.get(&bank.baked).unwrap();
        assert!(baked.unlit);
        assert!(baked.base_color_texture.is_some());

        let pole = standard.get(&bank.pole_light).unwrap();
        assert!(pole.unlit);
        assert_eq!(pole.base_color.to_srgba().to_hex().to_lowercase(), "#0bebff");

        let portal = portals.get(&bank.portal).unwrap();
        assert_eq!(portal.time(), 0.0);

        let firefly = fireflies.get(&bank.firefly).unwrap();
        assert_eq!(firefly.size(), 100.0);
        assert_eq!(firefly.pixel_ratio(), 1.5);
    }
}

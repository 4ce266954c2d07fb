use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized, WindowScaleFactorChanged};
use constants::render_settings::MAX_PIXEL_RATIO;

use super::PortalCamera;
use crate::engine::materials::firefly_material::FireflyMaterial;

/// Clamp a reported device pixel ratio to what the shaders are tuned for.
pub fn clamp_pixel_ratio(reported: f32) -> f32 {
    reported.min(MAX_PIXEL_RATIO)
}

/// Current drawable size in logical pixels and the clamped pixel ratio.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            pixel_ratio: 1.0,
        }
    }
}

impl ViewportState {
    pub fn from_window(window: &Window) -> Self {
        Self {
            width: window.width(),
            height: window.height(),
            pixel_ratio: clamp_pixel_ratio(window.scale_factor()),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32, reported_pixel_ratio: f32) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = clamp_pixel_ratio(reported_pixel_ratio);
    }

    /// `width / height`, or `None` while the surface has no area (minimised).
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }
}

/// Startup system: seed the viewport from the primary window.
pub fn init_viewport(
    mut viewport: ResMut<ViewportState>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    if let Ok(window) = windows.single() {
        *viewport = ViewportState::from_window(window);
    }
}

/// Apply every resize and scale-factor notification for the primary window.
///
/// Each event is handled in full; the last one processed wins.
pub fn handle_viewport_resize(
    mut resized: EventReader<WindowResized>,
    mut scale_changed: EventReader<WindowScaleFactorChanged>,
    windows: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportState>,
    mut projections: Query<&mut Projection, With<PortalCamera>>,
    mut firefly_materials: ResMut<Assets<FireflyMaterial>>,
) {
    let Ok((primary, window)) = windows.single() else {
        resized.clear();
        scale_changed.clear();
        return;
    };
    let reported_ratio = window.scale_factor();

    for event in resized.read().filter(|event| event.window == primary) {
        viewport.resize(event.width, event.height, reported_ratio);
        apply_viewport(&viewport, &mut projections, &mut firefly_materials);
    }

    for event in scale_changed.read().filter(|event| event.window == primary) {
        let (width, height) = (viewport.width, viewport.height);
        viewport.resize(width, height, event.scale_factor as f32);
        apply_viewport(&viewport, &mut projections, &mut firefly_materials);
    }
}

fn apply_viewport(
    viewport: &ViewportState,
    projections: &mut Query<&mut Projection, With<PortalCamera>>,
    firefly_materials: &mut Assets<FireflyMaterial>,
) {
    // Bevy's camera_system recomputes this from the render target in PostUpdate;
    // the write here keeps the projection in step within the same tick.
    if let Some(aspect_ratio) = viewport.aspect_ratio() {
        for mut projection in projections.iter_mut() {
            if let Projection::Perspective(perspective) = projection.as_mut() {
                perspective.aspect_ratio = aspect_ratio;
            }
        }
    }

    for (_, material) in firefly_materials.iter_mut() {
        material.set_pixel_ratio(viewport.pixel_ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::WindowResolution;

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        let reported = [1.0, 1.5, 2.0, 3.0];
        let clamped: Vec<f32> = reported.into_iter().map(clamp_pixel_ratio).collect();
        assert_eq!(clamped, vec![1.0, 1.5, 2.0, 2.0]);
    }

    #[test]
    fn degenerate_viewport_has_no_aspect() {
        let mut viewport = ViewportState::default();
        viewport.resize(800.0, 0.0, 1.0);
        assert_eq!(viewport.aspect_ratio(), None);
    }

    struct Harness {
        app: App,
        window: Entity,
        camera: Entity,
        fireflies: Handle<FireflyMaterial>,
    }

    fn harness(reported_ratio: f32) -> Harness {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<FireflyMaterial>()
            .add_event::<WindowResized>()
            .add_event::<WindowScaleFactorChanged>()
            .init_resource::<ViewportState>()
            .add_systems(Update, handle_viewport_resize);

        let window = app
            .world_mut()
            .spawn((
                Window {
                    resolution: WindowResolution::new(800.0, 600.0)
                        .with_scale_factor_override(reported_ratio),
                    ..default()
                },
                PrimaryWindow,
            ))
            .id();
        let camera = app
            .world_mut()
            .spawn((
                PortalCamera,
                Projection::Perspective(PerspectiveProjection::default()),
            ))
            .id();
        let fireflies = app
            .world_mut()
            .resource_mut::<Assets<FireflyMaterial>>()
            .add(FireflyMaterial::new(100.0, 1.0));

        Harness {
            app,
            window,
            camera,
            fireflies,
        }
    }

    fn resize(h: &mut Harness, width: f32, height: f32) {
        let window = h.window;
        h.app.world_mut().send_event(WindowResized {
            window,
            width,
            height,
        });
        h.app.update();
    }

    fn aspect(h: &Harness) -> f32 {
        match h.app.world().get::<Projection>(h.camera) {
            Some(Projection::Perspective(p)) => p.aspect_ratio,
            _ => panic!("camera lost its perspective projection"),
        }
    }

    #[test]
    fn resize_updates_aspect_size_and_pixel_ratio() {
        for (reported, expected) in [(1.0, 1.0), (1.5, 1.5), (2.0, 2.0), (3.0, 2.0)] {
            let mut h = harness(reported);
            resize(&mut h, 1920.0, 1080.0);

            assert_eq!(aspect(&h), 1920.0 / 1080.0);
            let viewport = *h.app.world().resource::<ViewportState>();
            assert_eq!((viewport.width, viewport.height), (1920.0, 1080.0));
            assert_eq!(viewport.pixel_ratio, expected);

            let material = h
                .app
                .world()
                .resource::<Assets<FireflyMaterial>>()
                .get(&h.fireflies)
                .unwrap();
            assert_eq!(material.pixel_ratio(), expected);
        }
    }

    #[test]
    fn burst_of_resizes_keeps_the_last_one() {
        let mut h = harness(1.0);
        let window = h.window;
        for (width, height) in [(640.0, 480.0), (1024.0, 768.0), (300.0, 900.0)] {
            h.app.world_mut().send_event(WindowResized {
                window,
                width,
                height,
            });
        }
        h.app.update();

        assert_eq!(aspect(&h), 300.0 / 900.0);
        let viewport = *h.app.world().resource::<ViewportState>();
        assert_eq!((viewport.width, viewport.height), (300.0, 900.0));
    }

    #[test]
    fn scale_factor_change_updates_pixel_ratio_only() {
        let mut h = harness(1.0);
        resize(&mut h, 1024.0, 768.0);

        let window = h.window;
        h.app.world_mut().send_event(WindowScaleFactorChanged {
            window,
            scale_factor: 3.0,
        });
        h.app.update();

        let viewport = *h.app.world().resource::<ViewportState>();
        assert_eq!(viewport.pixel_ratio, 2.0);
        assert_eq!((viewport.width, viewport.height), (1024.0, 768.0));
        assert_eq!(aspect(&h), 1024.0 / 768.0);

        let material = h
            .app
            .world()
            .resource::<Assets<FireflyMaterial>>()
            .get(&h.fireflies)
            .unwrap();
        assert_eq!(material.pixel_ratio(), 2.0);
    }

    #[test]
    fn minimised_window_keeps_previous_aspect() {
        let mut h = harness(1.0);
        resize(&mut h, 1600.0, 800.0);
        resize(&mut h, 0.0, 0.0);

        assert_eq!(aspect(&h), 2.0);
        assert_eq!(h.app.world().resource::<ViewportState>().width, 0.0);
    }
}

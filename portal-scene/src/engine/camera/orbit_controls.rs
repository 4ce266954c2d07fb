use std::f32::consts::PI;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::coordinate_system::ORBIT_DAMPING_FACTOR;

const MIN_POLAR: f32 = 0.01;
const MAX_POLAR: f32 = PI - 0.01;
const MIN_RADIUS: f32 = 0.5;
const MAX_RADIUS: f32 = 50.0;

/// Orbit camera around a target with damped motion.
///
/// Ships disabled: the diorama is framed by a fixed camera and the debug
/// panel can switch orbiting on to find a new framing.
#[derive(Component, Debug, Clone)]
pub struct OrbitControls {
    pub enabled: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub target: Vec3,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Pending (azimuth, polar) change in radians.
    pub(crate) spherical_delta: Vec2,
    /// Pending multiplicative radius change.
    pub(crate) scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: false,
            enable_damping: true,
            damping_factor: ORBIT_DAMPING_FACTOR,
            target: Vec3::ZERO,
            rotate_speed: 0.005,
            zoom_speed: 0.95,
            spherical_delta: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn with_target(target: Vec3) -> Self {
        Self {
            target,
            ..default()
        }
    }

    /// Queue a rotation from a pointer drag, in pixels.
    pub fn rotate(&mut self, drag: Vec2) {
        self.spherical_delta += Vec2::new(-drag.x, -drag.y) * self.rotate_speed;
    }

    /// Queue a dolly from wheel input; positive moves closer.
    pub fn dolly(&mut self, amount: f32) {
        self.scale *= self.zoom_speed.powf(amount);
    }

    /// Advance one tick and return the new camera position.
    ///
    /// Disabled controls leave the position and any pending motion alone.
    pub fn step(&mut self, position: Vec3) -> Vec3 {
        if !self.enabled {
            return position;
        }

        let offset = position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return position;
        }

        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let (delta, scale) = if self.enable_damping {
            (
                self.spherical_delta * self.damping_factor,
                1.0 + (self.scale - 1.0) * self.damping_factor,
            )
        } else {
            (self.spherical_delta, self.scale)
        };

        azimuth += delta.x;
        polar = (polar + delta.y).clamp(MIN_POLAR, MAX_POLAR);
        let radius = (radius * scale).clamp(MIN_RADIUS, MAX_RADIUS);

        if self.enable_damping {
            self.spherical_delta *= 1.0 - self.damping_factor;
            self.scale = 1.0 + (self.scale - 1.0) * (1.0 - self.damping_factor);
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.scale = 1.0;
        }

        let sin_polar = polar.sin();
        self.target
            + Vec3::new(
                radius * sin_polar * azimuth.sin(),
                radius * polar.cos(),
                radius * sin_polar * azimuth.cos(),
            )
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.spherical_delta = Vec2::ZERO;
        self.scale = 1.0;
    }
}

/// Feed pointer input into the controls and move the camera.
///
/// Input is drained every tick so nothing queued while disabled replays
/// after re-enabling.
pub fn update_orbit_controls(
    mut controls_query: Query<(&mut OrbitControls, &mut Transform)>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
) {
    let drag: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let scroll: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();

    for (mut controls, mut transform) in &mut controls_query {
        if !controls.enabled {
            continue;
        }

        if mouse_button.pressed(MouseButton::Right) && drag != Vec2::ZERO {
            controls.rotate(drag);
        }
        if scroll.abs() > f32::EPSILON {
            controls.dolly(scroll);
        }

        let target = controls.target;
        transform.translation = controls.step(transform.translation);
        transform.look_at(target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Vec3 = Vec3::new(3.0, 3.0, 5.0);

    #[test]
    fn disabled_controls_are_a_no_op() {
        let mut controls = OrbitControls::default();
        controls.rotate(Vec2::new(120.0, 40.0));
        assert_eq!(controls.step(START), START);
    }

    #[test]
    fn orbit_keeps_distance_to_target() {
        let mut controls = OrbitControls {
            enabled: true,
            ..default()
        };
        controls.rotate(Vec2::new(200.0, 0.0));

        let mut position = START;
        for _ in 0..10 {
            position = controls.step(position);
        }

        assert!((position.length() - START.length()).abs() < 1e-3);
        assert!(position.distance(START) > 0.01);
    }

    #[test]
    fn damping_decays_pending_motion() {
        let mut controls = OrbitControls {
            enabled: true,
            ..default()
        };
        controls.rotate(Vec2::new(100.0, 0.0));

        let mut position = START;
        for _ in 0..400 {
            position = controls.step(position);
        }
        let settled = position;
        position = controls.step(position);
        assert!(position.distance(settled) < 1e-4);
    }

    #[test]
    fn stop_discards_pending_motion() {
        let mut controls = OrbitControls {
            enabled: true,
            ..default()
        };
        controls.rotate(Vec2::new(100.0, 100.0));
        controls.stop();
        controls.enabled = true;
        assert!(controls.step(START).distance(START) < 1e-4);
    }
}

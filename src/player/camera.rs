//! Top-down camera boom, mouse-wheel zoom and the ground cursor.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use serde::Deserialize;

use super::components::Player;
use crate::core::SmoothTransform;

/// Camera boom tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoomSettings {
    /// Boom length when the game starts
    pub start_length: f32,
    pub min_length: f32,
    pub max_length: f32,
    /// Length change per wheel notch
    pub zoom_step: f32,
    /// Boom units travelled per second during a zoom slide
    pub slide_speed: f32,
    /// Downward tilt of the camera in degrees
    pub pitch_degrees: f32,
}

impl Default for BoomSettings {
    fn default() -> Self {
        Self {
            start_length: 8.0,
            min_length: 7.0,
            max_length: 12.0,
            zoom_step: 1.0,
            slide_speed: 10.0,
            pitch_degrees: 60.0,
        }
    }
}

/// A zoom slide in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slide {
    /// +1 lengthens the boom, -1 shortens it
    direction: f32,
    remaining: f32,
}

/// The arm holding the camera above and behind the character.
#[derive(Component, Debug, Clone)]
pub struct CameraBoom {
    pub length: f32,
    pub settings: BoomSettings,
    slide: Option<Slide>,
}

impl CameraBoom {
    pub fn new(settings: BoomSettings) -> Self {
        Self {
            length: settings.start_length.clamp(settings.min_length, settings.max_length),
            settings,
            slide: None,
        }
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    /// React to a wheel value: negative zooms out, positive zooms in.
    ///
    /// Returns false when the request is ignored because a slide is already
    /// running or the slide would leave the allowed range.
    pub fn request_slide(&mut self, wheel: f32) -> bool {
        if self.slide.is_some() {
            return false;
        }

        let step = self.settings.zoom_step;
        let direction = if wheel < 0.0 && self.length + step <= self.settings.max_length {
            1.0
        } else if wheel > 0.0 && self.length - step >= self.settings.min_length {
            -1.0
        } else {
            return false;
        };

        self.slide = Some(Slide {
            direction,
            remaining: step,
        });
        true
    }

    /// Advance a running slide by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let Some(slide) = self.slide.as_mut() else {
            return;
        };

        let travel = if self.settings.slide_speed > 0.0 {
            (self.settings.slide_speed * dt).min(slide.remaining)
        } else {
            slide.remaining
        };
        self.length += travel * slide.direction;
        slide.remaining -= travel;

        if slide.remaining <= 0.0 {
            self.slide = None;
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_x(-self.settings.pitch_degrees.to_radians())
    }

    /// Camera position relative to the point it looks at.
    pub fn offset(&self) -> Vec3 {
        self.rotation() * Vec3::Z * self.length
    }
}

/// Marker for the top-down gameplay camera.
#[derive(Component)]
pub struct TopDownCamera;

/// Where the cursor meets the ground, used as the aim target.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct AimPoint(pub Option<Vec3>);

/// Marker for the flat decal drawn under the cursor.
#[derive(Component)]
pub struct CursorMarker;

/// Spawn the gameplay camera and the cursor decal.
pub fn spawn_camera_rig(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    focus: Vec3,
    settings: BoomSettings,
) {
    let boom = CameraBoom::new(settings);

    commands.spawn((
        TopDownCamera,
        Camera3d::default(),
        Transform::from_translation(focus + boom.offset()).with_rotation(boom.rotation()),
        SmoothTransform::new(12.0),
        boom,
    ));

    commands.spawn((
        CursorMarker,
        Mesh3d(meshes.add(Cylinder::new(0.25, 0.02))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 0.8, 0.2, 0.8),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_translation(focus),
        Visibility::Hidden,
    ));
}

/// Start a zoom slide from the mouse wheel.
pub fn mouse_wheel_zoom(
    mut wheel_events: EventReader<MouseWheel>,
    mut boom_query: Query<&mut CameraBoom, With<TopDownCamera>>,
) {
    let value: f32 = wheel_events.read().map(|event| event.y).sum();
    if value == 0.0 {
        return;
    }

    let Ok(mut boom) = boom_query.get_single_mut() else {
        return;
    };

    if boom.request_slide(value) {
        debug!("Camera zoom slide started (boom length {:.1})", boom.length);
    }
}

/// Animate the boom and keep the camera trailing the player.
pub fn follow_player(
    time: Res<Time>,
    player_query: Query<&Transform, With<Player>>,
    mut camera_query: Query<(&mut CameraBoom, &mut SmoothTransform), With<TopDownCamera>>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let Ok((mut boom, mut smooth)) = camera_query.get_single_mut() else {
        return;
    };

    boom.advance(time.delta_secs());
    smooth.target_translation = Some(player.translation + boom.offset());
}

/// Project the cursor onto the ground plane.
pub fn update_cursor(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<TopDownCamera>>,
    mut aim_query: Query<&mut AimPoint, With<Player>>,
    mut marker_query: Query<(&mut Transform, &mut Visibility), With<CursorMarker>>,
) {
    let Ok(mut aim) = aim_query.get_single_mut() else {
        return;
    };

    let hit = window_query
        .get_single()
        .ok()
        .and_then(|window| window.cursor_position())
        .zip(camera_query.get_single().ok())
        .and_then(|(cursor, (camera, camera_transform))| {
            camera.viewport_to_world(camera_transform, cursor).ok()
        })
        .and_then(|ray| {
            ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))
                .map(|distance| ray.get_point(distance))
        });

    aim.0 = hit;

    if let Ok((mut transform, mut visibility)) = marker_query.get_single_mut() {
        match hit {
            Some(point) => {
                transform.translation = point + Vec3::Y * 0.01;
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish_slide(boom: &mut CameraBoom) {
        for _ in 0..100 {
            boom.advance(1.0 / 60.0);
        }
    }

    #[test]
    fn wheel_down_lengthens_by_one_step() {
        let mut boom = CameraBoom::new(BoomSettings::default());
        assert!(boom.request_slide(-1.0));
        finish_slide(&mut boom);
        assert!((boom.length - 9.0).abs() < 1e-4);
        assert!(!boom.is_sliding());
    }

    #[test]
    fn wheel_up_shortens_by_one_step() {
        let mut boom = CameraBoom::new(BoomSettings::default());
        assert!(boom.request_slide(1.0));
        finish_slide(&mut boom);
        assert!((boom.length - 7.0).abs() < 1e-4);
    }

    #[test]
    fn slide_rejected_past_limits() {
        let mut boom = CameraBoom::new(BoomSettings::default());
        assert!(boom.request_slide(1.0));
        finish_slide(&mut boom);
        // Already at the minimum
        assert!(!boom.request_slide(1.0));

        boom.length = 12.0;
        assert!(!boom.request_slide(-1.0));
    }

    #[test]
    fn slide_rejected_while_running() {
        let mut boom = CameraBoom::new(BoomSettings::default());
        assert!(boom.request_slide(-1.0));
        boom.advance(0.01);
        assert!(boom.is_sliding());
        assert!(!boom.request_slide(-1.0));
    }

    #[test]
    fn slide_moves_gradually() {
        let mut boom = CameraBoom::new(BoomSettings::default());
        boom.request_slide(-1.0);
        boom.advance(0.05);
        assert!(boom.length > 8.0 && boom.length < 9.0);
    }

    #[test]
    fn offset_points_up_and_back() {
        let boom = CameraBoom::new(BoomSettings::default());
        let offset = boom.offset();
        assert!(offset.y > 0.0);
        assert!(offset.z > 0.0);
        assert!((offset.length() - boom.length).abs() < 1e-4);
    }
}

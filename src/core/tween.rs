//! Frame-rate independent transform smoothing.

use bevy::prelude::*;

/// Component for smooth transform interpolation.
///
/// Other systems only write the targets; `update_smooth_transforms` moves the
/// transform toward them every frame.
#[derive(Component)]
pub struct SmoothTransform {
    /// Target translation (None = don't animate)
    pub target_translation: Option<Vec3>,
    /// Target rotation (None = don't animate)
    pub target_rotation: Option<Quat>,
    /// Convergence rate per second (higher = snappier)
    pub sharpness: f32,
}

impl Default for SmoothTransform {
    fn default() -> Self {
        Self {
            target_translation: None,
            target_rotation: None,
            sharpness: 10.0,
        }
    }
}

impl SmoothTransform {
    pub fn new(sharpness: f32) -> Self {
        Self {
            sharpness,
            ..default()
        }
    }
}

/// Fraction of the remaining distance to cover this frame.
///
/// Exponential decay keeps the motion identical at any frame rate.
pub fn blend_factor(sharpness: f32, dt: f32) -> f32 {
    1.0 - (-sharpness.max(0.0) * dt).exp()
}

/// System that interpolates transforms toward their targets.
pub fn update_smooth_transforms(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &SmoothTransform)>,
) {
    let dt = time.delta_secs();

    for (mut transform, smooth) in query.iter_mut() {
        let t = blend_factor(smooth.sharpness, dt);

        if let Some(target) = smooth.target_translation {
            transform.translation = transform.translation.lerp(target, t);
        }

        if let Some(target) = smooth.target_rotation {
            transform.rotation = transform.rotation.slerp(target, t);
        }
    }
}

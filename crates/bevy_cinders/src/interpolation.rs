use bevy::color::{ColorToPacked, Srgba};
use bevy::prelude::*;
use rand::Rng;

use crate::easing::EasingFn;

/// Applies the lifetime-mirrored easing to an interpolation amount.
///
/// Size and color are driven by the remaining life ratio, which counts down,
/// while easing curves are authored against an increasing progress. Mirroring
/// the curve (`1 - e(1 - t)`) keeps the curve shape aligned with elapsed time.
pub fn eased_amount(amount: f32, easing: Option<EasingFn>) -> f32 {
    match easing {
        Some(easing) => 1.0 - easing(1.0 - amount),
        None => amount,
    }
}

/// Interpolates from `start` (at `amount = 0`) to `end` (at `amount = 1`).
pub fn lerp_point(start: Vec2, end: Vec2, amount: f32, easing: Option<EasingFn>) -> Vec2 {
    let amount = eased_amount(amount, easing);
    start * (1.0 - amount) + end * amount
}

/// Interpolates two colors channel by channel in 8-bit space.
///
/// Each channel is truncated and clamped to `0..=255`, so equal endpoints always
/// interpolate to themselves. The weighted sum is truncated once, so a channel can
/// be 1 higher than truncating `start * (1 - t)` and `end * t` separately and adding.
pub fn lerp_color(start: Srgba, end: Srgba, amount: f32, easing: Option<EasingFn>) -> Srgba {
    let amount = eased_amount(amount, easing);
    let a = start.to_u8_array();
    let b = end.to_u8_array();
    let channel = |i: usize| {
        let value = f32::from(a[i]) * (1.0 - amount) + f32::from(b[i]) * amount;
        (value as i32).clamp(0, 255) as u8
    };
    Srgba::rgba_u8(channel(0), channel(1), channel(2), channel(3))
}

/// Draws a uniformly distributed value between `a` and `b`. Equal bounds return `a` exactly.
pub fn random_between(rng: &mut impl Rng, a: f32, b: f32) -> f32 {
    let r: f32 = rng.random();
    a + (b - a) * r
}

/// Rotates `v` counter-clockwise by `degrees`.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

const MAX_WRAP_STEPS: f32 = 1024.0;

/// Wraps an angle in degrees into `0.0..360.0` by repeated add/subtract.
///
/// Non-finite angles collapse to `0.0`.
pub fn wrap_degrees(mut degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    // f32 steps of 360 stop changing the value long before this
    if degrees.abs() > MAX_WRAP_STEPS * 360.0 {
        degrees = degrees.rem_euclid(360.0);
    }
    while degrees >= 360.0 {
        degrees -= 360.0;
    }
    while degrees < 0.0 {
        degrees += 360.0;
    }
    // tiny negatives round up to exactly 360.0 in f32
    if degrees >= 360.0 { 0.0 } else { degrees }
}

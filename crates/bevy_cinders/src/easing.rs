use serde::{Deserialize, Serialize};

/// Remaps an interpolation progress in `0.0..=1.0` to another value in `0.0..=1.0`.
///
/// Easing functions are authored against an increasing progress. When they drive
/// lifetime-based interpolation, see [`lerp_point`](crate::interpolation::lerp_point)
/// for how the curve gets mirrored.
pub type EasingFn = fn(f32) -> f32;

/// Returns `t` unchanged.
pub fn linear(t: f32) -> f32 {
    t
}

/// Increasing quadratic easing, slow start.
pub fn in_quad(t: f32) -> f32 {
    t * t
}

/// Decreasing quadratic easing, slow end.
pub fn out_quad(t: f32) -> f32 {
    -t * (t - 2.0)
}

/// Serializable selector for the built-in easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Easing {
    #[default]
    Linear,
    InQuad,
    OutQuad,
}

impl Easing {
    pub fn all() -> &'static [Easing] {
        &[Self::Linear, Self::InQuad, Self::OutQuad]
    }

    pub fn function(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::InQuad => in_quad,
            Self::OutQuad => out_quad,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::InQuad => "In Quad",
            Self::OutQuad => "Out Quad",
        }
    }
}

impl From<Easing> for EasingFn {
    fn from(easing: Easing) -> Self {
        easing.function()
    }
}

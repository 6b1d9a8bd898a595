use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Produces an offset used as a particle's start translation or start velocity.
///
/// Offset functions are called once per spawned particle. They must not keep
/// mutable state of their own so that one [`Effect`](crate::Effect) can be shared
/// by any number of sources.
pub type OffsetFn = Arc<dyn Fn() -> Vec2 + Send + Sync>;

/// Returns an [`OffsetFn`] yielding a uniformly distributed point inside the
/// rectangle spanned by `(x1, y1)` and `(x2, y2)`.
pub fn offset_in_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> OffsetFn {
    Arc::new(move || {
        let (r1, r2) = (rand::random::<f32>(), rand::random::<f32>());
        Vec2::new(x1 * (1.0 - r1) + x2 * r1, y1 * (1.0 - r2) + y2 * r2)
    })
}

/// Returns an [`OffsetFn`] that always yields `offset`.
pub fn fixed_offset(offset: Vec2) -> OffsetFn {
    Arc::new(move || offset)
}

/// Serializable description of an [`OffsetFn`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum OffsetShape {
    /// Always the zero vector.
    #[default]
    Zero,
    /// A constant offset.
    Fixed(Vec2),
    /// A uniformly distributed point between `min` and `max`.
    Rect { min: Vec2, max: Vec2 },
}

impl OffsetShape {
    pub(crate) fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the offset function this shape describes.
    pub fn to_offset_fn(self) -> OffsetFn {
        match self {
            Self::Zero => fixed_offset(Vec2::ZERO),
            Self::Fixed(offset) => fixed_offset(offset),
            Self::Rect { min, max } => offset_in_rect(min.x, min.y, max.x, max.y),
        }
    }
}

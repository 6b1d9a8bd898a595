use std::fmt;
use std::sync::Arc;

use bevy::color::Srgba;
use bevy::prelude::*;
use thiserror::Error;

use crate::drawable::{Drawable, ParticleShape};
use crate::easing::EasingFn;
use crate::offset::{OffsetFn, fixed_offset};
use crate::render::ShaderHandle;

/// Errors reported by [`Effect::validate`].
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum EffectError {
    /// The shortest particle lifetime is zero, negative or not a number.
    #[error("particle lifetime must be positive and finite, got min_life = {0}")]
    InvalidLife(f32),
    /// A `min`/`max` pair is ordered the wrong way round.
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Name of the offending range.
        field: &'static str,
        /// The lower bound as configured.
        min: f32,
        /// The upper bound as configured.
        max: f32,
    },
    /// The emission rate is negative or not a number.
    #[error("emit_rate must be finite and not negative, got {0}")]
    InvalidEmitRate(f32),
    /// Particles are due to spawn into a pool with no slots.
    #[error("max_particles is 0 but emit_rate is {0}")]
    EmptyPool(f32),
    /// A bound, size or acceleration is infinite or not a number.
    #[error("{field} must be finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Describes one particle style. Effects are immutable once shared and can be
/// used by any number of sources through an `Arc<Effect>`.
///
/// Ranges (`min_*`/`max_*`) are sampled uniformly for each spawned particle.
/// Size and color are interpolated from their start to their end value over each
/// particle's life, optionally shaped by an easing function (`None` is linear).
#[derive(Clone)]
pub struct Effect {
    /// Capacity of each source's particle pool.
    pub max_particles: u32,
    /// Particles spawned per second.
    pub emit_rate: f32,
    /// Shortest particle lifetime, in seconds.
    pub min_life: f32,
    /// Longest particle lifetime, in seconds.
    pub max_life: f32,
    /// Scale of a particle when it spawns.
    pub start_size: Vec2,
    /// Scale a particle approaches at the end of its life.
    pub end_size: Vec2,
    /// Shapes the size interpolation. `None` is linear.
    pub size_easing: Option<EasingFn>,
    /// Color of a particle when it spawns, and the one it fades to by the end of its life.
    pub start_color: Srgba,
    pub end_color: Srgba,
    /// Shapes the color interpolation. `None` is linear.
    pub color_easing: Option<EasingFn>,
    /// Spawn position jitter, in the emitter's facing frame.
    pub start_translation: OffsetFn,
    /// Initial velocity, in the emitter's facing frame at spawn time.
    pub start_velocity: OffsetFn,
    /// Constant acceleration applied to the velocity.
    pub acceleration: Vec2,
    /// Initial rotation range (`min_rotation..=max_rotation`), in degrees.
    pub min_rotation: f32,
    pub max_rotation: f32,
    /// Rotation speed range (`min_rotation_velocity..=max_rotation_velocity`),
    /// in degrees per second.
    pub min_rotation_velocity: f32,
    pub max_rotation_velocity: f32,
    /// Template every particle is drawn with.
    pub drawable: Arc<dyn Drawable>,
    /// Shader to use instead of the render pipeline's default for `drawable`.
    pub shader: Option<ShaderHandle>,
}

impl Default for Effect {
    fn default() -> Self {
        Self {
            max_particles: 100,
            emit_rate: 10.0,
            min_life: 1.0,
            max_life: 1.0,
            start_size: Vec2::ONE,
            end_size: Vec2::ONE,
            size_easing: None,
            start_color: Srgba::WHITE,
            end_color: Srgba::WHITE,
            color_easing: None,
            start_translation: fixed_offset(Vec2::ZERO),
            start_velocity: fixed_offset(Vec2::ZERO),
            acceleration: Vec2::ZERO,
            min_rotation: 0.0,
            max_rotation: 0.0,
            min_rotation_velocity: 0.0,
            max_rotation_velocity: 0.0,
            drawable: Arc::new(ParticleShape::Rectangle),
            shader: None,
        }
    }
}

impl Effect {
    /// Checks the descriptor for ranges and rates that cannot produce particles.
    pub fn validate(&self) -> Result<(), EffectError> {
        if !self.emit_rate.is_finite() || self.emit_rate < 0.0 {
            return Err(EffectError::InvalidEmitRate(self.emit_rate));
        }
        if self.max_particles == 0 && self.emit_rate > 0.0 {
            return Err(EffectError::EmptyPool(self.emit_rate));
        }
        if !self.min_life.is_finite() || self.min_life <= 0.0 {
            return Err(EffectError::InvalidLife(self.min_life));
        }

        let bounds = [
            ("max_life", self.max_life.is_finite()),
            ("min_rotation", self.min_rotation.is_finite()),
            ("max_rotation", self.max_rotation.is_finite()),
            ("min_rotation_velocity", self.min_rotation_velocity.is_finite()),
            ("max_rotation_velocity", self.max_rotation_velocity.is_finite()),
            ("start_size", self.start_size.is_finite()),
            ("end_size", self.end_size.is_finite()),
            ("acceleration", self.acceleration.is_finite()),
        ];
        if let Some(&(field, _)) = bounds.iter().find(|(_, finite)| !finite) {
            return Err(EffectError::NonFinite { field });
        }

        let ranges = [
            ("life", self.min_life, self.max_life),
            ("rotation", self.min_rotation, self.max_rotation),
            (
                "rotation_velocity",
                self.min_rotation_velocity,
                self.max_rotation_velocity,
            ),
        ];
        for (field, min, max) in ranges {
            if min > max {
                return Err(EffectError::InvertedRange { field, min, max });
            }
        }
        Ok(())
    }

    /// Returns the average number of particles alive at once, ignoring the pool limit.
    pub fn steady_state_particles(&self) -> f32 {
        self.emit_rate * (self.min_life + self.max_life) * 0.5
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("max_particles", &self.max_particles)
            .field("emit_rate", &self.emit_rate)
            .field("min_life", &self.min_life)
            .field("max_life", &self.max_life)
            .field("start_size", &self.start_size)
            .field("end_size", &self.end_size)
            .field("start_color", &self.start_color)
            .field("end_color", &self.end_color)
            .field("acceleration", &self.acceleration)
            .field("rotation", &(self.min_rotation..self.max_rotation))
            .field(
                "rotation_velocity",
                &(self.min_rotation_velocity..self.max_rotation_velocity),
            )
            .field("shader", &self.shader)
            .finish_non_exhaustive()
    }
}

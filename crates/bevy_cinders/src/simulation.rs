use std::sync::Arc;

use bevy::prelude::*;

use crate::effect::Effect;
use crate::interpolation::{lerp_color, lerp_point, random_between, rotate_degrees, wrap_degrees};
use crate::runtime::{Particle, ParticleSource, intrinsic_extent};

/// Angle added to the emitter facing when turning spawn offsets and velocities
/// into world space. Zero degrees of emitter facing points opposite to the
/// direction velocities are authored in.
pub const FACING_BIAS_DEGREES: f32 = 180.0;

/// What a source asks of its registry after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// Spawning is disabled, every particle is dead and the source wants to be removed.
    RemoveRequested,
}

/// Advances one source by `dt` seconds: spawns due particles, ages and moves the
/// alive ones and retires those whose life ran out.
///
/// Spawns follow the emission clock, so the number spawned over any run is
/// `floor(accumulated_time * emit_rate)` no matter how the time was sliced into
/// frames. Particles armed during this step start moving on the next one.
pub fn step(source: &mut ParticleSource, dt: f32) -> StepOutcome {
    let dt = dt.max(0.0);
    source.resize_pool();
    let effect = Arc::clone(&source.emitter.effect);

    let rate = f64::from(effect.emit_rate);
    let previous_count = (source.accumulated_time * rate).floor();
    source.accumulated_time += f64::from(dt);
    let spawn_count = ((source.accumulated_time * rate).floor() - previous_count).max(0.0) as u32;

    let center = source.space.center();
    let mut outcome = StepOutcome::Continue;
    if source.emitter.spawning_enabled {
        for i in 1..=spawn_count {
            let off = i as f32 / spawn_count as f32;
            let target = lerp_point(center, source.previous_center, off, None);
            if !spawn_particle(source, &effect, target) {
                // pool saturated, the remaining spawns of this step are dropped
                break;
            }
        }
    } else if source.all_dead && source.emitter.destroy_when_empty {
        outcome = StepOutcome::RemoveRequested;
    }

    let fallback = source.space.size;
    let mut live = 0;
    for particle in source.particles.iter_mut().filter(|p| p.alive) {
        if std::mem::take(&mut particle.fresh) || integrate_particle(particle, &effect, fallback, dt)
        {
            live += 1;
        }
    }
    source.all_dead = live == 0;
    source.previous_center = center;
    outcome
}

/// Arms the first dead slot at `target`. Returns `false` when the pool is full.
fn spawn_particle(source: &mut ParticleSource, effect: &Effect, target: Vec2) -> bool {
    let Some(particle) = source.particles.iter_mut().find(|p| !p.alive) else {
        return false;
    };
    let facing = source.space.rotation;

    particle.life = random_between(&mut source.rng, effect.min_life, effect.max_life);
    particle.life_remaining = particle.life;
    particle.rotation = random_between(&mut source.rng, effect.min_rotation, effect.max_rotation);
    particle.rotation_velocity = random_between(
        &mut source.rng,
        effect.min_rotation_velocity,
        effect.max_rotation_velocity,
    );
    particle.size = effect.start_size;
    particle.extent = intrinsic_extent(effect.drawable.as_ref(), source.space.size) * effect.start_size;
    particle.color = effect.start_color;

    let translation = rotate_degrees((effect.start_translation)(), facing + FACING_BIAS_DEGREES);
    particle.position = target + translation;
    particle.velocity = (effect.start_velocity)();
    particle.spawn_facing = facing;
    particle.alive = true;
    particle.fresh = true;

    source.spawned += 1;
    true
}

/// Ages and moves one alive particle. Returns `false` if it died.
fn integrate_particle(particle: &mut Particle, effect: &Effect, fallback: Vec2, dt: f32) -> bool {
    particle.life_remaining -= dt;
    if particle.life_remaining <= 0.0 {
        particle.alive = false;
        return false;
    }
    let life_ratio = particle.life_remaining / particle.life;

    let movement = rotate_degrees(
        particle.velocity * dt,
        particle.spawn_facing + FACING_BIAS_DEGREES,
    );
    particle.position += movement;
    particle.velocity += effect.acceleration * dt;
    particle.rotation = wrap_degrees(particle.rotation + particle.rotation_velocity * dt);

    particle.size = lerp_point(
        effect.end_size,
        effect.start_size,
        life_ratio,
        effect.size_easing,
    );
    particle.extent = intrinsic_extent(effect.drawable.as_ref(), fallback) * particle.size;
    particle.color = lerp_color(
        effect.end_color,
        effect.start_color,
        life_ratio,
        effect.color_easing,
    );
    true
}

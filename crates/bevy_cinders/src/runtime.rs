use std::sync::Arc;

use bevy::asset::AssetId;
use bevy::color::Srgba;
use bevy::math::EulerRot;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::drawable::Drawable;
use crate::effect::Effect;
use crate::interpolation::rotate_degrees;
use crate::render::{ParticleShader, RenderItem, RenderPipeline};

/// Position, size and facing of an emitter, as read from its transform.
///
/// `position` is the corner the bounding box rotates around; the emitter center
/// is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmitterSpace {
    pub position: Vec2,
    pub size: Vec2,
    /// Facing angle in degrees.
    pub rotation: f32,
}

impl EmitterSpace {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Center of the rotated bounding box.
    pub fn center(&self) -> Vec2 {
        self.position + rotate_degrees(self.size * 0.5, self.rotation)
    }

    /// Builds a space from a 2D transform: translation X/Y and rotation around Z.
    pub fn from_transform(transform: &Transform, size: Vec2) -> Self {
        let (_, _, z) = transform.rotation.to_euler(EulerRot::XYZ);
        Self {
            position: transform.translation.truncate(),
            size,
            rotation: z.to_degrees(),
        }
    }
}

/// Declared width and height of an emitter entity.
///
/// Particles whose drawable has no intrinsic size are scaled from this.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct EmitterSize(pub Vec2);

/// Makes an entity emit particles.
#[derive(Component, Debug, Clone)]
pub struct ParticleEmitter {
    pub effect: Arc<Effect>,
    /// When `false`, no new particles are spawned. Defaults to `true`.
    pub spawning_enabled: bool,
    /// Remove the source (and despawn the entity when driven by [`CindersPlugin`](crate::CindersPlugin))
    /// once spawning is disabled and every particle has died. Defaults to `false`.
    pub destroy_when_empty: bool,
    /// Optional fixed random seed for reproducible particle behavior.
    pub fixed_seed: Option<u64>,
}

impl ParticleEmitter {
    pub fn new(effect: Arc<Effect>) -> Self {
        Self {
            effect,
            spawning_enabled: true,
            destroy_when_empty: false,
            fixed_seed: None,
        }
    }
}

/// One reusable pool slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub alive: bool,
    /// World-space center.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    pub rotation_velocity: f32,
    /// Lifetime drawn at spawn.
    pub life: f32,
    pub life_remaining: f32,
    /// Current scale relative to the drawable's intrinsic size.
    pub size: Vec2,
    /// Current width and height in world units.
    pub extent: Vec2,
    pub color: Srgba,
    /// Emitter facing at spawn time, used to orient the velocity for the whole life.
    pub spawn_facing: f32,
    pub(crate) fresh: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            alive: false,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            rotation_velocity: 0.0,
            life: 0.0,
            life_remaining: 0.0,
            size: Vec2::ONE,
            extent: Vec2::ONE,
            color: Srgba::WHITE,
            spawn_facing: 0.0,
            fresh: false,
        }
    }
}

impl Particle {
    /// Remaining life over total life; `1.0` right after spawning.
    pub fn life_ratio(&self) -> f32 {
        if self.life > 0.0 {
            self.life_remaining / self.life
        } else {
            0.0
        }
    }

    pub fn render_item(&self, texture: Option<AssetId<Image>>, view: Rect) -> RenderItem {
        RenderItem {
            center: self.position,
            extent: self.extent,
            rotation: self.rotation,
            color: self.color,
            texture,
            view,
        }
    }
}

/// Simulation state of one emitting entity: its particle pool and emission clock.
pub struct ParticleSource {
    pub emitter: ParticleEmitter,
    pub space: EmitterSpace,
    pub(crate) particles: Vec<Particle>,
    pub(crate) accumulated_time: f64,
    pub(crate) previous_center: Vec2,
    pub(crate) all_dead: bool,
    pub(crate) spawned: u64,
    pub(crate) rng: StdRng,
    shader: Option<ParticleShader>,
    shader_effect: Option<Arc<Effect>>,
}

impl ParticleSource {
    pub fn new(emitter: ParticleEmitter, space: EmitterSpace) -> Self {
        let rng = emitter
            .fixed_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let mut source = Self {
            emitter,
            space,
            particles: Vec::new(),
            accumulated_time: 0.0,
            previous_center: space.center(),
            all_dead: true,
            spawned: 0,
            rng,
            shader: None,
            shader_effect: None,
        };
        source.resize_pool();
        source
    }

    pub fn effect(&self) -> &Arc<Effect> {
        &self.emitter.effect
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| p.alive).count()
    }

    /// Seconds this source has been simulated for.
    pub fn accumulated_time(&self) -> f64 {
        self.accumulated_time
    }

    pub fn previous_center(&self) -> Vec2 {
        self.previous_center
    }

    /// `true` when the last draw pass or integration pass saw no alive particle.
    pub fn all_dead(&self) -> bool {
        self.all_dead
    }

    /// Total number of particles spawned so far.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn shader(&self) -> Option<&ParticleShader> {
        self.shader.as_ref()
    }

    /// Grows or truncates the pool to the effect's `max_particles`.
    pub(crate) fn resize_pool(&mut self) {
        let max_particles = self.emitter.effect.max_particles as usize;
        if self.particles.len() != max_particles {
            self.particles.resize(max_particles, Particle::default());
        }
    }

    /// Picks the shader for the current effect, once per effect instance.
    pub(crate) fn resolve_shader(&mut self, pipeline: &dyn RenderPipeline) {
        let effect = &self.emitter.effect;
        let resolved = self
            .shader_effect
            .as_ref()
            .is_some_and(|previous| Arc::ptr_eq(previous, effect));
        if resolved && self.shader.is_some() {
            return;
        }

        let base = effect
            .shader
            .clone()
            .unwrap_or_else(|| pipeline.shader_for(effect.drawable.as_ref()));
        if !self.shader.as_ref().is_some_and(|shader| shader.wraps(&base)) {
            self.shader = Some(ParticleShader::new(base));
        }
        self.shader_effect = Some(Arc::clone(effect));
    }

    /// Runs the batch shader over the pool and returns the number of particles drawn.
    pub fn draw(&mut self) -> usize {
        let Some(shader) = &self.shader else {
            return 0;
        };
        shader.prepare_culling();
        if !shader.should_draw(&self.space) {
            return 0;
        }
        shader.pre();
        let drawn = shader.draw(&self.particles, self.emitter.effect.drawable.as_ref());
        shader.post();
        self.all_dead = drawn == 0;
        drawn
    }
}

/// Size a particle is scaled from: the drawable's intrinsic size, or `fallback`
/// when the drawable has none.
pub(crate) fn intrinsic_extent(drawable: &dyn Drawable, fallback: Vec2) -> Vec2 {
    let size = drawable.size();
    if size.x == 0.0 && size.y == 0.0 {
        fallback
    } else {
        size
    }
}

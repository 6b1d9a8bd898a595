use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::effect::EffectError;
use crate::render::RenderPipeline;
use crate::runtime::{EmitterSpace, ParticleEmitter, ParticleSource};
use crate::simulation::{StepOutcome, step};

/// Registry of every particle source, keyed by the emitting entity.
///
/// Needs a [`RenderPipeline`] before the first source is added. Drive it once
/// per frame with [`update`](Self::update) followed by [`draw`](Self::draw);
/// [`CindersPlugin`](crate::CindersPlugin) does both from Bevy schedules.
#[derive(Resource, Default)]
pub struct ParticleSystem {
    pipeline: Option<Box<dyn RenderPipeline>>,
    sources: HashMap<Entity, ParticleSource>,
    removed: Vec<Entity>,
}

impl ParticleSystem {
    pub fn new(pipeline: impl RenderPipeline + 'static) -> Self {
        Self {
            pipeline: Some(Box::new(pipeline)),
            ..Default::default()
        }
    }

    pub fn set_pipeline(&mut self, pipeline: impl RenderPipeline + 'static) {
        self.pipeline = Some(Box::new(pipeline));
    }

    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Registers `entity` as a particle source.
    ///
    /// An entity that is already registered gets a fresh source.
    ///
    /// # Panics
    ///
    /// Panics if no render pipeline is attached.
    pub fn add(
        &mut self,
        entity: Entity,
        space: EmitterSpace,
        emitter: ParticleEmitter,
    ) -> Result<(), EffectError> {
        let Some(pipeline) = self.pipeline.as_deref_mut() else {
            panic!("the particle system needs a render pipeline before sources can be added");
        };
        emitter.effect.validate()?;

        if self.sources.remove(&entity).is_some() {
            pipeline.remove(entity);
        }

        let effect = &emitter.effect;
        if effect.steady_state_particles() > effect.max_particles as f32 {
            debug!(
                "{entity:?}: pool of {} particles will saturate at {} particles/s",
                effect.max_particles, effect.emit_rate
            );
        }

        let mut source = ParticleSource::new(emitter, space);
        source.resolve_shader(pipeline);
        pipeline.add(entity, Arc::clone(&source.effect().drawable), space);
        self.sources.insert(entity, source);
        debug!("{entity:?}: particle source added");
        Ok(())
    }

    /// Unregisters `entity`. Unknown entities are ignored.
    pub fn remove(&mut self, entity: Entity) -> Option<ParticleSource> {
        let source = self.sources.remove(&entity)?;
        if let Some(pipeline) = self.pipeline.as_deref_mut() {
            pipeline.remove(entity);
        }
        debug!("{entity:?}: particle source removed");
        Some(source)
    }

    /// Swaps the emitter component of a registered source. The pool is resized
    /// and the shader re-resolved on the next [`update`](Self::update).
    ///
    /// Returns `Ok(false)` if `entity` is not registered.
    pub fn set_emitter(
        &mut self,
        entity: Entity,
        emitter: ParticleEmitter,
    ) -> Result<bool, EffectError> {
        let Some(source) = self.sources.get_mut(&entity) else {
            return Ok(false);
        };
        emitter.effect.validate()?;
        source.emitter = emitter;
        Ok(true)
    }

    /// Moves a registered source's emitter. Returns `false` if `entity` is not registered.
    pub fn set_space(&mut self, entity: Entity, space: EmitterSpace) -> bool {
        match self.sources.get_mut(&entity) {
            Some(source) => {
                source.space = space;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&ParticleSource> {
        self.sources.get(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.sources.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &ParticleSource)> {
        self.sources.iter().map(|(entity, source)| (*entity, source))
    }

    /// Steps every source by `dt` seconds.
    ///
    /// Sources asking to be removed are removed once all sources have been
    /// stepped; their entities are returned so the caller can retire them too.
    pub fn update(&mut self, dt: f32) -> &[Entity] {
        self.removed.clear();
        if self.sources.is_empty() {
            return &self.removed;
        }

        for (entity, source) in self.sources.iter_mut() {
            if let Some(pipeline) = self.pipeline.as_deref() {
                source.resolve_shader(pipeline);
            }
            if step(source, dt) == StepOutcome::RemoveRequested {
                self.removed.push(*entity);
            }
        }

        let removed = std::mem::take(&mut self.removed);
        for &entity in &removed {
            self.remove(entity);
        }
        self.removed = removed;
        &self.removed
    }

    /// Draws every source and returns the number of particles drawn.
    pub fn draw(&mut self) -> usize {
        self.sources.values_mut().map(ParticleSource::draw).sum()
    }

    /// Draws a single source. Returns `None` if `entity` is not registered.
    pub fn draw_source(&mut self, entity: Entity) -> Option<usize> {
        self.sources.get_mut(&entity).map(ParticleSource::draw)
    }
}

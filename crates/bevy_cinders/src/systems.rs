use bevy::prelude::*;

use crate::runtime::{EmitterSize, EmitterSpace, ParticleEmitter};
use crate::system::ParticleSystem;

fn emitter_space(transform: &Transform, size: Option<&EmitterSize>) -> EmitterSpace {
    EmitterSpace::from_transform(transform, size.map_or(Vec2::ZERO, |size| size.0))
}

/// Registers emitters that have no source yet.
///
/// Unregistered emitters are picked up when their component is added or edited,
/// and all of them at once on the first run that finds a render pipeline.
pub fn register_particle_sources(
    mut particles: ResMut<ParticleSystem>,
    mut pipeline_seen: Local<bool>,
    query: Query<(Entity, Ref<ParticleEmitter>, &Transform, Option<&EmitterSize>)>,
) {
    if !particles.has_pipeline() {
        if query.iter().any(|(_, emitter, ..)| emitter.is_changed()) {
            warn!("particle emitters are waiting for a render pipeline");
        }
        return;
    }
    let pipeline_attached = !std::mem::replace(&mut *pipeline_seen, true);

    for (entity, emitter, transform, size) in query.iter() {
        if particles.contains(entity) || !(pipeline_attached || emitter.is_changed()) {
            continue;
        }
        let space = emitter_space(transform, size);
        if let Err(err) = particles.add(entity, space, ParticleEmitter::clone(&emitter)) {
            warn!("{entity:?}: particle emitter rejected: {err}");
        }
    }
}

pub fn cleanup_particle_sources(
    mut particles: ResMut<ParticleSystem>,
    mut removed: RemovedComponents<ParticleEmitter>,
) {
    for entity in removed.read() {
        particles.remove(entity);
    }
}

pub fn sync_particle_sources(
    mut particles: ResMut<ParticleSystem>,
    query: Query<(Entity, Ref<ParticleEmitter>, &Transform, Option<&EmitterSize>)>,
) {
    for (entity, emitter, transform, size) in query.iter() {
        particles.set_space(entity, emitter_space(transform, size));

        if emitter.is_changed() && !emitter.is_added() {
            if let Err(err) = particles.set_emitter(entity, ParticleEmitter::clone(&emitter)) {
                warn!("{entity:?}: particle emitter update rejected: {err}");
            }
        }
    }
}

pub fn update_particle_sources(
    time: Res<Time>,
    mut particles: ResMut<ParticleSystem>,
    mut commands: Commands,
) {
    for &entity in particles.update(time.delta_secs()) {
        debug!("{entity:?}: all particles dead, despawning emitter");
        commands.entity(entity).despawn();
    }
}

pub fn draw_particle_sources(mut particles: ResMut<ParticleSystem>) {
    particles.draw();
}

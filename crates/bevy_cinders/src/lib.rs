//! **Cinders** is a CPU particle engine for 2D effects in the
//! [Bevy game engine](https://bevyengine.org/).
//!
//! An [`Effect`] describes one particle style. Any number of emitters can share it through
//! an `Arc<Effect>`. Each emitter owns a fixed pool of particles that spawn at a constant
//! rate, move in the emitter's facing frame and fade their size and color over their life.
//! Drawing goes through a [`RenderPipeline`] you provide, one [`RenderItem`] per live
//! particle.
//!
//! # Getting started
//!
//! Add [`CindersPlugin`] to your app and give the [`ParticleSystem`] resource a render
//! pipeline:
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_cinders::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, CindersPlugin))
//!         .insert_resource(ParticleSystem::new(MyPipeline::default()))
//!         .run();
//! }
//! ```
//!
//! ## Spawning an emitter
//!
//! ```ignore
//! fn setup(mut commands: Commands) {
//!     let effect = Arc::new(Effect {
//!         max_particles: 500,
//!         emit_rate: 120.0,
//!         start_velocity: offset_in_rect(-20.0, -60.0, 20.0, -90.0),
//!         ..default()
//!     });
//!
//!     commands.spawn((
//!         ParticleEmitter::new(effect),
//!         EmitterSize(Vec2::splat(8.0)),
//!         Transform::from_xyz(100.0, 50.0, 0.0),
//!     ));
//! }
//! ```
//!
//! Effects can also be described in RON files and loaded as [`EffectAsset`]s, then
//! converted with [`EffectAsset::to_effect`].
//!
//! Setting [`ParticleEmitter::destroy_when_empty`] and turning spawning off lets an
//! emitter finish its remaining particles and despawn itself.

/// Effect asset definitions and the RON loader.
pub mod asset;
/// Particle templates.
pub mod drawable;
/// Easing curves used by size and color interpolation.
pub mod easing;
/// The shared particle style.
pub mod effect;
/// Interpolation, random sampling and angle helpers.
pub mod interpolation;
/// Spawn offset generators.
pub mod offset;
/// Convenience re-exports for common particle types.
pub mod prelude;
/// The rendering boundary: shaders, pipelines and the per-source batch shim.
pub mod render;
/// Emitter components and per-emitter runtime state.
pub mod runtime;
/// Per-frame spawning and integration.
pub mod simulation;
/// The registry of all live particle sources.
pub mod system;
mod systems;

use bevy::prelude::*;

use asset::{EffectAsset, EffectAssetLoader};
use systems::{
    cleanup_particle_sources, draw_particle_sources, register_particle_sources,
    sync_particle_sources, update_particle_sources,
};

/// Plugin that drives particle emitters in a Bevy app.
///
/// Registers the effect asset loader and the [`ParticleSystem`] resource, keeps sources
/// in step with their emitter entities, advances them every frame and draws them in
/// [`PostUpdate`]. Insert a [`ParticleSystem`] built with a render pipeline, or call
/// [`ParticleSystem::set_pipeline`]. Emitters spawned earlier wait for the pipeline.
pub struct CindersPlugin;

impl Plugin for CindersPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<EffectAsset>()
            .init_asset_loader::<EffectAssetLoader>();

        app.init_resource::<ParticleSystem>()
            .add_systems(
                Update,
                (
                    register_particle_sources,
                    cleanup_particle_sources,
                    sync_particle_sources,
                    update_particle_sources,
                )
                    .chain(),
            )
            .add_systems(PostUpdate, draw_particle_sources);
    }
}

pub use asset::{DrawableRef, EffectAssetLoaderError};
pub use drawable::{Drawable, DrawableKind, ParticleShape, ParticleSprite};
pub use easing::{Easing, EasingFn};
pub use effect::{Effect, EffectError};
pub use offset::{OffsetFn, OffsetShape, fixed_offset, offset_in_rect};
pub use render::{
    CullingShader, ParticleShader, RenderItem, RenderPipeline, Shader, ShaderHandle,
};
pub use runtime::{EmitterSize, EmitterSpace, Particle, ParticleEmitter, ParticleSource};
pub use simulation::{FACING_BIAS_DEGREES, StepOutcome};
pub use system::ParticleSystem;

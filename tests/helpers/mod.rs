#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bevy::asset::{AssetPlugin, AssetServer, LoadState};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_cinders::CindersPlugin;
use bevy_cinders::asset::EffectAsset;
use bevy_cinders::drawable::{Drawable, DrawableKind};
use bevy_cinders::effect::Effect;
use bevy_cinders::render::{CullingShader, RenderItem, RenderPipeline, Shader, ShaderHandle};
use bevy_cinders::runtime::{EmitterSize, EmitterSpace, ParticleEmitter, ParticleSource};
use bevy_cinders::system::ParticleSystem;

pub const FRAME_TIME: std::time::Duration = std::time::Duration::from_millis(100);

pub fn fixtures_path() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .to_string_lossy()
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShaderCall {
    Pre,
    Draw(RenderItem),
    Post,
    PrepareCulling,
}

/// Shader that records every call it receives.
///
/// It always implements [`CullingShader`]; whether the capability is visible to
/// the particle system depends on how its [`ShaderHandle`] is built.
#[derive(Default)]
pub struct RecordingShader {
    calls: Mutex<Vec<ShaderCall>>,
}

impl RecordingShader {
    pub fn calls(&self) -> Vec<ShaderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn drawn_items(&self) -> Vec<RenderItem> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ShaderCall::Draw(item) => Some(item),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &ShaderCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn push(&self, call: ShaderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Shader for RecordingShader {
    fn pre(&self) {
        self.push(ShaderCall::Pre);
    }

    fn draw(&self, item: &RenderItem) {
        self.push(ShaderCall::Draw(*item));
    }

    fn post(&self) {
        self.push(ShaderCall::Post);
    }
}

impl CullingShader for RecordingShader {
    fn prepare_culling(&self) {
        self.push(ShaderCall::PrepareCulling);
    }

    fn should_draw(&self, _item: &RenderItem) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineCall {
    Add(Entity, EmitterSpace),
    Remove(Entity),
}

/// Render pipeline that hands out one recording shader for every drawable.
///
/// Clones share their state, so a test can keep one clone after moving another
/// into a [`ParticleSystem`].
#[derive(Clone)]
pub struct RecordingPipeline {
    pub shader: Arc<RecordingShader>,
    handle: ShaderHandle,
    calls: Arc<Mutex<Vec<PipelineCall>>>,
    lookups: Arc<AtomicUsize>,
}

impl Default for RecordingPipeline {
    fn default() -> Self {
        let shader = Arc::new(RecordingShader::default());
        Self {
            handle: ShaderHandle::new(shader.clone()),
            shader,
            calls: Arc::default(),
            lookups: Arc::default(),
        }
    }
}

impl RecordingPipeline {
    pub fn with_culling() -> Self {
        let shader = Arc::new(RecordingShader::default());
        Self {
            handle: ShaderHandle::with_culling(shader.clone()),
            shader,
            calls: Arc::default(),
            lookups: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<PipelineCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of times a default shader was looked up.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl RenderPipeline for RecordingPipeline {
    fn shader_for(&self, _drawable: &dyn Drawable) -> ShaderHandle {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.handle.clone()
    }

    fn add(&mut self, key: Entity, _drawable: Arc<dyn Drawable>, space: EmitterSpace) {
        self.calls.lock().unwrap().push(PipelineCall::Add(key, space));
    }

    fn remove(&mut self, key: Entity) {
        self.calls.lock().unwrap().push(PipelineCall::Remove(key));
    }
}

/// A drawable with a fixed intrinsic size.
pub struct SizedDrawable(pub Vec2);

impl Drawable for SizedDrawable {
    fn width(&self) -> f32 {
        self.0.x
    }

    fn height(&self) -> f32 {
        self.0.y
    }

    fn kind(&self) -> DrawableKind {
        DrawableKind::Texture
    }
}

pub fn test_effect(max_particles: u32, emit_rate: f32, life: f32) -> Effect {
    Effect {
        max_particles,
        emit_rate,
        min_life: life,
        max_life: life,
        ..default()
    }
}

pub fn seeded_emitter(effect: Effect) -> ParticleEmitter {
    ParticleEmitter {
        fixed_seed: Some(42),
        ..ParticleEmitter::new(Arc::new(effect))
    }
}

pub fn test_space() -> EmitterSpace {
    EmitterSpace::new(Vec2::ZERO, Vec2::splat(4.0))
}

pub fn test_source(effect: Effect) -> ParticleSource {
    ParticleSource::new(seeded_emitter(effect), test_space())
}

/// Distinct entity ids, for use as registry keys without an app.
pub fn entities(n: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..n).map(|_| world.spawn_empty().id()).collect()
}

/// App with the plugin and a fixed 100ms frame time, but no render pipeline.
pub fn create_app_without_pipeline() -> App {
    let mut app = App::new();

    app.add_plugins(
        MinimalPlugins.set(bevy::app::ScheduleRunnerPlugin::run_loop(
            std::time::Duration::from_millis(10),
        )),
    );

    app.add_plugins(AssetPlugin {
        file_path: fixtures_path(),
        ..default()
    });

    app.add_plugins(CindersPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME_TIME));

    app
}

pub fn create_minimal_app(pipeline: RecordingPipeline) -> App {
    let mut app = create_app_without_pipeline();
    app.insert_resource(ParticleSystem::new(pipeline));
    app
}

pub fn spawn_emitter(app: &mut App, emitter: ParticleEmitter, position: Vec2) -> Entity {
    app.world_mut()
        .spawn((
            emitter,
            EmitterSize(Vec2::splat(4.0)),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

pub fn particles(app: &App) -> &ParticleSystem {
    app.world().resource::<ParticleSystem>()
}

pub fn advance_frames(app: &mut App, n: u32) {
    for _ in 0..n {
        app.update();
    }
}

pub fn load_fixture(app: &mut App, filename: &str) -> Handle<EffectAsset> {
    let asset_server = app.world().resource::<AssetServer>();
    asset_server.load(filename.to_string())
}

pub fn run_until_loaded<T: Asset>(app: &mut App, handle: &Handle<T>, max_updates: u32) -> bool {
    for _ in 0..max_updates {
        app.update();

        let asset_server = app.world().resource::<AssetServer>();
        match asset_server.load_state(handle) {
            LoadState::Loaded => return true,
            LoadState::Failed(_) => return false,
            _ => continue,
        }
    }
    false
}

pub fn load_asset(app: &mut App, fixture: &str) -> EffectAsset {
    let handle = load_fixture(app, fixture);
    assert!(
        run_until_loaded(app, &handle, 100),
        "fixture failed to load: {fixture}"
    );
    let assets = app.world().resource::<Assets<EffectAsset>>();
    assets.get(&handle).expect("asset should exist").clone()
}

pub fn emitter_count(app: &mut App) -> usize {
    app.world_mut()
        .query::<&ParticleEmitter>()
        .iter(app.world())
        .count()
}

use std::fmt;
use std::sync::Arc;

use bevy::asset::AssetId;
use bevy::color::Srgba;
use bevy::prelude::*;

use crate::drawable::Drawable;
use crate::runtime::{EmitterSpace, Particle};

/// Everything a shader needs to draw one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    /// World-space center.
    pub center: Vec2,
    /// Width and height in world units.
    pub extent: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    pub color: Srgba,
    pub texture: Option<AssetId<Image>>,
    pub view: Rect,
}

/// Drawing routine provided by the host render pipeline.
///
/// `pre` and `post` bracket a batch of `draw` calls.
pub trait Shader: Send + Sync {
    fn pre(&self);
    fn draw(&self, item: &RenderItem);
    fn post(&self);
}

/// Optional visibility capability of a [`Shader`].
pub trait CullingShader: Send + Sync {
    fn prepare_culling(&self);
    fn should_draw(&self, item: &RenderItem) -> bool;
}

/// A shader together with its optional culling capability.
///
/// The capability is captured when the handle is built, so nothing has to probe
/// the shader for it while drawing.
#[derive(Clone)]
pub struct ShaderHandle {
    shader: Arc<dyn Shader>,
    culling: Option<Arc<dyn CullingShader>>,
}

impl ShaderHandle {
    /// Wraps a shader without culling support.
    pub fn new(shader: Arc<dyn Shader>) -> Self {
        Self {
            shader,
            culling: None,
        }
    }

    /// Wraps a shader that also implements [`CullingShader`].
    pub fn with_culling<S: Shader + CullingShader + 'static>(shader: Arc<S>) -> Self {
        let culling: Arc<dyn CullingShader> = shader.clone();
        Self {
            shader,
            culling: Some(culling),
        }
    }

    pub fn shader(&self) -> &Arc<dyn Shader> {
        &self.shader
    }

    pub fn culling(&self) -> Option<&Arc<dyn CullingShader>> {
        self.culling.as_ref()
    }

    /// Returns `true` if both handles point at the same shader instance.
    pub fn same_shader(&self, other: &ShaderHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.shader), Arc::as_ptr(&other.shader))
    }
}

impl fmt::Debug for ShaderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderHandle")
            .field("culling", &self.culling.is_some())
            .finish_non_exhaustive()
    }
}

/// The host render pipeline, as seen by the particle registry.
///
/// The registry announces each source's aggregate drawable through [`add`](Self::add)
/// and withdraws it through [`remove`](Self::remove). Drawing itself goes through
/// [`ParticleSystem::draw`](crate::ParticleSystem::draw).
pub trait RenderPipeline: Send + Sync {
    /// Picks the default shader for a drawable template.
    fn shader_for(&self, drawable: &dyn Drawable) -> ShaderHandle;
    fn add(&mut self, key: Entity, drawable: Arc<dyn Drawable>, space: EmitterSpace);
    fn remove(&mut self, key: Entity);
}

/// Draws a whole particle pool as one logical drawable.
///
/// Wraps the base shader of a source's drawable template. Dead records are
/// skipped, and the batch always reports itself as visible so the pipeline does
/// not sort or cull thousands of particles one by one.
#[derive(Clone)]
pub struct ParticleShader {
    wrapped: Arc<dyn Shader>,
    culling: Option<Arc<dyn CullingShader>>,
}

impl ParticleShader {
    pub fn new(base: ShaderHandle) -> Self {
        Self {
            wrapped: base.shader,
            culling: base.culling,
        }
    }

    /// Returns `true` if this shim wraps the shader of `base`.
    pub fn wraps(&self, base: &ShaderHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.wrapped), Arc::as_ptr(&base.shader))
    }

    pub fn wrapped(&self) -> &Arc<dyn Shader> {
        &self.wrapped
    }

    pub fn supports_culling(&self) -> bool {
        self.culling.is_some()
    }

    pub fn prepare_culling(&self) {
        if let Some(culling) = &self.culling {
            culling.prepare_culling();
        }
    }

    // TODO: per-particle view culling through the wrapped CullingShader.
    pub fn should_draw(&self, _space: &EmitterSpace) -> bool {
        true
    }

    pub fn pre(&self) {
        self.wrapped.pre();
    }

    /// Draws every alive particle and returns how many were drawn.
    pub fn draw(&self, particles: &[Particle], drawable: &dyn Drawable) -> usize {
        let texture = drawable.texture();
        let view = drawable.view();
        let mut drawn = 0;
        for particle in particles.iter().filter(|p| p.alive) {
            self.wrapped.draw(&particle.render_item(texture, view));
            drawn += 1;
        }
        drawn
    }

    pub fn post(&self) {
        self.wrapped.post();
    }
}

impl fmt::Debug for ParticleShader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleShader")
            .field("culling", &self.culling.is_some())
            .finish_non_exhaustive()
    }
}

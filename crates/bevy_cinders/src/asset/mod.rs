/// Effect format version tracking and compatibility validation.
pub mod versioning;

use std::sync::Arc;

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    color::Srgba,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drawable::{Drawable, ParticleShape, ParticleSprite};
use crate::easing::Easing;
use crate::effect::{Effect, EffectError};
use crate::offset::OffsetShape;
use versioning::{VersionStatus, current_format_version};

/// Loads `.ron` effect files as [`EffectAsset`]s.
#[derive(Default, TypePath)]
pub struct EffectAssetLoader;

/// Why an effect file could not be turned into an [`EffectAsset`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EffectAssetLoaderError {
    #[error("failed to read effect file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed effect file: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// The file names a `cinders_version` this release has never written.
    #[error("unrecognized cinders_version, the effect was probably saved by a newer release")]
    UnknownVersion,
    #[error("cinders_version \"{found}\" cannot be upgraded to \"{current}\" automatically")]
    IncompatibleVersion { found: String, current: String },
    /// The file parsed but describes an effect that cannot run.
    #[error(transparent)]
    Invalid(#[from] EffectError),
}

impl AssetLoader for EffectAssetLoader {
    type Asset = EffectAsset;
    type Settings = ();
    type Error = EffectAssetLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let mut asset = ron::de::from_bytes::<EffectAsset>(&bytes)?;

        match asset.try_upgrade_version() {
            VersionStatus::Current => {}
            VersionStatus::Outdated { found, current } => {
                let path = load_context.path();
                warn!(
                    "{path:?}: effect written for cinders_version \"{found}\" was upgraded to \"{current}\""
                );
            }
            VersionStatus::Incompatible { found, current } => {
                return Err(EffectAssetLoaderError::IncompatibleVersion {
                    found,
                    current: current.to_string(),
                });
            }
            VersionStatus::Unknown => {
                return Err(EffectAssetLoaderError::UnknownVersion);
            }
        }

        asset.validate()?;
        Ok(asset)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

fn is_zero_vec2(v: &Vec2) -> bool {
    *v == Vec2::ZERO
}

fn default_max_particles() -> u32 {
    100
}

fn default_emit_rate() -> f32 {
    10.0
}

/// A `min`/`max` pair sampled uniformly per particle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Default for Range {
    fn default() -> Self {
        Self { min: 1.0, max: 1.0 }
    }
}

impl Range {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    fn is_zero(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }
}

/// Particle scale from spawn to death.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SizeOverLifetime {
    pub start: Vec2,
    pub end: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

impl Default for SizeOverLifetime {
    fn default() -> Self {
        Self {
            start: Vec2::ONE,
            end: Vec2::ONE,
            easing: None,
        }
    }
}

/// Particle color from spawn to death, as 8-bit sRGBA.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColorOverLifetime {
    pub start: [u8; 4],
    pub end: [u8; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

impl Default for ColorOverLifetime {
    fn default() -> Self {
        Self {
            start: [255; 4],
            end: [255; 4],
            easing: None,
        }
    }
}

/// Which template the particles are drawn with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DrawableRef {
    /// A procedural shape, sized from the emitter.
    Shape(ParticleShape),
    /// An image loaded through the asset server.
    Sprite { path: String, size: Vec2 },
}

impl Default for DrawableRef {
    fn default() -> Self {
        Self::Shape(ParticleShape::default())
    }
}

/// A particle effect description, loadable from RON files.
///
/// Convert it into an [`Effect`] with [`to_effect`](Self::to_effect) to attach it
/// to emitters.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct EffectAsset {
    cinders_version: String,
    /// Display name for this effect.
    pub name: String,
    #[serde(default = "default_max_particles")]
    pub max_particles: u32,
    #[serde(default = "default_emit_rate")]
    pub emit_rate: f32,
    /// Particle lifetime in seconds.
    #[serde(default)]
    pub life: Range,
    #[serde(default)]
    pub size: SizeOverLifetime,
    #[serde(default)]
    pub color: ColorOverLifetime,
    #[serde(default, skip_serializing_if = "OffsetShape::is_default")]
    pub start_translation: OffsetShape,
    #[serde(default, skip_serializing_if = "OffsetShape::is_default")]
    pub start_velocity: OffsetShape,
    #[serde(default, skip_serializing_if = "is_zero_vec2")]
    pub acceleration: Vec2,
    /// Initial rotation in degrees.
    #[serde(default = "Range::zero", skip_serializing_if = "Range::is_zero")]
    pub rotation: Range,
    /// Rotation speed in degrees per second.
    #[serde(default = "Range::zero", skip_serializing_if = "Range::is_zero")]
    pub rotation_velocity: Range,
    #[serde(default)]
    pub drawable: DrawableRef,
}

impl EffectAsset {
    /// Creates an effect description with the current format version and default values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            cinders_version: current_format_version().to_string(),
            name: name.into(),
            max_particles: default_max_particles(),
            emit_rate: default_emit_rate(),
            life: Range::default(),
            size: SizeOverLifetime::default(),
            color: ColorOverLifetime::default(),
            start_translation: OffsetShape::default(),
            start_velocity: OffsetShape::default(),
            acceleration: Vec2::ZERO,
            rotation: Range::zero(),
            rotation_velocity: Range::zero(),
            drawable: DrawableRef::default(),
        }
    }

    pub fn version(&self) -> &str {
        &self.cinders_version
    }

    /// Classifies `cinders_version` and stamps the current version on effects that
    /// only miss additive changes. Returns the status found before stamping.
    pub fn try_upgrade_version(&mut self) -> VersionStatus {
        let status = versioning::validate_version(&self.cinders_version);
        if let VersionStatus::Outdated { current, .. } = &status {
            self.cinders_version = current.to_string();
        }
        status
    }

    /// Checks the numeric ranges the same way [`Effect::validate`] does.
    pub fn validate(&self) -> Result<(), EffectError> {
        self.build(Arc::new(ParticleShape::default())).validate()
    }

    /// Builds an [`Effect`] drawn with `drawable`, ignoring [`drawable`](Self::drawable).
    pub fn to_effect_with(&self, drawable: Arc<dyn Drawable>) -> Result<Effect, EffectError> {
        let effect = self.build(drawable);
        effect.validate()?;
        Ok(effect)
    }

    /// Builds an [`Effect`], loading sprite images through `asset_server`.
    pub fn to_effect(&self, asset_server: &AssetServer) -> Result<Effect, EffectError> {
        let drawable: Arc<dyn Drawable> = match &self.drawable {
            DrawableRef::Shape(shape) => Arc::new(*shape),
            DrawableRef::Sprite { path, size } => {
                Arc::new(ParticleSprite::new(asset_server.load(path.clone()), *size))
            }
        };
        self.to_effect_with(drawable)
    }

    fn build(&self, drawable: Arc<dyn Drawable>) -> Effect {
        let [r, g, b, a] = self.color.start;
        let start_color = Srgba::rgba_u8(r, g, b, a);
        let [r, g, b, a] = self.color.end;
        let end_color = Srgba::rgba_u8(r, g, b, a);

        Effect {
            max_particles: self.max_particles,
            emit_rate: self.emit_rate,
            min_life: self.life.min,
            max_life: self.life.max,
            start_size: self.size.start,
            end_size: self.size.end,
            size_easing: self.size.easing.map(Easing::function),
            start_color,
            end_color,
            color_easing: self.color.easing.map(Easing::function),
            start_translation: self.start_translation.to_offset_fn(),
            start_velocity: self.start_velocity.to_offset_fn(),
            acceleration: self.acceleration,
            min_rotation: self.rotation.min,
            max_rotation: self.rotation.max,
            min_rotation_velocity: self.rotation_velocity.min,
            max_rotation_velocity: self.rotation_velocity.max,
            drawable,
            shader: None,
        }
    }
}

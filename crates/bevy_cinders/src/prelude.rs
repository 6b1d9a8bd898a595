pub use crate::CindersPlugin;

pub use crate::asset::{
    ColorOverLifetime, DrawableRef, EffectAsset, Range as ParticleRange, SizeOverLifetime,
};
pub use crate::drawable::{Drawable, DrawableKind, ParticleShape, ParticleSprite};
pub use crate::easing::{Easing, EasingFn};
pub use crate::effect::{Effect, EffectError};
pub use crate::offset::{OffsetFn, OffsetShape, fixed_offset, offset_in_rect};
pub use crate::render::{CullingShader, RenderItem, RenderPipeline, ShaderHandle};
pub use crate::runtime::{EmitterSize, EmitterSpace, ParticleEmitter};
pub use crate::system::ParticleSystem;

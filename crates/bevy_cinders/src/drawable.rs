use bevy::asset::AssetId;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Broad category of a drawable template, used by render pipelines to pick a
/// default shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    /// A textured quad.
    Texture,
    /// A procedural shape without a texture.
    Shape,
}

/// The visual template every particle of an effect is drawn with.
///
/// Templates are shared read-only between all particles and sources using the
/// same [`Effect`](crate::Effect). A template reporting zero width and zero height
/// has no intrinsic extent; particles then take their extent from the emitter.
pub trait Drawable: Send + Sync {
    /// Intrinsic width in world units.
    fn width(&self) -> f32;
    /// Intrinsic height in world units.
    fn height(&self) -> f32;
    /// Opaque identifier of the image backing this template, if any.
    fn texture(&self) -> Option<AssetId<Image>> {
        None
    }
    /// Normalized sub-rectangle of the texture to sample.
    fn view(&self) -> Rect {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }
    fn kind(&self) -> DrawableKind;

    /// Intrinsic `(width, height)` as a vector.
    fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }
}

/// A textured particle template.
#[derive(Debug, Clone)]
pub struct ParticleSprite {
    pub image: Handle<Image>,
    pub size: Vec2,
    pub view: Rect,
}

impl ParticleSprite {
    pub fn new(image: Handle<Image>, size: Vec2) -> Self {
        Self {
            image,
            size,
            view: Rect::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}

impl Drawable for ParticleSprite {
    fn width(&self) -> f32 {
        self.size.x
    }

    fn height(&self) -> f32 {
        self.size.y
    }

    fn texture(&self) -> Option<AssetId<Image>> {
        Some(self.image.id())
    }

    fn view(&self) -> Rect {
        self.view
    }

    fn kind(&self) -> DrawableKind {
        DrawableKind::Texture
    }
}

/// Procedural shapes. They have no intrinsic size, so particles using them are
/// sized from the emitter's declared width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParticleShape {
    #[default]
    Rectangle,
    Circle,
    Triangle,
}

impl Drawable for ParticleShape {
    fn width(&self) -> f32 {
        0.0
    }

    fn height(&self) -> f32 {
        0.0
    }

    fn kind(&self) -> DrawableKind {
        DrawableKind::Shape
    }
}

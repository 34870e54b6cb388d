use egui::emath::Rot2;
use egui::{Pos2, Vec2};

/// Uniform scale + rotation + translation, the subset of 2D affine transforms
/// a drawing surface needs.
///
/// `apply(p) = linear * p + translation`. Composition with `*` follows the
/// canvas convention: `outer * inner` maps a point through `inner` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub linear: Rot2,
    pub translation: Vec2,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self {
        linear: Rot2::IDENTITY,
        translation: Vec2::ZERO,
    };

    pub fn from_translation(offset: Vec2) -> Self {
        Self {
            linear: Rot2::IDENTITY,
            translation: offset,
        }
    }

    /// Clockwise in screen space (y down), same as a canvas `rotate`.
    pub fn from_rotation(radians: f32) -> Self {
        Self {
            linear: Rot2::from_angle(radians),
            translation: Vec2::ZERO,
        }
    }

    pub fn from_scale(factor: f32) -> Self {
        Self {
            linear: Rot2::IDENTITY * factor,
            translation: Vec2::ZERO,
        }
    }

    pub fn apply(self, point: Pos2) -> Pos2 {
        (self.linear * point.to_vec2() + self.translation).to_pos2()
    }

    /// Length scale of the transform. Line widths and glyph sizes are multiplied by this.
    pub fn scale_factor(self) -> f32 {
        self.linear.length()
    }

    pub fn inverse(self) -> Self {
        let linear = self.linear.inverse();
        Self {
            linear,
            translation: -(linear * self.translation),
        }
    }
}

impl std::ops::Mul for Affine {
    type Output = Self;

    fn mul(self, inner: Self) -> Self {
        Self {
            linear: self.linear * inner.linear,
            translation: self.linear * inner.translation + self.translation,
        }
    }
}

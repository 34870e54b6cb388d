use egui::{Color32, Pos2};

use super::{Drawable, MarkId};
use crate::surface::Surface;

/// A glyph placed at a point with a fixed rotation.
///
/// Glyph, rotation and size are frozen at placement; dragging only moves it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    id: MarkId,
    position: Pos2,
    glyph: String,
    rotation_degrees: f32,
    px: f32,
    color: Color32,
}

impl Stamp {
    pub fn new(
        position: Pos2,
        glyph: impl Into<String>,
        rotation_degrees: f32,
        px: f32,
        color: Color32,
    ) -> Self {
        Self {
            id: MarkId::new(),
            position,
            glyph: glyph.into(),
            rotation_degrees,
            px,
            color,
        }
    }

    pub fn id(&self) -> MarkId {
        self.id
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn px(&self) -> f32 {
        self.px
    }
}

impl Drawable for Stamp {
    fn reposition_or_extend(&mut self, point: Pos2) {
        self.position = point;
    }

    fn render(&self, surface: &mut dyn Surface) {
        draw_rotated_glyph(
            surface,
            self.position,
            &self.glyph,
            self.rotation_degrees,
            self.px,
            self.color,
        );
    }
}

/// Draws `glyph` with its baseline origin at `position`, rotated about that
/// origin. The surface transform is restored before returning.
pub(crate) fn draw_rotated_glyph(
    surface: &mut dyn Surface,
    position: Pos2,
    glyph: &str,
    rotation_degrees: f32,
    px: f32,
    color: Color32,
) {
    if glyph.is_empty() {
        return;
    }
    surface.save();
    surface.translate(position.to_vec2());
    surface.rotate(rotation_degrees.to_radians());
    surface.fill_glyph(glyph, px, color);
    surface.restore();
}

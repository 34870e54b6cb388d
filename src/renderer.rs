use std::sync::Arc;

use egui::{Color32, Pos2, Rect, Vec2};
use image::RgbaImage;

use crate::config::SketchConfig;
use crate::fonts::FontBook;
use crate::mark::{Drawable, Mark};
use crate::pixmap::PixmapSurface;
use crate::preview::Preview;
use crate::surface::Surface;

/// Repaints a whole document onto a surface, at any integer scale.
#[derive(Debug, Clone)]
pub struct Renderer {
    base_size: Vec2,
    background: Color32,
    fonts: Arc<FontBook>,
}

impl Renderer {
    /// Creates a renderer for a canvas of `base_size` logical pixels.
    ///
    /// Args:
    ///     base_size (Vec2): on-screen canvas size at 1x
    ///     background (Color32): opaque fill painted under every mark
    ///     fonts (Arc<FontBook>): faces used by surfaces this renderer creates
    pub fn new(base_size: Vec2, background: Color32, fonts: Arc<FontBook>) -> Self {
        Self {
            base_size,
            background,
            fonts,
        }
    }

    pub fn from_config(config: &SketchConfig, fonts: Arc<FontBook>) -> Self {
        Self::new(config.canvas_size(), config.background_color(), fonts)
    }

    pub fn base_size(&self) -> Vec2 {
        self.base_size
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn fonts(&self) -> &Arc<FontBook> {
        &self.fonts
    }

    /// A blank pixmap sized for this canvas at `scale`.
    pub fn new_surface(&self, scale: u32) -> PixmapSurface {
        let width = (self.base_size.x * scale as f32).round() as u32;
        let height = (self.base_size.y * scale as f32).round() as u32;
        PixmapSurface::new(width, height, Arc::clone(&self.fonts))
    }

    /// Clears `surface`, paints the background, every mark in order and
    /// finally the preview, all scaled uniformly by `scale`.
    ///
    /// The surface transform is left as it was.
    pub fn render(
        &self,
        surface: &mut dyn Surface,
        marks: &[Mark],
        preview: Option<&Preview>,
        scale: f32,
    ) {
        surface.save();
        surface.scale(scale);

        surface.clear();
        surface.fill_rect(Rect::from_min_size(Pos2::ZERO, self.base_size), self.background);
        for mark in marks {
            mark.render(surface);
        }
        if let Some(preview) = preview {
            preview.render(surface);
        }

        surface.restore();
    }

    /// Renders `marks` onto a fresh off-screen pixmap `scale` times the
    /// canvas size. Previews are never exported.
    pub fn export(&self, marks: &[Mark], scale: u32) -> RgbaImage {
        let mut surface = self.new_surface(scale);
        self.render(&mut surface, marks, None, scale as f32);
        log::info!(
            "Rendered export of {} marks at {}x ({}x{})",
            marks.len(),
            scale,
            surface.image().width(),
            surface.image().height()
        );
        surface.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Stroke;
    use crate::surface::{RecordingSurface, SurfaceCall};
    use egui::pos2;

    fn renderer() -> Renderer {
        Renderer::new(Vec2::splat(64.0), Color32::WHITE, Arc::new(FontBook::empty()))
    }

    #[test]
    fn test_render_order() {
        let mut stroke = Stroke::new(pos2(0.0, 0.0), 2.0, Color32::BLACK);
        stroke.reposition_or_extend(pos2(5.0, 5.0));
        let marks = vec![Mark::from(stroke)];
        let preview = Preview::Stroke {
            position: pos2(9.0, 9.0),
            thickness: 2.0,
            color: Color32::BLACK,
        };

        let mut surface = RecordingSurface::new(64, 64);
        renderer().render(&mut surface, &marks, Some(&preview), 1.0);

        assert!(matches!(surface.calls()[1], SurfaceCall::Clear));
        let draws = surface.draw_calls();
        assert_eq!(draws.len(), 3);
        assert!(matches!(draws[0], SurfaceCall::FillRect { color, .. } if *color == Color32::WHITE));
        assert!(matches!(draws[1], SurfaceCall::StrokePolyline { .. }));
        assert!(matches!(draws[2], SurfaceCall::StrokeCircle { .. }));
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_background_covers_scaled_bounds() {
        let mut surface = renderer().new_surface(4);
        renderer().render(&mut surface, &[], None, 4.0);
        assert_eq!(surface.size(), [256, 256]);
        assert!(surface.is_opaque());
    }

    #[test]
    fn test_export_leaves_no_preview_and_is_opaque() {
        let image = renderer().export(&[], 2);
        assert_eq!(image.dimensions(), (128, 128));
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}

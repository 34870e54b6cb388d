use std::collections::HashMap;
use std::sync::Arc;

use ab_glyph::{Font, FontArc, ScaleFont, point};
use parking_lot::Mutex;

use crate::error::{SketchError, SketchResult};

/// Coverage bitmap of a rasterised piece of text.
///
/// `origin` is the position of the top-left texel relative to the pen origin
/// (baseline start), in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub origin: [i32; 2],
    pub width: u32,
    pub height: u32,
    coverage: Vec<f32>,
}

impl GlyphMask {
    /// Coverage at a pen-relative position, 0 outside the mask.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let ix = (x - self.origin[0] as f32).floor();
        let iy = (y - self.origin[1] as f32).floor();
        if ix < 0.0 || iy < 0.0 || ix >= self.width as f32 || iy >= self.height as f32 {
            return 0.0;
        }
        self.coverage[iy as usize * self.width as usize + ix as usize]
    }

    pub fn is_blank(&self) -> bool {
        self.coverage.iter().all(|&c| c <= 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MaskKey {
    text: String,
    px_bits: u32,
}

/// The font faces stamp glyphs are drawn with, plus a cache of rasterised masks.
///
/// Faces are tried in order for every character; the first one with a real
/// glyph wins. Characters no face covers are skipped.
#[derive(Default)]
pub struct FontBook {
    faces: Vec<FontArc>,
    masks: Mutex<HashMap<MaskKey, Option<Arc<GlyphMask>>>>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.faces.len())
            .field("cached_masks", &self.masks.lock().len())
            .finish()
    }
}

impl FontBook {
    /// A book with no faces. Every glyph draws as nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the faces egui itself ships with, in egui's proportional fallback order.
    pub fn load_default() -> SketchResult<Self> {
        let sources: [(&str, &'static [u8]); 4] = [
            ("Ubuntu-Light", epaint_default_fonts::UBUNTU_LIGHT),
            ("NotoEmoji-Regular", epaint_default_fonts::NOTO_EMOJI_REGULAR),
            ("emoji-icon-font", epaint_default_fonts::EMOJI_ICON),
            ("Hack-Regular", epaint_default_fonts::HACK_REGULAR),
        ];

        let mut faces = Vec::with_capacity(sources.len());
        for (name, bytes) in sources {
            let face = FontArc::try_from_slice(bytes)
                .map_err(|err| SketchError::Font(format!("{name}: {err}")))?;
            faces.push(face);
        }

        log::debug!("Loaded {} font faces for stamps", faces.len());
        Ok(Self {
            faces,
            masks: Mutex::default(),
        })
    }

    /// Shared default book; falls back to an empty one if the faces fail to load.
    pub fn shared_default() -> Arc<Self> {
        match Self::load_default() {
            Ok(book) => Arc::new(book),
            Err(err) => {
                log::error!("{err}; stamps will not be drawn");
                Arc::new(Self::empty())
            }
        }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_for(&self, ch: char) -> Option<&FontArc> {
        self.faces.iter().find(|face| face.glyph_id(ch).0 != 0)
    }

    /// Returns the coverage mask for `text` at `px` pixels, or `None` when
    /// nothing in it can be drawn.
    pub fn rasterize(&self, text: &str, px: f32) -> Option<Arc<GlyphMask>> {
        if text.is_empty() || !(px.is_finite() && px > 0.0) {
            return None;
        }

        let key = MaskKey {
            text: text.to_owned(),
            px_bits: px.to_bits(),
        };
        if let Some(cached) = self.masks.lock().get(&key) {
            return cached.clone();
        }

        let mask = self.rasterize_uncached(text, px).map(Arc::new);
        self.masks.lock().insert(key, mask.clone());
        mask
    }

    fn rasterize_uncached(&self, text: &str, px: f32) -> Option<GlyphMask> {
        let mut pen_x = 0.0;
        let mut outlines = Vec::new();

        for ch in text.chars() {
            let Some(face) = self.face_for(ch) else {
                continue;
            };
            let id = face.glyph_id(ch);
            let glyph = id.with_scale_and_position(px, point(pen_x, 0.0));
            pen_x += face.as_scaled(px).h_advance(id);
            if let Some(outlined) = face.outline_glyph(glyph) {
                outlines.push(outlined);
            }
        }

        let first = outlines.first()?;
        let mut min = first.px_bounds().min;
        let mut max = first.px_bounds().max;
        for outlined in &outlines[1..] {
            let bounds = outlined.px_bounds();
            min.x = min.x.min(bounds.min.x);
            min.y = min.y.min(bounds.min.y);
            max.x = max.x.max(bounds.max.x);
            max.y = max.y.max(bounds.max.y);
        }

        let origin = [min.x.floor() as i32, min.y.floor() as i32];
        let width = (max.x.ceil() as i32 - origin[0]).max(0) as u32;
        let height = (max.y.ceil() as i32 - origin[1]).max(0) as u32;
        let mut coverage = vec![0.0_f32; width as usize * height as usize];

        for outlined in &outlines {
            let bounds = outlined.px_bounds();
            let dx = bounds.min.x.floor() as i32 - origin[0];
            let dy = bounds.min.y.floor() as i32 - origin[1];
            outlined.draw(|x, y, c| {
                let tx = dx + x as i32;
                let ty = dy + y as i32;
                if tx >= 0 && ty >= 0 && (tx as u32) < width && (ty as u32) < height {
                    let cell = &mut coverage[ty as usize * width as usize + tx as usize];
                    *cell = (*cell + c).min(1.0);
                }
            });
        }

        Some(GlyphMask {
            origin,
            width,
            height,
            coverage,
        })
    }
}

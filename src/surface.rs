use egui::{Color32, Pos2, Rect, Vec2};

use crate::geometry::Affine;

/// The 2D drawing context marks, previews and the renderer paint onto.
///
/// Transform calls compose onto the current transform the way a canvas does:
/// the most recent call applies to points first. `save`/`restore` push and
/// pop the transform; a `restore` without a matching `save` does nothing.
pub trait Surface {
    /// Device size in pixels.
    fn size(&self) -> [u32; 2];

    /// Resets every pixel to transparent, regardless of the current transform.
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);

    fn transform(&self) -> Affine;
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, factor: f32);

    fn fill_rect(&mut self, rect: Rect, color: Color32);

    /// Strokes the open path through `points`. Fewer than two distinct points draw nothing.
    fn stroke_polyline(&mut self, points: &[Pos2], width: f32, color: Color32);

    fn stroke_circle(&mut self, center: Pos2, radius: f32, width: f32, color: Color32);

    /// Fills `text` with its baseline starting at the local origin.
    fn fill_glyph(&mut self, text: &str, px: f32, color: Color32);
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Clear,
    Save,
    Restore,
    FillRect {
        rect: Rect,
        color: Color32,
        transform: Affine,
    },
    StrokePolyline {
        points: Vec<Pos2>,
        width: f32,
        transform: Affine,
    },
    StrokeCircle {
        center: Pos2,
        radius: f32,
        width: f32,
        transform: Affine,
    },
    FillGlyph {
        text: String,
        px: f32,
        transform: Affine,
    },
}

/// A surface that paints nothing and remembers what it was asked to do.
///
/// Drawing calls are recorded together with the transform in effect, which
/// makes it easy to check draw order and that nothing leaks a transform.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: [u32; 2],
    current: Affine,
    stack: Vec<Affine>,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width, height],
            ..Default::default()
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Only the drawing calls, without clear/save/restore bookkeeping.
    pub fn draw_calls(&self) -> Vec<&SurfaceCall> {
        self.calls
            .iter()
            .filter(|call| {
                !matches!(
                    call,
                    SurfaceCall::Clear | SurfaceCall::Save | SurfaceCall::Restore
                )
            })
            .collect()
    }

    /// Number of `save`s not yet matched by a `restore`.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> [u32; 2] {
        self.size
    }

    fn clear(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }

    fn save(&mut self) {
        self.stack.push(self.current);
        self.calls.push(SurfaceCall::Save);
    }

    fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
        self.calls.push(SurfaceCall::Restore);
    }

    fn transform(&self) -> Affine {
        self.current
    }

    fn translate(&mut self, offset: Vec2) {
        self.current = self.current * Affine::from_translation(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.current = self.current * Affine::from_rotation(radians);
    }

    fn scale(&mut self, factor: f32) {
        self.current = self.current * Affine::from_scale(factor);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.calls.push(SurfaceCall::FillRect {
            rect,
            color,
            transform: self.current,
        });
    }

    fn stroke_polyline(&mut self, points: &[Pos2], width: f32, _color: Color32) {
        self.calls.push(SurfaceCall::StrokePolyline {
            points: points.to_vec(),
            width,
            transform: self.current,
        });
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, width: f32, _color: Color32) {
        self.calls.push(SurfaceCall::StrokeCircle {
            center,
            radius,
            width,
            transform: self.current,
        });
    }

    fn fill_glyph(&mut self, text: &str, px: f32, _color: Color32) {
        self.calls.push(SurfaceCall::FillGlyph {
            text: text.to_owned(),
            px,
            transform: self.current,
        });
    }
}

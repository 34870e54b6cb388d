use egui::{Color32, Pos2, Rect};

use super::{Drawable, MarkId};
use crate::surface::Surface;

/// Freehand pen path. Points are only ever appended; thickness is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: MarkId,
    points: Vec<Pos2>,
    thickness: f32,
    color: Color32,
}

impl Stroke {
    /// Starts a stroke at `start`, so a stroke always has at least one point.
    pub fn new(start: Pos2, thickness: f32, color: Color32) -> Self {
        Self {
            id: MarkId::new(),
            points: vec![start],
            thickness,
            color,
        }
    }

    pub fn id(&self) -> MarkId {
        self.id
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Bounding box of the path, padded by half the thickness.
    pub fn bounds(&self) -> Rect {
        let mut rect = Rect::NOTHING;
        for &point in &self.points {
            rect.extend_with(point);
        }
        rect.expand(self.thickness / 2.0)
    }
}

impl Drawable for Stroke {
    fn reposition_or_extend(&mut self, point: Pos2) {
        self.points.push(point);
    }

    fn render(&self, surface: &mut dyn Surface) {
        // A lone point is a zero-length path.
        if self.points.len() < 2 {
            return;
        }
        surface.stroke_polyline(&self.points, self.thickness, self.color);
    }
}

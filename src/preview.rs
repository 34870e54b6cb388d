use egui::{Color32, Pos2};

use crate::mark::{Drawable, draw_rotated_glyph};
use crate::surface::Surface;
use crate::tool::{ToolMode, ToolState};

/// Line width of the pen ring, in canvas pixels.
const RING_WIDTH: f32 = 1.0;

/// Transient hint following the pointer while nothing is being drawn.
/// Never part of the document or its history.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Ring with the diameter of the pen.
    Stroke {
        position: Pos2,
        thickness: f32,
        color: Color32,
    },
    /// The stamp glyph as it would be placed.
    Stamp {
        position: Pos2,
        glyph: String,
        rotation_degrees: f32,
        px: f32,
        color: Color32,
    },
}

impl Preview {
    /// Builds the preview for the active tool at `position`.
    pub fn for_tool(tools: &ToolState, position: Pos2) -> Self {
        let style = tools.style();
        match tools.active_mode() {
            ToolMode::Pen { thickness } => Self::Stroke {
                position,
                thickness: *thickness,
                color: style.ink,
            },
            ToolMode::Stamp { glyph } => Self::Stamp {
                position,
                glyph: glyph.clone(),
                rotation_degrees: tools.rotation_degrees(),
                px: style.stamp_px,
                color: style.ink,
            },
        }
    }

    /// Whether this preview still depicts the active tool, ignoring rotation
    /// which is updated in place.
    pub fn conforms_to(&self, tools: &ToolState) -> bool {
        match (self, tools.active_mode()) {
            (Self::Stroke { thickness, .. }, ToolMode::Pen { thickness: active }) => thickness == active,
            (Self::Stamp { glyph, .. }, ToolMode::Stamp { glyph: active }) => glyph == active,
            _ => false,
        }
    }

    pub fn position(&self) -> Pos2 {
        match self {
            Self::Stroke { position, .. } | Self::Stamp { position, .. } => *position,
        }
    }

    /// Updates the rotation of a stamp preview. Returns false for a pen ring.
    pub fn set_rotation(&mut self, degrees: f32) -> bool {
        match self {
            Self::Stamp {
                rotation_degrees, ..
            } => {
                *rotation_degrees = degrees;
                true
            }
            Self::Stroke { .. } => false,
        }
    }
}

impl Drawable for Preview {
    fn reposition_or_extend(&mut self, point: Pos2) {
        match self {
            Self::Stroke { position, .. } | Self::Stamp { position, .. } => *position = point,
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        match self {
            Self::Stroke {
                position,
                thickness,
                color,
            } => surface.stroke_circle(*position, thickness / 2.0, RING_WIDTH, *color),
            Self::Stamp {
                position,
                glyph,
                rotation_degrees,
                px,
                color,
            } => draw_rotated_glyph(surface, *position, glyph, *rotation_degrees, *px, *color),
        }
    }
}

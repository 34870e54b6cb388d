use egui::Pos2;
use uuid::Uuid;

use crate::surface::Surface;

mod stamp;
mod stroke;

pub use stamp::Stamp;
pub use stroke::Stroke;

pub(crate) use stamp::draw_rotated_glyph;

/// Rendering contract shared by committed marks and tool previews.
pub trait Drawable {
    /// Strokes append `point` to their path; everything else moves to it.
    fn reposition_or_extend(&mut self, point: Pos2);

    /// Paints onto `surface` using only the value's own state. Must leave the
    /// surface transform as it found it, and draw nothing for empty state.
    fn render(&self, surface: &mut dyn Surface);
}

/// Stable identity of a placed mark, independent of its index in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkId(Uuid);

impl MarkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A committed drawing element.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Stroke(Stroke),
    Stamp(Stamp),
}

impl Mark {
    pub fn id(&self) -> MarkId {
        match self {
            Self::Stroke(stroke) => stroke.id(),
            Self::Stamp(stamp) => stamp.id(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stroke(_) => "stroke",
            Self::Stamp(_) => "stamp",
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Self::Stroke(stroke) => Some(stroke),
            Self::Stamp(_) => None,
        }
    }

    pub fn as_stamp(&self) -> Option<&Stamp> {
        match self {
            Self::Stamp(stamp) => Some(stamp),
            Self::Stroke(_) => None,
        }
    }
}

impl Drawable for Mark {
    fn reposition_or_extend(&mut self, point: Pos2) {
        match self {
            Self::Stroke(stroke) => stroke.reposition_or_extend(point),
            Self::Stamp(stamp) => stamp.reposition_or_extend(point),
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        match self {
            Self::Stroke(stroke) => stroke.render(surface),
            Self::Stamp(stamp) => stamp.render(surface),
        }
    }
}

impl From<Stroke> for Mark {
    fn from(stroke: Stroke) -> Self {
        Self::Stroke(stroke)
    }
}

impl From<Stamp> for Mark {
    fn from(stamp: Stamp) -> Self {
        Self::Stamp(stamp)
    }
}

use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::config::SketchConfig;
use crate::mark::{Mark, Stamp, Stroke};

/// Largest rotation the rotation control offers.
pub const MAX_ROTATION_DEGREES: f32 = 360.0;

/// The drawing mode. Exactly one is active at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolMode {
    Pen { thickness: f32 },
    Stamp { glyph: String },
}

/// Appearance shared by every mark the tools create.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkStyle {
    pub ink: Color32,
    pub stamp_px: f32,
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self {
            ink: Color32::BLACK,
            stamp_px: 32.0,
        }
    }
}

/// The two pen sizes offered by the tools panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenPreset {
    #[default]
    Thin,
    Thick,
}

impl PenPreset {
    pub fn thickness(self, config: &SketchConfig) -> f32 {
        match self {
            Self::Thin => config.thin_thickness,
            Self::Thick => config.thick_thickness,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Thin => "Thin Doodle",
            Self::Thick => "Thick Doodle",
        }
    }
}

/// Currently selected tool plus the stamp rotation.
///
/// Rotation is kept whichever mode is active, so going back to a stamp
/// resumes the last angle.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    mode: ToolMode,
    rotation_degrees: f32,
    style: MarkStyle,
}

impl ToolState {
    /// Starts with a pen of `thickness` selected.
    pub fn new(style: MarkStyle, thickness: f32) -> Self {
        Self {
            mode: ToolMode::Pen { thickness },
            rotation_degrees: 0.0,
            style,
        }
    }

    pub fn from_config(config: &SketchConfig) -> Self {
        Self::new(
            MarkStyle {
                ink: config.ink_color(),
                stamp_px: config.stamp_px,
            },
            config.thin_thickness,
        )
    }

    pub fn select_pen(&mut self, thickness: f32) {
        self.mode = ToolMode::Pen { thickness };
    }

    pub fn select_stamp(&mut self, glyph: impl Into<String>) {
        self.mode = ToolMode::Stamp {
            glyph: glyph.into(),
        };
    }

    /// Stores the rotation, clamped to `0..=360`.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation_degrees = if degrees.is_finite() {
            degrees.clamp(0.0, MAX_ROTATION_DEGREES)
        } else {
            0.0
        };
    }

    pub fn active_mode(&self) -> &ToolMode {
        &self.mode
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn style(&self) -> MarkStyle {
        self.style
    }

    pub fn is_pen(&self, thickness: f32) -> bool {
        matches!(self.mode, ToolMode::Pen { thickness: t } if t == thickness)
    }

    pub fn is_stamp(&self, glyph: &str) -> bool {
        matches!(&self.mode, ToolMode::Stamp { glyph: g } if g == glyph)
    }

    /// Creates the mark the active tool places at `position`.
    pub fn begin_mark(&self, position: Pos2) -> Mark {
        match &self.mode {
            ToolMode::Pen { thickness } => Stroke::new(position, *thickness, self.style.ink).into(),
            ToolMode::Stamp { glyph } => Stamp::new(
                position,
                glyph.clone(),
                self.rotation_degrees,
                self.style.stamp_px,
                self.style.ink,
            )
            .into(),
        }
    }
}

/// The stamps the user can pick from: configured defaults followed by custom ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StampPalette {
    builtin: Vec<String>,
    custom: Vec<String>,
}

impl StampPalette {
    pub fn new(builtin: Vec<String>) -> Self {
        Self {
            builtin,
            custom: Vec::new(),
        }
    }

    /// Adds a user stamp. Blank input and glyphs already present are ignored.
    pub fn add_custom(&mut self, glyph: &str) -> bool {
        let glyph = glyph.trim();
        if glyph.is_empty() || self.contains(glyph) {
            return false;
        }
        self.custom.push(glyph.to_owned());
        true
    }

    pub fn contains(&self, glyph: &str) -> bool {
        self.iter().any(|g| g == glyph)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.builtin.iter().chain(self.custom.iter()).map(String::as_str)
    }

    pub fn custom(&self) -> &[String] {
        &self.custom
    }

    pub fn len(&self) -> usize {
        self.builtin.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

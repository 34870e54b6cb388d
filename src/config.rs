use std::path::Path;

use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{SketchError, SketchResult};

/// Tunables for the drawing surface, tools and export.
///
/// Missing fields fall back to their defaults so a config file only has to
/// mention what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Multiplier applied to the whole document when exporting.
    pub export_scale: u32,
    pub thin_thickness: f32,
    pub thick_thickness: f32,
    /// Font size used for stamp glyphs, in canvas pixels.
    pub stamp_px: f32,
    /// Built-in stamp glyphs, in button order.
    pub stamps: Vec<String>,
    pub background: [u8; 3],
    pub ink: [u8; 3],
    pub export_path: String,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            canvas_width: 256,
            canvas_height: 256,
            export_scale: 4,
            thin_thickness: 2.0,
            thick_thickness: 8.0,
            stamp_px: 32.0,
            stamps: vec!["😀".to_owned(), "🎨".to_owned(), "✨".to_owned()],
            background: [255, 255, 255],
            ink: [0, 0, 0],
            export_path: "sketchpad.png".to_owned(),
        }
    }
}

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "SKETCHPAD_CONFIG";

impl SketchConfig {
    /// Loads the file named by [`CONFIG_ENV`], falling back to defaults when
    /// it is unset or unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            Err(err) => {
                log::warn!(
                    "Ignoring config {}: {err}; using defaults",
                    Path::new(&path).display()
                );
                Self::default()
            }
        }
    }

    /// Reads a JSON config file and validates it.
    pub fn load(path: impl AsRef<Path>) -> SketchResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> SketchResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SketchResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(SketchError::InvalidConfig(format!(
                "canvas size must be non-zero, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.export_scale == 0 {
            return Err(SketchError::InvalidConfig(
                "export_scale must be at least 1".to_owned(),
            ));
        }
        for (name, value) in [
            ("thin_thickness", self.thin_thickness),
            ("thick_thickness", self.thick_thickness),
            ("stamp_px", self.stamp_px),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SketchError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width as f32, self.canvas_height as f32)
    }

    pub fn background_color(&self) -> Color32 {
        let [r, g, b] = self.background;
        Color32::from_rgb(r, g, b)
    }

    pub fn ink_color(&self) -> Color32 {
        let [r, g, b] = self.ink;
        Color32::from_rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SketchConfig::default();
        assert_eq!((config.canvas_width, config.canvas_height), (256, 256));
        assert_eq!(config.export_scale, 4);
        assert_eq!(config.thin_thickness, 2.0);
        assert_eq!(config.thick_thickness, 8.0);
        assert_eq!(config.background_color(), Color32::WHITE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SketchConfig::from_json(r#"{ "export_scale": 2, "stamps": ["★"] }"#).unwrap();
        assert_eq!(config.export_scale, 2);
        assert_eq!(config.stamps, vec!["★".to_owned()]);
        assert_eq!(config.canvas_width, 256);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            SketchConfig::from_json(r#"{ "export_scale": 0 }"#),
            Err(SketchError::InvalidConfig(_))
        ));
        assert!(matches!(
            SketchConfig::from_json(r#"{ "thin_thickness": -1.0 }"#),
            Err(SketchError::InvalidConfig(_))
        ));
        assert!(matches!(
            SketchConfig::from_json("not json"),
            Err(SketchError::Json(_))
        ));
    }
}

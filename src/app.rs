use std::sync::Arc;

use egui::TextureId;

use crate::canvas_texture::CanvasTexture;
use crate::config::SketchConfig;
use crate::export::ExportSink;
use crate::fonts::FontBook;
use crate::input::PointerTranslator;
use crate::panels::{central_panel, tools_panel};
use crate::state::EditorState;
use crate::tool::PenPreset;

pub const APP_NAME: &str = "Sick SketchPad";

/// User choices restored on the next start. The drawing itself is not kept.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    pub custom_stamps: Vec<String>,
    pub pen: PenPreset,
    pub rotation_degrees: f32,
}

pub struct SketchApp {
    editor: EditorState,
    translator: PointerTranslator,
    canvas_texture: CanvasTexture,
    custom_stamp_input: String,
    status: Option<String>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SketchConfig) -> Self {
        let preferences = cc
            .storage
            .and_then(|storage| eframe::get_value::<Preferences>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_preferences(config, FontBook::shared_default(), preferences)
    }

    pub fn with_preferences(config: SketchConfig, fonts: Arc<FontBook>, preferences: Preferences) -> Self {
        let mut editor = EditorState::new(config, fonts);
        for glyph in &preferences.custom_stamps {
            editor.add_custom_stamp(glyph);
        }
        editor.select_pen_preset(preferences.pen);
        editor.set_rotation(preferences.rotation_degrees);

        Self {
            editor,
            translator: PointerTranslator::new(),
            canvas_texture: CanvasTexture::new(),
            custom_stamp_input: String::new(),
            status: None,
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            custom_stamps: self.editor.palette().custom().to_vec(),
            pen: self.editor.pen_preset(),
            rotation_degrees: self.editor.tools().rotation_degrees(),
        }
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorState {
        &mut self.editor
    }

    pub fn custom_stamp_input_mut(&mut self) -> &mut String {
        &mut self.custom_stamp_input
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Adds whatever is typed in the custom stamp field to the palette.
    pub fn add_custom_stamp_from_input(&mut self) {
        if self.editor.add_custom_stamp(&self.custom_stamp_input) {
            self.custom_stamp_input.clear();
        }
    }

    /// Feeds this frame's pointer input for the canvas at `canvas_rect` into the editor.
    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        for event in self.translator.process_input(ctx, canvas_rect) {
            self.editor.handle_event(&event);
        }
    }

    /// Texture showing the latest on-screen render, uploading it if needed.
    pub fn canvas_texture_id(&mut self, ctx: &egui::Context) -> Option<TextureId> {
        let surface = self.editor.surface()?;
        self.canvas_texture
            .sync(ctx, surface.image(), self.editor.frame_version())
            .map(|handle| handle.id())
    }

    /// Renders the export and hands it to `sink`, recording the outcome for the UI.
    pub fn export_to(&mut self, sink: &mut dyn ExportSink) {
        let image = self.editor.export();
        self.status = Some(match sink.accept(&image) {
            Ok(()) => format!("Exported {}x{}", image.width(), image.height()),
            Err(err) => {
                log::error!("Export failed: {err}");
                format!("Export failed: {err}")
            }
        });
    }

    pub fn export(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        let mut sink = crate::export::PngFileSink::new(&self.editor.config().export_path);
        #[cfg(target_arch = "wasm32")]
        let mut sink = crate::export::MemorySink::new();
        self.export_to(&mut sink);
    }

    fn ensure_surface(&mut self) {
        if !self.editor.has_surface() {
            let surface = self.editor.renderer().new_surface(1);
            self.editor.attach_surface(surface);
            if self.editor.frame_version() == 0 {
                self.editor.on_document_changed();
            }
        }
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.preferences());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_surface();
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;

    fn app(preferences: Preferences) -> SketchApp {
        SketchApp::with_preferences(SketchConfig::default(), Arc::new(FontBook::empty()), preferences)
    }

    #[test]
    fn test_preferences_round_trip() {
        let preferences = Preferences {
            custom_stamps: vec!["😊".to_owned()],
            pen: PenPreset::Thick,
            rotation_degrees: 90.0,
        };
        let app = app(preferences.clone());
        assert!(app.editor().palette().contains("😊"));
        assert!(app.editor().tools().is_pen(8.0));
        assert_eq!(app.preferences(), preferences);

        let json = serde_json::to_string(&preferences).unwrap();
        assert_eq!(serde_json::from_str::<Preferences>(&json).unwrap(), preferences);
    }

    #[test]
    fn test_preferences_from_older_storage_default_pen() {
        let preferences: Preferences =
            serde_json::from_str(r#"{ "custom_stamps": ["🐸"], "rotation_degrees": 45.0 }"#).unwrap();
        assert_eq!(preferences.pen, PenPreset::Thin);

        let mut app = app(Preferences::default());
        app.editor_mut().select_pen_preset(PenPreset::Thick);
        assert_eq!(app.preferences().pen, PenPreset::Thick);
    }

    #[test]
    fn test_custom_stamp_input_clears_on_add() {
        let mut app = app(Preferences::default());
        app.custom_stamp_input_mut().push_str("🐸");
        app.add_custom_stamp_from_input();
        assert!(app.editor().palette().contains("🐸"));
        assert!(app.custom_stamp_input_mut().is_empty());
    }

    #[test]
    fn test_export_reports_status() {
        let mut app = app(Preferences::default());
        let mut sink = MemorySink::new();
        app.export_to(&mut sink);
        assert_eq!(app.status(), Some("Exported 1024x1024"));
        assert!(sink.latest().is_some());
    }
}

use std::sync::Arc;

use egui::Pos2;
use image::RgbaImage;

use crate::config::SketchConfig;
use crate::document::Document;
use crate::fonts::FontBook;
use crate::input::{InputController, InputEvent, Redraw};
use crate::pixmap::PixmapSurface;
use crate::renderer::Renderer;
use crate::tool::{PenPreset, StampPalette, ToolMode, ToolState};

/// Everything the editor mutates, owned in one place.
///
/// Controls and the pointer source call into this; after each mutation it
/// repaints the attached on-screen surface through [`EditorState::on_document_changed`]
/// or [`EditorState::on_tool_moved`]. Until a surface is attached repaints are
/// skipped and the most recent one is replayed on attach.
#[derive(Debug)]
pub struct EditorState {
    config: SketchConfig,
    document: Document,
    tools: ToolState,
    /// Last preset picked from the pen buttons.
    pen_preset: PenPreset,
    palette: StampPalette,
    input: InputController,
    renderer: Renderer,
    surface: Option<PixmapSurface>,
    pending: Option<Redraw>,
    frame_version: u64,
}

impl EditorState {
    pub fn new(config: SketchConfig, fonts: Arc<FontBook>) -> Self {
        Self {
            document: Document::new(),
            tools: ToolState::from_config(&config),
            pen_preset: PenPreset::default(),
            palette: StampPalette::new(config.stamps.clone()),
            input: InputController::new(),
            renderer: Renderer::from_config(&config, fonts),
            surface: None,
            pending: None,
            frame_version: 0,
            config,
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn palette(&self) -> &StampPalette {
        &self.palette
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    // ---- Surface ---------------------------------------------------------

    /// Hands over the on-screen surface and paints anything missed while none was attached.
    pub fn attach_surface(&mut self, surface: PixmapSurface) {
        self.surface = Some(surface);
        match self.pending.take() {
            Some(Redraw::ToolMoved) => self.on_tool_moved(),
            Some(_) => self.on_document_changed(),
            None => {}
        }
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&PixmapSurface> {
        self.surface.as_ref()
    }

    /// Bumped after every completed on-screen render.
    pub fn frame_version(&self) -> u64 {
        self.frame_version
    }

    // ---- Redraw ------------------------------------------------------------

    /// Repaints the document without any preview.
    pub fn on_document_changed(&mut self) {
        self.repaint(Redraw::DocumentChanged);
    }

    /// Repaints the document with the current preview on top.
    pub fn on_tool_moved(&mut self) {
        self.repaint(Redraw::ToolMoved);
    }

    fn dispatch(&mut self, redraw: Redraw) {
        match redraw {
            Redraw::DocumentChanged => self.on_document_changed(),
            Redraw::ToolMoved => self.on_tool_moved(),
            Redraw::Unchanged => {}
        }
    }

    fn repaint(&mut self, kind: Redraw) {
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("No surface attached, deferring {kind:?} repaint");
            self.pending = Some(kind);
            return;
        };
        let preview = match kind {
            Redraw::ToolMoved => self.input.preview(),
            _ => None,
        };
        self.renderer
            .render(surface, self.document.snapshot(), preview, 1.0);
        self.pending = None;
        self.frame_version += 1;
    }

    // ---- Pointer -----------------------------------------------------------

    pub fn handle_event(&mut self, event: &InputEvent) {
        let redraw = self.input.handle(event, &self.tools, &mut self.document);
        self.dispatch(redraw);
    }

    pub fn pointer_down(&mut self, position: Pos2) {
        self.handle_event(&InputEvent::PointerDown { position });
    }

    pub fn pointer_move(&mut self, position: Pos2) {
        self.handle_event(&InputEvent::PointerMove { position });
    }

    pub fn pointer_up(&mut self, position: Pos2) {
        self.handle_event(&InputEvent::PointerUp { position });
    }

    // ---- Controls ----------------------------------------------------------

    /// Switches to a pen. Ignored while a mark is being drawn.
    pub fn select_pen(&mut self, thickness: f32) -> bool {
        if self.refuse_tool_switch() {
            return false;
        }
        log::info!("Selected pen ({thickness}px)");
        self.tools.select_pen(thickness);
        true
    }

    pub fn select_pen_preset(&mut self, preset: PenPreset) -> bool {
        let selected = self.select_pen(preset.thickness(&self.config));
        if selected {
            self.pen_preset = preset;
        }
        selected
    }

    pub fn pen_preset(&self) -> PenPreset {
        self.pen_preset
    }

    /// Switches to a stamp. Ignored while a mark is being drawn.
    pub fn select_stamp(&mut self, glyph: &str) -> bool {
        if self.refuse_tool_switch() {
            return false;
        }
        log::info!("Selected stamp {glyph}");
        self.tools.select_stamp(glyph);
        true
    }

    fn refuse_tool_switch(&self) -> bool {
        let busy = self.input.is_committing();
        if busy {
            log::warn!("Ignoring tool switch while drawing");
        }
        busy
    }

    /// Stores the stamp rotation and turns an idle stamp preview to match.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.tools.set_rotation(degrees);
        let redraw = self.input.set_preview_rotation(self.tools.rotation_degrees());
        self.dispatch(redraw);
    }

    pub fn add_custom_stamp(&mut self, glyph: &str) -> bool {
        let added = self.palette.add_custom(glyph);
        if added {
            log::info!("Added custom stamp {}", glyph.trim());
        }
        added
    }

    pub fn active_mode(&self) -> &ToolMode {
        self.tools.active_mode()
    }

    pub fn undo(&mut self) {
        if self.document.undo() {
            self.on_document_changed();
        }
    }

    pub fn redo(&mut self) {
        if self.document.redo() {
            self.on_document_changed();
        }
    }

    pub fn clear(&mut self) {
        self.document.clear();
        self.on_document_changed();
    }

    pub fn can_undo(&self) -> bool {
        self.document.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.can_redo()
    }

    /// The document rendered at the configured export scale, without preview.
    /// The on-screen surface is not touched.
    pub fn export(&self) -> RgbaImage {
        self.renderer
            .export(self.document.snapshot(), self.config.export_scale)
    }
}

use egui::Pos2;

use super::InputEvent;
use crate::document::Document;
use crate::mark::{Drawable, MarkId};
use crate::preview::Preview;
use crate::tool::ToolState;

/// What the caller has to repaint after an input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Nothing visible changed.
    Unchanged,
    /// The document changed; repaint it without a preview.
    DocumentChanged,
    /// Only the preview moved; repaint the document with the preview on top.
    ToolMoved,
}

/// Pointer lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerState {
    /// Pointer up. Holds the preview once the pointer has moved over the canvas.
    Idle { preview: Option<Preview> },
    /// Pointer down; `mark` is being extended or dragged.
    Committing { mark: MarkId },
}

impl PointerState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "Idle",
            Self::Committing { .. } => "Committing",
        }
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::Idle { preview: None }
    }
}

/// Turns pointer events into document and preview changes.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    state: PointerState,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.state, PointerState::Committing { .. })
    }

    /// The mark currently being drawn, if any.
    pub fn in_flight(&self) -> Option<MarkId> {
        match self.state {
            PointerState::Committing { mark } => Some(mark),
            PointerState::Idle { .. } => None,
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        match &self.state {
            PointerState::Idle { preview } => preview.as_ref(),
            PointerState::Committing { .. } => None,
        }
    }

    pub fn handle(&mut self, event: &InputEvent, tools: &ToolState, document: &mut Document) -> Redraw {
        match *event {
            InputEvent::PointerDown { position } => self.pointer_down(position, tools, document),
            InputEvent::PointerMove { position } => self.pointer_move(position, tools, document),
            InputEvent::PointerUp { position } => self.pointer_up(position),
        }
    }

    /// Idle → Committing: the new mark goes into the document straight away
    /// and the preview is dropped.
    pub fn pointer_down(&mut self, position: Pos2, tools: &ToolState, document: &mut Document) -> Redraw {
        if self.is_committing() {
            return Redraw::Unchanged;
        }
        let mark = document.commit_new(tools.begin_mark(position));
        log::debug!("Pointer down at {position:?}: Idle -> Committing");
        self.state = PointerState::Committing { mark };
        Redraw::DocumentChanged
    }

    pub fn pointer_move(&mut self, position: Pos2, tools: &ToolState, document: &mut Document) -> Redraw {
        match &mut self.state {
            PointerState::Committing { mark } => match document.mark_mut(*mark) {
                Some(mark) => {
                    mark.reposition_or_extend(position);
                    Redraw::DocumentChanged
                }
                // Undone or cleared mid-drag; keep ignoring the drag until release.
                None => Redraw::Unchanged,
            },
            PointerState::Idle { preview } => {
                let reusable = preview.as_ref().is_some_and(|p| p.conforms_to(tools));
                match preview {
                    Some(existing) if reusable => {
                        existing.reposition_or_extend(position);
                        existing.set_rotation(tools.rotation_degrees());
                    }
                    _ => *preview = Some(Preview::for_tool(tools, position)),
                }
                Redraw::ToolMoved
            }
        }
    }

    /// Committing → Idle. The mark stays in the document.
    pub fn pointer_up(&mut self, position: Pos2) -> Redraw {
        if !self.is_committing() {
            return Redraw::Unchanged;
        }
        log::debug!("Pointer up at {position:?}: Committing -> Idle");
        self.state = PointerState::Idle { preview: None };
        Redraw::DocumentChanged
    }

    /// Applies a new rotation to an idle stamp preview.
    pub fn set_preview_rotation(&mut self, degrees: f32) -> Redraw {
        if let PointerState::Idle {
            preview: Some(preview),
        } = &mut self.state
        {
            if preview.set_rotation(degrees) {
                return Redraw::ToolMoved;
            }
        }
        Redraw::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::MarkStyle;
    use egui::pos2;

    fn setup() -> (InputController, ToolState, Document) {
        (
            InputController::new(),
            ToolState::new(MarkStyle::default(), 2.0),
            Document::new(),
        )
    }

    #[test]
    fn test_drag_extends_one_stroke() {
        let (mut input, tools, mut doc) = setup();
        assert_eq!(input.pointer_down(pos2(0.0, 0.0), &tools, &mut doc), Redraw::DocumentChanged);
        assert_eq!(doc.len(), 1);
        assert_eq!(input.pointer_move(pos2(1.0, 1.0), &tools, &mut doc), Redraw::DocumentChanged);
        assert_eq!(input.pointer_move(pos2(2.0, 2.0), &tools, &mut doc), Redraw::DocumentChanged);
        assert_eq!(input.pointer_up(pos2(2.0, 2.0)), Redraw::DocumentChanged);

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.snapshot()[0].as_stroke().unwrap().points().len(), 3);
        assert!(!input.is_committing());
        assert!(input.preview().is_none());
    }

    #[test]
    fn test_idle_move_creates_then_reuses_preview() {
        let (mut input, tools, mut doc) = setup();
        assert_eq!(input.pointer_move(pos2(3.0, 3.0), &tools, &mut doc), Redraw::ToolMoved);
        assert_eq!(input.pointer_move(pos2(4.0, 5.0), &tools, &mut doc), Redraw::ToolMoved);
        assert_eq!(input.preview().unwrap().position(), pos2(4.0, 5.0));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_preview_follows_tool_change() {
        let (mut input, mut tools, mut doc) = setup();
        input.pointer_move(pos2(3.0, 3.0), &tools, &mut doc);
        tools.select_stamp("😀");
        input.pointer_move(pos2(4.0, 4.0), &tools, &mut doc);
        assert!(matches!(input.preview(), Some(Preview::Stamp { glyph, .. }) if glyph == "😀"));
    }

    #[test]
    fn test_pointer_down_hides_preview() {
        let (mut input, tools, mut doc) = setup();
        input.pointer_move(pos2(3.0, 3.0), &tools, &mut doc);
        input.pointer_down(pos2(3.0, 3.0), &tools, &mut doc);
        assert!(input.preview().is_none());
        assert_eq!(input.state().name(), "Committing");
    }

    #[test]
    fn test_up_without_down_is_ignored() {
        let (mut input, _tools, _doc) = setup();
        assert_eq!(input.pointer_up(pos2(0.0, 0.0)), Redraw::Unchanged);
    }

    #[test]
    fn test_drag_after_undo_is_ignored() {
        let (mut input, tools, mut doc) = setup();
        input.pointer_down(pos2(0.0, 0.0), &tools, &mut doc);
        doc.undo();
        assert_eq!(input.pointer_move(pos2(1.0, 1.0), &tools, &mut doc), Redraw::Unchanged);
        assert!(doc.is_empty());
        assert_eq!(doc.redo_stack()[0].as_stroke().unwrap().points().len(), 1);
    }

    #[test]
    fn test_rotation_only_touches_stamp_preview() {
        let (mut input, mut tools, mut doc) = setup();
        assert_eq!(input.set_preview_rotation(30.0), Redraw::Unchanged);
        input.pointer_move(pos2(1.0, 1.0), &tools, &mut doc);
        assert_eq!(input.set_preview_rotation(30.0), Redraw::Unchanged);

        tools.select_stamp("✨");
        input.pointer_move(pos2(1.0, 1.0), &tools, &mut doc);
        assert_eq!(input.set_preview_rotation(30.0), Redraw::ToolMoved);
    }
}

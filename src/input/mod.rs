use egui::{Context, Pos2, Rect};

mod controller;
pub use controller::{InputController, PointerState, Redraw};

/// Pointer events in canvas-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the canvas
    PointerDown { position: Pos2 },
    /// Pointer moved, with or without the button held
    PointerMove { position: Pos2 },
    /// Primary button released after a press on the canvas
    PointerUp { position: Pos2 },
}

/// Raw primary-pointer state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Last known pointer position in screen coordinates
    pub position: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
}

impl PointerSample {
    pub fn from_egui(ctx: &Context) -> Self {
        ctx.input(|input| Self {
            position: input.pointer.latest_pos(),
            pressed: input.pointer.primary_pressed(),
            released: input.pointer.primary_released(),
        })
    }
}

/// Converts per-frame egui pointer state into [`InputEvent`]s for a canvas.
///
/// A press only counts when it lands on the canvas. Once a drag started it
/// keeps reporting moves and its release wherever the pointer goes; idle
/// moves outside the canvas are dropped.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    last_position: Option<Pos2>,
    dragging: bool,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Reads the current egui input and translates it against `canvas`.
    pub fn process_input(&mut self, ctx: &Context, canvas: Rect) -> Vec<InputEvent> {
        self.translate(PointerSample::from_egui(ctx), canvas)
    }

    pub fn translate(&mut self, sample: PointerSample, canvas: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let to_local = |pos: Pos2| (pos - canvas.min).to_pos2();
        let inside = sample.position.is_some_and(|pos| canvas.contains(pos));

        if sample.pressed && inside && !self.dragging {
            if let Some(pos) = sample.position {
                events.push(InputEvent::PointerDown {
                    position: to_local(pos),
                });
                self.dragging = true;
            }
        } else if let Some(pos) = sample.position {
            if Some(pos) != self.last_position && (self.dragging || inside) {
                events.push(InputEvent::PointerMove {
                    position: to_local(pos),
                });
            }
        }

        if sample.released && self.dragging {
            if let Some(pos) = sample.position.or(self.last_position) {
                events.push(InputEvent::PointerUp {
                    position: to_local(pos),
                });
            }
            self.dragging = false;
        }

        self.last_position = sample.position;
        events
    }
}

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas_texture;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod fonts;
pub mod geometry;
pub mod input;
pub mod mark;
pub mod panels;
pub mod pixmap;
pub mod preview;
pub mod renderer;
pub mod state;
pub mod surface;
pub mod tool;

pub use app::{APP_NAME, Preferences, SketchApp};
pub use config::SketchConfig;
pub use document::Document;
pub use error::{SketchError, SketchResult};
pub use export::{ExportSink, MemorySink, PngFileSink};
pub use fonts::FontBook;
pub use input::{InputController, InputEvent, PointerState, Redraw};
pub use mark::{Drawable, Mark, MarkId, Stamp, Stroke};
pub use pixmap::PixmapSurface;
pub use preview::Preview;
pub use renderer::Renderer;
pub use state::EditorState;
pub use surface::{RecordingSurface, Surface, SurfaceCall};
pub use tool::{MarkStyle, PenPreset, StampPalette, ToolMode, ToolState};

use egui::{Color32, Rect, Sense, pos2};

use crate::app::{APP_NAME, SketchApp};

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading(APP_NAME);

        // The canvas is shown at exactly its pixel size.
        let size = app.editor().renderer().base_size();
        let (canvas_rect, _response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        // Handle input before painting so this frame shows its effect
        app.handle_canvas_input(ctx, canvas_rect);

        match app.canvas_texture_id(ctx) {
            Some(texture_id) => {
                ui.painter().image(
                    texture_id,
                    canvas_rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                ui.painter()
                    .rect_filled(canvas_rect, 0.0, app.editor().renderer().background());
            }
        }
    });
}

use egui::RichText;

use crate::app::SketchApp;
use crate::tool::{MAX_ROTATION_DEGREES, PenPreset};

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            // History
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    app.editor_mut().clear();
                }
                let can_undo = app.editor().can_undo();
                let can_redo = app.editor().can_redo();
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.editor_mut().undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.editor_mut().redo();
                }
            });
            ui.separator();

            // Tool switches are refused mid-drag, so grey them out.
            let idle = !app.editor().input().is_committing();

            ui.label("Pens");
            ui.horizontal(|ui| {
                for preset in [PenPreset::Thin, PenPreset::Thick] {
                    let thickness = preset.thickness(app.editor().config());
                    let selected = app.editor().tools().is_pen(thickness);
                    let response = ui.add_enabled(idle, egui::SelectableLabel::new(selected, preset.label()));
                    if response.clicked() {
                        app.editor_mut().select_pen_preset(preset);
                    }
                }
            });

            ui.label("Stamps");
            let stamps: Vec<String> = app.editor().palette().iter().map(str::to_owned).collect();
            ui.horizontal_wrapped(|ui| {
                for glyph in &stamps {
                    let selected = app.editor().tools().is_stamp(glyph);
                    let label = egui::SelectableLabel::new(selected, RichText::new(glyph).size(20.0));
                    if ui.add_enabled(idle, label).clicked() {
                        app.editor_mut().select_stamp(glyph);
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(app.custom_stamp_input_mut()).desired_width(60.0));
                if ui.button("Custom Stamp").clicked() {
                    app.add_custom_stamp_from_input();
                }
            });

            let mut rotation = app.editor().tools().rotation_degrees();
            let slider = egui::Slider::new(&mut rotation, 0.0..=MAX_ROTATION_DEGREES)
                .text("Rotation")
                .integer();
            if ui.add(slider).changed() {
                app.editor_mut().set_rotation(rotation);
            }
            ui.separator();

            if ui.button("Export").clicked() {
                app.export();
            }
            if let Some(status) = app.status() {
                ui.label(status);
            }
            ui.separator();

            let document = app.editor().document();
            ui.label(format!("Marks: {}", document.len()));
            ui.label(format!("Redoable: {}", document.redo_stack().len()));
            ui.label(format!("Pointer: {}", app.editor().input().state().name()));
        });
}

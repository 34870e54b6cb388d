use std::sync::Arc;

use egui::{Color32, Vec2, pos2};
use image::RgbaImage;
use sketchpad::{
    Drawable, EditorState, ExportSink, FontBook, Mark, MemorySink, RecordingSurface, Renderer,
    SketchConfig, Stamp, Stroke, Surface, SurfaceCall,
};

fn renderer(fonts: Arc<FontBook>) -> Renderer {
    Renderer::new(Vec2::splat(64.0), Color32::WHITE, fonts)
}

fn stroke(points: &[(f32, f32)], thickness: f32) -> Mark {
    let mut stroke = Stroke::new(pos2(points[0].0, points[0].1), thickness, Color32::BLACK);
    for &(x, y) in &points[1..] {
        stroke.reposition_or_extend(pos2(x, y));
    }
    stroke.into()
}

fn is_ink(image: &RgbaImage, x: u32, y: u32) -> bool {
    image.get_pixel(x, y)[0] < 128
}

fn ink_count(image: &RgbaImage) -> usize {
    image.pixels().filter(|p| p[0] < 128).count()
}

#[test]
fn test_render_is_idempotent() {
    let renderer = renderer(Arc::new(FontBook::empty()));
    let marks = vec![
        stroke(&[(4.0, 4.0), (30.0, 12.0), (50.0, 40.0)], 8.0),
        stroke(&[(10.0, 50.0), (40.0, 50.0)], 2.0),
    ];

    let mut surface = renderer.new_surface(1);
    renderer.render(&mut surface, &marks, None, 1.0);
    let first = surface.image().clone();
    renderer.render(&mut surface, &marks, None, 1.0);
    assert_eq!(surface.image(), &first);
}

#[test]
fn test_export_scales_geometry() {
    let renderer = renderer(Arc::new(FontBook::empty()));
    let marks = vec![stroke(&[(10.0, 10.0), (30.0, 10.0)], 2.0)];

    let image = renderer.export(&marks, 4);
    assert_eq!(image.dimensions(), (256, 256));
    assert!(image.pixels().all(|p| p[3] == 255));
    assert!(is_ink(&image, 40, 40));
    let inked = (0..256).filter(|&y| is_ink(&image, 80, y)).count();
    assert_eq!(inked, 8);
}

#[test]
fn test_empty_export_is_plain_background() {
    let image = renderer(Arc::new(FontBook::empty())).export(&[], 4);
    assert!(image.pixels().all(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn test_export_leaves_editor_untouched() {
    let mut editor = EditorState::new(SketchConfig::default(), Arc::new(FontBook::empty()));
    let surface = editor.renderer().new_surface(1);
    editor.attach_surface(surface);
    editor.pointer_down(pos2(10.0, 10.0));
    editor.pointer_move(pos2(60.0, 10.0));
    editor.pointer_up(pos2(60.0, 10.0));
    editor.pointer_move(pos2(100.0, 100.0));

    let on_screen = editor.surface().unwrap().image().clone();
    let marks = editor.document().snapshot().to_vec();
    let version = editor.frame_version();

    let image = editor.export();
    assert_eq!(image.dimensions(), (1024, 1024));
    // The idle preview ring around (100, 100) is not part of the export.
    assert!(!is_ink(&image, 400 + 4, 400));

    assert_eq!(editor.surface().unwrap().image(), &on_screen);
    assert_eq!(editor.document().snapshot(), marks.as_slice());
    assert_eq!(editor.frame_version(), version);
    assert!(editor.input().preview().is_some());

    let mut sink = MemorySink::new();
    sink.accept(&image).unwrap();
    assert!(sink.latest().unwrap().starts_with(b"\x89PNG"));
}

#[test]
fn test_stamp_restores_transform() {
    let stamp = Stamp::new(pos2(20.0, 30.0), "★", 90.0, 32.0, Color32::BLACK);
    let mut surface = RecordingSurface::new(64, 64);
    surface.scale(2.0);
    let before = surface.transform();

    stamp.render(&mut surface);

    assert_eq!(surface.transform(), before);
    assert_eq!(surface.depth(), 0);
    let glyphs: Vec<_> = surface
        .draw_calls()
        .into_iter()
        .filter(|call| matches!(call, SurfaceCall::FillGlyph { .. }))
        .collect();
    assert_eq!(glyphs.len(), 1);
}

#[test]
fn test_stamp_glyph_inks_pixels() {
    let fonts = Arc::new(FontBook::load_default().unwrap());
    let renderer = renderer(fonts);
    let upright: Mark = Stamp::new(pos2(16.0, 40.0), "A", 0.0, 32.0, Color32::BLACK).into();
    let turned: Mark = Stamp::new(pos2(16.0, 40.0), "A", 90.0, 32.0, Color32::BLACK).into();

    let image = renderer.export(std::slice::from_ref(&upright), 1);
    assert!(ink_count(&image) > 20);
    // Drawn from the baseline upwards.
    assert!((0..64).all(|x| !is_ink(&image, x, 60)));

    let rotated = renderer.export(&[turned], 1);
    assert!(ink_count(&rotated) > 20);
    assert_ne!(image, rotated);
}

// Ink-weighted centroid and area, in device pixels.
fn ink_moments(image: &RgbaImage) -> (f32, f32, f32) {
    let (mut area, mut sx, mut sy) = (0.0, 0.0, 0.0);
    for (x, y, pixel) in image.enumerate_pixels() {
        let weight = (255 - pixel[0]) as f32 / 255.0;
        area += weight;
        sx += weight * (x as f32 + 0.5);
        sy += weight * (y as f32 + 0.5);
    }
    (sx / area, sy / area, area)
}

#[test]
fn test_stamp_export_scales_position_and_size() {
    let renderer = renderer(Arc::new(FontBook::load_default().unwrap()));

    for rotation in [0.0, 90.0, 37.0] {
        let stamp: Mark = Stamp::new(pos2(20.0, 40.0), "★", rotation, 16.0, Color32::BLACK).into();
        let marks = [stamp];

        let (x1, y1, area1) = ink_moments(&renderer.export(&marks, 1));
        let (x4, y4, area4) = ink_moments(&renderer.export(&marks, 4));

        assert!(area1 > 10.0, "rotation {rotation}: nothing drawn");
        assert!((x4 - 4.0 * x1).abs() < 2.0, "rotation {rotation}: x {x1} -> {x4}");
        assert!((y4 - 4.0 * y1).abs() < 2.0, "rotation {rotation}: y {y1} -> {y4}");
        let ratio = area4 / area1;
        assert!((14.0..18.0).contains(&ratio), "rotation {rotation}: area ratio {ratio}");
    }
}

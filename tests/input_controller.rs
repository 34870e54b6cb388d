use std::sync::Arc;

use egui::pos2;
use sketchpad::{
    EditorState, FontBook, InputEvent, PointerState, Preview, SketchConfig, ToolMode,
};

fn attached_editor() -> EditorState {
    let mut editor = EditorState::new(SketchConfig::default(), Arc::new(FontBook::empty()));
    let surface = editor.renderer().new_surface(1);
    editor.attach_surface(surface);
    editor
}

#[test]
fn test_idle_moves_never_touch_history() {
    let mut editor = attached_editor();
    editor.pointer_down(pos2(1.0, 1.0));
    editor.pointer_move(pos2(4.0, 4.0));
    editor.pointer_up(pos2(4.0, 4.0));
    editor.undo();

    for i in 0..20 {
        editor.pointer_move(pos2(i as f32, 2.0 * i as f32));
        assert_eq!(editor.document().len(), 0);
        assert_eq!(editor.document().redo_stack().len(), 1);
    }
    assert_eq!(editor.input().preview().unwrap().position(), pos2(19.0, 38.0));
}

#[test]
fn test_stamp_drag_moves_single_stamp() {
    let mut editor = attached_editor();
    assert!(editor.select_stamp("★"));
    editor.set_rotation(90.0);

    editor.handle_event(&InputEvent::PointerDown { position: pos2(20.0, 20.0) });
    editor.handle_event(&InputEvent::PointerMove { position: pos2(30.0, 25.0) });
    editor.handle_event(&InputEvent::PointerMove { position: pos2(40.0, 30.0) });
    editor.set_rotation(10.0);
    editor.handle_event(&InputEvent::PointerUp { position: pos2(40.0, 30.0) });

    let marks = editor.document().snapshot();
    assert_eq!(marks.len(), 1);
    let stamp = marks[0].as_stamp().unwrap();
    assert_eq!(stamp.position(), pos2(40.0, 30.0));
    assert_eq!(stamp.rotation_degrees(), 90.0);
    assert_eq!(editor.tools().rotation_degrees(), 10.0);
}

#[test]
fn test_state_machine_transitions() {
    let mut editor = attached_editor();
    assert!(matches!(editor.input().state(), PointerState::Idle { preview: None }));

    editor.pointer_move(pos2(5.0, 5.0));
    assert!(matches!(
        editor.input().state(),
        PointerState::Idle { preview: Some(Preview::Stroke { .. }) }
    ));

    editor.pointer_down(pos2(5.0, 5.0));
    let in_flight = editor.input().in_flight().unwrap();
    assert_eq!(editor.document().snapshot()[0].id(), in_flight);
    assert!(editor.input().preview().is_none());

    editor.pointer_up(pos2(5.0, 5.0));
    assert!(matches!(editor.input().state(), PointerState::Idle { preview: None }));
    assert_eq!(editor.document().len(), 1);
}

#[test]
fn test_tool_switch_policy_during_drag() {
    let mut editor = attached_editor();
    editor.pointer_down(pos2(0.0, 0.0));
    assert!(!editor.select_stamp("😀"));
    assert!(!editor.select_pen(8.0));
    editor.pointer_move(pos2(3.0, 3.0));
    editor.pointer_up(pos2(3.0, 3.0));

    assert_eq!(editor.active_mode(), &ToolMode::Pen { thickness: 2.0 });
    assert_eq!(editor.document().snapshot()[0].as_stroke().unwrap().points().len(), 2);
}

#[test]
fn test_new_drawing_after_undo_discards_redo() {
    let mut editor = attached_editor();
    for x in [0.0, 10.0, 20.0] {
        editor.pointer_down(pos2(x, 0.0));
        editor.pointer_move(pos2(x, 5.0));
        editor.pointer_up(pos2(x, 5.0));
    }
    editor.undo();
    editor.undo();
    assert!(editor.can_redo());

    editor.pointer_down(pos2(50.0, 50.0));
    editor.pointer_up(pos2(50.0, 50.0));
    assert_eq!(editor.document().len(), 2);
    assert!(!editor.can_redo());
}

//! End-to-end editing sessions driven through `EditController`.

use kurbo::{Point, Rect, Size, Vec2};
use panelkit_core::document::SerializedView;
use panelkit_core::input::Instant;
use panelkit_core::registry::{CONTAINER_CLASS, KNOB_CLASS, TEXT_LABEL_CLASS, VIEW_CLASS};
use panelkit_core::storage::{MemoryStorage, Storage};
use panelkit_core::transfer;
use panelkit_core::{
    Document, EditController, EditorConfig, Key, Modifiers, ResourceKind, ResourceValue, Rgba,
    ViewId, ViewRegistry,
};
use std::sync::Arc;
use std::time::Duration;

fn editor() -> EditController {
    EditController::with_root(
        Arc::new(ViewRegistry::with_builtins()),
        CONTAINER_CLASS,
        Size::new(400.0, 300.0),
        EditorConfig::default(),
    )
    .unwrap()
}

fn snapshot(ed: &EditController) -> Option<SerializedView> {
    ed.to_document("snapshot").root
}

fn frame(ed: &EditController, id: ViewId) -> Rect {
    ed.tree().get(id).unwrap().frame
}

fn click(ed: &mut EditController, pos: Point, modifiers: Modifiers) {
    let now = Instant::now();
    ed.pointer_down(pos, modifiers, now);
    ed.pointer_up(pos, modifiers, now);
}

#[test]
fn test_undo_all_then_redo_all_reproduces_the_session() {
    let mut ed = editor();
    let initial = snapshot(&ed);

    ed.set_resource(
        ResourceKind::Color,
        "accent",
        Some(ResourceValue::Color(Rgba::new(0, 128, 255, 255))),
    );
    let label = ed.create_new_view(TEXT_LABEL_CLASS, Point::new(20.0, 20.0)).unwrap();
    ed.change_attribute("title", "Cutoff");
    ed.change_attribute("font-color", "accent");
    ed.create_new_view(KNOB_CLASS, Point::new(150.0, 40.0)).unwrap();
    ed.nudge(Vec2::new(5.0, 0.0));
    ed.select_all();
    assert!(ed.embed_selection_into(CONTAINER_CLASS));
    ed.select_view(label);
    assert!(ed.bring_forward());
    assert!(ed.rename_resource(ResourceKind::Color, "accent", "highlight"));

    let done = snapshot(&ed);
    let steps = ed.history().len();
    while ed.undo() {}
    assert_eq!(snapshot(&ed), initial);
    assert!(ed.catalog().lookup_color("accent").is_none());

    for _ in 0..steps {
        assert!(ed.redo());
    }
    assert!(!ed.can_redo());
    assert_eq!(snapshot(&ed), done);
    assert!(ed.catalog().lookup_color("highlight").is_some());
}

#[test]
fn test_delete_then_undo_restores_sibling_order() {
    let mut ed = editor();
    let a = ed.create_new_view(VIEW_CLASS, Point::new(10.0, 10.0)).unwrap();
    let b = ed.create_new_view(VIEW_CLASS, Point::new(100.0, 10.0)).unwrap();
    let c = ed.create_new_view(VIEW_CLASS, Point::new(200.0, 10.0)).unwrap();
    let root = ed.root();

    ed.select_view(b);
    assert!(ed.key_down(Key::Delete, Modifiers::NONE));
    assert_eq!(ed.tree().children(root), &[a, c]);
    assert!(ed.undo());
    assert_eq!(ed.tree().children(root), &[a, b, c]);

    ed.select_view(c);
    assert!(ed.delete_selection());
    assert!(ed.undo());
    assert_eq!(ed.tree().children(root), &[a, b, c]);

    ed.select_view(root);
    assert!(!ed.delete_selection());
}

#[test]
fn test_copying_container_and_child_transfers_the_child_once() {
    let mut ed = editor();
    let group = ed.create_new_view(CONTAINER_CLASS, Point::new(100.0, 100.0)).unwrap();
    let child = ed.create_new_view(VIEW_CLASS, Point::new(110.0, 110.0)).unwrap();
    assert_eq!(ed.tree().parent(child), Some(group));

    click(&mut ed, Point::new(102.0, 102.0), Modifiers::NONE);
    click(&mut ed, Point::new(120.0, 120.0), Modifiers::SHIFT);
    assert_eq!(ed.selection().len(), 2);

    let bytes = ed.copy().unwrap();
    assert_eq!(transfer::peek_count(&bytes), Ok(1));
    let payload = transfer::deserialize(&bytes, ed.registry(), ed.catalog()).unwrap();
    assert_eq!(payload.views.len(), 1);
    assert_eq!(payload.views[0].len(), 2);

    let pasted = ed.paste(Some(Point::new(250.0, 150.0)));
    assert_eq!(pasted.len(), 1);
    assert_eq!(ed.tree().len(), 5);
    assert_eq!(ed.tree().children(pasted[0]).len(), 1);
}

#[test]
fn test_pointer_drag_moves_by_snapped_delta() {
    let mut ed = editor();
    let v = ed.create_new_view(VIEW_CLASS, Point::new(90.0, 90.0)).unwrap();
    let t0 = Instant::now();

    ed.pointer_down(Point::new(103.0, 107.0), Modifiers::NONE, t0);
    ed.pointer_move(Point::new(118.0, 122.0), Modifiers::NONE, t0 + Duration::from_millis(16));
    ed.pointer_up(Point::new(118.0, 122.0), Modifiers::NONE, t0 + Duration::from_millis(32));

    assert_eq!(frame(&ed, v).origin(), Point::new(100.0, 110.0));
    assert_eq!(ed.undo_name(), Some("Move View"));
}

#[test]
fn test_drag_between_editors() {
    let mut source = editor();
    source.create_new_view(TEXT_LABEL_CLASS, Point::new(40.0, 40.0)).unwrap();
    source.change_attribute("title", "Resonance");
    let now = Instant::now();
    let bytes = match source.pointer_down(Point::new(50.0, 50.0), Modifiers::ALT, now) {
        panelkit_core::PointerResult::DragOut(bytes) => bytes,
        other => panic!("expected drag-out, got {:?}", other),
    };

    let mut target = editor();
    assert!(target.drag_enter(&bytes, Point::new(200.0, 200.0)));
    let dropped = target.drop(Point::new(200.0, 200.0));
    assert_eq!(dropped.len(), 1);
    let node = target.tree().get(dropped[0]).unwrap();
    assert_eq!(
        target.registry().read(node, "title", target.catalog()).as_deref(),
        Some("Resonance")
    );
    assert_eq!(node.frame.origin(), Point::new(190.0, 190.0));
}

#[test]
fn test_document_survives_storage_and_reload() {
    let mut ed = editor();
    ed.set_resource(
        ResourceKind::Color,
        "panel",
        Some(ResourceValue::Color(Rgba::new(30, 30, 30, 255))),
    );
    ed.create_new_view(TEXT_LABEL_CLASS, Point::new(10.0, 10.0)).unwrap();
    ed.change_attribute("title", "Mix");
    ed.change_attribute("back-color", "panel");
    ed.select_all();
    assert!(ed.save_template("Mix Label"));
    assert!(ed.is_dirty());

    let document = ed.to_document("Mixer");
    let storage = MemoryStorage::new();
    pollster::block_on(storage.save(&document.id, &document)).unwrap();
    ed.mark_saved();
    assert!(!ed.is_dirty());

    let loaded = pollster::block_on(storage.load(&document.id)).unwrap();
    let json = loaded.to_json().unwrap();
    let reopened = Document::from_json(&json).unwrap();

    let mut restored =
        EditController::from_document(ed.registry_handle(), &reopened, EditorConfig::default())
            .unwrap();
    assert_eq!(snapshot(&restored), snapshot(&ed));
    assert!(!restored.can_undo());

    let inserted = restored.insert_template("Mix Label", Point::new(200.0, 100.0));
    assert_eq!(inserted.len(), 1);
    let node = restored.tree().get(inserted[0]).unwrap();
    assert_eq!(
        restored.registry().read(node, "back-color", restored.catalog()).as_deref(),
        Some("panel")
    );
}
